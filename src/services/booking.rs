//! Booking lifecycle and creation.
//!
//! DESIGN
//! ======
//! The status vocabulary is canonical and closed: `pending, confirmed,
//! rejected, active, completed, cancelled`. The legacy synonyms `approved`
//! and `canceled` are accepted at the parse boundary and normalized before
//! anything is written, so the database only ever holds canonical strings.
//!
//! Transitions are authoritative and role-guarded: the item owner moves a
//! booking forward (confirm/reject/activate/complete), the renter may only
//! cancel, and terminal states accept nothing. Creation computes the rental
//! window and total server-side and rejects date overlap with confirmed or
//! active bookings inside the insert transaction; pending requests may
//! coexist until the owner confirms one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::pricing::{PricingError, RentalQuote};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("item not found: {0}")]
    ItemNotFound(Uuid),
    #[error("item {0} is not available for rent")]
    ItemUnavailable(Uuid),
    #[error("renters cannot book their own items")]
    OwnBooking,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("item is already booked for the requested dates")]
    Overlap,
    #[error("booking not found: {0}")]
    NotFound(Uuid),
    #[error("user {user_id} is not a party to booking {booking_id}")]
    Forbidden { user_id: Uuid, booking_id: Uuid },
    #[error("unknown booking status: {0}")]
    InvalidStatus(String),
    #[error("cannot move a booking from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[serde(alias = "approved")]
    Confirmed,
    Rejected,
    Active,
    Completed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status string. Accepts the legacy `approved`/`canceled`
    /// synonyms and returns the canonical value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" | "approved" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Transitions permitted out of this status, any actor.
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [BookingStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Rejected, Self::Cancelled],
            Self::Confirmed => &[Self::Active, Self::Cancelled],
            Self::Active => &[Self::Completed],
            Self::Rejected | Self::Completed | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Which side of the booking the acting user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Owner,
    Renter,
}

/// Role rule on top of the transition table: owners move bookings forward,
/// renters may only cancel.
#[must_use]
pub fn actor_may(actor: BookingActor, to: BookingStatus) -> bool {
    match actor {
        BookingActor::Owner => matches!(
            to,
            BookingStatus::Confirmed | BookingStatus::Rejected | BookingStatus::Active | BookingStatus::Completed
        ),
        BookingActor::Renter => to == BookingStatus::Cancelled,
    }
}

/// Row returned from booking queries.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_days: i32,
    pub total_price: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Booking joined with display context for list pages: the item's title and
/// cover photo, plus the other party's display name.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_title: String,
    pub item_photo: Option<String>,
    pub counterparty_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_days: i32,
    pub total_price: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn row_to_booking(r: &PgRow) -> BookingRow {
    BookingRow {
        id: r.get("id"),
        item_id: r.get("item_id"),
        renter_id: r.get("renter_id"),
        start_date: r.get("start_date"),
        end_date: r.get("end_date"),
        rental_days: r.get("rental_days"),
        total_price: r.get("total_price"),
        status: r.get("status"),
        created_at: r.get("created_at"),
    }
}

fn row_to_list_row(r: &PgRow) -> BookingListRow {
    let photos: serde_json::Value = r.get("photos");
    let item_photo = photos
        .as_array()
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned);
    BookingListRow {
        id: r.get("id"),
        item_id: r.get("item_id"),
        item_title: r.get("title"),
        item_photo,
        counterparty_name: r.get("counterparty_name"),
        start_date: r.get("start_date"),
        end_date: r.get("end_date"),
        rental_days: r.get("rental_days"),
        total_price: r.get("total_price"),
        status: r.get("status"),
        created_at: r.get("created_at"),
    }
}

// =============================================================================
// CREATION
// =============================================================================

/// Create a booking request for `days` starting at `start_date`.
///
/// The quote (end date, total) is computed here, never taken from the
/// client. The item row is locked for the duration of the transaction so
/// two concurrent requests cannot both pass the overlap check.
///
/// # Errors
///
/// `ItemNotFound`/`ItemUnavailable`/`OwnBooking` for a bad target, a
/// pricing error for a bad window, `Overlap` when the dates collide with a
/// confirmed or active booking, or a database error.
pub async fn create_booking(
    pool: &PgPool,
    renter_id: Uuid,
    item_id: Uuid,
    start_date: NaiveDate,
    days: u32,
) -> Result<BookingRow, BookingError> {
    let mut tx = pool.begin().await?;

    let item = sqlx::query("SELECT owner_id, price_per_day, status FROM items WHERE id = $1 FOR UPDATE")
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::ItemNotFound(item_id))?;

    let owner_id: Uuid = item.get("owner_id");
    let price_per_day: i64 = item.get("price_per_day");
    let status: String = item.get("status");

    if status != "active" {
        return Err(BookingError::ItemUnavailable(item_id));
    }
    if owner_id == renter_id {
        return Err(BookingError::OwnBooking);
    }

    let quote = RentalQuote::compute(price_per_day, start_date, days)?;

    let overlapping: bool = sqlx::query_scalar(
        "SELECT EXISTS(
            SELECT 1 FROM bookings
            WHERE item_id = $1
              AND status IN ('confirmed', 'active')
              AND start_date < $3
              AND end_date > $2
         )",
    )
    .bind(item_id)
    .bind(quote.start_date)
    .bind(quote.end_date)
    .fetch_one(&mut *tx)
    .await?;
    if overlapping {
        return Err(BookingError::Overlap);
    }

    let row = sqlx::query(
        r"INSERT INTO bookings (item_id, renter_id, start_date, end_date, rental_days, total_price, status)
          VALUES ($1, $2, $3, $4, $5, $6, 'pending')
          RETURNING id, item_id, renter_id, start_date, end_date, rental_days, total_price, status, created_at",
    )
    .bind(item_id)
    .bind(renter_id)
    .bind(quote.start_date)
    .bind(quote.end_date)
    .bind(i32::try_from(quote.days).unwrap_or(i32::MAX))
    .bind(quote.total)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(booking_id = %row.get::<Uuid, _>("id"), %item_id, "booking requested");
    Ok(row_to_booking(&row))
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Apply a status transition on behalf of `user_id`.
///
/// # Errors
///
/// `NotFound` for a missing booking, `Forbidden` when the user is neither
/// party, `InvalidStatus` for an unrecognized stored status,
/// `InvalidTransition` when the table or role rule rejects the move, or a
/// database error.
pub async fn transition(
    pool: &PgPool,
    booking_id: Uuid,
    user_id: Uuid,
    to: BookingStatus,
) -> Result<BookingRow, BookingError> {
    let row = sqlx::query(
        r"SELECT b.id, b.item_id, b.renter_id, b.start_date, b.end_date,
                 b.rental_days, b.total_price, b.status, b.created_at,
                 i.owner_id
          FROM bookings b
          JOIN items i ON i.id = b.item_id
          WHERE b.id = $1",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .ok_or(BookingError::NotFound(booking_id))?;

    let owner_id: Uuid = row.get("owner_id");
    let booking = row_to_booking(&row);

    let actor = if user_id == owner_id {
        BookingActor::Owner
    } else if user_id == booking.renter_id {
        BookingActor::Renter
    } else {
        return Err(BookingError::Forbidden { user_id, booking_id });
    };

    let from = BookingStatus::parse(&booking.status)
        .ok_or_else(|| BookingError::InvalidStatus(booking.status.clone()))?;

    if !from.can_transition(to) || !actor_may(actor, to) {
        return Err(BookingError::InvalidTransition { from: from.as_str(), to: to.as_str() });
    }

    let updated = sqlx::query(
        r"UPDATE bookings SET status = $2, updated_at = now()
          WHERE id = $1
          RETURNING id, item_id, renter_id, start_date, end_date, rental_days, total_price, status, created_at",
    )
    .bind(booking_id)
    .bind(to.as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(%booking_id, from = from.as_str(), to = to.as_str(), "booking transitioned");
    Ok(row_to_booking(&updated))
}

// =============================================================================
// READS
// =============================================================================

/// Fetch one booking, visible only to its renter or the item owner.
///
/// # Errors
///
/// `NotFound`, `Forbidden`, or a database error.
pub async fn get_booking(pool: &PgPool, booking_id: Uuid, user_id: Uuid) -> Result<BookingRow, BookingError> {
    let row = sqlx::query(
        r"SELECT b.id, b.item_id, b.renter_id, b.start_date, b.end_date,
                 b.rental_days, b.total_price, b.status, b.created_at,
                 i.owner_id
          FROM bookings b
          JOIN items i ON i.id = b.item_id
          WHERE b.id = $1",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .ok_or(BookingError::NotFound(booking_id))?;

    let owner_id: Uuid = row.get("owner_id");
    let booking = row_to_booking(&row);
    if user_id != owner_id && user_id != booking.renter_id {
        return Err(BookingError::Forbidden { user_id, booking_id });
    }
    Ok(booking)
}

/// Bookings the user created, newest first ("my rentals").
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_renter(pool: &PgPool, renter_id: Uuid) -> Result<Vec<BookingListRow>, BookingError> {
    let rows = sqlx::query(
        r"SELECT b.id, b.item_id, b.start_date, b.end_date, b.rental_days,
                 b.total_price, b.status, b.created_at,
                 i.title, i.photos, p.display_name AS counterparty_name
          FROM bookings b
          JOIN items i ON i.id = b.item_id
          JOIN profiles p ON p.user_id = i.owner_id
          WHERE b.renter_id = $1
          ORDER BY b.created_at DESC",
    )
    .bind(renter_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_list_row).collect())
}

/// Booking requests on the user's items, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<BookingListRow>, BookingError> {
    let rows = sqlx::query(
        r"SELECT b.id, b.item_id, b.start_date, b.end_date, b.rental_days,
                 b.total_price, b.status, b.created_at,
                 i.title, i.photos, p.display_name AS counterparty_name
          FROM bookings b
          JOIN items i ON i.id = b.item_id
          JOIN profiles p ON p.user_id = b.renter_id
          WHERE i.owner_id = $1
          ORDER BY b.created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_list_row).collect())
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
