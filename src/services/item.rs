//! Item data access.
//!
//! DESIGN
//! ======
//! The single typed layer over the `items` table: browse filters, detail
//! with owner summary, owner-guarded mutation, and the featured strip.
//! Status strings in the database are always canonical because every write
//! goes through `ItemStatus`; reads keep the raw string so display code can
//! apply its unknown-value fallback uniformly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use super::pricing::{PricingError, PricingTiers};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("item not found: {0}")]
    NotFound(Uuid),
    #[error("user {user_id} does not own item {item_id}")]
    Forbidden { user_id: Uuid, item_id: Uuid },
    #[error("item {0} has open bookings")]
    HasOpenBookings(Uuid),
    #[error("unknown category")]
    InvalidCategory,
    #[error("unknown item status: {0}")]
    InvalidStatus(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Rented,
    Maintenance,
    Inactive,
}

impl ItemStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "rented" => Some(Self::Rented),
            "maintenance" => Some(Self::Maintenance),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Row returned from item queries.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price_per_day: i64,
    pub price_three_days: Option<i64>,
    pub price_seven_days: Option<i64>,
    pub photos: Vec<String>,
    pub city: String,
    pub cancellation_policy: String,
    pub item_value: Option<i64>,
    pub status: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl ItemRow {
    #[must_use]
    pub fn tiers(&self) -> PricingTiers {
        PricingTiers {
            one_day: self.price_per_day,
            three_days: self.price_three_days,
            seven_days: self.price_seven_days,
        }
    }
}

/// Public owner summary shown on the item detail page.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub rating_avg: Option<f64>,
    pub rating_count: i64,
}

/// Browse filters for the public item list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub q: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 50;

impl ItemFilter {
    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE))
    }

    pub(crate) fn offset(&self) -> i64 {
        let page = i64::from(self.page.unwrap_or(1).max(1));
        (page - 1) * self.limit()
    }
}

/// Owner-supplied partial update. `None` leaves a field unchanged; pricing
/// is replaced as a whole tier set, never field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<PricingTiers>,
    pub city: Option<String>,
    pub cancellation_policy: Option<String>,
    pub item_value: Option<i64>,
}

pub(crate) const ITEM_COLUMNS: &str = "id, owner_id, title, description, category, subcategory, \
     price_per_day, price_three_days, price_seven_days, photos, city, \
     cancellation_policy, item_value, status, featured, created_at";

pub(crate) fn row_to_item(r: &PgRow) -> ItemRow {
    let photos: serde_json::Value = r.get("photos");
    ItemRow {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        description: r.get("description"),
        category: r.get("category"),
        subcategory: r.get("subcategory"),
        price_per_day: r.get("price_per_day"),
        price_three_days: r.get("price_three_days"),
        price_seven_days: r.get("price_seven_days"),
        photos: serde_json::from_value(photos).unwrap_or_default(),
        city: r.get("city"),
        cancellation_policy: r.get("cancellation_policy"),
        item_value: r.get("item_value"),
        status: r.get("status"),
        featured: r.get("featured"),
        created_at: r.get("created_at"),
    }
}

// =============================================================================
// READS
// =============================================================================

/// Fetch one item.
///
/// # Errors
///
/// `NotFound` when no such item exists, or a database error.
pub async fn get_item(pool: &PgPool, item_id: Uuid) -> Result<ItemRow, ItemError> {
    let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(item_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ItemError::NotFound(item_id))?;
    Ok(row_to_item(&row))
}

/// Fetch the public owner summary for an item detail page.
///
/// # Errors
///
/// `NotFound` when the owner row is missing, or a database error.
pub async fn get_owner_summary(pool: &PgPool, owner_id: Uuid) -> Result<OwnerSummary, ItemError> {
    let row = sqlx::query(
        r"SELECT user_id, display_name, avatar_url, city, rating_sum, rating_count
          FROM profiles WHERE user_id = $1",
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ItemError::NotFound(owner_id))?;

    let rating_sum: i64 = row.get("rating_sum");
    let rating_count: i64 = row.get("rating_count");
    Ok(OwnerSummary {
        user_id: row.get("user_id"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        city: row.get("city"),
        rating_avg: rating_average(rating_sum, rating_count),
        rating_count,
    })
}

/// Average rating rounded to one decimal, `None` before the first rating.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rating_average(sum: i64, count: i64) -> Option<f64> {
    if count <= 0 {
        return None;
    }
    let avg = sum as f64 / count as f64;
    Some((avg * 10.0).round() / 10.0)
}

/// List active items for the public browse grid, filtered and paginated,
/// newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_items(pool: &PgPool, filter: &ItemFilter) -> Result<Vec<ItemRow>, ItemError> {
    let mut builder = QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE status = 'active'"));

    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(subcategory) = &filter.subcategory {
        builder.push(" AND subcategory = ").push_bind(subcategory);
    }
    if let Some(city) = &filter.city {
        builder.push(" AND city = ").push_bind(city);
    }
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        builder.push(" AND (title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR description ILIKE ").push_bind(pattern);
        builder.push(")");
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price_per_day >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price_per_day <= ").push_bind(max);
    }

    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(filter.limit());
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset());

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_item).collect())
}

/// The home-page featured strip: active, flagged items, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn featured_items(pool: &PgPool, limit: i64) -> Result<Vec<ItemRow>, ItemError> {
    let rows = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM items
         WHERE featured AND status = 'active'
         ORDER BY created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_item).collect())
}

/// List every item the owner has, regardless of status, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_owner_items(pool: &PgPool, owner_id: Uuid) -> Result<Vec<ItemRow>, ItemError> {
    let rows = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_item).collect())
}

// =============================================================================
// OWNER-GUARDED WRITES
// =============================================================================

async fn ensure_owner(pool: &PgPool, item_id: Uuid, user_id: Uuid) -> Result<(), ItemError> {
    let owner_id: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

    match owner_id {
        None => Err(ItemError::NotFound(item_id)),
        Some(owner) if owner != user_id => Err(ItemError::Forbidden { user_id, item_id }),
        Some(_) => Ok(()),
    }
}

/// Apply a partial update to an owned item. The merged pricing tier set is
/// re-validated as a whole before anything is written.
///
/// # Errors
///
/// `NotFound`/`Forbidden` on ownership failures, a pricing error when the
/// merged tiers violate the caps, or a database error.
pub async fn update_item(
    pool: &PgPool,
    item_id: Uuid,
    user_id: Uuid,
    update: &ItemUpdate,
) -> Result<ItemRow, ItemError> {
    ensure_owner(pool, item_id, user_id).await?;
    let current = get_item(pool, item_id).await?;

    let tiers = update.pricing.unwrap_or_else(|| current.tiers());
    tiers.validate()?;

    let title = update.title.as_deref().unwrap_or(&current.title);
    let description = update.description.as_deref().unwrap_or(&current.description);
    let city = update.city.as_deref().unwrap_or(&current.city);
    let cancellation_policy = update
        .cancellation_policy
        .as_deref()
        .unwrap_or(&current.cancellation_policy);
    let item_value = update.item_value.or(current.item_value);

    sqlx::query(
        r"UPDATE items
          SET title = $2, description = $3, price_per_day = $4,
              price_three_days = $5, price_seven_days = $6, city = $7,
              cancellation_policy = $8, item_value = $9, updated_at = now()
          WHERE id = $1",
    )
    .bind(item_id)
    .bind(title)
    .bind(description)
    .bind(tiers.one_day)
    .bind(tiers.three_days)
    .bind(tiers.seven_days)
    .bind(city)
    .bind(cancellation_policy)
    .bind(item_value)
    .execute(pool)
    .await?;

    get_item(pool, item_id).await
}

/// Change an owned item's lifecycle status.
///
/// # Errors
///
/// `NotFound`/`Forbidden` on ownership failures, or a database error.
pub async fn set_status(
    pool: &PgPool,
    item_id: Uuid,
    user_id: Uuid,
    status: ItemStatus,
) -> Result<(), ItemError> {
    ensure_owner(pool, item_id, user_id).await?;
    sqlx::query("UPDATE items SET status = $2, updated_at = now() WHERE id = $1")
        .bind(item_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete an owned item. Refused while any booking on it is still open.
///
/// # Errors
///
/// `NotFound`/`Forbidden` on ownership failures, `HasOpenBookings` when an
/// open booking exists, or a database error.
pub async fn delete_item(pool: &PgPool, item_id: Uuid, user_id: Uuid) -> Result<(), ItemError> {
    ensure_owner(pool, item_id, user_id).await?;

    let open: bool = sqlx::query_scalar(
        "SELECT EXISTS(
            SELECT 1 FROM bookings
            WHERE item_id = $1 AND status IN ('pending', 'confirmed', 'active')
         )",
    )
    .bind(item_id)
    .fetch_one(pool)
    .await?;
    if open {
        return Err(ItemError::HasOpenBookings(item_id));
    }

    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "item_test.rs"]
mod tests;
