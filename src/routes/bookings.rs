//! Booking routes — request, lists, detail, lifecycle transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AuthUser;
use super::{error_response, pricing_key};
use crate::i18n::{self, Lang, MessageKey};
use crate::services::booking::{
    self, BookingActor, BookingError, BookingListRow, BookingRow, BookingStatus, actor_may,
};
use crate::state::AppState;

fn booking_error_response(err: &BookingError, lang: Lang) -> Response {
    let (status, code, key) = match err {
        BookingError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "item_not_found", MessageKey::ItemNotFound),
        BookingError::ItemUnavailable(_) => (StatusCode::CONFLICT, "item_unavailable", MessageKey::ItemUnavailable),
        BookingError::OwnBooking => (StatusCode::BAD_REQUEST, "own_booking", MessageKey::OwnBooking),
        BookingError::Pricing(p) => (StatusCode::BAD_REQUEST, "invalid_range", pricing_key(p)),
        BookingError::Overlap => (StatusCode::CONFLICT, "booking_overlap", MessageKey::BookingOverlap),
        BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "booking_not_found", MessageKey::BookingNotFound),
        BookingError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden", MessageKey::Forbidden),
        BookingError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, "invalid_transition", MessageKey::InvalidTransition)
        }
        BookingError::InvalidStatus(raw) => {
            tracing::error!(status = %raw, "stored booking status is not canonical");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
        BookingError::Database(e) => {
            tracing::error!(error = %e, "booking database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

/// Booking plus the display strings the UI renders next to it.
#[derive(Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: BookingRow,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub total_display: String,
}

fn to_booking_response(booking: BookingRow, lang: Lang) -> BookingResponse {
    let status_label = i18n::booking_status_text(&booking.status, lang);
    let status_color = i18n::booking_status_color(&booking.status);
    let total_display = i18n::format_shekels(booking.total_price);
    BookingResponse { booking, status_label, status_color, total_display }
}

#[derive(Serialize)]
pub struct BookingListResponse {
    #[serde(flatten)]
    pub row: BookingListRow,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub total_display: String,
}

fn to_list_response(row: BookingListRow, lang: Lang) -> BookingListResponse {
    let status_label = i18n::booking_status_text(&row.status, lang);
    let status_color = i18n::booking_status_color(&row.status);
    let total_display = i18n::format_shekels(row.total_price);
    BookingListResponse { row, status_label, status_color, total_display }
}

/// Transitions the acting user may take from the booking's current status.
/// Unknown stored statuses yield no actions, matching the unknown-status
/// display fallback.
pub(crate) fn transitions_for(raw_status: &str, actor: BookingActor) -> Vec<&'static str> {
    BookingStatus::parse(raw_status)
        .map(|from| {
            from.allowed_transitions()
                .iter()
                .copied()
                .filter(|to| actor_may(actor, *to))
                .map(BookingStatus::as_str)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct CreateBookingBody {
    pub item_id: Uuid,
    pub start_date: NaiveDate,
    pub days: u32,
}

/// `POST /api/bookings` — request a rental; the quote is computed here.
pub async fn create(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<BookingResponse>), Response> {
    let booking = booking::create_booking(&state.pool, auth.user.id, body.item_id, body.start_date, body.days)
        .await
        .map_err(|e| booking_error_response(&e, lang))?;
    Ok((StatusCode::CREATED, Json(to_booking_response(booking, lang))))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub role: Option<String>,
}

/// `GET /api/bookings?role=renter|owner` — my rentals, or requests on my
/// items. Defaults to the renter view.
pub async fn list(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingListResponse>>, Response> {
    let rows = match query.role.as_deref() {
        Some("owner") => booking::list_for_owner(&state.pool, auth.user.id).await,
        _ => booking::list_for_renter(&state.pool, auth.user.id).await,
    }
    .map_err(|e| booking_error_response(&e, lang))?;

    Ok(Json(rows.into_iter().map(|r| to_list_response(r, lang)).collect()))
}

#[derive(Serialize)]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    /// Status values the caller may move this booking to.
    pub allowed_transitions: Vec<&'static str>,
}

/// `GET /api/bookings/:id` — one booking, renter or owner only.
pub async fn detail(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingDetailResponse>, Response> {
    let booking = booking::get_booking(&state.pool, booking_id, auth.user.id)
        .await
        .map_err(|e| booking_error_response(&e, lang))?;

    let actor = if booking.renter_id == auth.user.id {
        BookingActor::Renter
    } else {
        BookingActor::Owner
    };
    let allowed_transitions = transitions_for(&booking.status, actor);

    Ok(Json(BookingDetailResponse {
        booking: to_booking_response(booking, lang),
        allowed_transitions,
    }))
}

#[derive(Deserialize)]
pub struct SetStatusBody {
    pub status: String,
}

/// `POST /api/bookings/:id/status` — role-guarded lifecycle transition.
/// Accepts the legacy `approved`/`canceled` spellings and normalizes them.
pub async fn set_status(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<BookingResponse>, Response> {
    let Some(to) = BookingStatus::parse(&body.status) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "invalid_status", lang, MessageKey::InvalidStatus));
    };

    let booking = booking::transition(&state.pool, booking_id, auth.user.id, to)
        .await
        .map_err(|e| booking_error_response(&e, lang))?;
    Ok(Json(to_booking_response(booking, lang)))
}

#[cfg(test)]
#[path = "bookings_test.rs"]
mod tests;
