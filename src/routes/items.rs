//! Public browse routes — categories, item lists, detail, quotes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{error_response, pricing_key};
use crate::i18n::{self, Lang, MessageKey};
use crate::services::catalog;
use crate::services::item::{self, ItemError, ItemFilter, ItemRow, OwnerSummary};
use crate::services::pricing::RentalQuote;
use crate::services::retry;

pub(crate) fn item_error_response(err: &ItemError, lang: Lang) -> Response {
    let (status, code, key) = match err {
        ItemError::NotFound(_) => (StatusCode::NOT_FOUND, "item_not_found", MessageKey::ItemNotFound),
        ItemError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden", MessageKey::Forbidden),
        ItemError::HasOpenBookings(_) => (StatusCode::CONFLICT, "has_open_bookings", MessageKey::HasOpenBookings),
        ItemError::InvalidCategory => (StatusCode::BAD_REQUEST, "invalid_category", MessageKey::InvalidCategory),
        ItemError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "invalid_status", MessageKey::InvalidStatus),
        ItemError::Pricing(p) => (StatusCode::BAD_REQUEST, "invalid_pricing", pricing_key(p)),
        ItemError::Database(e) => {
            tracing::error!(error = %e, "item database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

/// Item plus the display strings the UI renders next to it.
#[derive(Serialize)]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: ItemRow,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub price_display: String,
}

pub(crate) fn to_item_response(item: ItemRow, lang: Lang) -> ItemResponse {
    let status_label = i18n::item_status_text(&item.status, lang);
    let status_color = i18n::item_status_color(&item.status);
    let price_display = i18n::format_shekels(item.price_per_day);
    ItemResponse { item, status_label, status_color, price_display }
}

#[derive(Serialize)]
pub struct SubcategoryResponse {
    pub slug: &'static str,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub slug: &'static str,
    pub label: &'static str,
    pub subcategories: Vec<SubcategoryResponse>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/categories` — the browse grid, labels localized.
pub async fn categories(lang: Lang) -> Json<Vec<CategoryResponse>> {
    let list = catalog::CATEGORIES
        .iter()
        .map(|cat| CategoryResponse {
            slug: cat.slug,
            label: cat.label(lang),
            subcategories: cat
                .subcategories
                .iter()
                .map(|sub| SubcategoryResponse { slug: sub.slug, label: sub.label(lang) })
                .collect(),
        })
        .collect();
    Json(list)
}

/// `GET /api/items` — filtered, paginated browse list.
pub async fn list(
    State(state): State<crate::state::AppState>,
    lang: Lang,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ItemResponse>>, Response> {
    let rows = item::list_items(&state.pool, &filter)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    Ok(Json(rows.into_iter().map(|r| to_item_response(r, lang)).collect()))
}

const FEATURED_LIMIT: i64 = 8;

/// `GET /api/items/featured` — home-page strip. The one fetch with a retry
/// policy: up to 3 attempts with linear backoff.
pub async fn featured(
    State(state): State<crate::state::AppState>,
    lang: Lang,
) -> Result<Json<Vec<ItemResponse>>, Response> {
    let rows = retry::with_retry(retry::DEFAULT_MAX_ATTEMPTS, retry::DEFAULT_BASE_DELAY, || {
        item::featured_items(&state.pool, FEATURED_LIMIT)
    })
    .await
    .map_err(|e| item_error_response(&e, lang))?;
    Ok(Json(rows.into_iter().map(|r| to_item_response(r, lang)).collect()))
}

#[derive(Serialize)]
pub struct ItemDetailResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub owner: OwnerSummary,
}

/// `GET /api/items/:id` — item detail with the owner's public summary.
pub async fn detail(
    State(state): State<crate::state::AppState>,
    lang: Lang,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemDetailResponse>, Response> {
    let row = item::get_item(&state.pool, item_id)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    let owner = item::get_owner_summary(&state.pool, row.owner_id)
        .await
        .map_err(|e| item_error_response(&e, lang))?;

    Ok(Json(ItemDetailResponse { item: to_item_response(row, lang), owner }))
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub start_date: NaiveDate,
    pub days: u32,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: RentalQuote,
    pub total_display: String,
}

/// `GET /api/items/:id/quote?start_date&days` — server-side rental quote.
pub async fn quote(
    State(state): State<crate::state::AppState>,
    lang: Lang,
    Path(item_id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, Response> {
    let row = item::get_item(&state.pool, item_id)
        .await
        .map_err(|e| item_error_response(&e, lang))?;

    let quote = RentalQuote::compute(row.price_per_day, query.start_date, query.days)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, "invalid_quote", lang, pricing_key(&e)))?;

    let total_display = i18n::format_shekels(quote.total);
    Ok(Json(QuoteResponse { quote, total_display }))
}

#[cfg(test)]
#[path = "items_test.rs"]
mod tests;
