//! Owner listing management — item mutation and the publish wizard.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::AuthUser;
use super::items::{ItemResponse, item_error_response, to_item_response};
use super::{error_response, pricing_key, read_image_field, storage_error_response};
use crate::i18n::{Lang, MessageKey};
use crate::services::item::{self, ItemStatus, ItemUpdate};
use crate::services::listing::{self, DraftRow, DraftUpdate, ListingError};
use crate::state::AppState;
use crate::storage::BUCKET_ITEM_PHOTOS;

fn listing_error_response(err: &ListingError, lang: Lang) -> Response {
    let (status, code, key) = match err {
        ListingError::NotFound(_) => (StatusCode::NOT_FOUND, "draft_not_found", MessageKey::DraftNotFound),
        ListingError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden", MessageKey::Forbidden),
        ListingError::AtFirstStep => (StatusCode::CONFLICT, "at_first_step", MessageKey::AtFirstStep),
        ListingError::AtLastStep => (StatusCode::CONFLICT, "at_last_step", MessageKey::AtLastStep),
        ListingError::NotAtReviewStep => (StatusCode::CONFLICT, "not_at_review_step", MessageKey::DraftIncomplete),
        ListingError::Incomplete(_) => (StatusCode::BAD_REQUEST, "draft_incomplete", MessageKey::DraftIncomplete),
        ListingError::InvalidCategory => (StatusCode::BAD_REQUEST, "invalid_category", MessageKey::InvalidCategory),
        ListingError::InvalidPolicy(_) => (StatusCode::BAD_REQUEST, "invalid_policy", MessageKey::InvalidPolicy),
        ListingError::TooManyPhotos => (StatusCode::BAD_REQUEST, "too_many_photos", MessageKey::TooManyPhotos),
        ListingError::Pricing(p) => (StatusCode::BAD_REQUEST, "invalid_pricing", pricing_key(p)),
        ListingError::Database(e) => {
            tracing::error!(error = %e, "listing database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

// =============================================================================
// OWNED ITEMS
// =============================================================================

/// `GET /api/listings` — every item the signed-in user owns.
pub async fn my_items(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
) -> Result<Json<Vec<ItemResponse>>, Response> {
    let rows = item::list_owner_items(&state.pool, auth.user.id)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    Ok(Json(rows.into_iter().map(|r| to_item_response(r, lang)).collect()))
}

/// `PATCH /api/items/:id` — partial update of an owned item.
pub async fn update_item(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
    Json(body): Json<ItemUpdate>,
) -> Result<Json<ItemResponse>, Response> {
    let row = item::update_item(&state.pool, item_id, auth.user.id, &body)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    Ok(Json(to_item_response(row, lang)))
}

/// `DELETE /api/items/:id` — delete an owned item without open bookings.
pub async fn delete_item(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    item::delete_item(&state.pool, item_id, auth.user.id)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SetItemStatusBody {
    pub status: String,
}

/// `POST /api/items/:id/status` — owner lifecycle change
/// (active/rented/maintenance/inactive).
pub async fn set_item_status(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
    Json(body): Json<SetItemStatusBody>,
) -> Result<StatusCode, Response> {
    let Some(status) = ItemStatus::parse(&body.status) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "invalid_status", lang, MessageKey::InvalidStatus));
    };

    item::set_status(&state.pool, item_id, auth.user.id, status)
        .await
        .map_err(|e| item_error_response(&e, lang))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// WIZARD DRAFTS
// =============================================================================

/// `POST /api/listings/drafts` — start the publish wizard at step 1.
pub async fn create_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
) -> Result<(StatusCode, Json<DraftRow>), Response> {
    let draft = listing::create_draft(&state.pool, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// `GET /api/listings/drafts/:id` — fetch a draft in progress.
pub async fn get_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftRow>, Response> {
    let draft = listing::get_draft(&state.pool, draft_id, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok(Json(draft))
}

/// `PATCH /api/listings/drafts/:id` — merge wizard fields into the draft.
pub async fn update_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<DraftUpdate>,
) -> Result<Json<DraftRow>, Response> {
    let draft = listing::update_draft(&state.pool, draft_id, auth.user.id, &body)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok(Json(draft))
}

/// `POST /api/listings/drafts/:id/next` — one step forward.
pub async fn advance_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftRow>, Response> {
    let draft = listing::advance(&state.pool, draft_id, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok(Json(draft))
}

/// `POST /api/listings/drafts/:id/back` — one step back.
pub async fn back_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftRow>, Response> {
    let draft = listing::back(&state.pool, draft_id, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok(Json(draft))
}

/// `POST /api/listings/drafts/:id/photos` — stage a photo on the draft.
pub async fn upload_photo(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DraftRow>, Response> {
    // Check draft access before accepting bytes.
    listing::get_draft(&state.pool, draft_id, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;

    let (content_type, bytes) = read_image_field(&mut multipart, lang).await?;
    let url = state
        .store
        .put(BUCKET_ITEM_PHOTOS, &content_type, &bytes)
        .await
        .map_err(|e| storage_error_response(&e, lang))?;

    match listing::add_photo(&state.pool, draft_id, auth.user.id, &url).await {
        Ok(draft) => Ok(Json(draft)),
        Err(e) => {
            // The object is orphaned if the draft write failed; reclaim it.
            if let Err(del) = state.store.delete(&url).await {
                tracing::warn!(error = %del, %url, "orphaned photo cleanup failed");
            }
            Err(listing_error_response(&e, lang))
        }
    }
}

/// `POST /api/listings/drafts/:id/submit` — publish the listing.
pub async fn submit_draft(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Path(draft_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ItemResponse>), Response> {
    let item = listing::submit(&state.pool, draft_id, auth.user.id)
        .await
        .map_err(|e| listing_error_response(&e, lang))?;
    Ok((StatusCode::CREATED, Json(to_item_response(item, lang))))
}

#[cfg(test)]
#[path = "listings_test.rs"]
mod tests;
