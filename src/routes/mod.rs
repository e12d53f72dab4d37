//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds every HTTP endpoint under a single Axum router: the
//! JSON API under `/api`, uploaded objects served read-only under
//! `/uploads`, and a health probe. Error responses share one localized JSON
//! shape, and the response language is picked per request (`lang` query
//! parameter, then `Accept-Language`, defaulting to Hebrew).

pub mod auth;
pub mod bookings;
pub mod items;
pub mod listings;
pub mod profiles;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::i18n::{self, Lang, MessageKey};
use crate::services::pricing::PricingError;
use crate::state::AppState;

/// Request body cap, sized above the per-object storage limit so multipart
/// framing overhead does not reject a maximal image.
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Build the application router.
pub fn app(state: AppState, uploads_dir: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/password", post(auth::change_password))
        .route("/api/auth/password/request-reset", post(auth::request_reset))
        .route("/api/auth/password/reset", post(auth::reset_password))
        .route("/api/categories", get(items::categories))
        .route("/api/items", get(items::list))
        .route("/api/items/featured", get(items::featured))
        .route(
            "/api/items/{id}",
            get(items::detail)
                .patch(listings::update_item)
                .delete(listings::delete_item),
        )
        .route("/api/items/{id}/quote", get(items::quote))
        .route("/api/items/{id}/status", post(listings::set_item_status))
        .route("/api/listings", get(listings::my_items))
        .route("/api/listings/drafts", post(listings::create_draft))
        .route(
            "/api/listings/drafts/{id}",
            get(listings::get_draft).patch(listings::update_draft),
        )
        .route("/api/listings/drafts/{id}/next", post(listings::advance_draft))
        .route("/api/listings/drafts/{id}/back", post(listings::back_draft))
        .route("/api/listings/drafts/{id}/photos", post(listings::upload_photo))
        .route("/api/listings/drafts/{id}/submit", post(listings::submit_draft))
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route("/api/bookings/{id}", get(bookings::detail))
        .route("/api/bookings/{id}/status", post(bookings::set_status))
        .route("/api/profiles/me", axum::routing::patch(profiles::update_me))
        .route("/api/profiles/me/avatar", post(profiles::upload_avatar))
        .route("/api/profiles/{id}", get(profiles::detail))
        .route("/healthz", get(healthz))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(axum::extract::DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERROR BODY
// =============================================================================

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: &'static str,
}

/// Localized JSON error response shared by every route module.
pub(crate) fn error_response(status: StatusCode, code: &'static str, lang: Lang, key: MessageKey) -> Response {
    let body = ErrorBody {
        error: ErrorDetail { code, message: i18n::message(lang, key) },
    };
    (status, Json(body)).into_response()
}

/// Message key for a pricing violation.
pub(crate) fn pricing_key(err: &PricingError) -> MessageKey {
    match err {
        PricingError::BasePriceRequired => MessageKey::BasePriceRequired,
        PricingError::NonPositiveTier => MessageKey::NonPositiveTier,
        PricingError::TierThreeTooHigh => MessageKey::TierThreeTooHigh,
        PricingError::TierSevenTooHigh => MessageKey::TierSevenTooHigh,
        PricingError::InvalidDays => MessageKey::InvalidDateRange,
        PricingError::Overflow => MessageKey::PriceOverflow,
    }
}

// =============================================================================
// UPLOAD PLUMBING
// =============================================================================

/// Pull the first file field out of a multipart upload, returning its
/// content type and bytes.
pub(crate) async fn read_image_field(
    multipart: &mut axum::extract::Multipart,
    lang: Lang,
) -> Result<(String, Vec<u8>), Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "missing_file", lang, MessageKey::MissingFile))?
    {
        let Some(content_type) = field.content_type().map(ToOwned::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|_| error_response(StatusCode::PAYLOAD_TOO_LARGE, "upload_too_large", lang, MessageKey::UploadTooLarge))?;
        return Ok((content_type, bytes.to_vec()));
    }

    Err(error_response(StatusCode::BAD_REQUEST, "missing_file", lang, MessageKey::MissingFile))
}

pub(crate) fn storage_error_response(err: &crate::storage::StorageError, lang: Lang) -> Response {
    use crate::storage::StorageError;
    let (status, code, key) = match err {
        StorageError::UnsupportedType(_) => {
            (StatusCode::BAD_REQUEST, "unsupported_image_type", MessageKey::UnsupportedImageType)
        }
        StorageError::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "upload_too_large", MessageKey::UploadTooLarge),
        StorageError::ForeignUrl(_) | StorageError::Io(_) => {
            tracing::error!(error = %err, "storage error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

// =============================================================================
// LANGUAGE SELECTION
// =============================================================================

pub(crate) fn lang_from_parts(parts: &Parts) -> Lang {
    let from_query = parts
        .uri
        .query()
        .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("lang=").and_then(Lang::parse)));
    if let Some(lang) = from_query {
        return lang;
    }

    parts
        .headers
        .get(axum::http::header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| {
            raw.split(',')
                .find_map(|tag| Lang::parse(tag.split(';').next().unwrap_or_default()))
        })
        .unwrap_or_default()
}

impl<S> axum::extract::FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(lang_from_parts(parts))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
