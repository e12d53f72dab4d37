//! Profile routes — public profile pages, self-service edits, avatar upload.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Serialize;
use uuid::Uuid;

use super::auth::AuthUser;
use super::{error_response, read_image_field, storage_error_response};
use crate::i18n::{Lang, MessageKey};
use crate::services::profile::{self, ProfileError, ProfileRow, ProfileUpdate};
use crate::state::AppState;
use crate::storage::BUCKET_AVATARS;

fn profile_error_response(err: &ProfileError, lang: Lang) -> Response {
    let (status, code, key) = match err {
        ProfileError::NotFound(_) => (StatusCode::NOT_FOUND, "profile_not_found", MessageKey::ProfileNotFound),
        ProfileError::Database(e) => {
            tracing::error!(error = %e, "profile database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

/// `GET /api/profiles/:id` — a user's profile with rating aggregates.
pub async fn detail(
    State(state): State<AppState>,
    lang: Lang,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileRow>, Response> {
    let row = profile::get_profile(&state.pool, user_id)
        .await
        .map_err(|e| profile_error_response(&e, lang))?;
    Ok(Json(row))
}

/// `PATCH /api/profiles/me` — update the signed-in user's profile fields.
pub async fn update_me(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<ProfileRow>, Response> {
    let row = profile::update_profile(&state.pool, auth.user.id, &body)
        .await
        .map_err(|e| profile_error_response(&e, lang))?;
    Ok(Json(row))
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

/// `POST /api/profiles/me/avatar` — upload a new avatar; the previous
/// object is reclaimed once the profile points at the new one.
pub async fn upload_avatar(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, Response> {
    let (content_type, bytes) = read_image_field(&mut multipart, lang).await?;

    let url = state
        .store
        .put(BUCKET_AVATARS, &content_type, &bytes)
        .await
        .map_err(|e| storage_error_response(&e, lang))?;

    let previous = match profile::set_avatar(&state.pool, auth.user.id, &url).await {
        Ok(previous) => previous,
        Err(e) => {
            if let Err(del) = state.store.delete(&url).await {
                tracing::warn!(error = %del, %url, "orphaned avatar cleanup failed");
            }
            return Err(profile_error_response(&e, lang));
        }
    };

    if let Some(old_url) = previous {
        if let Err(e) = state.store.delete(&old_url).await {
            tracing::warn!(error = %e, url = %old_url, "previous avatar cleanup failed");
        }
    }

    Ok(Json(AvatarResponse { avatar_url: url }))
}
