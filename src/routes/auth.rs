//! Auth routes — signup/login/logout, password change and reset.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::{error_response, lang_from_parts};
use crate::i18n::{Lang, MessageKey};
use crate::services::password::{self, PasswordError};
use crate::services::session;
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|raw| parse_bool(&raw))
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_BASE_URL")
        .map(|url| url.starts_with("https://"))
        .unwrap_or(false)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let lang = lang_from_parts(parts);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(error_response(StatusCode::UNAUTHORIZED, "unauthorized", lang, MessageKey::Unauthorized));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session validation failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", lang, MessageKey::Internal)
            })?
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "unauthorized", lang, MessageKey::Unauthorized))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

fn password_error_response(err: &PasswordError, lang: Lang) -> Response {
    let (status, code, key) = match err {
        PasswordError::InvalidEmail => (StatusCode::BAD_REQUEST, "invalid_email", MessageKey::InvalidEmail),
        PasswordError::EmailTaken => (StatusCode::CONFLICT, "email_taken", MessageKey::EmailTaken),
        PasswordError::WeakPassword => (StatusCode::BAD_REQUEST, "weak_password", MessageKey::WeakPassword),
        PasswordError::InvalidCode | PasswordError::VerificationFailed => {
            (StatusCode::BAD_REQUEST, "reset_code_invalid", MessageKey::ResetCodeInvalid)
        }
        PasswordError::Db(e) => {
            tracing::error!(error = %e, "auth database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
        PasswordError::EmailDelivery(e) => {
            tracing::error!(error = %e, "reset email delivery failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", MessageKey::Internal)
        }
    };
    error_response(status, code, lang, key)
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct SignupBody {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// `POST /api/auth/signup` — register, open a session, set the cookie.
pub async fn signup(
    State(state): State<AppState>,
    lang: Lang,
    Json(body): Json<SignupBody>,
) -> Result<(CookieJar, Json<session::SessionUser>), Response> {
    let user_id = password::create_account(&state.pool, &body.email, &body.password, body.display_name.as_deref())
        .await
        .map_err(|e| password_error_response(&e, lang))?;

    open_session(&state, user_id, lang).await
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — check credentials, open a session, set the cookie.
pub async fn login(
    State(state): State<AppState>,
    lang: Lang,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<session::SessionUser>), Response> {
    let user_id = password::authenticate(&state.pool, &body.email, &body.password)
        .await
        .map_err(|e| password_error_response(&e, lang))?
        .ok_or_else(|| {
            error_response(StatusCode::UNAUTHORIZED, "invalid_credentials", lang, MessageKey::InvalidCredentials)
        })?;

    open_session(&state, user_id, lang).await
}

async fn open_session(
    state: &AppState,
    user_id: uuid::Uuid,
    lang: Lang,
) -> Result<(CookieJar, Json<session::SessionUser>), Response> {
    let token = session::create_session(&state.pool, user_id).await.map_err(|e| {
        tracing::error!(error = %e, "session creation failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", lang, MessageKey::Internal)
    })?;

    let user = session::validate_session(&state.pool, &token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session readback failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", lang, MessageKey::Internal)
        })?
        .ok_or_else(|| error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal", lang, MessageKey::Internal))?;

    let jar = CookieJar::new().add(session_cookie(token, cookie_secure()));
    Ok((jar, Json(user)))
}

/// `GET /api/auth/me` — return the signed-in user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout` — delete the session, clear the cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let _ = session::delete_session(&state.pool, &auth.token).await;

    let jar = CookieJar::new().add(clear_session_cookie(cookie_secure()));
    (jar, StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

/// `POST /api/auth/password` — change the password, current one required.
pub async fn change_password(
    State(state): State<AppState>,
    lang: Lang,
    auth: AuthUser,
    Json(body): Json<ChangePasswordBody>,
) -> Result<StatusCode, Response> {
    let verified = password::authenticate(&state.pool, &auth.user.email, &body.current_password)
        .await
        .map_err(|e| password_error_response(&e, lang))?;
    if verified.is_none() {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            lang,
            MessageKey::InvalidCredentials,
        ));
    }

    password::set_password(&state.pool, auth.user.id, &body.new_password)
        .await
        .map_err(|e| password_error_response(&e, lang))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RequestResetBody {
    pub email: String,
}

/// `POST /api/auth/password/request-reset` — issue a reset code.
///
/// Always answers 204 so the endpoint does not disclose which addresses
/// are registered. Without a configured mailer the code is logged.
pub async fn request_reset(
    State(state): State<AppState>,
    lang: Lang,
    Json(body): Json<RequestResetBody>,
) -> Result<StatusCode, Response> {
    let code = password::create_reset_code(&state.pool, &body.email)
        .await
        .map_err(|e| password_error_response(&e, lang))?;

    if let Some(code) = code {
        match &state.mailer {
            Some(mailer) => {
                if let Err(e) =
                    password::send_reset_code_email(&mailer.api_key, &mailer.from, &body.email, &code).await
                {
                    tracing::error!(error = %e, "reset email delivery failed");
                }
            }
            None => {
                tracing::info!(email = %body.email, %code, "mailer not configured, reset code logged");
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ResetPasswordBody {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// `POST /api/auth/password/reset` — consume a reset code, set the new
/// password, and revoke every open session for the account.
pub async fn reset_password(
    State(state): State<AppState>,
    lang: Lang,
    Json(body): Json<ResetPasswordBody>,
) -> Result<StatusCode, Response> {
    let user_id = password::consume_reset_code(&state.pool, &body.email, &body.code)
        .await
        .map_err(|e| password_error_response(&e, lang))?;

    password::set_password(&state.pool, user_id, &body.new_password)
        .await
        .map_err(|e| password_error_response(&e, lang))?;

    if let Err(e) = session::delete_user_sessions(&state.pool, user_id).await {
        tracing::error!(error = %e, "session revocation after reset failed");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
