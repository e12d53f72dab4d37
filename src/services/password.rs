//! Password credentials and reset codes.
//!
//! ARCHITECTURE
//! ============
//! Passwords are stored as SHA-256 over a per-user random salt plus the
//! password, hex-encoded. Reset codes are short-lived six-character codes
//! from an unambiguous alphabet, stored hashed, single-use, and consumed
//! after too many failed attempts.

use rand::Rng;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::session::bytes_to_hex;

const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_FAILED_ATTEMPTS: i32 = 5;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already registered")]
    EmailTaken,
    #[error("password too short")]
    WeakPassword,
    #[error("invalid code")]
    InvalidCode,
    #[error("expired or incorrect code")]
    VerificationFailed,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),
}

// =============================================================================
// NORMALIZATION & HASHING
// =============================================================================

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Reject passwords shorter than the minimum length.
///
/// # Errors
///
/// Returns `WeakPassword` when the password is too short.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::WeakPassword);
    }
    Ok(())
}

/// Generate a random 16-byte hex salt.
#[must_use]
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Hash a password with its per-user salt.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

#[must_use]
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

fn name_from_email(email: &str) -> String {
    let local = email
        .split('@')
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("user");
    local.to_owned()
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Register a new account with its profile row, returning the user id.
/// The display name falls back to the email's local part.
///
/// # Errors
///
/// `InvalidEmail`, `WeakPassword`, `EmailTaken`, or a database error.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password: &str,
    display_name: Option<&str>,
) -> Result<Uuid, PasswordError> {
    let normalized = normalize_email(email).ok_or(PasswordError::InvalidEmail)?;
    validate_password(password)?;

    let salt = generate_salt();
    let hash = hash_password(password, &salt);
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| name_from_email(&normalized), ToOwned::to_owned);

    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r"INSERT INTO users (email, password_hash, password_salt)
          VALUES ($1, $2, $3)
          ON CONFLICT (email) DO NOTHING
          RETURNING id",
    )
    .bind(&normalized)
    .bind(hash)
    .bind(salt)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        return Err(PasswordError::EmailTaken);
    };
    let user_id: Uuid = row.get("id");

    sqlx::query("INSERT INTO profiles (user_id, display_name) VALUES ($1, $2)")
        .bind(user_id)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user_id)
}

/// Check credentials, returning the user id on success and `None` for a
/// wrong email or password (indistinguishable to the caller).
///
/// # Errors
///
/// `InvalidEmail` for a malformed address, or a database error.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<Option<Uuid>, PasswordError> {
    let normalized = normalize_email(email).ok_or(PasswordError::InvalidEmail)?;

    let row = sqlx::query("SELECT id, password_hash, password_salt FROM users WHERE email = $1")
        .bind(&normalized)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let hash: String = row.get("password_hash");
    let salt: String = row.get("password_salt");
    if !verify_password(password, &salt, &hash) {
        return Ok(None);
    }
    Ok(Some(row.get("id")))
}

// =============================================================================
// RESET CODES
// =============================================================================

#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN
        || !normalized
            .chars()
            .all(|c| CODE_ALPHABET.contains(&(c as u8)))
    {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_reset_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[must_use]
pub fn hash_reset_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Create a reset code for the account behind `email`.
///
/// Returns `Ok(None)` when no account exists, so callers can answer
/// uniformly and not disclose which addresses are registered.
///
/// # Errors
///
/// Returns `InvalidEmail` for a malformed address, or a database error.
pub async fn create_reset_code(pool: &PgPool, email: &str) -> Result<Option<String>, PasswordError> {
    let normalized = normalize_email(email).ok_or(PasswordError::InvalidEmail)?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&normalized)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(None);
    }

    sqlx::query("DELETE FROM password_reset_codes WHERE email = $1 AND consumed_at IS NULL")
        .bind(&normalized)
        .execute(pool)
        .await?;

    let code = generate_reset_code();
    let code_hash = hash_reset_code(&code);

    sqlx::query("INSERT INTO password_reset_codes (email, code_hash) VALUES ($1, $2)")
        .bind(&normalized)
        .bind(code_hash)
        .execute(pool)
        .await?;

    Ok(Some(code))
}

/// Verify a reset code and return the account's user id. The code is
/// consumed on success; a wrong code counts toward the attempt cap and the
/// whole code is consumed once the cap is reached.
///
/// # Errors
///
/// Returns `VerificationFailed` for a wrong/expired/consumed code.
pub async fn consume_reset_code(pool: &PgPool, email: &str, code: &str) -> Result<Uuid, PasswordError> {
    let normalized_email = normalize_email(email).ok_or(PasswordError::InvalidEmail)?;
    let normalized_code = normalize_code(code).ok_or(PasswordError::InvalidCode)?;
    let code_hash = hash_reset_code(&normalized_code);

    let update = sqlx::query(
        r"UPDATE password_reset_codes
          SET consumed_at = now()
          WHERE id = (
              SELECT id
              FROM password_reset_codes
              WHERE email = $1
                AND consumed_at IS NULL
                AND expires_at > now()
              ORDER BY created_at DESC
              LIMIT 1
          )
          AND code_hash = $2
          RETURNING id",
    )
    .bind(&normalized_email)
    .bind(&code_hash)
    .fetch_optional(pool)
    .await?;

    if update.is_none() {
        sqlx::query(
            r"UPDATE password_reset_codes
              SET attempts = attempts + 1,
                  consumed_at = CASE WHEN attempts + 1 >= $2 THEN now() ELSE consumed_at END
              WHERE id = (
                  SELECT id
                  FROM password_reset_codes
                  WHERE email = $1
                    AND consumed_at IS NULL
                    AND expires_at > now()
                  ORDER BY created_at DESC
                  LIMIT 1
              )",
        )
        .bind(&normalized_email)
        .bind(MAX_FAILED_ATTEMPTS)
        .execute(pool)
        .await?;
        return Err(PasswordError::VerificationFailed);
    }

    let user_row = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&normalized_email)
        .fetch_optional(pool)
        .await?;

    let Some(user_row) = user_row else {
        return Err(PasswordError::VerificationFailed);
    };

    Ok(user_row.get("id"))
}

/// Replace a user's password with a freshly salted hash.
///
/// # Errors
///
/// Returns `WeakPassword` for a too-short password, or a database error.
pub async fn set_password(pool: &PgPool, user_id: Uuid, new_password: &str) -> Result<(), PasswordError> {
    validate_password(new_password)?;
    let salt = generate_salt();
    let hash = hash_password(new_password, &salt);

    sqlx::query("UPDATE users SET password_hash = $2, password_salt = $3 WHERE id = $1")
        .bind(user_id)
        .bind(hash)
        .bind(salt)
        .execute(pool)
        .await?;
    Ok(())
}

// =============================================================================
// RESET EMAIL
// =============================================================================

/// Deliver a reset code via Resend.
///
/// # Errors
///
/// Returns `EmailDelivery` when the provider rejects the send.
pub async fn send_reset_code_email(
    resend_api_key: &str,
    resend_from: &str,
    to_email: &str,
    code: &str,
) -> Result<(), PasswordError> {
    let resend = Resend::new(resend_api_key);
    let to = [to_email];
    let subject = "איפוס סיסמה — Maskir";
    let html = render_reset_email(code);

    let email = CreateEmailBaseOptions::new(resend_from, to, subject).with_html(&html);
    resend
        .emails
        .send(email)
        .await
        .map_err(|e| PasswordError::EmailDelivery(e.to_string()))?;
    Ok(())
}

#[must_use]
pub fn render_reset_email(code: &str) -> String {
    format!(
        concat!(
            "<div dir=\"rtl\" style=\"font-family:sans-serif\">",
            "<p>קוד איפוס הסיסמה שלך:</p>",
            "<p style=\"font-size:24px;letter-spacing:4px\"><b>{code}</b></p>",
            "<p>הקוד תקף ל-15 דקות. אם לא ביקשת איפוס, ניתן להתעלם מהודעה זו.</p>",
            "<hr><p dir=\"ltr\">Your password reset code: <b>{code}</b> (valid for 15 minutes)</p>",
            "</div>"
        ),
        code = code
    )
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
