//! Profile data access.

use serde::Deserialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::item::rating_average;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub rating_avg: Option<f64>,
    pub rating_count: i64,
    pub member_since: Option<String>,
}

/// Self-service profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

const PROFILE_QUERY: &str = r"SELECT user_id, display_name, avatar_url, phone, city, street,
         rating_sum, rating_count,
         to_char(created_at, 'YYYY-MM-DD') AS member_since
  FROM profiles WHERE user_id = $1";

fn row_to_profile(r: &sqlx::postgres::PgRow) -> ProfileRow {
    let rating_sum: i64 = r.get("rating_sum");
    let rating_count: i64 = r.get("rating_count");
    ProfileRow {
        user_id: r.get("user_id"),
        display_name: r.get("display_name"),
        avatar_url: r.get("avatar_url"),
        phone: r.get("phone"),
        city: r.get("city"),
        street: r.get("street"),
        rating_avg: rating_average(rating_sum, rating_count),
        rating_count,
        member_since: r.get("member_since"),
    }
}

/// Fetch a profile with derived rating aggregates.
///
/// # Errors
///
/// `NotFound` when no profile row exists, or a database error.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileRow, ProfileError> {
    let row = sqlx::query(PROFILE_QUERY)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ProfileError::NotFound(user_id))?;
    Ok(row_to_profile(&row))
}

/// Merge profile fields for the signed-in user.
///
/// # Errors
///
/// `NotFound` when no profile row exists, or a database error.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<ProfileRow, ProfileError> {
    let touched = sqlx::query(
        r"UPDATE profiles
          SET display_name = COALESCE($2, display_name),
              phone = COALESCE($3, phone),
              city = COALESCE($4, city),
              street = COALESCE($5, street)
          WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(update.display_name.as_deref())
    .bind(update.phone.as_deref())
    .bind(update.city.as_deref())
    .bind(update.street.as_deref())
    .execute(pool)
    .await?;

    if touched.rows_affected() == 0 {
        return Err(ProfileError::NotFound(user_id));
    }
    get_profile(pool, user_id).await
}

/// Point the profile at a freshly uploaded avatar, returning the previous
/// URL so the caller can reclaim the old object.
///
/// # Errors
///
/// `NotFound` when no profile row exists, or a database error.
pub async fn set_avatar(pool: &PgPool, user_id: Uuid, url: &str) -> Result<Option<String>, ProfileError> {
    let row = sqlx::query(
        r"UPDATE profiles p
          SET avatar_url = $2
          FROM (SELECT avatar_url AS old_url FROM profiles WHERE user_id = $1) prev
          WHERE p.user_id = $1
          RETURNING prev.old_url",
    )
    .bind(user_id)
    .bind(url)
    .fetch_optional(pool)
    .await?
    .ok_or(ProfileError::NotFound(user_id))?;

    Ok(row.get("old_url"))
}
