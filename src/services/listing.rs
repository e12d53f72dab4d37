//! Listing wizard drafts.
//!
//! DESIGN
//! ======
//! Publishing an item is a 7-step wizard: category, title/description,
//! photos, pricing, location, policy/value, review. Drafts persist
//! server-side so a listing in progress survives reloads. The step moves
//! strictly one at a time (`advance`/`back`, no jump API), and step bounds
//! mirror the UI, which hides "back" on the first step and "next" on the
//! last.
//!
//! Field updates merge into the draft at any step without blocking
//! validation, with one exception: a pricing update that violates the tier
//! caps is rejected outright and never stored. Full completeness is
//! enforced at submit, which creates the item and deletes the draft in one
//! transaction.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::catalog;
use super::item::ItemRow;
use super::pricing::{PricingError, PricingTiers};

pub const FIRST_STEP: i32 = 1;
pub const LAST_STEP: i32 = 7;
pub const MAX_PHOTOS: usize = 10;

const CANCELLATION_POLICIES: &[&str] = &["flexible", "moderate", "strict"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("draft not found: {0}")]
    NotFound(Uuid),
    #[error("user {user_id} does not own draft {draft_id}")]
    Forbidden { user_id: Uuid, draft_id: Uuid },
    #[error("already at the first step")]
    AtFirstStep,
    #[error("already at the last step")]
    AtLastStep,
    #[error("draft must be at the review step to submit")]
    NotAtReviewStep,
    #[error("missing required field: {0}")]
    Incomplete(&'static str),
    #[error("unknown category")]
    InvalidCategory,
    #[error("unknown cancellation policy: {0}")]
    InvalidPolicy(String),
    #[error("draft already has {MAX_PHOTOS} photos")]
    TooManyPhotos,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A listing draft as accumulated across wizard steps.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DraftRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub step: i32,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub price_per_day: Option<i64>,
    pub price_three_days: Option<i64>,
    pub price_seven_days: Option<i64>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub cancellation_policy: Option<String>,
    pub item_value: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Partial wizard-field update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<PricingTiers>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub cancellation_policy: Option<String>,
    pub item_value: Option<i64>,
}

fn row_to_draft(r: &PgRow) -> DraftRow {
    let photos: serde_json::Value = r.get("photos");
    DraftRow {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        step: r.get("step"),
        category: r.get("category"),
        subcategory: r.get("subcategory"),
        title: r.get("title"),
        description: r.get("description"),
        photos: serde_json::from_value(photos).unwrap_or_default(),
        price_per_day: r.get("price_per_day"),
        price_three_days: r.get("price_three_days"),
        price_seven_days: r.get("price_seven_days"),
        city: r.get("city"),
        street: r.get("street"),
        cancellation_policy: r.get("cancellation_policy"),
        item_value: r.get("item_value"),
        created_at: r.get("created_at"),
    }
}

// =============================================================================
// STEP MACHINE
// =============================================================================

/// Next step from `step`, exactly +1.
///
/// # Errors
///
/// `AtLastStep` when already at the review step.
pub fn next_step(step: i32) -> Result<i32, ListingError> {
    if step >= LAST_STEP {
        return Err(ListingError::AtLastStep);
    }
    Ok(step + 1)
}

/// Previous step from `step`, exactly −1.
///
/// # Errors
///
/// `AtFirstStep` when already at the first step.
pub fn prev_step(step: i32) -> Result<i32, ListingError> {
    if step <= FIRST_STEP {
        return Err(ListingError::AtFirstStep);
    }
    Ok(step - 1)
}

/// Required fields, checked only at submit.
///
/// # Errors
///
/// `Incomplete` naming the first missing field, `InvalidCategory` for a
/// slug outside the catalog, `InvalidPolicy`, or a pricing violation.
pub fn validate_complete(draft: &DraftRow) -> Result<(), ListingError> {
    let category = draft.category.as_deref().ok_or(ListingError::Incomplete("category"))?;
    if !catalog::is_valid(category, draft.subcategory.as_deref()) {
        return Err(ListingError::InvalidCategory);
    }

    let title = draft.title.as_deref().unwrap_or("");
    if title.trim().is_empty() {
        return Err(ListingError::Incomplete("title"));
    }

    let one_day = draft.price_per_day.ok_or(ListingError::Incomplete("price_per_day"))?;
    let tiers = PricingTiers {
        one_day,
        three_days: draft.price_three_days,
        seven_days: draft.price_seven_days,
    };
    tiers.validate()?;

    let city = draft.city.as_deref().unwrap_or("");
    if city.trim().is_empty() {
        return Err(ListingError::Incomplete("city"));
    }

    if let Some(policy) = draft.cancellation_policy.as_deref() {
        if !CANCELLATION_POLICIES.contains(&policy) {
            return Err(ListingError::InvalidPolicy(policy.to_owned()));
        }
    }

    Ok(())
}

// =============================================================================
// DRAFT CRUD
// =============================================================================

const DRAFT_COLUMNS: &str = "id, owner_id, step, category, subcategory, title, description, photos, \
     price_per_day, price_three_days, price_seven_days, city, street, \
     cancellation_policy, item_value, created_at";

/// Start a new draft at step 1.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_draft(pool: &PgPool, owner_id: Uuid) -> Result<DraftRow, ListingError> {
    let row = sqlx::query(&format!(
        "INSERT INTO listing_drafts (owner_id) VALUES ($1) RETURNING {DRAFT_COLUMNS}"
    ))
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(row_to_draft(&row))
}

/// Fetch a draft, owner-guarded.
///
/// # Errors
///
/// `NotFound`/`Forbidden`, or a database error.
pub async fn get_draft(pool: &PgPool, draft_id: Uuid, user_id: Uuid) -> Result<DraftRow, ListingError> {
    let row = sqlx::query(&format!("SELECT {DRAFT_COLUMNS} FROM listing_drafts WHERE id = $1"))
        .bind(draft_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ListingError::NotFound(draft_id))?;

    let draft = row_to_draft(&row);
    if draft.owner_id != user_id {
        return Err(ListingError::Forbidden { user_id, draft_id });
    }
    Ok(draft)
}

/// Merge wizard fields into the draft. A pricing update that violates the
/// tier caps is rejected and nothing is stored.
///
/// # Errors
///
/// Ownership errors, `InvalidCategory`/`InvalidPolicy`, a pricing
/// violation, or a database error.
pub async fn update_draft(
    pool: &PgPool,
    draft_id: Uuid,
    user_id: Uuid,
    update: &DraftUpdate,
) -> Result<DraftRow, ListingError> {
    let current = get_draft(pool, draft_id, user_id).await?;

    if let Some(category) = update.category.as_deref() {
        if catalog::find(category).is_none() {
            return Err(ListingError::InvalidCategory);
        }
    }
    if let Some(policy) = update.cancellation_policy.as_deref() {
        if !CANCELLATION_POLICIES.contains(&policy) {
            return Err(ListingError::InvalidPolicy(policy.to_owned()));
        }
    }
    if let Some(pricing) = &update.pricing {
        pricing.validate()?;
    }

    let (price_per_day, price_three_days, price_seven_days) = match &update.pricing {
        Some(p) => (Some(p.one_day), p.three_days, p.seven_days),
        None => (current.price_per_day, current.price_three_days, current.price_seven_days),
    };

    let row = sqlx::query(&format!(
        "UPDATE listing_drafts
         SET category = $2, subcategory = $3, title = $4, description = $5,
             price_per_day = $6, price_three_days = $7, price_seven_days = $8,
             city = $9, street = $10, cancellation_policy = $11, item_value = $12,
             updated_at = now()
         WHERE id = $1
         RETURNING {DRAFT_COLUMNS}"
    ))
    .bind(draft_id)
    .bind(update.category.as_deref().or(current.category.as_deref()))
    .bind(update.subcategory.as_deref().or(current.subcategory.as_deref()))
    .bind(update.title.as_deref().or(current.title.as_deref()))
    .bind(update.description.as_deref().or(current.description.as_deref()))
    .bind(price_per_day)
    .bind(price_three_days)
    .bind(price_seven_days)
    .bind(update.city.as_deref().or(current.city.as_deref()))
    .bind(update.street.as_deref().or(current.street.as_deref()))
    .bind(update.cancellation_policy.as_deref().or(current.cancellation_policy.as_deref()))
    .bind(update.item_value.or(current.item_value))
    .fetch_one(pool)
    .await?;

    Ok(row_to_draft(&row))
}

async fn set_step(pool: &PgPool, draft_id: Uuid, step: i32) -> Result<(), ListingError> {
    sqlx::query("UPDATE listing_drafts SET step = $2, updated_at = now() WHERE id = $1")
        .bind(draft_id)
        .bind(step)
        .execute(pool)
        .await?;
    Ok(())
}

/// Move the draft forward one step.
///
/// # Errors
///
/// Ownership errors, `AtLastStep`, or a database error.
pub async fn advance(pool: &PgPool, draft_id: Uuid, user_id: Uuid) -> Result<DraftRow, ListingError> {
    let mut draft = get_draft(pool, draft_id, user_id).await?;
    draft.step = next_step(draft.step)?;
    set_step(pool, draft_id, draft.step).await?;
    Ok(draft)
}

/// Move the draft back one step.
///
/// # Errors
///
/// Ownership errors, `AtFirstStep`, or a database error.
pub async fn back(pool: &PgPool, draft_id: Uuid, user_id: Uuid) -> Result<DraftRow, ListingError> {
    let mut draft = get_draft(pool, draft_id, user_id).await?;
    draft.step = prev_step(draft.step)?;
    set_step(pool, draft_id, draft.step).await?;
    Ok(draft)
}

/// Attach an uploaded photo URL to the draft.
///
/// # Errors
///
/// Ownership errors, `TooManyPhotos`, or a database error.
pub async fn add_photo(
    pool: &PgPool,
    draft_id: Uuid,
    user_id: Uuid,
    url: &str,
) -> Result<DraftRow, ListingError> {
    let mut draft = get_draft(pool, draft_id, user_id).await?;
    if draft.photos.len() >= MAX_PHOTOS {
        return Err(ListingError::TooManyPhotos);
    }
    draft.photos.push(url.to_owned());

    sqlx::query("UPDATE listing_drafts SET photos = $2, updated_at = now() WHERE id = $1")
        .bind(draft_id)
        .bind(json!(draft.photos))
        .execute(pool)
        .await?;
    Ok(draft)
}

/// Publish the draft: validate completeness, create the item, delete the
/// draft, all in one transaction. Only allowed at the review step.
///
/// # Errors
///
/// Ownership errors, `NotAtReviewStep`, completeness/pricing errors, or a
/// database error.
pub async fn submit(pool: &PgPool, draft_id: Uuid, user_id: Uuid) -> Result<ItemRow, ListingError> {
    let draft = get_draft(pool, draft_id, user_id).await?;
    if draft.step != LAST_STEP {
        return Err(ListingError::NotAtReviewStep);
    }
    validate_complete(&draft)?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query(&format!(
        "INSERT INTO items (owner_id, title, description, category, subcategory,
                            price_per_day, price_three_days, price_seven_days,
                            photos, city, cancellation_policy, item_value, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'active')
         RETURNING {}",
        super::item::ITEM_COLUMNS
    ))
    .bind(draft.owner_id)
    .bind(draft.title.as_deref().unwrap_or_default().trim())
    .bind(draft.description.as_deref().unwrap_or_default())
    .bind(draft.category.as_deref())
    .bind(draft.subcategory.as_deref())
    .bind(draft.price_per_day)
    .bind(draft.price_three_days)
    .bind(draft.price_seven_days)
    .bind(json!(draft.photos))
    .bind(draft.city.as_deref())
    .bind(draft.cancellation_policy.as_deref().unwrap_or("moderate"))
    .bind(draft.item_value)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM listing_drafts WHERE id = $1")
        .bind(draft_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let item = super::item::row_to_item(&row);
    tracing::info!(item_id = %item.id, owner_id = %user_id, "listing published");
    Ok(item)
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
