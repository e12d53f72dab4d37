//! Tiered pricing validation and rental quotes.
//!
//! DESIGN
//! ======
//! Prices are whole shekels stored as `i64`; all arithmetic is checked.
//! An item offers a mandatory one-day price and optional discounted prices
//! for 3-day and 7-day windows. A tier price may never exceed the one-day
//! price multiplied by its window, and the whole tier set is validated on
//! every write regardless of which field changed.
//!
//! A rental quote is pure calendar arithmetic: `end = start + days` on
//! `YYYY-MM-DD` dates with no timezone component, and
//! `total = price_per_day * days`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Upper bound on a single rental, in days.
pub const MAX_RENTAL_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("a positive one-day price is required")]
    BasePriceRequired,
    #[error("tier prices must be positive")]
    NonPositiveTier,
    #[error("3-day price exceeds 3x the one-day price")]
    TierThreeTooHigh,
    #[error("7-day price exceeds 7x the one-day price")]
    TierSevenTooHigh,
    #[error("rental length must be between 1 and {MAX_RENTAL_DAYS} days")]
    InvalidDays,
    #[error("price arithmetic overflow")]
    Overflow,
}

// =============================================================================
// PRICING TIERS
// =============================================================================

/// Per-item prices for the 1/3/7-day rental windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTiers {
    pub one_day: i64,
    pub three_days: Option<i64>,
    pub seven_days: Option<i64>,
}

impl PricingTiers {
    /// Validate the full tier set.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: missing/non-positive base price,
    /// non-positive tier, or a tier exceeding its window cap.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.one_day < 1 {
            return Err(PricingError::BasePriceRequired);
        }
        if let Some(three) = self.three_days {
            if three < 1 {
                return Err(PricingError::NonPositiveTier);
            }
            let cap = self.one_day.checked_mul(3).ok_or(PricingError::Overflow)?;
            if three > cap {
                return Err(PricingError::TierThreeTooHigh);
            }
        }
        if let Some(seven) = self.seven_days {
            if seven < 1 {
                return Err(PricingError::NonPositiveTier);
            }
            let cap = self.one_day.checked_mul(7).ok_or(PricingError::Overflow)?;
            if seven > cap {
                return Err(PricingError::TierSevenTooHigh);
            }
        }
        Ok(())
    }
}

// =============================================================================
// RENTAL QUOTE
// =============================================================================

/// Server-computed rental window and price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalQuote {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub total: i64,
}

impl RentalQuote {
    /// Compute the rental window and total for `days` starting at
    /// `start_date`. `end_date = start_date + days` in calendar days.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive price, a day count outside
    /// `1..=MAX_RENTAL_DAYS`, and arithmetic overflow.
    pub fn compute(price_per_day: i64, start_date: NaiveDate, days: u32) -> Result<Self, PricingError> {
        if price_per_day < 1 {
            return Err(PricingError::BasePriceRequired);
        }
        if days < 1 || days > MAX_RENTAL_DAYS {
            return Err(PricingError::InvalidDays);
        }
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(PricingError::InvalidDays)?;
        let total = price_per_day
            .checked_mul(i64::from(days))
            .ok_or(PricingError::Overflow)?;

        Ok(Self { start_date, end_date, days, total })
    }
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
