//! Bilingual message catalog.
//!
//! DESIGN
//! ======
//! The marketplace is Hebrew-first: every user-facing string (status labels,
//! validation messages, API errors) exists in Hebrew and English, with Hebrew
//! as the default. The string set is closed, so the catalog is plain `match`
//! tables rather than a file-loaded translation store. Status lookups accept
//! raw strings and fall back to the "unknown" label/style so an unrecognized
//! value renders safely instead of failing.

use serde::{Deserialize, Serialize};

/// Response language, selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    He,
    En,
}

impl Lang {
    /// Parse a language tag. Accepts bare codes (`he`, `en`) and region
    /// variants (`he-IL`, `en-US`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let primary = raw.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "he" | "iw" => Some(Self::He),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

// =============================================================================
// API MESSAGES
// =============================================================================

/// Keys for user-facing API messages. Route error mappers pick a key; the
/// response body carries `message(lang, key)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Unauthorized,
    Forbidden,
    Internal,
    InvalidEmail,
    EmailTaken,
    WeakPassword,
    InvalidCredentials,
    ResetCodeInvalid,
    ItemNotFound,
    ItemUnavailable,
    HasOpenBookings,
    InvalidCategory,
    InvalidStatus,
    BookingNotFound,
    OwnBooking,
    InvalidDateRange,
    BookingOverlap,
    InvalidTransition,
    DraftNotFound,
    AtFirstStep,
    AtLastStep,
    DraftIncomplete,
    BasePriceRequired,
    NonPositiveTier,
    TierThreeTooHigh,
    TierSevenTooHigh,
    PriceOverflow,
    InvalidPolicy,
    TooManyPhotos,
    ProfileNotFound,
    MissingFile,
    UnsupportedImageType,
    UploadTooLarge,
}

/// Localized text for an API message key.
#[must_use]
pub fn message(lang: Lang, key: MessageKey) -> &'static str {
    use MessageKey as K;
    match lang {
        Lang::He => match key {
            K::Unauthorized => "יש להתחבר כדי לבצע פעולה זו",
            K::Forbidden => "אין לך הרשאה לבצע פעולה זו",
            K::Internal => "אירעה שגיאה, נסו שוב מאוחר יותר",
            K::InvalidEmail => "כתובת האימייל אינה תקינה",
            K::EmailTaken => "כתובת האימייל כבר רשומה במערכת",
            K::WeakPassword => "הסיסמה חייבת להכיל לפחות 8 תווים",
            K::InvalidCredentials => "אימייל או סיסמה שגויים",
            K::ResetCodeInvalid => "קוד האיפוס שגוי או שפג תוקפו",
            K::ItemNotFound => "הפריט לא נמצא",
            K::ItemUnavailable => "הפריט אינו זמין להשכרה",
            K::HasOpenBookings => "לא ניתן למחוק פריט עם הזמנות פתוחות",
            K::InvalidCategory => "קטגוריה לא מוכרת",
            K::InvalidStatus => "סטטוס לא מוכר",
            K::BookingNotFound => "ההזמנה לא נמצאה",
            K::OwnBooking => "לא ניתן להזמין פריט שבבעלותך",
            K::InvalidDateRange => "טווח התאריכים אינו תקין",
            K::BookingOverlap => "הפריט כבר מוזמן בתאריכים אלו",
            K::InvalidTransition => "שינוי הסטטוס המבוקש אינו אפשרי",
            K::DraftNotFound => "טיוטת הפרסום לא נמצאה",
            K::AtFirstStep => "זהו השלב הראשון",
            K::AtLastStep => "זהו השלב האחרון",
            K::DraftIncomplete => "יש להשלים את כל הפרטים לפני הפרסום",
            K::BasePriceRequired => "יש להזין מחיר ליום אחד",
            K::NonPositiveTier => "מחירי המדרגות חייבים להיות חיוביים",
            K::TierThreeTooHigh => "המחיר ל-3 ימים לא יכול לעלות על מחיר יום אחד כפול 3",
            K::TierSevenTooHigh => "המחיר ל-7 ימים לא יכול לעלות על מחיר יום אחד כפול 7",
            K::PriceOverflow => "המחיר המבוקש גבוה מדי",
            K::InvalidPolicy => "מדיניות ביטול לא מוכרת",
            K::TooManyPhotos => "ניתן להעלות עד 10 תמונות",
            K::ProfileNotFound => "הפרופיל לא נמצא",
            K::MissingFile => "לא צורף קובץ",
            K::UnsupportedImageType => "ניתן להעלות תמונות מסוג JPG, PNG או WebP בלבד",
            K::UploadTooLarge => "הקובץ גדול מדי",
        },
        Lang::En => match key {
            K::Unauthorized => "You must be signed in to do that",
            K::Forbidden => "You are not allowed to do that",
            K::Internal => "Something went wrong, please try again later",
            K::InvalidEmail => "Invalid email address",
            K::EmailTaken => "This email is already registered",
            K::WeakPassword => "Password must be at least 8 characters",
            K::InvalidCredentials => "Wrong email or password",
            K::ResetCodeInvalid => "Reset code is wrong or expired",
            K::ItemNotFound => "Item not found",
            K::ItemUnavailable => "This item is not available for rent",
            K::HasOpenBookings => "Cannot delete an item with open bookings",
            K::InvalidCategory => "Unknown category",
            K::InvalidStatus => "Unknown status",
            K::BookingNotFound => "Booking not found",
            K::OwnBooking => "You cannot book your own item",
            K::InvalidDateRange => "Invalid date range",
            K::BookingOverlap => "The item is already booked for these dates",
            K::InvalidTransition => "That status change is not allowed",
            K::DraftNotFound => "Listing draft not found",
            K::AtFirstStep => "Already at the first step",
            K::AtLastStep => "Already at the last step",
            K::DraftIncomplete => "Please complete all details before publishing",
            K::BasePriceRequired => "A one-day price is required",
            K::NonPositiveTier => "Tier prices must be positive",
            K::TierThreeTooHigh => "The 3-day price cannot exceed 3 times the one-day price",
            K::TierSevenTooHigh => "The 7-day price cannot exceed 7 times the one-day price",
            K::PriceOverflow => "The requested price is too large",
            K::InvalidPolicy => "Unknown cancellation policy",
            K::TooManyPhotos => "Up to 10 photos can be uploaded",
            K::ProfileNotFound => "Profile not found",
            K::MissingFile => "No file attached",
            K::UnsupportedImageType => "Only JPG, PNG or WebP images can be uploaded",
            K::UploadTooLarge => "The file is too large",
        },
    }
}

// =============================================================================
// STATUS LABELS
// =============================================================================

/// Booking status label. Unrecognized strings get the "unknown" label.
#[must_use]
pub fn booking_status_text(raw: &str, lang: Lang) -> &'static str {
    match lang {
        Lang::He => match raw {
            "pending" => "ממתין לאישור",
            "confirmed" => "מאושר",
            "rejected" => "נדחה",
            "active" => "פעיל",
            "completed" => "הושלם",
            "cancelled" => "בוטל",
            _ => "לא ידוע",
        },
        Lang::En => match raw {
            "pending" => "Pending approval",
            "confirmed" => "Confirmed",
            "rejected" => "Rejected",
            "active" => "Active",
            "completed" => "Completed",
            "cancelled" => "Cancelled",
            _ => "Unknown",
        },
    }
}

/// Booking status display color token. Unrecognized strings get the neutral
/// style.
#[must_use]
pub fn booking_status_color(raw: &str) -> &'static str {
    match raw {
        "pending" => "yellow",
        "confirmed" => "green",
        "rejected" | "cancelled" => "red",
        "active" => "blue",
        "completed" => "gray",
        _ => "gray",
    }
}

/// Item status label. Unrecognized strings get the "unknown" label.
#[must_use]
pub fn item_status_text(raw: &str, lang: Lang) -> &'static str {
    match lang {
        Lang::He => match raw {
            "active" => "זמין",
            "rented" => "מושכר",
            "maintenance" => "בתחזוקה",
            "inactive" => "לא פעיל",
            _ => "לא ידוע",
        },
        Lang::En => match raw {
            "active" => "Available",
            "rented" => "Rented out",
            "maintenance" => "In maintenance",
            "inactive" => "Inactive",
            _ => "Unknown",
        },
    }
}

/// Item status display color token. Unrecognized strings get the neutral
/// style.
#[must_use]
pub fn item_status_color(raw: &str) -> &'static str {
    match raw {
        "active" => "green",
        "rented" => "blue",
        "maintenance" => "yellow",
        "inactive" => "gray",
        _ => "gray",
    }
}

/// Format a whole-shekel amount for display, e.g. `₪315`.
#[must_use]
pub fn format_shekels(amount: i64) -> String {
    format!("₪{amount}")
}

#[cfg(test)]
#[path = "i18n_test.rs"]
mod tests;
