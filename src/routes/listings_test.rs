use super::*;
use crate::services::pricing::PricingError;

#[test]
fn listing_errors_map_to_statuses() {
    let cases = [
        (ListingError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
        (
            ListingError::Forbidden { user_id: Uuid::nil(), draft_id: Uuid::nil() },
            StatusCode::FORBIDDEN,
        ),
        (ListingError::AtFirstStep, StatusCode::CONFLICT),
        (ListingError::AtLastStep, StatusCode::CONFLICT),
        (ListingError::NotAtReviewStep, StatusCode::CONFLICT),
        (ListingError::Incomplete("title"), StatusCode::BAD_REQUEST),
        (ListingError::InvalidCategory, StatusCode::BAD_REQUEST),
        (ListingError::InvalidPolicy("whenever".into()), StatusCode::BAD_REQUEST),
        (ListingError::TooManyPhotos, StatusCode::BAD_REQUEST),
        (ListingError::Pricing(PricingError::TierThreeTooHigh), StatusCode::BAD_REQUEST),
    ];
    for (err, expected) in cases {
        assert_eq!(listing_error_response(&err, Lang::He).status(), expected, "{err:?}");
    }
}

#[test]
fn item_status_body_rejects_unknown_status() {
    let body: SetItemStatusBody = serde_json::from_str(r#"{"status":"broken"}"#).unwrap();
    assert!(ItemStatus::parse(&body.status).is_none());
}

#[test]
fn item_status_body_accepts_canonical_statuses() {
    for raw in ["active", "rented", "maintenance", "inactive"] {
        let body: SetItemStatusBody = serde_json::from_str(&format!(r#"{{"status":"{raw}"}}"#)).unwrap();
        assert!(ItemStatus::parse(&body.status).is_some());
    }
}
