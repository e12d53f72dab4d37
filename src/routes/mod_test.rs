use super::*;

fn parts_for(uri: &str, accept_language: Option<&str>) -> Parts {
    let mut builder = axum::http::Request::builder().uri(uri);
    if let Some(value) = accept_language {
        builder = builder.header(axum::http::header::ACCEPT_LANGUAGE, value);
    }
    builder.body(()).unwrap().into_parts().0
}

// =============================================================================
// language selection
// =============================================================================

#[test]
fn lang_defaults_to_hebrew() {
    let parts = parts_for("/api/items", None);
    assert_eq!(lang_from_parts(&parts), Lang::He);
}

#[test]
fn lang_query_param_wins() {
    let parts = parts_for("/api/items?lang=en", Some("he"));
    assert_eq!(lang_from_parts(&parts), Lang::En);
}

#[test]
fn lang_query_param_among_other_params() {
    let parts = parts_for("/api/items?category=tools&lang=en&page=2", None);
    assert_eq!(lang_from_parts(&parts), Lang::En);
}

#[test]
fn lang_falls_back_to_accept_language_header() {
    let parts = parts_for("/api/items", Some("en-US,en;q=0.9"));
    assert_eq!(lang_from_parts(&parts), Lang::En);
}

#[test]
fn lang_header_skips_unsupported_tags() {
    let parts = parts_for("/api/items", Some("fr-FR,he-IL;q=0.8"));
    assert_eq!(lang_from_parts(&parts), Lang::He);
}

#[test]
fn lang_invalid_query_value_falls_through() {
    let parts = parts_for("/api/items?lang=de", Some("en"));
    assert_eq!(lang_from_parts(&parts), Lang::En);
}

// =============================================================================
// error body
// =============================================================================

#[test]
fn error_body_serialization_shape() {
    let body = ErrorBody {
        error: ErrorDetail { code: "item_not_found", message: "הפריט לא נמצא" },
    };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["error"]["code"], "item_not_found");
    assert_eq!(json["error"]["message"], "הפריט לא נמצא");
}

#[test]
fn error_response_carries_status() {
    let resp = error_response(StatusCode::NOT_FOUND, "item_not_found", Lang::He, MessageKey::ItemNotFound);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// pricing_key
// =============================================================================

#[test]
fn pricing_key_covers_every_variant() {
    assert_eq!(pricing_key(&PricingError::BasePriceRequired), MessageKey::BasePriceRequired);
    assert_eq!(pricing_key(&PricingError::NonPositiveTier), MessageKey::NonPositiveTier);
    assert_eq!(pricing_key(&PricingError::TierThreeTooHigh), MessageKey::TierThreeTooHigh);
    assert_eq!(pricing_key(&PricingError::TierSevenTooHigh), MessageKey::TierSevenTooHigh);
    assert_eq!(pricing_key(&PricingError::InvalidDays), MessageKey::InvalidDateRange);
    assert_eq!(pricing_key(&PricingError::Overflow), MessageKey::PriceOverflow);
}
