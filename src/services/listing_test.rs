use super::*;

fn complete_draft() -> DraftRow {
    DraftRow {
        id: Uuid::nil(),
        owner_id: Uuid::nil(),
        step: LAST_STEP,
        category: Some("tools".into()),
        subcategory: Some("power-tools".into()),
        title: Some("מקדחה רוטטת".into()),
        description: Some("כמעט חדשה, כולל מזוודה".into()),
        photos: vec!["/uploads/item-photos/a.jpg".into()],
        price_per_day: Some(45),
        price_three_days: Some(120),
        price_seven_days: Some(280),
        city: Some("תל אביב".into()),
        street: Some("דיזנגוף 1".into()),
        cancellation_policy: Some("moderate".into()),
        item_value: Some(900),
        created_at: DateTime::<Utc>::MIN_UTC,
    }
}

// =============================================================================
// step machine
// =============================================================================

#[test]
fn next_step_increments_by_exactly_one() {
    for step in FIRST_STEP..LAST_STEP {
        assert_eq!(next_step(step).unwrap(), step + 1);
    }
}

#[test]
fn prev_step_decrements_by_exactly_one() {
    for step in (FIRST_STEP + 1)..=LAST_STEP {
        assert_eq!(prev_step(step).unwrap(), step - 1);
    }
}

#[test]
fn next_step_refused_at_review() {
    assert!(matches!(next_step(LAST_STEP), Err(ListingError::AtLastStep)));
}

#[test]
fn prev_step_refused_at_first() {
    assert!(matches!(prev_step(FIRST_STEP), Err(ListingError::AtFirstStep)));
}

#[test]
fn full_walk_forward_and_back_returns_to_start() {
    let mut step = FIRST_STEP;
    while step < LAST_STEP {
        step = next_step(step).unwrap();
    }
    assert_eq!(step, LAST_STEP);
    while step > FIRST_STEP {
        step = prev_step(step).unwrap();
    }
    assert_eq!(step, FIRST_STEP);
}

// =============================================================================
// validate_complete
// =============================================================================

#[test]
fn complete_draft_passes() {
    assert!(validate_complete(&complete_draft()).is_ok());
}

#[test]
fn minimal_draft_passes_without_optional_fields() {
    let draft = DraftRow {
        subcategory: None,
        photos: vec![],
        price_three_days: None,
        price_seven_days: None,
        street: None,
        cancellation_policy: None,
        item_value: None,
        description: None,
        ..complete_draft()
    };
    assert!(validate_complete(&draft).is_ok());
}

#[test]
fn missing_category_reported_first() {
    let draft = DraftRow { category: None, ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::Incomplete("category"))));
}

#[test]
fn unknown_category_rejected() {
    let draft = DraftRow { category: Some("boats".into()), ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::InvalidCategory)));
}

#[test]
fn subcategory_must_belong_to_category() {
    let draft = DraftRow { subcategory: Some("drones".into()), ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::InvalidCategory)));
}

#[test]
fn blank_title_rejected() {
    let draft = DraftRow { title: Some("   ".into()), ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::Incomplete("title"))));
}

#[test]
fn missing_price_rejected() {
    let draft = DraftRow { price_per_day: None, ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::Incomplete("price_per_day"))));
}

#[test]
fn tier_violation_surfaces_as_pricing_error() {
    let draft = DraftRow { price_three_days: Some(200), ..complete_draft() };
    assert!(matches!(
        validate_complete(&draft),
        Err(ListingError::Pricing(PricingError::TierThreeTooHigh))
    ));
}

#[test]
fn missing_city_rejected() {
    let draft = DraftRow { city: None, ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::Incomplete("city"))));
}

#[test]
fn unknown_policy_rejected() {
    let draft = DraftRow { cancellation_policy: Some("whenever".into()), ..complete_draft() };
    assert!(matches!(validate_complete(&draft), Err(ListingError::InvalidPolicy(_))));
}

// =============================================================================
// DraftUpdate
// =============================================================================

#[test]
fn draft_update_partial_deserialization() {
    let update: DraftUpdate = serde_json::from_str(r#"{"category":"camping","title":"אוהל"}"#).unwrap();
    assert_eq!(update.category.as_deref(), Some("camping"));
    assert_eq!(update.title.as_deref(), Some("אוהל"));
    assert!(update.pricing.is_none());
}

#[test]
fn draft_update_accepts_pricing_object() {
    let update: DraftUpdate =
        serde_json::from_str(r#"{"pricing":{"one_day":45,"three_days":120,"seven_days":null}}"#).unwrap();
    let pricing = update.pricing.unwrap();
    assert_eq!(pricing.one_day, 45);
    assert_eq!(pricing.three_days, Some(120));
    assert_eq!(pricing.seven_days, None);
}
