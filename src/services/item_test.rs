use super::*;

// =============================================================================
// ItemStatus
// =============================================================================

#[test]
fn status_round_trips_canonical_values() {
    for status in [ItemStatus::Active, ItemStatus::Rented, ItemStatus::Maintenance, ItemStatus::Inactive] {
        assert_eq!(ItemStatus::parse(status.as_str()), Some(status));
    }
}

#[test]
fn status_parse_rejects_unknown() {
    assert_eq!(ItemStatus::parse("broken"), None);
    assert_eq!(ItemStatus::parse("ACTIVE"), None);
    assert_eq!(ItemStatus::parse(""), None);
}

#[test]
fn status_serde_uses_lowercase() {
    let json = serde_json::to_string(&ItemStatus::Maintenance).unwrap();
    assert_eq!(json, "\"maintenance\"");
    let back: ItemStatus = serde_json::from_str("\"rented\"").unwrap();
    assert_eq!(back, ItemStatus::Rented);
}

// =============================================================================
// ItemFilter pagination
// =============================================================================

#[test]
fn filter_defaults() {
    let filter = ItemFilter::default();
    assert_eq!(filter.limit(), 20);
    assert_eq!(filter.offset(), 0);
}

#[test]
fn filter_per_page_is_capped() {
    let filter = ItemFilter { per_page: Some(500), ..ItemFilter::default() };
    assert_eq!(filter.limit(), 50);
}

#[test]
fn filter_per_page_minimum_is_one() {
    let filter = ItemFilter { per_page: Some(0), ..ItemFilter::default() };
    assert_eq!(filter.limit(), 1);
}

#[test]
fn filter_offset_from_page() {
    let filter = ItemFilter { page: Some(3), per_page: Some(10), ..ItemFilter::default() };
    assert_eq!(filter.offset(), 20);
}

#[test]
fn filter_page_zero_treated_as_first() {
    let filter = ItemFilter { page: Some(0), ..ItemFilter::default() };
    assert_eq!(filter.offset(), 0);
}

#[test]
fn filter_deserializes_from_query_shape() {
    let filter: ItemFilter =
        serde_json::from_str(r#"{"category":"tools","q":"מקדחה","min_price":10,"max_price":100}"#).unwrap();
    assert_eq!(filter.category.as_deref(), Some("tools"));
    assert_eq!(filter.q.as_deref(), Some("מקדחה"));
    assert_eq!(filter.min_price, Some(10));
    assert_eq!(filter.max_price, Some(100));
}

// =============================================================================
// rating_average
// =============================================================================

#[test]
fn rating_average_none_without_ratings() {
    assert_eq!(rating_average(0, 0), None);
    assert_eq!(rating_average(10, -1), None);
}

#[test]
fn rating_average_rounds_to_tenth() {
    assert_eq!(rating_average(14, 3), Some(4.7));
    assert_eq!(rating_average(9, 2), Some(4.5));
    assert_eq!(rating_average(5, 1), Some(5.0));
}

// =============================================================================
// ItemRow
// =============================================================================

fn sample_item() -> ItemRow {
    ItemRow {
        id: Uuid::nil(),
        owner_id: Uuid::nil(),
        title: "מקדחה רוטטת".into(),
        description: "כמעט חדשה".into(),
        category: "tools".into(),
        subcategory: Some("power-tools".into()),
        price_per_day: 45,
        price_three_days: Some(120),
        price_seven_days: Some(280),
        photos: vec!["/uploads/item-photos/a.jpg".into()],
        city: "תל אביב".into(),
        cancellation_policy: "moderate".into(),
        item_value: Some(900),
        status: "active".into(),
        featured: false,
        created_at: DateTime::<Utc>::MIN_UTC,
    }
}

#[test]
fn item_row_tiers_mirror_prices() {
    let item = sample_item();
    let tiers = item.tiers();
    assert_eq!(tiers.one_day, 45);
    assert_eq!(tiers.three_days, Some(120));
    assert_eq!(tiers.seven_days, Some(280));
    assert!(tiers.validate().is_ok());
}

#[test]
fn item_row_serializes_photos_as_array() {
    let json = serde_json::to_value(sample_item()).unwrap();
    assert!(json["photos"].is_array());
    assert_eq!(json["photos"][0], "/uploads/item-photos/a.jpg");
    assert_eq!(json["status"], "active");
}

// =============================================================================
// ItemUpdate
// =============================================================================

#[test]
fn item_update_partial_deserialization() {
    let update: ItemUpdate = serde_json::from_str(r#"{"title":"חדש"}"#).unwrap();
    assert_eq!(update.title.as_deref(), Some("חדש"));
    assert!(update.pricing.is_none());
    assert!(update.city.is_none());
}

#[test]
fn item_update_pricing_replaces_whole_tier_set() {
    let update: ItemUpdate =
        serde_json::from_str(r#"{"pricing":{"one_day":50,"three_days":140,"seven_days":null}}"#).unwrap();
    let pricing = update.pricing.unwrap();
    assert_eq!(pricing.one_day, 50);
    assert_eq!(pricing.three_days, Some(140));
    assert_eq!(pricing.seven_days, None);
}
