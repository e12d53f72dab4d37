use super::*;
use chrono::{DateTime, Utc};

fn sample_item(status: &str) -> ItemRow {
    ItemRow {
        id: Uuid::nil(),
        owner_id: Uuid::nil(),
        title: "מקדחה רוטטת".into(),
        description: String::new(),
        category: "tools".into(),
        subcategory: Some("power-tools".into()),
        price_per_day: 45,
        price_three_days: None,
        price_seven_days: None,
        photos: vec![],
        city: "חיפה".into(),
        cancellation_policy: "moderate".into(),
        item_value: None,
        status: status.into(),
        featured: false,
        created_at: DateTime::<Utc>::MIN_UTC,
    }
}

// =============================================================================
// to_item_response
// =============================================================================

#[test]
fn response_localizes_status_label() {
    let resp = to_item_response(sample_item("active"), Lang::He);
    assert_eq!(resp.status_label, "זמין");
    assert_eq!(resp.status_color, "green");
    assert_eq!(resp.price_display, "₪45");

    let resp = to_item_response(sample_item("active"), Lang::En);
    assert_eq!(resp.status_label, "Available");
}

#[test]
fn response_unknown_status_falls_back() {
    let resp = to_item_response(sample_item("limbo"), Lang::He);
    assert_eq!(resp.status_label, "לא ידוע");
    assert_eq!(resp.status_color, "gray");
}

#[test]
fn response_flattens_item_fields() {
    let json = serde_json::to_value(to_item_response(sample_item("active"), Lang::He)).unwrap();
    assert_eq!(json["title"], "מקדחה רוטטת");
    assert_eq!(json["price_per_day"], 45);
    assert_eq!(json["status_label"], "זמין");
    assert_eq!(json["price_display"], "₪45");
}

// =============================================================================
// categories handler
// =============================================================================

#[tokio::test]
async fn categories_localize_labels() {
    let Json(he) = categories(Lang::He).await;
    let Json(en) = categories(Lang::En).await;

    assert_eq!(he.len(), en.len());
    let he_tools = he.iter().find(|c| c.slug == "tools").unwrap();
    let en_tools = en.iter().find(|c| c.slug == "tools").unwrap();
    assert_eq!(he_tools.label, "כלי עבודה");
    assert_eq!(en_tools.label, "Work tools");
    assert!(!he_tools.subcategories.is_empty());
}

// =============================================================================
// quote query
// =============================================================================

#[test]
fn quote_query_deserializes_iso_date() {
    let query: QuoteQuery = serde_json::from_str(r#"{"start_date":"2024-01-10","days":3}"#).unwrap();
    assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(query.days, 3);
}
