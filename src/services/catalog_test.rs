use super::*;

#[test]
fn slugs_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for cat in CATEGORIES {
        assert!(seen.insert(cat.slug), "duplicate category slug {}", cat.slug);
        let mut sub_seen = std::collections::HashSet::new();
        for sub in cat.subcategories {
            assert!(sub_seen.insert(sub.slug), "duplicate subcategory slug {}", sub.slug);
        }
    }
}

#[test]
fn every_entry_has_both_labels() {
    for cat in CATEGORIES {
        assert!(!cat.label_he.is_empty());
        assert!(!cat.label_en.is_empty());
        for sub in cat.subcategories {
            assert!(!sub.label_he.is_empty());
            assert!(!sub.label_en.is_empty());
        }
    }
}

#[test]
fn find_known_category() {
    let cat = find("tools").unwrap();
    assert_eq!(cat.label(crate::i18n::Lang::He), "כלי עבודה");
    assert_eq!(cat.label(crate::i18n::Lang::En), "Work tools");
}

#[test]
fn find_unknown_category_is_none() {
    assert!(find("boats").is_none());
}

#[test]
fn is_valid_category_alone() {
    assert!(is_valid("camping", None));
    assert!(!is_valid("boats", None));
}

#[test]
fn is_valid_category_with_subcategory() {
    assert!(is_valid("camping", Some("tents")));
    assert!(!is_valid("camping", Some("drones")));
    assert!(!is_valid("boats", Some("tents")));
}

#[test]
fn subcategory_labels_resolve_by_lang() {
    let cat = find("electronics").unwrap();
    let sub = cat.subcategories.iter().find(|s| s.slug == "drones").unwrap();
    assert_eq!(sub.label(crate::i18n::Lang::He), "רחפנים");
    assert_eq!(sub.label(crate::i18n::Lang::En), "Drones");
}
