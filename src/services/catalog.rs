//! Static category catalog for the browse grid.
//!
//! Slugs are the stored/query vocabulary; labels exist in both languages.
//! The catalog is a closed compile-time table, so lookups are slice scans.

use crate::i18n::Lang;

#[derive(Debug, Clone, Copy)]
pub struct Subcategory {
    pub slug: &'static str,
    pub label_he: &'static str,
    pub label_en: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub slug: &'static str,
    pub label_he: &'static str,
    pub label_en: &'static str,
    pub subcategories: &'static [Subcategory],
}

impl Category {
    #[must_use]
    pub fn label(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::He => self.label_he,
            Lang::En => self.label_en,
        }
    }
}

impl Subcategory {
    #[must_use]
    pub fn label(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::He => self.label_he,
            Lang::En => self.label_en,
        }
    }
}

pub const CATEGORIES: &[Category] = &[
    Category {
        slug: "tools",
        label_he: "כלי עבודה",
        label_en: "Work tools",
        subcategories: &[
            Subcategory { slug: "power-tools", label_he: "כלים חשמליים", label_en: "Power tools" },
            Subcategory { slug: "hand-tools", label_he: "כלי יד", label_en: "Hand tools" },
            Subcategory { slug: "ladders", label_he: "סולמות ופיגומים", label_en: "Ladders & scaffolding" },
            Subcategory { slug: "measuring", label_he: "ציוד מדידה", label_en: "Measuring equipment" },
        ],
    },
    Category {
        slug: "garden",
        label_he: "גינון",
        label_en: "Gardening",
        subcategories: &[
            Subcategory { slug: "lawn-mowers", label_he: "מכסחות דשא", label_en: "Lawn mowers" },
            Subcategory { slug: "trimmers", label_he: "חרמשים וגוזמים", label_en: "Trimmers" },
            Subcategory { slug: "pressure-washers", label_he: "מכונות שטיפה בלחץ", label_en: "Pressure washers" },
        ],
    },
    Category {
        slug: "camping",
        label_he: "קמפינג וטיולים",
        label_en: "Camping & hiking",
        subcategories: &[
            Subcategory { slug: "tents", label_he: "אוהלים", label_en: "Tents" },
            Subcategory { slug: "sleeping-gear", label_he: "ציוד שינה", label_en: "Sleeping gear" },
            Subcategory { slug: "coolers", label_he: "צידניות", label_en: "Coolers" },
            Subcategory { slug: "grills", label_he: "מנגלים", label_en: "Grills" },
        ],
    },
    Category {
        slug: "events",
        label_he: "אירועים",
        label_en: "Events",
        subcategories: &[
            Subcategory { slug: "sound", label_he: "מערכות הגברה", label_en: "Sound systems" },
            Subcategory { slug: "projectors", label_he: "מקרנים ומסכים", label_en: "Projectors & screens" },
            Subcategory { slug: "furniture", label_he: "שולחנות וכיסאות", label_en: "Tables & chairs" },
            Subcategory { slug: "lighting", label_he: "תאורה", label_en: "Lighting" },
        ],
    },
    Category {
        slug: "electronics",
        label_he: "אלקטרוניקה",
        label_en: "Electronics",
        subcategories: &[
            Subcategory { slug: "cameras", label_he: "מצלמות", label_en: "Cameras" },
            Subcategory { slug: "drones", label_he: "רחפנים", label_en: "Drones" },
            Subcategory { slug: "lenses", label_he: "עדשות", label_en: "Lenses" },
        ],
    },
    Category {
        slug: "sports",
        label_he: "ספורט ופנאי",
        label_en: "Sports & leisure",
        subcategories: &[
            Subcategory { slug: "bikes", label_he: "אופניים", label_en: "Bikes" },
            Subcategory { slug: "water-sports", label_he: "ספורט ימי", label_en: "Water sports" },
            Subcategory { slug: "ski", label_he: "ציוד סקי", label_en: "Ski gear" },
        ],
    },
    Category {
        slug: "home",
        label_he: "בית ומשפחה",
        label_en: "Home & family",
        subcategories: &[
            Subcategory { slug: "baby-gear", label_he: "ציוד לתינוקות", label_en: "Baby gear" },
            Subcategory { slug: "cleaning", label_he: "מכונות ניקוי", label_en: "Cleaning machines" },
            Subcategory { slug: "kitchen", label_he: "ציוד מטבח", label_en: "Kitchen equipment" },
        ],
    },
];

/// Look up a category by slug.
#[must_use]
pub fn find(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

/// Check a category slug, and (when given) that the subcategory belongs
/// to it.
#[must_use]
pub fn is_valid(category: &str, subcategory: Option<&str>) -> bool {
    let Some(cat) = find(category) else {
        return false;
    };
    match subcategory {
        None => true,
        Some(sub) => cat.subcategories.iter().any(|s| s.slug == sub),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
