//! Static vocabularies shared by filter extraction and description composition
//!
//! All tables are compile-time constants. Lookups are linear scans over
//! short slices; declaration order is significant wherever a "first match"
//! rule applies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Jewelry,
    Paintings,
    HomeDecor,
    Crafts,
    Stationery,
    Pottery,
    Textiles,
}

impl Category {
    /// Every category in catalog order
    pub const ALL: [Category; 7] = [
        Category::Jewelry,
        Category::Paintings,
        Category::HomeDecor,
        Category::Crafts,
        Category::Stationery,
        Category::Pottery,
        Category::Textiles,
    ];

    /// Wire label as stored on product records
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Jewelry => "jewelry",
            Category::Paintings => "paintings",
            Category::HomeDecor => "home-decor",
            Category::Crafts => "crafts",
            Category::Stationery => "stationery",
            Category::Pottery => "pottery",
            Category::Textiles => "textiles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::UnknownCategory(s.trim().to_string()))
    }
}

/// Material tags, scanned as substrings in this order
pub const MATERIALS: &[&str] = &[
    "silver",
    "gold",
    "bamboo",
    "clay",
    "cotton",
    "wool",
    "wood",
    "terracotta",
    "acrylic",
    "watercolor",
    "leather",
];

/// Style tags, scanned as substrings in this order
pub const STYLES: &[&str] = &["minimalist", "boho", "rustic", "modern", "vintage", "classic"];

/// Occasion tags, scanned as substrings in this order
pub const OCCASIONS: &[&str] = &[
    "birthday",
    "anniversary",
    "housewarming",
    "diwali",
    "christmas",
    "mothers",
    "fathers",
];

/// Tag emitted for any sustainability signal
pub const ECO_TAG: &str = "eco-friendly";

/// Words dropped from the residual keyword list
pub const STOPWORDS: &[&str] = &[
    "show", "me", "the", "a", "an", "and", "or", "to", "for", "under", "below", "above", "over",
    "between", "with", "in", "of", "gift", "gifts", "unique", "suggest",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Occasion keyword → display phrase, first contained keyword wins
const OCCASION_PHRASES: &[(&str, &str)] = &[
    ("birthday", "birthdays"),
    ("anniversary", "anniversaries"),
    ("housewarming", "housewarming"),
    ("diwali", "Diwali gifting"),
    ("christmas", "Christmas"),
    ("mothers", "Mother\u{2019}s Day"),
    ("fathers", "Father\u{2019}s Day"),
];

/// Normalize an occasion tag into a display phrase
///
/// Unrecognised occasions are returned unchanged; empty input yields an
/// empty string.
pub fn phrase_occasion(occasion: &str) -> String {
    let lowered = occasion.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }

    OCCASION_PHRASES
        .iter()
        .find(|(key, _)| lowered.contains(key))
        .map(|(_, phrase)| phrase.to_string())
        .unwrap_or_else(|| occasion.to_string())
}

/// Category value → display label used in copy
const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("home-decor", "home d\u{e9}cor"),
    ("home decor", "home d\u{e9}cor"),
    ("jewelry", "jewelry"),
    ("paintings", "wall art"),
    ("crafts", "handicraft"),
    ("stationery", "stationery"),
    ("pottery", "pottery"),
    ("textiles", "textiles"),
];

/// Label used when a product has no category at all
pub const DEFAULT_CATEGORY_LABEL: &str = "handmade";

/// Normalize a raw category value into its display label
pub fn category_label(category: &str) -> String {
    let key = category.trim().to_lowercase();
    if key.is_empty() {
        return DEFAULT_CATEGORY_LABEL.to_string();
    }

    CATEGORY_LABELS
        .iter()
        .find(|(raw, _)| *raw == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or(key)
}

/// Display label → closing call-to-action line
const CALLS_TO_ACTION: &[(&str, &str)] = &[
    ("home d\u{e9}cor", "Brighten your space with artisan character."),
    ("jewelry", "Elevate everyday looks with a distinctive accent."),
    ("wall art", "Transform your walls with expressive art."),
    ("handicraft", "Bring handmade charm into daily life."),
    ("stationery", "Make every note feel special."),
    ("pottery", "Add organic warmth to your home."),
    ("textiles", "Wrap comfort and style into your routine."),
];

pub const GENERIC_CALL_TO_ACTION: &str = "Make it part of the story at home.";

/// Exact lookup of the call-to-action for a normalized label
pub fn call_to_action(label: &str) -> &'static str {
    CALLS_TO_ACTION
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, cta)| *cta)
        .unwrap_or(GENERIC_CALL_TO_ACTION)
}
