//! Free-text shopping query → structured search filter
//!
//! Rule-based extraction used by the shopping assistant whenever the
//! generative oracle is absent or misbehaves. The extractor is total: every
//! input, including the empty string, produces a well-formed [`Filter`].
//!
//! # Pipeline
//! 1. Lowercase the query
//! 2. Price bounds: range → upper bound → lower bound → bare number
//! 3. Category: first matching keyword family in priority order
//! 4. Facets: independent membership scans per tag family
//! 5. Residual keywords: punctuation-stripped, stopword-filtered words
//! 6. Search string: deduplicated facet tags then keywords, first 6 entries
//!
//! Keyword families match substrings inside longer words ("string" counts as
//! a ring, "artisan" as art). Downstream ranking relies on that looseness.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::vocabulary::{self, Category};

/// Maximum number of entries joined into [`Filter::search`]
pub const MAX_SEARCH_TERMS: usize = 6;

/// Accepted digit-run lengths for prices
const PRICE_DIGITS: std::ops::RangeInclusive<usize> = 2..=6;

/// Structured search filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Inferred catalog category (at most one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Inclusive lower price bound (INR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    /// Inclusive upper price bound (INR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    /// Space-joined keyword string, empty when nothing was recognised
    #[serde(default)]
    pub search: String,
    /// Facet tags
    #[serde(default, alias = "_facets")]
    pub facets: Facets,
}

impl Filter {
    /// True when no signal at all was extracted
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.search.is_empty()
            && self.facets.is_empty()
    }

    /// Re-impose the extractor's invariants on a filter built elsewhere
    ///
    /// Facet families lose repeated tags (first occurrence kept), the search
    /// string is de-duplicated word by word and capped at
    /// [`MAX_SEARCH_TERMS`] words, and reversed price bounds are swapped.
    pub fn normalized(mut self) -> Self {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                self.min_price = Some(max);
                self.max_price = Some(min);
            }
        }
        self.search = join_unique(self.search.split_whitespace());
        self.facets = Facets {
            materials: dedup_tags(self.facets.materials),
            styles: dedup_tags(self.facets.styles),
            audience: dedup_tags(self.facets.audience),
            occasion: dedup_tags(self.facets.occasion),
            eco: dedup_tags(self.facets.eco),
        };
        self
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}

/// Facet tag families, each insertion-ordered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub audience: Vec<String>,
    #[serde(default)]
    pub occasion: Vec<String>,
    #[serde(default)]
    pub eco: Vec<String>,
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        self.tags().next().is_none()
    }

    /// All tags in family order: materials, styles, audience, occasion, eco
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.materials
            .iter()
            .chain(&self.styles)
            .chain(&self.audience)
            .chain(&self.occasion)
            .chain(&self.eco)
            .map(String::as_str)
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Optional currency marker before a number: "₹", "rs", "rs."
const CURRENCY: &str = r"(?:(?:₹|rs\.?)\s*)?";

static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"between\s*{CURRENCY}([0-9]+)\s*(?:and|to|-)\s*{CURRENCY}([0-9]+)"
    ))
    .expect("range pattern")
});

static UPPER_BOUND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:\b(?:under|below)|<=?)\s*{CURRENCY}([0-9]+)"))
        .expect("upper bound pattern")
});

static LOWER_BOUND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:\b(?:above|over)|>=?)\s*{CURRENCY}([0-9]+)"))
        .expect("lower bound pattern")
});

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run pattern"));

/// Category keyword families in priority order
static CATEGORY_FAMILIES: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
    [
        (r"\bjewel|ring|necklace|earrings?\b", Category::Jewelry),
        (r"\bpaint|canvas|art|wall\s*art\b", Category::Paintings),
        (r"\bdecor|wall|home\b", Category::HomeDecor),
        (r"\bcraft|handicraft\b", Category::Crafts),
        (r"\bstationery|notebook|pen|journal\b", Category::Stationery),
        // Pottery listings live under crafts in the catalog
        (r"\bpottery|ceramic|terracotta\b", Category::Crafts),
        (r"\btextile|fabric|scarf|shawl\b", Category::Textiles),
    ]
    .into_iter()
    .map(|(pattern, category)| (Regex::new(pattern).expect("category pattern"), category))
    .collect()
});

static AUDIENCE_FAMILIES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bfor\s+her\b", "for her"),
        (r"\bfor\s+him\b", "for him"),
        (r"\b(?:kids?|child|baby)\b", "kids"),
    ]
    .into_iter()
    .map(|(pattern, tag)| (Regex::new(pattern).expect("audience pattern"), tag))
    .collect()
});

static ECO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\beco|sustainable|handmade|artisan\b").expect("eco pattern")
});

// ============================================================================
// Extraction
// ============================================================================

/// Extract a structured filter from a free-text shopping query
///
/// Never fails; absence of signal yields `Filter::default()`.
pub fn extract_filters(query: &str) -> Filter {
    let text = query.to_lowercase();

    let (min_price, max_price) = extract_price_bounds(&text);
    let category = infer_category(&text);
    let facets = extract_facets(&text);
    let keywords = residual_keywords(&text);
    let search = compose_search(&facets, &keywords);

    let filter = Filter {
        category,
        min_price,
        max_price,
        search,
        facets,
    };

    tracing::trace!(
        category = ?filter.category,
        min_price = ?filter.min_price,
        max_price = ?filter.max_price,
        search = %filter.search,
        "Extracted filters from query"
    );

    filter
}

/// Price bounds from the first rule that matches
///
/// Returns `(min_price, max_price)`.
fn extract_price_bounds(text: &str) -> (Option<u32>, Option<u32>) {
    let range = RANGE_PATTERN.captures_iter(text).find_map(|caps| {
        let a = parse_price(caps.get(1)?.as_str())?;
        let b = parse_price(caps.get(2)?.as_str())?;
        Some((a.min(b), a.max(b)))
    });
    if let Some((low, high)) = range {
        return (Some(low), Some(high));
    }

    if let Some(max) = first_capture_price(&UPPER_BOUND_PATTERN, text) {
        return (None, Some(max));
    }

    if let Some(min) = first_capture_price(&LOWER_BOUND_PATTERN, text) {
        return (Some(min), None);
    }

    let bare = DIGIT_RUN
        .find_iter(text)
        .find_map(|m| parse_price(m.as_str()));
    (None, bare)
}

fn first_capture_price(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures_iter(text)
        .find_map(|caps| parse_price(caps.get(1)?.as_str()))
}

/// Parse a digit run as a price, rejecting runs outside 2–6 digits
fn parse_price(digits: &str) -> Option<u32> {
    if !PRICE_DIGITS.contains(&digits.len()) {
        return None;
    }
    digits.parse().ok()
}

fn infer_category(text: &str) -> Option<Category> {
    CATEGORY_FAMILIES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, category)| *category)
}

fn extract_facets(text: &str) -> Facets {
    let contained = |vocab: &[&str]| -> Vec<String> {
        vocab
            .iter()
            .filter(|tag| text.contains(*tag))
            .map(|tag| tag.to_string())
            .collect()
    };

    let audience = AUDIENCE_FAMILIES
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, tag)| tag.to_string())
        .collect();

    let eco = if ECO_PATTERN.is_match(text) {
        vec![vocabulary::ECO_TAG.to_string()]
    } else {
        Vec::new()
    };

    Facets {
        materials: contained(vocabulary::MATERIALS),
        styles: contained(vocabulary::STYLES),
        audience,
        occasion: contained(vocabulary::OCCASIONS),
        eco,
    }
}

/// Words left over once punctuation, stopwords, short words and numbers go
fn residual_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| {
            !vocabulary::is_stopword(word)
                && word.len() > 2
                && !word.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect()
}

fn compose_search(facets: &Facets, keywords: &[String]) -> String {
    join_unique(facets.tags().chain(keywords.iter().map(String::as_str)))
}

/// First [`MAX_SEARCH_TERMS`] distinct entries, space-joined
fn join_unique<'a>(terms: impl Iterator<Item = &'a str>) -> String {
    let mut seen = HashSet::new();
    terms
        .filter(|term| seen.insert(*term))
        .take(MAX_SEARCH_TERMS)
        .collect::<Vec<_>>()
        .join(" ")
}
