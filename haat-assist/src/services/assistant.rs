//! Oracle-first shopping assistant with rule-based fallback
//!
//! Every operation returns a usable result. The oracle is consulted only
//! when it reports itself available; its reply must survive strict
//! validation, otherwise the deterministic rules from `haat-common` answer
//! instead and the failure reason travels with the result for diagnostics.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use haat_common::{
    compose_description, extract_filters, Category, Facets, Filter, ProductAttributes,
    ProductDescription,
};

use super::oracle::{extract_json_object, json_kind, DisabledOracle, OracleError, TextOracle};
use super::prompts;

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Oracle,
    Rules,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Oracle => "oracle",
            Source::Rules => "rules",
        }
    }
}

/// A result plus where it came from
#[derive(Debug, Clone)]
pub struct Assisted<T> {
    pub value: T,
    pub source: Source,
    /// Set when the oracle was tried and its answer discarded
    pub fallback_reason: Option<String>,
}

impl<T> Assisted<T> {
    fn oracle(value: T) -> Self {
        Self {
            value,
            source: Source::Oracle,
            fallback_reason: None,
        }
    }

    fn rules(value: T) -> Self {
        Self {
            value,
            source: Source::Rules,
            fallback_reason: None,
        }
    }

    fn fallback(value: T, err: &OracleError) -> Self {
        Self {
            value,
            source: Source::Rules,
            fallback_reason: Some(err.to_string()),
        }
    }
}

/// Shopping assistant service
pub struct ShoppingAssistant {
    oracle: Arc<dyn TextOracle>,
}

impl ShoppingAssistant {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    /// Assistant that never calls out
    pub fn rules_only() -> Self {
        Self::new(Arc::new(DisabledOracle::new("rule-based mode")))
    }

    pub fn oracle(&self) -> &dyn TextOracle {
        self.oracle.as_ref()
    }

    /// Structured filter for a shopping query
    pub async fn filters_for(&self, query: &str) -> Assisted<Filter> {
        if query.trim().is_empty() {
            return Assisted::rules(Filter::default());
        }
        if !self.oracle.is_available() {
            return Assisted::rules(extract_filters(query));
        }

        let reply = self.oracle.generate(&prompts::filter_prompt(query)).await;
        match reply.and_then(|text| parse_filter_reply(&text)) {
            Ok(filter) => {
                debug!(oracle = self.oracle.name(), "Filters extracted by oracle");
                Assisted::oracle(filter)
            }
            Err(err) => {
                warn!(
                    oracle = self.oracle.name(),
                    error = %err,
                    "Oracle filter extraction failed, falling back to rules"
                );
                Assisted::fallback(extract_filters(query), &err)
            }
        }
    }

    /// Description and feature list for a product
    pub async fn describe(&self, attrs: &ProductAttributes) -> Assisted<ProductDescription> {
        if !self.oracle.is_available() {
            return Assisted::rules(compose_description(attrs));
        }

        let reply = self
            .oracle
            .generate(&prompts::description_prompt(attrs))
            .await;
        match reply.and_then(|text| parse_description_reply(&text, attrs)) {
            Ok(description) => {
                debug!(
                    oracle = self.oracle.name(),
                    features = description.features.len(),
                    "Description drafted by oracle"
                );
                Assisted::oracle(description)
            }
            Err(err) => {
                warn!(
                    oracle = self.oracle.name(),
                    error = %err,
                    "Oracle description failed, falling back to templates"
                );
                Assisted::fallback(compose_description(attrs), &err)
            }
        }
    }
}

// ============================================================================
// Reply validation
// ============================================================================

/// Validate an oracle filter reply
///
/// Absent or null fields are fine; anything present must have the right
/// shape. Unknown extra fields are ignored. An accepted reply is normalized
/// so it carries the same guarantees as rule output.
pub fn parse_filter_reply(text: &str) -> Result<Filter, OracleError> {
    let map = extract_json_object(text)?;

    let category = match map.get("category") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(
            s.parse::<Category>()
                .map_err(|_| OracleError::Malformed(format!("unknown category '{}'", s)))?,
        ),
        Some(other) => {
            return Err(OracleError::Malformed(format!(
                "category is {}",
                json_kind(other)
            )))
        }
    };

    let min_price = price_field(&map, "minPrice")?;
    let max_price = price_field(&map, "maxPrice")?;
    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(OracleError::Malformed(format!(
                "minPrice {} exceeds maxPrice {}",
                min, max
            )));
        }
    }

    let search = match map.get("search") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(OracleError::Malformed(format!(
                "search is {}",
                json_kind(other)
            )))
        }
    };

    let facets = match map.get("_facets").or_else(|| map.get("facets")) {
        None | Some(Value::Null) => Facets::default(),
        Some(Value::Object(facets)) => Facets {
            materials: tag_list(facets, "materials")?,
            styles: tag_list(facets, "styles")?,
            audience: tag_list(facets, "audience")?,
            occasion: tag_list(facets, "occasion")?,
            eco: tag_list(facets, "eco")?,
        },
        Some(other) => {
            return Err(OracleError::Malformed(format!(
                "facets is {}",
                json_kind(other)
            )))
        }
    };

    Ok(Filter {
        category,
        min_price,
        max_price,
        search,
        facets,
    }
    .normalized())
}

/// Non-negative whole-number price; `1000.0` is accepted, `999.5` is not
fn price_field(map: &Map<String, Value>, key: &str) -> Result<Option<u32>, OracleError> {
    let value = match map.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let price = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };

    price
        .and_then(|p| u32::try_from(p).ok())
        .map(Some)
        .ok_or_else(|| OracleError::Malformed(format!("{} is not a valid price: {}", key, value)))
}

fn tag_list(facets: &Map<String, Value>, key: &str) -> Result<Vec<String>, OracleError> {
    match facets.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                other => Err(OracleError::Malformed(format!(
                    "{} entry is {}",
                    key,
                    json_kind(other)
                ))),
            })
            .filter(|tag| !matches!(tag, Ok(s) if s.is_empty()))
            .collect(),
        Some(other) => Err(OracleError::Malformed(format!(
            "{} is {}",
            key,
            json_kind(other)
        ))),
    }
}

/// Validate an oracle description reply
///
/// Needs a non-empty `description` string and a `features` string array;
/// features beyond the mode's limit are dropped.
pub fn parse_description_reply(
    text: &str,
    attrs: &ProductAttributes,
) -> Result<ProductDescription, OracleError> {
    let map = extract_json_object(text)?;

    let description = match map.get("description") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => {
            return Err(OracleError::Malformed("description is empty".to_string()))
        }
        Some(other) => {
            return Err(OracleError::Malformed(format!(
                "description is {}",
                json_kind(other)
            )))
        }
        None => return Err(OracleError::Malformed("description missing".to_string())),
    };

    let mut features = match map.get("features") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                other => Err(OracleError::Malformed(format!(
                    "feature entry is {}",
                    json_kind(other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(OracleError::Malformed(format!(
                "features is {}",
                json_kind(other)
            )))
        }
        None => return Err(OracleError::Malformed("features missing".to_string())),
    };
    features.retain(|f| !f.is_empty());
    features.truncate(attrs.mode.feature_limit());

    Ok(ProductDescription {
        description,
        features,
        voice: attrs.tone.style_guide().voice.to_string(),
    })
}
