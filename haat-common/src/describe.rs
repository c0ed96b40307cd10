//! Template-based product description composer
//!
//! Produces marketing copy plus a "Label: value" feature list from the
//! attributes a seller enters on the authoring form. Output is deterministic
//! for a given [`TemplateChoice`]; the lead and body templates are otherwise
//! drawn uniformly from a random source so repeated drafts read differently.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::vocabulary::{call_to_action, category_label, phrase_occasion};

/// Output length mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum DescriptionMode {
    /// Lead + body only, up to 3 features
    Short,
    /// Lead + body + highlights + call-to-action, up to 6 features
    #[default]
    Long,
}

impl DescriptionMode {
    /// Maximum number of feature lines returned in this mode
    pub fn feature_limit(self) -> usize {
        match self {
            DescriptionMode::Short => 3,
            DescriptionMode::Long => 6,
        }
    }
}

impl From<Option<String>> for DescriptionMode {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<String> for DescriptionMode {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("short") {
            DescriptionMode::Short
        } else {
            DescriptionMode::Long
        }
    }
}

/// Copy tone; anything unrecognised reads as warm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Tone {
    #[default]
    Warm,
    Luxury,
    Playful,
    Earthy,
}

impl From<Option<String>> for Tone {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<String> for Tone {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "luxury" => Tone::Luxury,
            "playful" => Tone::Playful,
            "earthy" => Tone::Earthy,
            _ => Tone::Warm,
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Warm => "warm",
            Tone::Luxury => "luxury",
            Tone::Playful => "playful",
            Tone::Earthy => "earthy",
        }
    }

    /// Voice metadata and the lead-sentence line for this tone
    pub fn style_guide(&self) -> StyleGuide {
        match self {
            Tone::Luxury => StyleGuide {
                voice: "Refined, elegant, and detail\u{2011}oriented",
                line: "Elegantly crafted with meticulous attention to detail.",
            },
            Tone::Playful => StyleGuide {
                voice: "Vibrant, friendly, and upbeat",
                line: "Fun, vibrant, and full of personality.",
            },
            Tone::Earthy => StyleGuide {
                voice: "Natural, grounded, and artisan\u{2011}led",
                line: "Rooted in natural textures and mindful craftsmanship.",
            },
            Tone::Warm => StyleGuide {
                voice: "Warm, approachable, and crafted",
                line: "Thoughtfully made in small batches by local artisans.",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleGuide {
    /// Describes the register; carried on the output, never rendered
    pub voice: &'static str,
    /// Spliced into the lead sentence
    pub line: &'static str,
}

/// Optional product specification entered by the seller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSpec {
    /// Overrides the top-level materials for the feature list when present
    pub materials: Option<Vec<String>>,
    pub size: Option<String>,
    pub dimensions: Option<String>,
    pub weight: Option<String>,
    pub care: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub audience: Option<String>,
    pub occasion: Option<String>,
    pub origin: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub eco: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub handmade: bool,
}

/// Everything the composer needs to draft a description
///
/// Missing and `null` fields both read as their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductAttributes {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Raw category value (catalog label or free text)
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub materials: Vec<String>,
    pub tone: Tone,
    #[serde(deserialize_with = "null_as_default")]
    pub use_case: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub spec: ProductSpec,
    pub mode: DescriptionMode,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Generated description and feature list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescription {
    pub description: String,
    pub features: Vec<String>,
    /// Tone voice metadata
    #[serde(default)]
    pub voice: String,
}

// ============================================================================
// Templates
// ============================================================================

/// Lead sentence template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadTemplate {
    Piece,
    ArtisanCrafted,
    Discover,
}

impl LeadTemplate {
    pub const ALL: [LeadTemplate; 3] = [
        LeadTemplate::Piece,
        LeadTemplate::ArtisanCrafted,
        LeadTemplate::Discover,
    ];

    fn render(self, title: &str, label: &str, materials: &str, tail: &str) -> String {
        match self {
            LeadTemplate::Piece => format!("{title} \u{2014} a {label} piece{materials}. {tail}"),
            LeadTemplate::ArtisanCrafted => {
                format!("{title}: artisan\u{2011}crafted {label}{materials}. {tail}")
            }
            LeadTemplate::Discover => {
                format!("Discover {title}, a {label} essential{materials}. {tail}")
            }
        }
    }
}

/// Body sentence template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTemplate {
    Balanced,
    SmallBatch,
    BuiltToLast,
}

impl BodyTemplate {
    pub const ALL: [BodyTemplate; 3] = [
        BodyTemplate::Balanced,
        BodyTemplate::SmallBatch,
        BodyTemplate::BuiltToLast,
    ];

    fn text(self) -> &'static str {
        match self {
            BodyTemplate::Balanced => "Each piece is thoughtfully designed to balance aesthetics and everyday utility, with subtle details that elevate any space or outfit.",
            BodyTemplate::SmallBatch => "Crafted in small batches, it delivers character and quality you can see and feel\u{2014}no two pieces are exactly alike.",
            BodyTemplate::BuiltToLast => "Built to last and easy to love, it\u{2019}s a simple way to add personality and warmth to your collection.",
        }
    }
}

/// Which lead and body templates to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateChoice {
    pub lead: LeadTemplate,
    pub body: BodyTemplate,
}

impl TemplateChoice {
    pub fn new(lead: LeadTemplate, body: BodyTemplate) -> Self {
        Self { lead, body }
    }

    /// Uniform pick of one lead and one body template
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            lead: LeadTemplate::ALL[rng.gen_range(0..LeadTemplate::ALL.len())],
            body: BodyTemplate::ALL[rng.gen_range(0..BodyTemplate::ALL.len())],
        }
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Compose a description using the thread-local random source
pub fn compose_description(attrs: &ProductAttributes) -> ProductDescription {
    compose_description_with(attrs, &mut rand::thread_rng())
}

/// Compose a description drawing the template choice from `rng`
pub fn compose_description_with<R: Rng + ?Sized>(
    attrs: &ProductAttributes,
    rng: &mut R,
) -> ProductDescription {
    compose_description_from(attrs, TemplateChoice::random(rng))
}

/// Compose a description with an explicit template choice
///
/// Short mode is the lead and body sentences only. Long mode appends a
/// `Highlights:` bullet block of the feature lines and then the category's
/// call-to-action; with no feature lines the `Highlights:` block is omitted
/// and the call-to-action follows the body directly.
pub fn compose_description_from(
    attrs: &ProductAttributes,
    choice: TemplateChoice,
) -> ProductDescription {
    let label = category_label(&attrs.category);
    let guide = attrs.tone.style_guide();

    let materials = listify(&attrs.materials, 5);
    let materials = if materials.is_empty() {
        String::new()
    } else {
        format!(" made with {materials}")
    };

    let mut tail = guide.line.to_string();
    if !attrs.use_case.is_empty() {
        tail.push_str(&format!(" \u{2014} ideal for {}", attrs.use_case));
    }
    let occasion = attrs
        .spec
        .occasion
        .as_deref()
        .map(phrase_occasion)
        .unwrap_or_default();
    if !occasion.is_empty() {
        tail.push_str(&format!(" Perfect for {occasion}."));
    }

    let lead = choice.lead.render(&attrs.title, &label, &materials, &tail);

    let keywords = listify(&attrs.keywords, 6);
    let body = if keywords.is_empty() {
        choice.body.text().to_string()
    } else {
        format!("{} Featuring {keywords}.", choice.body.text())
    };

    let feature_materials = attrs.spec.materials.as_deref().unwrap_or(attrs.materials.as_slice());
    let mut features = feature_lines(feature_materials, &attrs.spec);
    features.truncate(attrs.mode.feature_limit());

    let description = match attrs.mode {
        DescriptionMode::Short => format!("{lead} {body}"),
        DescriptionMode::Long => {
            let cta = call_to_action(&label);
            if features.is_empty() {
                format!("{lead} {body}\n\n{cta}")
            } else {
                let bullets: Vec<String> = features.iter().map(|f| format!("\u{2022} {f}")).collect();
                format!("{lead} {body}\n\nHighlights:\n{}\n\n{cta}", bullets.join("\n"))
            }
        }
    };

    ProductDescription {
        description,
        features,
        voice: guide.voice.to_string(),
    }
}

/// Feature lines for a product spec, in fixed checklist order
pub fn build_features(spec: &ProductSpec) -> Vec<String> {
    feature_lines(spec.materials.as_deref().unwrap_or_default(), spec)
}

fn feature_lines(materials: &[String], spec: &ProductSpec) -> Vec<String> {
    let mut out = Vec::new();

    let materials = listify(materials, 5);
    if !materials.is_empty() {
        out.push(format!("Materials: {materials}"));
    }
    if let Some(dimensions) = present(&spec.dimensions) {
        out.push(format!("Dimensions: {dimensions}"));
    } else if let Some(size) = present(&spec.size) {
        out.push(format!("Size: {size}"));
    }
    if let Some(weight) = present(&spec.weight) {
        out.push(format!("Weight: {weight}"));
    }
    if let Some(color) = present(&spec.color) {
        out.push(format!("Color: {color}"));
    }
    if let Some(style) = present(&spec.style) {
        out.push(format!("Style: {style}"));
    }
    if let Some(audience) = present(&spec.audience) {
        out.push(format!("Ideal for: {audience}"));
    }
    if let Some(occasion) = present(&spec.occasion) {
        out.push(format!("Occasion: {}", phrase_occasion(occasion)));
    }
    if let Some(care) = present(&spec.care) {
        out.push(format!("Care: {care}"));
    }
    if let Some(origin) = present(&spec.origin) {
        out.push(format!("Origin: {origin}"));
    }
    if spec.eco {
        out.push("Eco\u{2011}friendly materials".to_string());
    }
    if spec.handmade {
        out.push("Handmade, each piece is unique".to_string());
    }

    out
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Trim, drop blanks, keep the first `limit`, join with ", "
fn listify(items: &[String], limit: usize) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect::<Vec<_>>()
        .join(", ")
}
