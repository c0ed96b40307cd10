//! # Haat Common Library
//!
//! Rules shared by every Haat service and request handler:
//! - Free-text shopping query → search filter extraction
//! - Template-based product description composition
//! - Static vocabularies (categories, materials, styles, occasions)
//! - Filter → catalog lookup translation
//! - TOML configuration and common error types
//!
//! Everything here is synchronous and free of I/O except the config loader,
//! so handlers can call it directly whether or not an oracle is configured.

pub mod catalog;
pub mod config;
pub mod describe;
pub mod error;
pub mod filters;
pub mod vocabulary;

pub use catalog::{CatalogPage, CatalogQuery, ProductSummary};
pub use describe::{
    build_features, compose_description, compose_description_from, compose_description_with,
    BodyTemplate, DescriptionMode, LeadTemplate, ProductAttributes, ProductDescription,
    ProductSpec, TemplateChoice, Tone,
};
pub use error::{Error, Result};
pub use filters::{extract_filters, Facets, Filter};
pub use vocabulary::Category;
