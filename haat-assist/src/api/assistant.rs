//! Shopping assistant endpoints
//!
//! - `POST /api/assistant/filters`: oracle-first filter extraction
//! - `POST /api/assistant/filters/rules`: rule-based extraction only
//! - `POST /api/assistant/plan`: filters plus the catalog lookups to issue
//! - `POST /api/assistant/search`: filters run against a supplied product list

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use haat_common::{extract_filters, CatalogPage, CatalogQuery, Category, Filter, ProductSummary};

use crate::{ApiError, ApiResult, AppState};

/// Assistant query request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Filters plus the catalog lookups the storefront should run
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub filters: Filter,
    /// Lookup built from the filters as extracted
    pub primary: CatalogQuery,
    /// Same lookup without the category, to try when `primary` comes back empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxed: Option<CatalogQuery>,
}

/// Query plus the product listing to search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub products: Vec<ProductSummary>,
    /// Category picked by the shopper; replaces the extracted one and is
    /// never relaxed
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub filters: Filter,
    /// Lookup that produced `items`
    pub lookup: CatalogQuery,
    /// Category was dropped after the first lookup matched nothing
    pub relaxed: bool,
    #[serde(flatten)]
    pub results: CatalogPage,
}

fn check_query_len(state: &AppState, query: &str) -> ApiResult<()> {
    let len = query.chars().count();
    if len > state.max_query_len {
        return Err(ApiError::BadRequest(format!(
            "Query is {} characters; the limit is {}",
            len, state.max_query_len
        )));
    }
    Ok(())
}

/// Unwrap the body and enforce the query length limit
fn accept_query(
    state: &AppState,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(request) = body?;
    check_query_len(state, &request.query)?;
    Ok(request.query)
}

/// POST /api/assistant/filters
pub async fn extract(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<Filter>> {
    let query = accept_query(&state, body)?;

    let assisted = state.assistant.filters_for(&query).await;
    state
        .record_fallback(assisted.fallback_reason.as_deref())
        .await;

    tracing::info!(source = assisted.source.as_str(), "Assistant filters extracted");
    Ok(Json(assisted.value))
}

/// POST /api/assistant/filters/rules
pub async fn extract_rules(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<Filter>> {
    let query = accept_query(&state, body)?;
    Ok(Json(extract_filters(&query)))
}

/// POST /api/assistant/plan
pub async fn plan(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<PlanResponse>> {
    let query = accept_query(&state, body)?;

    let assisted = state.assistant.filters_for(&query).await;
    state
        .record_fallback(assisted.fallback_reason.as_deref())
        .await;

    let primary = CatalogQuery::from_filter(&assisted.value);
    let relaxed = primary.without_category();

    tracing::info!(
        source = assisted.source.as_str(),
        relaxed = relaxed.is_some(),
        "Assistant lookup planned"
    );

    Ok(Json(PlanResponse {
        filters: assisted.value,
        primary,
        relaxed,
    }))
}

/// POST /api/assistant/search
///
/// Extracts filters, then pages through `products` with the catalog rules.
/// An extracted category that matches nothing is dropped and the lookup run
/// again.
pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(request) = body?;
    check_query_len(&state, &request.query)?;

    let chosen = request
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<Category>)
        .transpose()?;

    let assisted = state.assistant.filters_for(&request.query).await;
    state
        .record_fallback(assisted.fallback_reason.as_deref())
        .await;

    let mut filters = assisted.value;
    if chosen.is_some() {
        filters.category = chosen;
    }

    let mut lookup = CatalogQuery::from_filter(&filters);
    if let Some(page) = request.page {
        lookup.page = page.max(1);
    }
    let mut results = lookup.run(&request.products);

    let mut relaxed = false;
    if results.total == 0 && chosen.is_none() {
        if let Some(wider) = lookup.without_category() {
            results = wider.run(&request.products);
            lookup = wider;
            relaxed = true;
        }
    }

    tracing::info!(
        source = assisted.source.as_str(),
        total = results.total,
        relaxed,
        "Assistant search served"
    );

    Ok(Json(SearchResponse {
        filters,
        lookup,
        relaxed,
        results,
    }))
}

/// Build assistant routes
pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assistant/filters", post(extract))
        .route("/api/assistant/filters/rules", post(extract_rules))
        .route("/api/assistant/plan", post(plan))
        .route("/api/assistant/search", post(search))
}
