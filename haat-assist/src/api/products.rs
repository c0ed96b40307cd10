//! Product description endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use haat_common::{compose_description, ProductAttributes, ProductDescription};

use crate::{ApiResult, AppState};

/// POST /api/products/describe
///
/// Oracle draft when one is configured and answers sensibly, template copy
/// otherwise.
pub async fn describe(
    State(state): State<AppState>,
    body: Result<Json<ProductAttributes>, JsonRejection>,
) -> ApiResult<Json<ProductDescription>> {
    let Json(attrs) = body?;

    let assisted = state.assistant.describe(&attrs).await;
    state
        .record_fallback(assisted.fallback_reason.as_deref())
        .await;

    tracing::info!(
        source = assisted.source.as_str(),
        features = assisted.value.features.len(),
        "Product description drafted"
    );
    Ok(Json(assisted.value))
}

/// POST /api/products/describe/rules
pub async fn describe_rules(
    body: Result<Json<ProductAttributes>, JsonRejection>,
) -> ApiResult<Json<ProductDescription>> {
    let Json(attrs) = body?;
    Ok(Json(compose_description(&attrs)))
}

/// Build product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products/describe", post(describe))
        .route("/api/products/describe/rules", post(describe_rules))
}
