//! haat-assist library interface
//!
//! Exposes the router, state and services for the binary and for
//! integration tests.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use haat_common::config::DEFAULT_MAX_QUERY_LEN;
use services::ShoppingAssistant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Oracle-first assistant with rule-based fallback
    pub assistant: Arc<ShoppingAssistant>,
    /// Longest accepted assistant query, in characters
    pub max_query_len: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Most recent oracle fallback reason, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(assistant: ShoppingAssistant, max_query_len: usize) -> Self {
        Self {
            assistant: Arc::new(assistant),
            max_query_len,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Rule-based state with default limits
    pub fn rules_only() -> Self {
        Self::new(ShoppingAssistant::rules_only(), DEFAULT_MAX_QUERY_LEN)
    }

    /// Remember why the oracle was bypassed, if it was
    pub async fn record_fallback(&self, reason: Option<&str>) {
        if let Some(reason) = reason {
            *self.last_error.write().await = Some(reason.to_string());
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::assistant_routes())
        .merge(api::product_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
