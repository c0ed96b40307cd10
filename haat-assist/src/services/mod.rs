//! Service layer: oracle clients, prompts and the fallback assistant

pub mod assistant;
pub mod gemini_client;
pub mod oracle;
pub mod prompts;

pub use assistant::{Assisted, ShoppingAssistant, Source};
pub use gemini_client::GeminiClient;
pub use oracle::{extract_json_object, DisabledOracle, OracleError, TextOracle};

use std::sync::Arc;

use haat_common::config::{resolve_oracle_api_key, TomlConfig};

/// Pick the oracle for this configuration
///
/// Disabled in config or no usable API key → [`DisabledOracle`]. A client
/// that fails to build is logged and also degrades to disabled.
pub fn select_oracle(config: &TomlConfig) -> Arc<dyn TextOracle> {
    if !config.oracle.enabled {
        tracing::info!("Oracle disabled in configuration, using rule-based assistant");
        return Arc::new(DisabledOracle::new("disabled in configuration"));
    }

    let Some(api_key) = resolve_oracle_api_key(config) else {
        tracing::warn!(
            "No oracle API key found (set {} or [oracle] api_key). Using rule-based assistant.",
            haat_common::config::ORACLE_API_KEY_ENV
        );
        return Arc::new(DisabledOracle::new("no API key configured"));
    };

    match GeminiClient::from_config(&config.oracle, api_key) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini oracle enabled");
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Gemini client, using rule-based assistant");
            Arc::new(DisabledOracle::new(format!("client init failed: {}", e)))
        }
    }
}
