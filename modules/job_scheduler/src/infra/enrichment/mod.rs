pub mod disabled;
pub mod http_client;
pub mod prompts;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::EnrichmentConfig;
use crate::domain::ports::EnrichmentPort;

pub use disabled::DisabledEnrichment;
pub use http_client::AnthropicEnrichmentClient;

/// Pick the enrichment adapter for `cfg`. A missing key or a bad base URL
/// disables enrichment instead of failing startup.
pub fn from_config(cfg: &EnrichmentConfig) -> Arc<dyn EnrichmentPort> {
    if !cfg.enabled {
        info!("Enrichment disabled by configuration");
        return Arc::new(DisabledEnrichment);
    }

    let api_key = cfg
        .api_key
        .clone()
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .filter(|k| !k.trim().is_empty());
    let Some(api_key) = api_key else {
        warn!("Enrichment enabled but no API key configured; disabling");
        return Arc::new(DisabledEnrichment);
    };

    match AnthropicEnrichmentClient::new(cfg, api_key.into()) {
        Ok(client) => {
            info!(model = %cfg.model, base_url = %cfg.base_url, "Enrichment enabled");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "Cannot build enrichment client; disabling");
            Arc::new(DisabledEnrichment)
        }
    }
}
