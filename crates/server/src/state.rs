use std::sync::Arc;
use encore_core::{ConcertPipeline, Config, SanitizedConfig};

/// Shared application state
///
/// Immutable after startup. Everything tied to one user travels in the
/// request, never here.
pub struct AppState {
    config: Config,
    pipeline: Arc<ConcertPipeline>,
    authorize_url: String,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<ConcertPipeline>, authorize_url: String) -> Self {
        Self {
            config,
            pipeline,
            authorize_url,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &ConcertPipeline {
        self.pipeline.as_ref()
    }

    /// Where the homepage sends users to grant access to their listening history.
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }
}
