use super::{types::Config, ConfigError};
use crate::providers::MAX_TOP_ARTISTS;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Spotify and Ticketmaster credentials are present
/// - Pipeline bounds are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Credentials
    for (key, value) in [
        ("spotify.client_id", &config.spotify.client_id),
        ("spotify.client_secret", &config.spotify.client_secret),
        ("spotify.redirect_uri", &config.spotify.redirect_uri),
        ("ticketmaster.api_key", &config.ticketmaster.api_key),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} must be set",
                key
            )));
        }
    }

    // Pipeline validation
    if config.pipeline.max_bucket_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.max_bucket_iterations cannot be 0".to_string(),
        ));
    }
    if !(1..=MAX_TOP_ARTISTS).contains(&config.pipeline.default_artist_limit) {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.default_artist_limit must be between 1 and {}",
            MAX_TOP_ARTISTS
        )));
    }

    Ok(())
}
