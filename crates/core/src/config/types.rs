use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::pipeline::PipelineConfig;
use crate::providers::{SpotifyConfig, TicketmasterConfig};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub spotify: SpotifyConfig,
    pub ticketmaster: TicketmasterConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for unmatched paths (stylesheets, images)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub spotify: SanitizedSpotifyConfig,
    pub ticketmaster: SanitizedTicketmasterConfig,
    pub pipeline: PipelineConfig,
}

/// Sanitized Spotify config (client secret hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSpotifyConfig {
    pub client_id: String,
    pub client_secret_configured: bool,
    pub redirect_uri: String,
}

/// Sanitized Ticketmaster config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTicketmasterConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            spotify: SanitizedSpotifyConfig {
                client_id: config.spotify.client_id.clone(),
                client_secret_configured: !config.spotify.client_secret.is_empty(),
                redirect_uri: config.spotify.redirect_uri.clone(),
            },
            ticketmaster: SanitizedTicketmasterConfig {
                api_key_configured: !config.ticketmaster.api_key.is_empty(),
                base_url: config.ticketmaster.base_url.clone(),
            },
            pipeline: config.pipeline.clone(),
        }
    }
}
