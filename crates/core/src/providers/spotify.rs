//! Spotify Web API client.
//!
//! Spotify requires:
//! - Basic auth (`client_id:client_secret`) on the token endpoint
//! - A bearer token for every Web API call
//! - The `user-top-read` scope to list a user's top artists

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{check_status, observe, AccessToken, MusicProvider, ProviderError};
use crate::calendar::Artist;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com";
const SCOPE: &str = "user-top-read";

/// Spotify's hard limit on `limit` for the top-items endpoint.
pub const MAX_TOP_ARTISTS: u32 = 50;

/// Spotify API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Application client ID.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Redirect URI registered with the application.
    pub redirect_uri: String,
    /// Accounts service base URL (default: https://accounts.spotify.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts_url: Option<String>,
    /// Web API base URL (default: https://api.spotify.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Spotify API client.
pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    api_url: String,
}

impl SpotifyClient {
    /// Create a new Spotify client.
    pub fn new(config: SpotifyConfig) -> Result<Self, ProviderError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Spotify client_id and client_secret are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_uri: config.redirect_uri,
            accounts_url: trim_base(config.accounts_url, DEFAULT_ACCOUNTS_URL),
            api_url: trim_base(config.api_url, DEFAULT_API_URL),
        })
    }

    /// URL the user is sent to in order to grant access.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
            self.accounts_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            SCOPE
        )
    }

    async fn request_token(&self, code: &str) -> Result<AccessToken, ProviderError> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        // Spotify answers a bad or reused code with 400 invalid_grant.
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unauthorized(body));
        }
        let response = check_status(response).await?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        if token.access_token.is_empty() {
            return Err(ProviderError::ParseError(
                "Token response has an empty access_token".to_string(),
            ));
        }

        Ok(AccessToken::new(token.access_token))
    }

    async fn request_top_artists(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Vec<Artist>, ProviderError> {
        let url = format!("{}/v1/me/top/artists", self.api_url);
        let limit = limit.clamp(1, MAX_TOP_ARTISTS);

        debug!("Spotify top artists: limit={}", limit);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        let response = check_status(response).await?;

        let page: ArtistPage = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse top artists response: {}", e))
        })?;

        Ok(page.items.into_iter().map(Artist::from).collect())
    }
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError> {
        let started = Instant::now();
        let result = self.request_token(code).await;
        observe("spotify", "token", started, &result);
        if let Err(e) = &result {
            warn!("Spotify token exchange failed: {}", e);
        }
        result
    }

    async fn top_artists(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Vec<Artist>, ProviderError> {
        let started = Instant::now();
        let result = self.request_top_artists(token, limit).await;
        observe("spotify", "top_artists", started, &result);
        result
    }
}

fn trim_base(configured: Option<String>, default: &str) -> String {
    configured
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

// ============================================================================
// Spotify API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
    #[serde(default)]
    images: Vec<SpotifyImage>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

impl From<SpotifyArtist> for Artist {
    fn from(artist: SpotifyArtist) -> Self {
        Artist {
            name: artist.name,
            image_url: artist.images.into_iter().next().map(|i| i.url),
            profile_url: artist.external_urls.spotify,
        }
    }
}
