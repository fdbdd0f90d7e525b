//! Clients for the music and ticketing APIs.
//!
//! The pipeline only talks to the [`MusicProvider`] and [`TicketingProvider`]
//! traits, so the HTTP clients can be swapped for the in-memory mocks in
//! [`crate::testing`].

mod spotify;
mod ticketmaster;

pub use spotify::{SpotifyClient, SpotifyConfig, MAX_TOP_ARTISTS};
pub use ticketmaster::{TicketmasterClient, TicketmasterConfig};

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use thiserror::Error;

use crate::calendar::{Artist, Attraction, AttractionId, Event};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

/// Errors that can occur when calling an upstream API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Credentials or authorization code were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Bearer token granting access to the music API on a user's behalf.
///
/// Lives for one pipeline run only. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The music streaming service: OAuth code exchange and listening history.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Exchange a single-use authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError>;

    /// Fetch the user's top artists, ranked, at most `limit` of them.
    async fn top_artists(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Vec<Artist>, ProviderError>;
}

/// The ticketing service: attraction lookup and event search.
#[async_trait]
pub trait TicketingProvider: Send + Sync {
    /// Keyword search over attractions. An empty result is not an error.
    async fn search_attractions(&self, keyword: &str) -> Result<Vec<Attraction>, ProviderError>;

    /// Upcoming events for one attraction within a region.
    async fn search_events(
        &self,
        attraction: &AttractionId,
        region: &str,
    ) -> Result<Vec<Event>, ProviderError>;
}

/// Map non-success statuses to [`ProviderError`], passing successful responses through.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized(body));
    }
    Err(ProviderError::ApiError {
        status: status.as_u16(),
        message: body,
    })
}

/// Record duration and outcome of one upstream call.
fn observe<T>(service: &str, operation: &str, started: Instant, result: &Result<T, ProviderError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(ProviderError::RateLimitExceeded) => "rate_limited",
        Err(_) => "error",
    };
    EXTERNAL_SERVICE_DURATION
        .with_label_values(&[service, operation])
        .observe(started.elapsed().as_secs_f64());
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, outcome])
        .inc();
}
