//! Mock music provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::calendar::Artist;
use crate::providers::{AccessToken, MusicProvider, ProviderError};

/// Prefix of every token handed out by [`MockMusic::exchange_code`].
///
/// The exchanged code follows the prefix, so each token maps back to the
/// code it came from.
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

/// Mock implementation of the MusicProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable ranked artist list, optionally per authorization code
/// - Record exchanged authorization codes
/// - Simulate token exchange or top-artists failures
#[derive(Debug, Default)]
pub struct MockMusic {
    artists: Arc<RwLock<Vec<Artist>>>,
    /// Artist lists that replace `artists` for tokens from specific codes.
    artists_by_code: Arc<RwLock<HashMap<String, Vec<Artist>>>>,
    exchanged_codes: Arc<RwLock<Vec<String>>>,
    /// Limits requested from `top_artists`.
    requested_limits: Arc<RwLock<Vec<u32>>>,
    /// If set, the next token exchange fails with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
    /// If set, the next top-artists fetch fails with this error.
    next_top_artists_error: Arc<RwLock<Option<ProviderError>>>,
}

impl MockMusic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ranked artist list returned by `top_artists`.
    pub async fn set_artists(&self, artists: Vec<Artist>) {
        *self.artists.write().await = artists;
    }

    /// Set the ranked artist list returned for tokens exchanged from `code`.
    pub async fn set_artists_for_code(&self, code: &str, artists: Vec<Artist>) {
        self.artists_by_code
            .write()
            .await
            .insert(code.to_string(), artists);
    }

    /// Codes passed to `exchange_code`, in call order.
    pub async fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.read().await.clone()
    }

    /// Limits passed to `top_artists`, in call order.
    pub async fn requested_limits(&self) -> Vec<u32> {
        self.requested_limits.read().await.clone()
    }

    /// Configure the next token exchange to fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next top-artists fetch to fail with the given error.
    pub async fn set_next_top_artists_error(&self, error: ProviderError) {
        *self.next_top_artists_error.write().await = Some(error);
    }
}

#[async_trait]
impl MusicProvider for MockMusic {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError> {
        self.exchanged_codes.write().await.push(code.to_string());
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(AccessToken::new(format!("{}:{}", MOCK_ACCESS_TOKEN, code)))
    }

    async fn top_artists(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<Vec<Artist>, ProviderError> {
        self.requested_limits.write().await.push(limit);
        if let Some(error) = self.next_top_artists_error.write().await.take() {
            return Err(error);
        }
        let code = token
            .secret()
            .strip_prefix(MOCK_ACCESS_TOKEN)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| ProviderError::Unauthorized("unknown token".to_string()))?;

        let by_code = self.artists_by_code.read().await;
        let artists = match by_code.get(code) {
            Some(artists) => artists.clone(),
            None => self.artists.read().await.clone(),
        };
        Ok(artists.into_iter().take(limit as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_top_artists_respects_limit() {
        let music = MockMusic::new();
        music
            .set_artists(vec![
                fixtures::artist("One"),
                fixtures::artist("Two"),
                fixtures::artist("Three"),
            ])
            .await;

        let token = music.exchange_code("code").await.unwrap();
        let artists = music.top_artists(&token, 2).await.unwrap();

        assert_eq!(artists.len(), 2);
        assert_eq!(artists[1].name, "Two");
        assert_eq!(music.exchanged_codes().await, vec!["code".to_string()]);
        assert_eq!(music.requested_limits().await, vec![2]);
    }

    #[tokio::test]
    async fn test_artists_follow_the_exchanged_code() {
        let music = MockMusic::new();
        music.set_artists(vec![fixtures::artist("Default")]).await;
        music
            .set_artists_for_code("u1", vec![fixtures::artist("Only For U1")])
            .await;

        let u1 = music.exchange_code("u1").await.unwrap();
        let u2 = music.exchange_code("u2").await.unwrap();
        assert_ne!(u1, u2);

        assert_eq!(music.top_artists(&u1, 5).await.unwrap()[0].name, "Only For U1");
        assert_eq!(music.top_artists(&u2, 5).await.unwrap()[0].name, "Default");
        assert!(music
            .top_artists(&AccessToken::new("stolen"), 5)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_error_is_consumed_once() {
        let music = MockMusic::new();
        music.set_next_error(ProviderError::RateLimitExceeded).await;

        assert!(music.exchange_code("a").await.is_err());
        assert!(music.exchange_code("b").await.is_ok());
    }
}
