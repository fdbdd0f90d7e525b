//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock music and ticketing providers, enabling end-to-end testing
//! without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use encore_core::{
    testing::{MockMusic, MockTicketing},
    ConcertPipeline, Config, MusicProvider, PipelineConfig, ServerConfig, SpotifyConfig,
    TicketingProvider, TicketmasterConfig,
};
use encore_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use encore_core::testing::fixtures;

/// Authorize URL handed to the app state.
pub const AUTHORIZE_URL: &str =
    "https://accounts.spotify.com/authorize?client_id=test-client&response_type=code";

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Spotify token exchange and top artists (MockMusic)
/// - Ticketmaster attraction and event search (MockTicketing)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_regions() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v1/regions").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock music provider - configure top artists and token failures
    pub music: Arc<MockMusic>,
    /// Mock ticketing provider - configure attractions and events
    pub ticketing: Arc<MockTicketing>,
    /// Static file directory served as the fallback
    pub static_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, or `Null` for non-JSON responses
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks and no pacing delay.
    pub fn new() -> Self {
        let static_dir = TempDir::new().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("styles.css"), "body { margin: 0; }")
            .expect("Failed to write stylesheet");

        let music = Arc::new(MockMusic::new());
        let ticketing = Arc::new(MockTicketing::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                static_dir: static_dir.path().to_path_buf(),
            },
            spotify: SpotifyConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_uri: "http://localhost:3000/user".to_string(),
                accounts_url: None,
                api_url: None,
            },
            ticketmaster: TicketmasterConfig {
                api_key: "test-api-key".to_string(),
                base_url: None,
            },
            pipeline: PipelineConfig {
                request_delay_ms: 0,
                ..Default::default()
            },
        };

        let pipeline = Arc::new(ConcertPipeline::new(
            config.pipeline.clone(),
            Arc::clone(&music) as Arc<dyn MusicProvider>,
            Arc::clone(&ticketing) as Arc<dyn TicketingProvider>,
        ));

        let state = Arc::new(AppState::new(config, pipeline, AUTHORIZE_URL.to_string()));
        let router = create_router(state);

        Self {
            router,
            music,
            ticketing,
            static_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, Body::empty(), None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(
            "POST",
            path,
            Body::from(serde_json::to_vec(&body).unwrap()),
            Some("application/json"),
        )
        .await
    }

    /// Send a POST request with an urlencoded form body.
    pub async fn post_form(&self, path: &str, form: &str) -> TestResponse {
        self.request(
            "POST",
            path,
            Body::from(form.to_string()),
            Some("application/x-www-form-urlencoded"),
        )
        .await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Body,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            request_builder = request_builder.header("Content-Type", content_type);
        }
        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}
