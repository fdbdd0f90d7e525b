//! The concert pipeline: token exchange through month bucketing.
//!
//! Every value tied to a user (authorization code, token, artists) lives in a
//! [`PipelineRequest`] and the locals of one [`ConcertPipeline::run`] call.
//! The pipeline itself holds only configuration and provider clients, so one
//! instance serves concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::calendar::ConcertCalendar;
use crate::collector::EventCollector;
use crate::metrics::{PIPELINE_DURATION, PIPELINE_RUNS};
use crate::organizer::{organize, DEFAULT_MAX_ITERATIONS};
use crate::pacing::Pacer;
use crate::providers::{MusicProvider, ProviderError, TicketingProvider, MAX_TOP_ARTISTS};
use crate::region::normalize_region;
use crate::resolver::ArtistResolver;

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Delay before each ticketing API call, in milliseconds (default: 250).
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Safety bound on month bucketing steps (default: 200).
    #[serde(default = "default_max_bucket_iterations")]
    pub max_bucket_iterations: usize,
    /// Artist count preselected in the form (default: 10).
    #[serde(default = "default_artist_limit")]
    pub default_artist_limit: u32,
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_max_bucket_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_artist_limit() -> u32 {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            max_bucket_iterations: default_max_bucket_iterations(),
            default_artist_limit: default_artist_limit(),
        }
    }
}

/// Everything one user submission carries into the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRequest {
    /// Single-use code from the music service's redirect.
    pub authorization_code: String,
    /// How many top artists to look up.
    pub artist_limit: u32,
    /// Two-letter state or province code.
    pub region: String,
}

/// Failures that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not sign in with Spotify: {0}")]
    TokenExchange(#[source] ProviderError),

    #[error("Could not load your top artists: {0}")]
    TopArtists(#[source] ProviderError),
}

impl PipelineError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "invalid_request",
            PipelineError::TokenExchange(_) => "token_exchange",
            PipelineError::TopArtists(_) => "top_artists",
        }
    }
}

/// Runs token exchange, artist lookup, attraction resolution, event
/// collection and month bucketing for one request.
pub struct ConcertPipeline {
    config: PipelineConfig,
    music: Arc<dyn MusicProvider>,
    resolver: ArtistResolver,
    collector: EventCollector,
}

impl ConcertPipeline {
    pub fn new(
        config: PipelineConfig,
        music: Arc<dyn MusicProvider>,
        ticketing: Arc<dyn TicketingProvider>,
    ) -> Self {
        let pacer = Pacer::from_millis(config.request_delay_ms);
        Self {
            resolver: ArtistResolver::new(Arc::clone(&ticketing), pacer),
            collector: EventCollector::new(ticketing, pacer),
            music,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline with today's local date as the first month.
    pub async fn run(&self, request: PipelineRequest) -> Result<ConcertCalendar, PipelineError> {
        self.run_at(request, Local::now().date_naive()).await
    }

    /// Run the pipeline with an explicit "today".
    pub async fn run_at(
        &self,
        request: PipelineRequest,
        today: NaiveDate,
    ) -> Result<ConcertCalendar, PipelineError> {
        let span = info_span!("pipeline", run_id = %Uuid::new_v4());
        let started = Instant::now();

        let result = self.execute(request, today).instrument(span).await;

        PIPELINE_DURATION.observe(started.elapsed().as_secs_f64());
        let label = match &result {
            Ok(_) => "success",
            Err(e) => {
                warn!("Pipeline aborted ({}): {}", e.kind(), e);
                e.kind()
            }
        };
        PIPELINE_RUNS.with_label_values(&[label]).inc();

        result
    }

    async fn execute(
        &self,
        request: PipelineRequest,
        today: NaiveDate,
    ) -> Result<ConcertCalendar, PipelineError> {
        let region = normalize_region(&request.region).ok_or_else(|| {
            PipelineError::InvalidRequest(format!("unknown region code '{}'", request.region))
        })?;
        if !(1..=MAX_TOP_ARTISTS).contains(&request.artist_limit) {
            return Err(PipelineError::InvalidRequest(format!(
                "artist count must be between 1 and {}",
                MAX_TOP_ARTISTS
            )));
        }
        if request.authorization_code.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "missing authorization code".to_string(),
            ));
        }

        info!(
            "Starting pipeline: {} artist(s) in {}",
            request.artist_limit, region
        );

        let token = self
            .music
            .exchange_code(&request.authorization_code)
            .await
            .map_err(PipelineError::TokenExchange)?;

        let artists = self
            .music
            .top_artists(&token, request.artist_limit)
            .await
            .map_err(PipelineError::TopArtists)?;
        info!("Fetched {} top artist(s)", artists.len());

        let attractions = self.resolver.resolve(&artists).await;
        let events = self.collector.collect(&attractions, &region).await;
        let organized = organize(events, today, self.config.max_bucket_iterations);

        let mut calendar = ConcertCalendar::new(artists, organized.months);
        calendar.truncated_events = organized.truncated;

        info!(
            "Pipeline finished: {} event(s) across {} month(s)",
            calendar.event_count(),
            calendar.events_by_month.len()
        );
        Ok(calendar)
    }
}
