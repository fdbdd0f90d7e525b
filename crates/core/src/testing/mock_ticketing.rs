//! Mock ticketing provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::calendar::{Attraction, AttractionId, Event};
use crate::providers::{ProviderError, TicketingProvider};

/// A recorded ticketing call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedTicketingCall {
    SearchAttractions { keyword: String },
    SearchEvents { attraction: AttractionId, region: String },
}

/// Mock implementation of the TicketingProvider trait.
///
/// Attraction results are keyed by search keyword and event results by
/// attraction id. Unknown keys return empty results. Failures can be injected
/// per keyword or per attraction and fire once.
#[derive(Debug, Default)]
pub struct MockTicketing {
    attractions: Arc<RwLock<HashMap<String, Vec<Attraction>>>>,
    events: Arc<RwLock<HashMap<AttractionId, Vec<Event>>>>,
    attraction_failures: Arc<RwLock<HashMap<String, ProviderError>>>,
    event_failures: Arc<RwLock<HashMap<AttractionId, ProviderError>>>,
    calls: Arc<RwLock<Vec<RecordedTicketingCall>>>,
}

impl MockTicketing {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Results returned when searching for `keyword`.
    pub async fn add_attractions(&self, keyword: &str, attractions: Vec<Attraction>) {
        self.attractions
            .write()
            .await
            .entry(keyword.to_string())
            .or_default()
            .extend(attractions);
    }

    /// Events returned for the attraction `id`.
    pub async fn add_events(&self, id: &str, events: Vec<Event>) {
        self.events
            .write()
            .await
            .entry(AttractionId::new(id))
            .or_default()
            .extend(events);
    }

    /// Make the next search for `keyword` fail.
    pub async fn fail_attraction_search(&self, keyword: &str, error: ProviderError) {
        self.attraction_failures
            .write()
            .await
            .insert(keyword.to_string(), error);
    }

    /// Make the next event search for attraction `id` fail.
    pub async fn fail_event_search(&self, id: &str, error: ProviderError) {
        self.event_failures
            .write()
            .await
            .insert(AttractionId::new(id), error);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedTicketingCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl TicketingProvider for MockTicketing {
    async fn search_attractions(&self, keyword: &str) -> Result<Vec<Attraction>, ProviderError> {
        self.calls
            .write()
            .await
            .push(RecordedTicketingCall::SearchAttractions {
                keyword: keyword.to_string(),
            });

        if let Some(error) = self.attraction_failures.write().await.remove(keyword) {
            return Err(error);
        }

        Ok(self
            .attractions
            .read()
            .await
            .get(keyword)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_events(
        &self,
        attraction: &AttractionId,
        region: &str,
    ) -> Result<Vec<Event>, ProviderError> {
        self.calls
            .write()
            .await
            .push(RecordedTicketingCall::SearchEvents {
                attraction: attraction.clone(),
                region: region.to_string(),
            });

        if let Some(error) = self.event_failures.write().await.remove(attraction) {
            return Err(error);
        }

        Ok(self
            .events
            .read()
            .await
            .get(attraction)
            .cloned()
            .unwrap_or_default())
    }
}
