//! Gather events for resolved attractions within one region.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calendar::{AttractionId, Event};
use crate::pacing::Pacer;
use crate::providers::TicketingProvider;

/// Collects raw events, one paced event search per attraction id.
pub struct EventCollector {
    ticketing: Arc<dyn TicketingProvider>,
    pacer: Pacer,
}

impl EventCollector {
    pub fn new(ticketing: Arc<dyn TicketingProvider>, pacer: Pacer) -> Self {
        Self { ticketing, pacer }
    }

    /// Flat list of events for every attraction, in attraction order.
    ///
    /// Events shared by two attractions appear twice. A failed search skips
    /// that attraction's contribution.
    pub async fn collect(&self, attractions: &[AttractionId], region: &str) -> Vec<Event> {
        let results = self
            .pacer
            .run(attractions, |id| self.ticketing.search_events(id, region))
            .await;

        let mut events = Vec::new();
        for (id, result) in attractions.iter().zip(results) {
            match result {
                Ok(found) => {
                    debug!("Attraction {} has {} event(s) in {}", id, found.len(), region);
                    events.extend(found);
                }
                Err(e) => {
                    warn!("Event search for attraction {} failed: {}", id, e);
                }
            }
        }

        info!(
            "Collected {} event(s) for {} attraction(s) in {}",
            events.len(),
            attractions.len(),
            region
        );
        events
    }
}
