//! Map ranked artists to ticketing attraction ids.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calendar::{Artist, AttractionId};
use crate::pacing::Pacer;
use crate::providers::TicketingProvider;

/// Resolves artist names to attraction ids by exact name match.
///
/// Matching is case-sensitive string equality. "The Band Live" never resolves
/// for "The Band", and naming variants such as "feat." suffixes do not match.
pub struct ArtistResolver {
    ticketing: Arc<dyn TicketingProvider>,
    pacer: Pacer,
}

impl ArtistResolver {
    pub fn new(ticketing: Arc<dyn TicketingProvider>, pacer: Pacer) -> Self {
        Self { ticketing, pacer }
    }

    /// Resolve each artist in turn, one paced search per artist.
    ///
    /// An artist contributes every exactly-named attraction the provider
    /// returns, possibly none. A failed search skips that artist only.
    pub async fn resolve(&self, artists: &[Artist]) -> Vec<AttractionId> {
        let results = self
            .pacer
            .run(artists, |artist| {
                self.ticketing.search_attractions(&artist.name)
            })
            .await;

        let mut ids = Vec::new();
        for (artist, result) in artists.iter().zip(results) {
            match result {
                Ok(attractions) => {
                    let before = ids.len();
                    ids.extend(
                        attractions
                            .into_iter()
                            .filter(|a| a.name == artist.name)
                            .map(|a| a.id),
                    );
                    debug!(
                        "Artist '{}' resolved to {} attraction(s)",
                        artist.name,
                        ids.len() - before
                    );
                }
                Err(e) => {
                    warn!("Attraction search for '{}' failed: {}", artist.name, e);
                }
            }
        }

        info!(
            "Resolved {} attraction id(s) from {} artist(s)",
            ids.len(),
            artists.len()
        );
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::testing::{fixtures, MockTicketing, RecordedTicketingCall};
    use std::time::Duration;
    use tokio::time::Instant;

    fn resolver(ticketing: &Arc<MockTicketing>, delay_ms: u64) -> ArtistResolver {
        ArtistResolver::new(
            Arc::clone(ticketing) as Arc<dyn TicketingProvider>,
            Pacer::from_millis(delay_ms),
        )
    }

    #[tokio::test]
    async fn test_exact_match_excludes_near_match() {
        let ticketing = Arc::new(MockTicketing::new());
        ticketing
            .add_attractions(
                "The Band",
                vec![
                    fixtures::attraction("K1", "The Band"),
                    fixtures::attraction("K2", "The Band Live"),
                    fixtures::attraction("K3", "the band"),
                ],
            )
            .await;

        let ids = resolver(&ticketing, 0)
            .resolve(&[fixtures::artist("The Band")])
            .await;

        assert_eq!(ids, vec![AttractionId::new("K1")]);
    }

    #[tokio::test]
    async fn test_duplicate_exact_matches_are_kept() {
        let ticketing = Arc::new(MockTicketing::new());
        ticketing
            .add_attractions(
                "Weezer",
                vec![
                    fixtures::attraction("W1", "Weezer"),
                    fixtures::attraction("W2", "Weezer"),
                ],
            )
            .await;

        let ids = resolver(&ticketing, 0)
            .resolve(&[fixtures::artist("Weezer")])
            .await;

        assert_eq!(ids, vec![AttractionId::new("W1"), AttractionId::new("W2")]);
    }

    #[tokio::test]
    async fn test_failed_search_skips_only_that_artist() {
        let ticketing = Arc::new(MockTicketing::new());
        ticketing
            .add_attractions("Beach House", vec![fixtures::attraction("B1", "Beach House")])
            .await;
        ticketing
            .fail_attraction_search("Alvvays", ProviderError::RateLimitExceeded)
            .await;

        let ids = resolver(&ticketing, 0)
            .resolve(&[fixtures::artist("Alvvays"), fixtures::artist("Beach House")])
            .await;

        assert_eq!(ids, vec![AttractionId::new("B1")]);
        assert_eq!(ticketing.call_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_paced_search_per_artist() {
        let ticketing = Arc::new(MockTicketing::new());
        ticketing
            .add_attractions("Mitski", vec![fixtures::attraction("M1", "Mitski")])
            .await;

        let artists = vec![
            fixtures::artist("Mitski"),
            fixtures::artist("Unknown Artist"),
            fixtures::artist("Another Unknown"),
        ];

        let start = Instant::now();
        resolver(&ticketing, 250).resolve(&artists).await;
        let elapsed = start.elapsed();

        let calls = ticketing.recorded_calls().await;
        assert_eq!(calls.len(), artists.len());
        for (call, artist) in calls.iter().zip(&artists) {
            match call {
                RecordedTicketingCall::SearchAttractions { keyword, .. } => {
                    assert_eq!(keyword, &artist.name)
                }
                other => panic!("unexpected call {:?}", other),
            }
        }
        assert!(elapsed >= Duration::from_millis(750));
    }

    #[tokio::test]
    async fn test_empty_artist_list() {
        let ticketing = Arc::new(MockTicketing::new());
        let ids = resolver(&ticketing, 250).resolve(&[]).await;
        assert!(ids.is_empty());
        assert_eq!(ticketing.call_count().await, 0);
    }
}
