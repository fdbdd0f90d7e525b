//! Ticketmaster Discovery API client.
//!
//! Ticketmaster requires an API key, passed as the `apikey` query parameter.
//! The default quota allows 5 requests per second; callers pace themselves.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, observe, ProviderError, TicketingProvider};
use crate::calendar::{Attraction, AttractionId, Event};

const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com";

/// Ticketmaster API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketmasterConfig {
    /// Discovery API key (required).
    pub api_key: String,
    /// Base URL (default: https://app.ticketmaster.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Ticketmaster Discovery API client.
pub struct TicketmasterClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TicketmasterClient {
    /// Create a new Ticketmaster client.
    pub fn new(config: TicketmasterConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Ticketmaster API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Page<T>, ProviderError> {
        let url = format!("{}/discovery/v2/{}.json", self.base_url, resource);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;

        response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse {} response: {}", resource, e))
        })
    }
}

#[async_trait]
impl TicketingProvider for TicketmasterClient {
    async fn search_attractions(&self, keyword: &str) -> Result<Vec<Attraction>, ProviderError> {
        debug!("Ticketmaster attraction search: keyword='{}'", keyword);

        let started = Instant::now();
        let result = self
            .get_page::<EmbeddedAttractions>("attractions", &[("keyword", keyword)])
            .await;
        observe("ticketmaster", "attractions", started, &result);

        // No `_embedded` means zero matches.
        let attractions = result?
            .embedded
            .map(|e| e.attractions)
            .unwrap_or_default()
            .into_iter()
            .map(|a| Attraction {
                id: AttractionId::new(a.id),
                name: a.name,
            })
            .collect();

        Ok(attractions)
    }

    async fn search_events(
        &self,
        attraction: &AttractionId,
        region: &str,
    ) -> Result<Vec<Event>, ProviderError> {
        debug!(
            "Ticketmaster event search: attraction={}, region={}",
            attraction, region
        );

        let started = Instant::now();
        let result = self
            .get_page::<EmbeddedEvents>(
                "events",
                &[("attractionId", attraction.as_str()), ("stateCode", region)],
            )
            .await;
        observe("ticketmaster", "events", started, &result);

        let records = result?.embedded.map(|e| e.events).unwrap_or_default();

        let mut events = Vec::with_capacity(records.len());
        for record in records {
            match Event::try_from(record) {
                Ok(event) => events.push(event),
                Err(reason) => debug!(
                    "Skipping malformed event for attraction {}: {}",
                    attraction, reason
                ),
            }
        }

        Ok(events)
    }
}

// ============================================================================
// Ticketmaster API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(rename = "_embedded")]
    embedded: Option<T>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedAttractions {
    #[serde(default)]
    attractions: Vec<TmAttraction>,
}

#[derive(Debug, Deserialize)]
struct TmAttraction {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddedEvents {
    #[serde(default)]
    events: Vec<TmEvent>,
}

#[derive(Debug, Deserialize)]
struct TmEvent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    dates: Option<TmDates>,
    #[serde(rename = "_embedded", default)]
    embedded: Option<TmEventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct TmDates {
    #[serde(default)]
    start: Option<TmStart>,
}

#[derive(Debug, Deserialize)]
struct TmStart {
    #[serde(rename = "localDate", default)]
    local_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmEventEmbedded {
    #[serde(default)]
    venues: Vec<TmVenue>,
}

#[derive(Debug, Deserialize)]
struct TmVenue {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    city: Option<TmCity>,
}

#[derive(Debug, Deserialize)]
struct TmCity {
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<TmEvent> for Event {
    type Error = String;

    fn try_from(tm: TmEvent) -> Result<Self, Self::Error> {
        let event_name = tm.name.ok_or("missing name")?;

        let local_date = tm
            .dates
            .and_then(|d| d.start)
            .and_then(|s| s.local_date)
            .ok_or_else(|| format!("'{}' has no start date", event_name))?;
        let date = NaiveDate::parse_from_str(&local_date, "%Y-%m-%d")
            .map_err(|e| format!("'{}' has invalid date '{}': {}", event_name, local_date, e))?;

        let venue = tm
            .embedded
            .and_then(|e| e.venues.into_iter().next())
            .ok_or_else(|| format!("'{}' has no venue", event_name))?;
        let venue_name = venue
            .name
            .ok_or_else(|| format!("'{}' venue has no name", event_name))?;
        let city = venue
            .city
            .and_then(|c| c.name)
            .ok_or_else(|| format!("'{}' venue has no city", event_name))?;

        Ok(Event {
            event_url: tm.url.unwrap_or_default(),
            event_name,
            date,
            venue: venue_name,
            city,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TicketmasterClient {
        TicketmasterClient::new(TicketmasterConfig {
            api_key: "tm-key".to_string(),
            base_url: Some(server.uri()),
        })
        .unwrap()
    }

    fn event_json(name: &str, date: &str, venue: &str, city: &str) -> serde_json::Value {
        json!({
            "name": name,
            "url": format!("https://www.ticketmaster.com/event/{}", name.len()),
            "dates": { "start": { "localDate": date, "localTime": "19:30:00" } },
            "_embedded": {
                "venues": [
                    { "name": venue, "city": { "name": city }, "state": { "stateCode": "CA" } },
                    { "name": "Overflow Lot", "city": { "name": "Elsewhere" } }
                ]
            }
        })
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = TicketmasterClient::new(TicketmasterConfig {
            api_key: String::new(),
            base_url: None,
        });
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_event_uses_first_venue() {
        let tm: TmEvent =
            serde_json::from_value(event_json("Night One", "2026-11-14", "The Greek", "Berkeley"))
                .unwrap();
        let event = Event::try_from(tm).unwrap();
        assert_eq!(event.event_name, "Night One");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 11, 14).unwrap());
        assert_eq!(event.venue, "The Greek");
        assert_eq!(event.city, "Berkeley");
    }

    #[test]
    fn test_event_without_venue_is_rejected() {
        let tm: TmEvent = serde_json::from_value(json!({
            "name": "TBA",
            "dates": { "start": { "localDate": "2026-11-14" } }
        }))
        .unwrap();
        assert!(Event::try_from(tm).unwrap_err().contains("no venue"));
    }

    #[test]
    fn test_event_with_bad_date_is_rejected() {
        let tm: TmEvent =
            serde_json::from_value(event_json("Night One", "soon", "The Greek", "Berkeley"))
                .unwrap();
        assert!(Event::try_from(tm).unwrap_err().contains("invalid date"));
    }

    #[tokio::test]
    async fn test_search_attractions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discovery/v2/attractions.json"))
            .and(query_param("keyword", "The Band"))
            .and(query_param("apikey", "tm-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {
                    "attractions": [
                        { "id": "K8vZ917Gku7", "name": "The Band", "type": "attraction" },
                        { "id": "K8vZ917Gxx0", "name": "The Band Live", "type": "attraction" }
                    ]
                },
                "page": { "size": 20, "totalElements": 2 }
            })))
            .mount(&server)
            .await;

        let attractions = client_for(&server)
            .search_attractions("The Band")
            .await
            .unwrap();
        assert_eq!(attractions.len(), 2);
        assert_eq!(attractions[0].id, AttractionId::new("K8vZ917Gku7"));
        assert_eq!(attractions[1].name, "The Band Live");
    }

    #[tokio::test]
    async fn test_search_attractions_without_embedded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discovery/v2/attractions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": { "size": 20, "totalElements": 0 }
            })))
            .mount(&server)
            .await;

        let attractions = client_for(&server)
            .search_attractions("Nobody")
            .await
            .unwrap();
        assert!(attractions.is_empty());
    }

    #[tokio::test]
    async fn test_search_events_skips_malformed_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discovery/v2/events.json"))
            .and(query_param("attractionId", "K8vZ917Gku7"))
            .and(query_param("stateCode", "CA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {
                    "events": [
                        event_json("Night One", "2026-11-14", "The Greek", "Berkeley"),
                        { "name": "Mystery Show" },
                        event_json("Night Two", "2026-11-15", "The Greek", "Berkeley")
                    ]
                }
            })))
            .mount(&server)
            .await;

        let events = client_for(&server)
            .search_events(&AttractionId::new("K8vZ917Gku7"), "CA")
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_name, "Night One");
        assert_eq!(events[1].event_name, "Night Two");
    }

    #[tokio::test]
    async fn test_search_events_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discovery/v2/events.json"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search_events(&AttractionId::new("K8vZ917Gku7"), "CA")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimitExceeded));
    }
}
