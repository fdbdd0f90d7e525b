//! Testing utilities and mock implementations of the provider traits.
//!
//! The mocks let the pipeline run end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_core::testing::{fixtures, MockMusic, MockTicketing};
//!
//! let music = MockMusic::new();
//! music.set_artists(vec![fixtures::artist("Big Thief")]).await;
//!
//! let ticketing = MockTicketing::new();
//! ticketing
//!     .add_attractions("Big Thief", vec![fixtures::attraction("K1", "Big Thief")])
//!     .await;
//! ```

mod mock_music;
mod mock_ticketing;

pub use mock_music::MockMusic;
pub use mock_ticketing::{MockTicketing, RecordedTicketingCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::calendar::{Artist, Attraction, AttractionId, Event};

    /// Create an artist with placeholder links.
    pub fn artist(name: &str) -> Artist {
        let slug = name.to_lowercase().replace(' ', "-");
        Artist {
            name: name.to_string(),
            image_url: Some(format!("https://i.scdn.co/image/{}", slug)),
            profile_url: format!("https://open.spotify.com/artist/{}", slug),
        }
    }

    /// Create an attraction.
    pub fn attraction(id: &str, name: &str) -> Attraction {
        Attraction {
            id: AttractionId::new(id),
            name: name.to_string(),
        }
    }

    /// Create an event on the given date.
    ///
    /// Panics on an invalid date.
    pub fn event(name: &str, year: i32, month: u32, day: u32) -> Event {
        event_on(
            name,
            NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date"),
        )
    }

    /// Create an event on `date`.
    pub fn event_on(name: &str, date: NaiveDate) -> Event {
        Event {
            event_name: name.to_string(),
            event_url: format!(
                "https://www.ticketmaster.com/event/{}",
                name.to_lowercase().replace(' ', "-")
            ),
            date,
            venue: "The Fillmore".to_string(),
            city: "San Francisco".to_string(),
        }
    }
}
