//! Data model shared by the pipeline stages and the rendering layer.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// English month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A ranked artist from the user's listening history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    /// Display name, also used as the attraction search keyword.
    pub name: String,
    /// First profile image, if the provider returned any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Link to the artist's page on the music service.
    pub profile_url: String,
}

/// Opaque identifier of an attraction in the ticketing provider's namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AttractionId(String);

impl AttractionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An attraction returned by the ticketing provider's keyword search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attraction {
    pub id: AttractionId,
    pub name: String,
}

/// A single upcoming event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub event_name: String,
    pub event_url: String,
    /// Local calendar date of the event start.
    pub date: NaiveDate,
    pub venue: String,
    pub city: String,
}

/// Events sharing one calendar month, in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    /// Month number, 1 through 12.
    pub month: u32,
    pub events: Vec<Event>,
}

impl MonthBucket {
    /// Create an empty bucket for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            events: Vec::new(),
        }
    }

    /// Whether `date` falls in this bucket's month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Empty bucket for the following calendar month.
    pub fn next(&self) -> Self {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self {
            year,
            month,
            events: Vec::new(),
        }
    }

    /// English name of the bucket's month.
    ///
    /// Months outside 1 through 12 yield "Unknown".
    pub fn month_name(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|index| MONTH_NAMES.get(index as usize))
            .copied()
            .unwrap_or("Unknown")
    }

    /// Human readable label, e.g. "March 2026".
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

/// The final artifact handed to the view layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConcertCalendar {
    /// Artists in the order the music provider ranked them.
    pub artists: Vec<Artist>,
    pub events_by_month: Vec<MonthBucket>,
    pub month_names: Vec<String>,
    /// Events that did not fit under the bucketing iteration cap.
    #[serde(default)]
    pub truncated_events: usize,
}

impl ConcertCalendar {
    pub fn new(artists: Vec<Artist>, events_by_month: Vec<MonthBucket>) -> Self {
        Self {
            artists,
            events_by_month,
            month_names: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
            truncated_events: 0,
        }
    }

    /// Total number of events across all buckets.
    pub fn event_count(&self) -> usize {
        self.events_by_month.iter().map(|b| b.events.len()).sum()
    }
}
