//! Sort events and group them into calendar months.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::calendar::{Event, MonthBucket};
use crate::metrics::EVENTS_TRUNCATED;

/// Default bound on walk steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Result of grouping events by month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrganizedEvents {
    /// Chronological buckets starting at the current month.
    pub months: Vec<MonthBucket>,
    /// Events left out because the walk hit its iteration cap.
    pub truncated: usize,
    /// Events dated before the current month, which a forward walk never reaches.
    pub past: usize,
}

/// Group `events` into month buckets starting at the month of `today`.
///
/// The walk advances one step per placed event or closed month, bounded by
/// `max_iterations`. Months between the first and last event are emitted even
/// when empty. With no events the result is one empty bucket for the current
/// month. When the cap is hit, the open bucket is still closed and the
/// remaining events are counted in [`OrganizedEvents::truncated`].
pub fn organize(mut events: Vec<Event>, today: NaiveDate, max_iterations: usize) -> OrganizedEvents {
    events.sort_by_key(|e| e.date);

    let mut bucket = MonthBucket::containing(today);

    let before = events.len();
    events.retain(|e| (e.date.year(), e.date.month()) >= (bucket.year, bucket.month));
    let past = before - events.len();
    if past > 0 {
        debug!("Dropped {} event(s) dated before {}", past, bucket.label());
    }

    let mut months = Vec::new();
    let mut remaining = events.into_iter().peekable();
    let mut closed = false;

    for _ in 0..max_iterations {
        match remaining.peek() {
            Some(event) if bucket.contains(event.date) => {
                if let Some(event) = remaining.next() {
                    bucket.events.push(event);
                }
            }
            _ => {
                let next = bucket.next();
                months.push(std::mem::replace(&mut bucket, next));
                if remaining.peek().is_none() {
                    closed = true;
                    break;
                }
            }
        }
    }

    let mut truncated = 0;
    if !closed {
        if !bucket.events.is_empty() {
            months.push(bucket);
        }
        truncated = remaining.count();
        if truncated > 0 {
            warn!(
                "Month bucketing stopped after {} iterations, {} event(s) left out",
                max_iterations, truncated
            );
            EVENTS_TRUNCATED.inc_by(truncated as u64);
        }
    }

    OrganizedEvents {
        months,
        truncated,
        past,
    }
}
