//! Client-side event search and view filtering
//!
//! Lists are fetched whole and filtered in memory, which is fine while result
//! sets stay small.

use serde::{Deserialize, Serialize};

use crate::entities::Event;

/// Dashboard tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventView {
    /// Only events whose status is `upcoming`
    #[default]
    Upcoming,
    All,
}

impl EventView {
    /// Check if an event is visible in this view
    pub fn includes(self, event: &Event) -> bool {
        match self {
            Self::Upcoming => event.is_upcoming(),
            Self::All => true,
        }
    }
}

/// Case-insensitive substring match over title, description and location
///
/// Surrounding whitespace in the query is ignored, so `"  rust "` matches
/// like `"rust"` and a blank query matches everything. A raw substring match
/// would instead require the spaces to appear in a field.
pub fn matches_query(event: &Event, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [&event.title, &event.description, &event.location]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the events matching `query`, preserving order
pub fn filter_events(events: Vec<Event>, query: &str) -> Vec<Event> {
    if query.trim().is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|event| matches_query(event, query))
        .collect()
}
