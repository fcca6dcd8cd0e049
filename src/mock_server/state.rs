//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Golf Genius API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use serde_json::Value as JsonValue;

/// Page size of the events listing.
pub const EVENTS_PER_PAGE: usize = 25;

/// Page size of roster listings.
pub const ROSTER_PER_PAGE: usize = 100;

/// Shared state for the mock server.
///
/// Items are stored as raw JSON objects, unwrapped; handlers add the
/// envelope each endpoint uses. Event-scoped collections are keyed by
/// event id, round-scoped ones by `(event id, round id)`.
#[derive(Debug, Default)]
pub struct MockState {
    pub seasons: Vec<JsonValue>,
    pub categories: Vec<JsonValue>,
    pub directories: Vec<JsonValue>,

    /// Event ids listed under each directory id.
    pub directory_events: HashMap<String, Vec<String>>,

    /// Active and archived events; archived ones carry `"archived": true`.
    pub events: Vec<JsonValue>,

    pub rosters: HashMap<String, Vec<JsonValue>>,
    pub master_roster: Vec<JsonValue>,
    pub rounds: HashMap<String, Vec<JsonValue>>,
    pub tournaments: HashMap<(String, String), Vec<JsonValue>>,
    pub tee_sheets: HashMap<(String, String), Vec<JsonValue>>,
    pub courses: HashMap<String, Vec<JsonValue>>,
    pub divisions: HashMap<String, Vec<JsonValue>>,

    /// Optional API key. If set, requests under any other key get 401.
    pub required_key: Option<String>,

    /// When set, paginated endpoints return every item whatever `page` says.
    pub ignore_page: bool,
}

/// Identifier of a fixture as a string, whether stored as string or number.
pub(crate) fn id_of(item: &JsonValue) -> Option<String> {
    match item.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Set the required API key.
    pub fn with_required_key(mut self, key: &str) -> Self {
        self.required_key = Some(key.to_string());
        self
    }

    /// Make paginated endpoints ignore the `page` parameter.
    pub fn ignoring_page(mut self) -> Self {
        self.ignore_page = true;
        self
    }

    pub fn with_season(mut self, season: JsonValue) -> Self {
        self.seasons.push(season);
        self
    }

    pub fn with_category(mut self, category: JsonValue) -> Self {
        self.categories.push(category);
        self
    }

    /// Add a directory listing the given events.
    pub fn with_directory(mut self, directory: JsonValue, event_ids: &[&str]) -> Self {
        if let Some(id) = id_of(&directory) {
            self.directory_events
                .insert(id, event_ids.iter().map(|e| e.to_string()).collect());
        }
        self.directories.push(directory);
        self
    }

    pub fn with_event(mut self, event: JsonValue) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_roster(mut self, event_id: &str, players: Vec<JsonValue>) -> Self {
        self.rosters.insert(event_id.to_string(), players);
        self
    }

    pub fn with_master_member(mut self, member: JsonValue) -> Self {
        self.master_roster.push(member);
        self
    }

    pub fn with_rounds(mut self, event_id: &str, rounds: Vec<JsonValue>) -> Self {
        self.rounds.insert(event_id.to_string(), rounds);
        self
    }

    pub fn with_tournaments(
        mut self,
        event_id: &str,
        round_id: &str,
        tournaments: Vec<JsonValue>,
    ) -> Self {
        self.tournaments
            .insert((event_id.to_string(), round_id.to_string()), tournaments);
        self
    }

    pub fn with_tee_sheet(mut self, event_id: &str, round_id: &str, groups: Vec<JsonValue>) -> Self {
        self.tee_sheets
            .insert((event_id.to_string(), round_id.to_string()), groups);
        self
    }

    pub fn with_courses(mut self, event_id: &str, courses: Vec<JsonValue>) -> Self {
        self.courses.insert(event_id.to_string(), courses);
        self
    }

    pub fn with_divisions(mut self, event_id: &str, divisions: Vec<JsonValue>) -> Self {
        self.divisions.insert(event_id.to_string(), divisions);
        self
    }

    /// Get an event by id, archived or not.
    pub fn get_event(&self, id: &str) -> Option<&JsonValue> {
        self.events
            .iter()
            .find(|e| id_of(e).as_deref() == Some(id))
    }

    /// Whether a round exists under an event.
    pub fn has_round(&self, event_id: &str, round_id: &str) -> bool {
        self.rounds.get(event_id).is_some_and(|rounds| {
            rounds
                .iter()
                .any(|r| id_of(r).as_deref() == Some(round_id))
        })
    }

    /// List events of one partition, optionally filtered by season and
    /// category id.
    pub fn list_events(
        &self,
        archived: bool,
        season: Option<&str>,
        category: Option<&str>,
    ) -> Vec<&JsonValue> {
        let nested_id = |event: &JsonValue, key: &str| id_of(event.get(key)?);
        self.events
            .iter()
            .filter(|e| e.get("archived").and_then(JsonValue::as_bool).unwrap_or(false) == archived)
            .filter(|e| season.map_or(true, |s| nested_id(e, "season").as_deref() == Some(s)))
            .filter(|e| {
                category.map_or(true, |c| nested_id(e, "category").as_deref() == Some(c))
            })
            .collect()
    }

    /// Events of a directory, or `None` for an unknown directory.
    pub fn list_directory_events(&self, directory_id: &str) -> Option<Vec<&JsonValue>> {
        let ids = self.directory_events.get(directory_id)?;
        Some(ids.iter().filter_map(|id| self.get_event(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_get_event_includes_archived() {
        let state = MockState::new()
            .with_event(Fixtures::event("e1", "Open", "gg1"))
            .with_event(Fixtures::archived_event("e2", "Old Open", "gg2"));

        assert!(state.get_event("e1").is_some());
        assert!(state.get_event("e2").is_some());
        assert!(state.get_event("e3").is_none());
    }

    #[test]
    fn test_state_list_events_by_partition_and_filter() {
        let mut other_season = Fixtures::event("e3", "Spring", "gg3");
        other_season["season"] = serde_json::json!({ "id": "s2026" });

        let state = MockState::new()
            .with_event(Fixtures::event("e1", "Open", "gg1"))
            .with_event(Fixtures::archived_event("e2", "Old Open", "gg2"))
            .with_event(other_season);

        assert_eq!(state.list_events(false, None, None).len(), 2);
        assert_eq!(state.list_events(true, None, None).len(), 1);
        assert_eq!(state.list_events(false, Some("s2025"), None).len(), 1);
        assert_eq!(state.list_events(false, None, Some("c1")).len(), 2);
        assert!(state.list_events(false, None, Some("c9")).is_empty());
    }

    #[test]
    fn test_state_directory_events() {
        let state = MockState::new()
            .with_event(Fixtures::event("e1", "Open", "gg1"))
            .with_directory(Fixtures::directory("d1", "Club"), &["e1", "missing"]);

        let events = state.list_directory_events("d1").unwrap();
        assert_eq!(events.len(), 1);
        assert!(state.list_directory_events("d2").is_none());
    }

    #[test]
    fn test_id_of_accepts_numbers() {
        assert_eq!(id_of(&serde_json::json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(id_of(&serde_json::json!({"name": "x"})), None);
    }
}
