//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic Golf Genius payloads. Fixtures
//! are plain JSON so that they reach the client exactly as the API would
//! send them.

use serde_json::{json, Value as JsonValue};

/// Events in the default scenario that are not archived.
pub const ACTIVE_EVENT_COUNT: usize = 30;

/// Players on the roster of `event_001` in the default scenario.
pub const ROSTER_SIZE: usize = 120;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Catalog Fixtures
    // =========================================================================

    /// Create a season.
    pub fn season(id: &str, name: &str, current: bool) -> JsonValue {
        json!({ "id": id, "name": name, "current": current })
    }

    /// Create an event category.
    pub fn category(id: &str, name: &str) -> JsonValue {
        json!({ "id": id, "name": name, "color": "#1d6b2f" })
    }

    /// Create a directory.
    pub fn directory(id: &str, name: &str) -> JsonValue {
        json!({ "id": id, "name": name })
    }

    // =========================================================================
    // Event Fixtures
    // =========================================================================

    /// Create an active event with nested season and category stubs.
    pub fn event(id: &str, name: &str, ggid: &str) -> JsonValue {
        json!({
            "id": id,
            "name": name,
            "ggid": ggid,
            "type": "event",
            "start_date": "2025-05-03",
            "end_date": "2025-05-04",
            "season": { "id": "s2025", "name": "2025" },
            "category": { "id": "c1", "name": "Men's League" },
            "archived": false
        })
    }

    /// Create an archived event from a past season.
    pub fn archived_event(id: &str, name: &str, ggid: &str) -> JsonValue {
        let mut event = Self::event(id, name, ggid);
        event["archived"] = json!(true);
        event["season"] = json!({ "id": "s2024", "name": "2024" });
        event["start_date"] = json!("2024-06-01");
        event["end_date"] = json!("2024-06-01");
        event
    }

    /// Create a roster player.
    pub fn player(id: &str, first_name: &str, last_name: &str, waitlist: bool) -> JsonValue {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
            "handicap_index": 12.4,
            "waitlist": waitlist
        })
    }

    /// Create a master roster member.
    pub fn member(id: &str, first_name: &str, last_name: &str, network_id: &str) -> JsonValue {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "handicap_network_id": network_id
        })
    }

    // =========================================================================
    // Round Fixtures
    // =========================================================================

    /// Create a round.
    pub fn round(id: &str, name: &str, index: i64, date: &str) -> JsonValue {
        json!({ "id": id, "name": name, "index": index, "date": date, "status": "scheduled" })
    }

    /// Create a tournament. The API reports tournaments under `"event"`.
    pub fn tournament(id: &str, name: &str) -> JsonValue {
        json!({ "id": id, "name": name, "score_format": "stroke" })
    }

    /// Create a pairing group for a tee sheet.
    pub fn pairing_group(tee_time: &str, hole: i64, players: &[&str]) -> JsonValue {
        let players: Vec<JsonValue> = players
            .iter()
            .map(|name| json!({ "name": name }))
            .collect();
        json!({ "tee_time": tee_time, "hole": hole, "players": players })
    }

    /// Create a course with two tees.
    pub fn course(id: &str, name: &str) -> JsonValue {
        json!({
            "id": id,
            "name": name,
            "tees": [
                { "name": "Blue", "rating": 72.1, "slope": 131 },
                { "name": "White", "rating": 70.3, "slope": 125 }
            ]
        })
    }

    /// Create a division.
    pub fn division(id: &str, name: &str, position: i64) -> JsonValue {
        json!({ "id": id, "name": name, "position": position })
    }

    /// Create the default scenario with common test data.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
///
/// `event_001` carries every event-scoped resource; round `r1` of it carries
/// tournaments and a tee sheet.
pub struct DefaultScenario {
    pub seasons: Vec<JsonValue>,
    pub categories: Vec<JsonValue>,
    pub directories: Vec<(JsonValue, Vec<String>)>,
    pub events: Vec<JsonValue>,
    pub rosters: Vec<(String, Vec<JsonValue>)>,
    pub master_roster: Vec<JsonValue>,
    pub rounds: Vec<(String, Vec<JsonValue>)>,
    pub tournaments: Vec<((String, String), Vec<JsonValue>)>,
    pub tee_sheets: Vec<((String, String), Vec<JsonValue>)>,
    pub courses: Vec<(String, Vec<JsonValue>)>,
    pub divisions: Vec<(String, Vec<JsonValue>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let event_id = "event_001".to_string();
        let round = ("event_001".to_string(), "r1".to_string());

        let mut events: Vec<JsonValue> = (1..=ACTIVE_EVENT_COUNT)
            .map(|i| {
                Fixtures::event(
                    &format!("event_{i:03}"),
                    &format!("Event {i}"),
                    &format!("gg{i:03}"),
                )
            })
            .collect();
        events.push(Fixtures::archived_event("event_a01", "Club Championship 2024", "gga01"));
        events.push(Fixtures::archived_event("event_a02", "Member-Guest 2024", "gga02"));

        let roster = (1..=ROSTER_SIZE)
            .map(|i| {
                Fixtures::player(
                    &format!("p{i:03}"),
                    &format!("Player{i}"),
                    "Golfer",
                    i % 10 == 0,
                )
            })
            .collect();

        Self {
            seasons: vec![
                Fixtures::season("s2024", "2024", false),
                Fixtures::season("s2025", "2025", true),
            ],
            categories: vec![
                Fixtures::category("c1", "Men's League"),
                Fixtures::category("c2", "Member-Guest"),
            ],
            directories: vec![(
                Fixtures::directory("d1", "Club Events"),
                vec!["event_001".to_string(), "event_002".to_string()],
            )],
            events,
            rosters: vec![(event_id.clone(), roster)],
            master_roster: vec![
                Fixtures::member("m1", "Ann", "Lee", "GHIN-1001"),
                Fixtures::member("m2", "Bob", "Park", "GHIN-1002"),
                Fixtures::member("m3", "Cy", "Diaz", "GHIN-1003"),
            ],
            // Returned out of order; the client sorts rounds by index.
            rounds: vec![(
                event_id.clone(),
                vec![
                    Fixtures::round("r2", "Final Round", 2, "2025-05-04"),
                    Fixtures::round("r1", "Opening Round", 1, "2025-05-03"),
                ],
            )],
            tournaments: vec![(
                round.clone(),
                vec![
                    Fixtures::tournament("t1", "Gross"),
                    Fixtures::tournament("t2", "Net"),
                ],
            )],
            tee_sheets: vec![(
                round,
                vec![
                    Fixtures::pairing_group("08:00", 1, &["Player1 Golfer", "Player2 Golfer"]),
                    Fixtures::pairing_group("08:10", 10, &["Player3 Golfer"]),
                ],
            )],
            courses: vec![(
                event_id.clone(),
                vec![Fixtures::course("course_1", "North Course")],
            )],
            divisions: vec![(
                event_id,
                vec![
                    Fixtures::division("div_b", "Flight B", 2),
                    Fixtures::division("div_a", "Flight A", 1),
                ],
            )],
        }
    }
}
