//! Event model and its event-scoped resources.

use super::course::{COURSES, DIVISIONS};
use super::roster::ROSTER;
use super::round::{ROUNDS, TEE_SHEET, TOURNAMENTS};
use super::{wrap, Course, Division, PairingGroup, Round, RosterMember, Tournament};
use crate::error::Result;
use crate::query::{Identified, Query};
use crate::record::{Record, Timestamp};
use crate::traits::Resource;
use crate::transport::Transport;

/// Events are listed 25 per page.
pub const EVENT_PAGE_SIZE: u32 = 25;

record_model! {
    /// A Golf Genius event: a league, trip or single-day tournament.
    ///
    /// Events are looked up by `id` or by their public `ggid`, and archived
    /// events are only listed when `archived=true` is passed.
    Event
}

impl Event {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Public event code shown in Golf Genius URLs.
    pub fn ggid(&self) -> Option<String> {
        self.attribute("ggid").and_then(|v| v.to_id_string())
    }

    /// Event type, e.g. `"event"` or `"league"`.
    pub fn event_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn start_date(&self) -> Option<&Timestamp> {
        self.get_timestamp("start_date")
    }

    pub fn end_date(&self) -> Option<&Timestamp> {
        self.get_timestamp("end_date")
    }

    pub fn season(&self) -> Option<&Record> {
        self.get_record("season")
    }

    pub fn category(&self) -> Option<&Record> {
        self.get_record("category")
    }

    pub fn is_archived(&self) -> bool {
        self.predicate("archived")
    }

    fn bound_ids(&self) -> [&dyn Identified; 1] {
        [self as &dyn Identified]
    }

    /// Players registered for the event, across all roster pages.
    ///
    /// Pass `waitlist` in the query to keep only (or exclude) waitlisted
    /// players; it is applied locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the event has no identifier or a request fails.
    pub async fn roster(&self, client: &dyn Transport, query: Query) -> Result<Vec<RosterMember>> {
        let roster = ROSTER.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(roster.fetch_many(None, query).await?))
    }

    /// Rounds of the event, ordered by their `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the event has no identifier or the request fails.
    pub async fn rounds(&self, client: &dyn Transport, query: Query) -> Result<Vec<Round>> {
        let rounds = ROUNDS.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(rounds.fetch_many(None, query).await?))
    }

    /// # Errors
    ///
    /// Returns an error if the event has no identifier or the request fails.
    pub async fn courses(&self, client: &dyn Transport, query: Query) -> Result<Vec<Course>> {
        let courses = COURSES.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(courses.fetch_many(None, query).await?))
    }

    /// # Errors
    ///
    /// Returns an error if the event has no identifier or the request fails.
    pub async fn divisions(&self, client: &dyn Transport, query: Query) -> Result<Vec<Division>> {
        let divisions = DIVISIONS.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(divisions.fetch_many(None, query).await?))
    }

    /// Tournaments of one round.
    ///
    /// The round is either passed as `round` or named in the query as
    /// `round_id`.
    ///
    /// # Errors
    ///
    /// Returns `Arity` when no round is given, and an error if the request
    /// fails.
    pub async fn tournaments(
        &self,
        client: &dyn Transport,
        round: Option<&dyn Identified>,
        query: Query,
    ) -> Result<Vec<Tournament>> {
        let tournaments = TOURNAMENTS.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(tournaments.fetch_many(round, query).await?))
    }

    /// Pairing groups of one round, given as for [`Event::tournaments`].
    ///
    /// # Errors
    ///
    /// Returns `Arity` when no round is given, and an error if the request
    /// fails.
    pub async fn tee_sheet(
        &self,
        client: &dyn Transport,
        round: Option<&dyn Identified>,
        query: Query,
    ) -> Result<Vec<PairingGroup>> {
        let tee_sheet = TEE_SHEET.bind(client, &self.bound_ids(), self.credential())?;
        Ok(wrap(tee_sheet.fetch_many(round, query).await?))
    }
}

impl Resource for Event {
    const NAME: &'static str = "event";
    const PATH: &'static str = "/events";
    const ITEM_KEY: Option<&'static str> = Some("event");
    const PAGE_SIZE: Option<u32> = Some(EVENT_PAGE_SIZE);
    const MATCH_FIELDS: &'static [&'static str] = &["id", "ggid"];
    const ARCHIVE_FILTER: Option<&'static str> = Some("archived");
}

/// Fetch the roster of an event.
///
/// # Example
///
/// ```no_run
/// use golfgenius::{get_roster, GolfGeniusClient, Query};
///
/// # async fn example() -> golfgenius::Result<()> {
/// let client = GolfGeniusClient::from_env()?;
/// let waitlist = get_roster(&client, &"event_001", Query::new().with("waitlist", true)).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a request fails.
pub async fn get_roster(
    client: &dyn Transport,
    event: &dyn Identified,
    query: Query,
) -> Result<Vec<RosterMember>> {
    Ok(wrap(ROSTER.fetch_many(client, &[event], query).await?))
}

/// Fetch the rounds of an event, ordered by `index`.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_rounds(
    client: &dyn Transport,
    event: &dyn Identified,
    query: Query,
) -> Result<Vec<Round>> {
    Ok(wrap(ROUNDS.fetch_many(client, &[event], query).await?))
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_courses(
    client: &dyn Transport,
    event: &dyn Identified,
    query: Query,
) -> Result<Vec<Course>> {
    Ok(wrap(COURSES.fetch_many(client, &[event], query).await?))
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_divisions(
    client: &dyn Transport,
    event: &dyn Identified,
    query: Query,
) -> Result<Vec<Division>> {
    Ok(wrap(DIVISIONS.fetch_many(client, &[event], query).await?))
}

/// Fetch the tournaments of a round.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_tournaments(
    client: &dyn Transport,
    event: &dyn Identified,
    round: &dyn Identified,
    query: Query,
) -> Result<Vec<Tournament>> {
    Ok(wrap(
        TOURNAMENTS.fetch_many(client, &[event, round], query).await?,
    ))
}

/// Fetch the tee sheet (pairing groups) of a round.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_tee_sheet(
    client: &dyn Transport,
    event: &dyn Identified,
    round: &dyn Identified,
    query: Query,
) -> Result<Vec<PairingGroup>> {
    Ok(wrap(TEE_SHEET.fetch_many(client, &[event, round], query).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GolfGeniusError;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn event() -> Event {
        Event::from(
            Record::from_json(
                json!({
                    "id": "event_001",
                    "ggid": 98765,
                    "name": "Club Championship",
                    "start_date": "2024-06-01",
                    "season": {"id": "s1", "name": "2024"}
                }),
                Some("event-key"),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_event_accessors() {
        let event = event();
        assert_eq!(event.name(), Some("Club Championship"));
        assert_eq!(event.ggid().as_deref(), Some("98765"));
        assert_eq!(event.season().and_then(|s| s.get_str("name")), Some("2024"));
        assert_eq!(
            event.start_date().map(Timestamp::to_canonical_string).as_deref(),
            Some("2024-06-01")
        );
        assert!(!event.is_archived());
    }

    #[tokio::test]
    async fn test_roster_injects_event_and_filters_waitlist() {
        let transport = ScriptedTransport::new(|_, _| {
            Ok(json!([
                {"member": {"id": "m1", "name": "A. Player", "waitlist": true}},
                {"member": {"id": "m2", "name": "B. Player", "waitlist": false}},
                {"member": {"id": "m3", "name": "C. Player", "waitlist": false}}
            ]))
        });

        let members = event()
            .roster(&transport, Query::new().with("waitlist", false))
            .await
            .unwrap();

        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.get_str("event_id") == Some("event_001")));
        let calls = transport.calls();
        // Three items is a short page, so the aggregation stops after one request.
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/events/event_001/roster");
        assert_eq!(calls[0].credential.as_deref(), Some("event-key"));
        assert!(!calls[0].query.contains_key("waitlist"));
    }

    #[tokio::test]
    async fn test_rounds_are_sorted_by_index() {
        let transport = ScriptedTransport::new(|_, _| {
            Ok(json!([
                {"round": {"id": "r2", "index": 2, "name": "Final Round"}},
                {"round": {"id": "r1", "index": 1, "name": "Round 1"}}
            ]))
        });

        let rounds = event().rounds(&transport, Query::new()).await.unwrap();

        let names: Vec<_> = rounds.iter().filter_map(Round::name).collect();
        assert_eq!(names, ["Round 1", "Final Round"]);
        assert_eq!(rounds[0].event_id().as_deref(), Some("event_001"));
    }

    #[tokio::test]
    async fn test_tournaments_need_a_round() {
        let transport = ScriptedTransport::new(|_, _| Ok(json!([{"event": {"id": "t1"}}])));
        let event = event();

        let err = event
            .tournaments(&transport, None, Query::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GolfGeniusError::Arity { .. }));

        let tournaments = event
            .tournaments(&transport, Some(&"r1"), Query::new())
            .await
            .unwrap();
        assert_eq!(tournaments[0].tournament_id().as_deref(), Some("t1"));
        assert_eq!(transport.calls()[0].path, "/events/event_001/rounds/r1/tournaments");
    }

    #[tokio::test]
    async fn test_free_functions_accept_raw_ids() {
        let transport = ScriptedTransport::new(|_, _| {
            Ok(json!({"courses": [{"id": "c1", "name": "North"}, {"id": "c2", "name": "South"}]}))
        });

        let courses = get_courses(&transport, &"event_001", Query::new()).await.unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].name(), Some("South"));
        assert_eq!(courses[1].get_str("event_id"), Some("event_001"));
        assert_eq!(transport.calls()[0].credential.as_deref(), Some(crate::testing::TEST_KEY));
    }
}
