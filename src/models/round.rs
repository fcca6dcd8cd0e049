//! Rounds and the round-scoped resources: tournaments and tee sheets.

use std::sync::LazyLock;

use super::wrap;
use crate::error::{GolfGeniusError, Result};
use crate::query::Query;
use crate::record::{Timestamp, Value};
use crate::resolver::{BoundResource, NestedResource};
use crate::transport::Transport;

/// `/events/{event_id}/rounds`; the API returns rounds in no particular order.
pub(crate) static ROUNDS: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection("round", "/events/{event_id}/rounds")
        .item_key("round")
        .inject_parent("event_id")
        .sort_by("index")
});

pub(crate) static TOURNAMENTS: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection(
        "tournament",
        "/events/{event_id}/rounds/{round_id}/tournaments",
    )
    .item_key("event")
    .alias("tournament_id", "id")
    .inject_parent("event_id")
    .inject_parent("round_id")
});

pub(crate) static TEE_SHEET: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection(
        "pairing group",
        "/events/{event_id}/rounds/{round_id}/tee_sheet",
    )
    .item_key("pairing_group")
    .inject_parent("event_id")
    .inject_parent("round_id")
});

record_model! {
    /// One round of an event.
    ///
    /// Rounds listed through an event carry that event's `event_id`, which
    /// is all [`Round::tournaments`] and [`Round::tee_sheet`] need.
    Round
}

impl Round {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Position of the round within the event, starting at 1.
    pub fn index(&self) -> Option<i64> {
        self.get_i64("index")
    }

    pub fn date(&self) -> Option<&Timestamp> {
        self.get_timestamp("date")
    }

    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    pub fn event_id(&self) -> Option<String> {
        self.attribute("event_id").and_then(Value::to_id_string)
    }

    fn bind_event<'a>(
        &self,
        resource: &'a NestedResource,
        client: &'a dyn Transport,
    ) -> Result<BoundResource<'a>> {
        let event_id = self.event_id().ok_or_else(|| {
            GolfGeniusError::invalid("round has no event_id; list it through its event")
        })?;
        resource.bind(client, &[&event_id], self.credential())
    }

    /// Tournaments played in this round.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a round without `event_id` or `id`, and
    /// an error if the request fails.
    pub async fn tournaments(
        &self,
        client: &dyn Transport,
        query: Query,
    ) -> Result<Vec<Tournament>> {
        let tournaments = self.bind_event(&TOURNAMENTS, client)?;
        Ok(wrap(tournaments.fetch_many(Some(self), query).await?))
    }

    /// Pairing groups (tee times) of this round.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a round without `event_id` or `id`, and
    /// an error if the request fails.
    pub async fn tee_sheet(
        &self,
        client: &dyn Transport,
        query: Query,
    ) -> Result<Vec<PairingGroup>> {
        let tee_sheet = self.bind_event(&TEE_SHEET, client)?;
        Ok(wrap(tee_sheet.fetch_many(Some(self), query).await?))
    }
}

record_model! {
    /// A tournament (scoring competition) within a round.
    Tournament
}

impl Tournament {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn tournament_id(&self) -> Option<String> {
        self.attribute("tournament_id").and_then(Value::to_id_string)
    }

    pub fn round_id(&self) -> Option<String> {
        self.attribute("round_id").and_then(Value::to_id_string)
    }

    /// Scoring format, e.g. `"stroke"` or `"stableford"`.
    pub fn score_format(&self) -> Option<&str> {
        self.get_str("score_format")
    }
}

record_model! {
    /// A group of players sharing a tee time.
    PairingGroup
}

impl PairingGroup {
    pub fn tee_time(&self) -> Option<&str> {
        self.get_str("tee_time")
    }

    pub fn starting_hole(&self) -> Option<i64> {
        self.get_i64("hole")
    }

    pub fn players(&self) -> &[Value] {
        self.get_list("players").unwrap_or_default()
    }
}
