//! Event rosters and the account's master roster.

use std::sync::LazyLock;

use crate::resolver::{ClientFilter, NestedResource};
use crate::traits::Resource;

/// Roster pages hold up to 100 players.
pub const ROSTER_PAGE_SIZE: u32 = 100;

/// `/events/{event_id}/roster`, filtered locally on `waitlist`.
pub(crate) static ROSTER: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection("roster member", "/events/{event_id}/roster")
        .item_key("member")
        .inject_parent("event_id")
        .paginate(ROSTER_PAGE_SIZE)
        .client_filter(ClientFilter::equals("waitlist", "waitlist"))
});

record_model! {
    /// A player on an event roster.
    RosterMember
}

impl RosterMember {
    pub fn first_name(&self) -> Option<&str> {
        self.get_str("first_name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.get_str("last_name")
    }

    /// `name` when present, else first and last name joined.
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = self.get_str("name") {
            return Some(name.to_string());
        }
        match (self.first_name(), self.last_name()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn handicap_index(&self) -> Option<f64> {
        self.get_f64("handicap_index")
    }

    pub fn is_waitlisted(&self) -> bool {
        self.predicate("waitlist")
    }

    /// Event this roster entry belongs to.
    pub fn event_id(&self) -> Option<String> {
        self.attribute("event_id").and_then(|v| v.to_id_string())
    }
}

record_model! {
    /// A member of the account-wide master roster.
    MasterRosterMember
}

impl MasterRosterMember {
    pub fn first_name(&self) -> Option<&str> {
        self.get_str("first_name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.get_str("last_name")
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn handicap_network_id(&self) -> Option<String> {
        self.attribute("handicap_network_id")
            .and_then(|v| v.to_id_string())
    }
}

impl Resource for MasterRosterMember {
    const NAME: &'static str = "master roster member";
    const PATH: &'static str = "/master_roster";
    const ITEM_KEY: Option<&'static str> = Some("member");
    const PAGE_SIZE: Option<u32> = Some(ROSTER_PAGE_SIZE);
    const MATCH_FIELDS: &'static [&'static str] = &["id", "handicap_network_id"];
}
