//! Seasons, categories and directories: the account-level catalog.

use std::sync::LazyLock;

use super::{wrap, Event};
use crate::error::Result;
use crate::query::{Identified, Query};
use crate::resolver::NestedResource;
use crate::traits::Resource;
use crate::transport::Transport;

record_model! {
    /// A season groups events by year or campaign.
    Season
}

impl Season {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Whether this is the account's current season.
    pub fn is_current(&self) -> bool {
        self.predicate("current")
    }
}

impl Resource for Season {
    const NAME: &'static str = "season";
    const PATH: &'static str = "/seasons";
    const ITEM_KEY: Option<&'static str> = Some("season");
}

record_model! {
    /// An event category, e.g. "Member-Guest" or "Weekly Games".
    Category
}

impl Category {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn color(&self) -> Option<&str> {
        self.get_str("color")
    }
}

impl Resource for Category {
    const NAME: &'static str = "category";
    const PATH: &'static str = "/categories";
    const ITEM_KEY: Option<&'static str> = Some("category");
}

record_model! {
    /// A directory: a named folder of events.
    Directory
}

static DIRECTORY_EVENTS: LazyLock<NestedResource> = LazyLock::new(|| {
    NestedResource::collection("event", "/directories/{directory_id}/events")
        .item_key("event")
        .inject_parent("directory_id")
});

impl Directory {
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Events filed in this directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory has no identifier or the request
    /// fails.
    pub async fn events(&self, client: &dyn Transport, query: Query) -> Result<Vec<Event>> {
        let records = DIRECTORY_EVENTS
            .bind(client, &[self as &dyn Identified], self.credential())?
            .fetch_many(None, query)
            .await?;
        Ok(wrap(records))
    }
}

impl Resource for Directory {
    const NAME: &'static str = "directory";
    const PATH: &'static str = "/directories";
    const ITEM_KEY: Option<&'static str> = Some("directory");
}

/// Fetch the events of a directory.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_directory_events(
    client: &dyn Transport,
    directory: &dyn Identified,
    query: Query,
) -> Result<Vec<Event>> {
    Ok(wrap(DIRECTORY_EVENTS.fetch_many(client, &[directory], query).await?))
}
