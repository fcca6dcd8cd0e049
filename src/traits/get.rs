//! Get trait for fetching single resources.

use async_trait::async_trait;

use super::Resource;
use crate::error::Result;
use crate::query::{Identified, Param, Query};
use crate::transport::Transport;

/// Fetch a single resource by identifier.
///
/// The API has no fetch-by-id endpoints for these resources, so lookups scan
/// the listing (see [`Finder`](crate::Finder)). Blanket-implemented for every
/// [`Resource`].
///
/// # Example
///
/// ```no_run
/// use golfgenius::{Event, Get, GolfGeniusClient, Query};
///
/// # async fn example() -> golfgenius::Result<()> {
/// let client = GolfGeniusClient::from_env()?;
/// let event = Event::get(&client, &"event_001").await?;
/// let same = Event::find_by(&client, "ggid", "abc123".into(), Query::new()).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Get: Resource {
    /// Fetch the resource whose match fields equal `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no listed resource matches.
    async fn get(client: &dyn Transport, id: &dyn Identified) -> Result<Self> {
        Self::get_with(client, id, Query::new()).await
    }

    /// [`Get::get`] with extra listing filters.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no listed resource matches.
    async fn get_with(client: &dyn Transport, id: &dyn Identified, query: Query) -> Result<Self> {
        let listing = Self::listing();
        let source = listing.bind(client, &[], None)?;
        let record = Self::finder().fetch_by_id(&source, id, query).await?;
        Ok(Self::from(record))
    }

    /// Fetch the resource whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `field` is not a match field of the
    /// resource, and `NotFound` if no listed resource matches.
    async fn find_by(
        client: &dyn Transport,
        field: &str,
        value: Param,
        query: Query,
    ) -> Result<Self> {
        let listing = Self::listing();
        let source = listing.bind(client, &[], None)?;
        let record = Self::finder().fetch_by_key(&source, field, value, query).await?;
        Ok(Self::from(record))
    }
}

impl<T: Resource> Get for T {}
