//! List trait for fetching collections of resources.

use async_trait::async_trait;

use super::Resource;
use crate::error::Result;
use crate::pagination::{Page, Paginator};
use crate::query::Query;
use crate::transport::Transport;

/// List resources, one page at a time or all at once.
///
/// Blanket-implemented for every [`Resource`].
///
/// # Example
///
/// ```no_run
/// use golfgenius::{Event, GolfGeniusClient, List, Query};
///
/// # async fn example() -> golfgenius::Result<()> {
/// let client = GolfGeniusClient::from_env()?;
///
/// // Fetch a single page
/// let page = Event::list_page(&client, Query::new(), 1).await?;
///
/// // Fetch all pages
/// let all_events = Event::list_all(&client, Query::new().with("season", "2024")).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait List: Resource {
    /// List resources matching the query.
    ///
    /// A paginated listing is aggregated over all pages unless the query
    /// names a `page`.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    async fn list(client: &dyn Transport, query: Query) -> Result<Vec<Self>> {
        let records = Self::listing().fetch_many(client, &[], query).await?;
        Ok(records.into_iter().map(Self::from).collect())
    }

    /// Fetch exactly one page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(client: &dyn Transport, query: Query, page: u32) -> Result<Page<Self>> {
        let records = Self::listing()
            .fetch_many(client, &[], query.page(page))
            .await?;
        Ok(Page::new(records, page, Self::PAGE_SIZE).map(Self::from))
    }

    /// Every resource across all pages, in page order.
    ///
    /// Commits to the whole listing; use [`Paginator::pages`] to stop early.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &dyn Transport, query: Query) -> Result<Vec<Self>> {
        let listing = Self::listing();
        let paginator = Paginator::new(client, Self::PATH).envelope(listing.envelope().clone());
        let mut cursor = paginator.pages(query)?.with_page_size(Self::PAGE_SIZE);

        let mut all_items = Vec::new();
        while let Some(page) = cursor.next_page().await? {
            all_items.extend(page.items.into_iter().map(Self::from));
        }
        Ok(all_items)
    }
}

impl<T: Resource> List for T {}
