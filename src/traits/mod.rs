//! Trait definitions for Golf Genius resources.
//!
//! Each top-level resource declares where it lives and how its listing is
//! shaped by implementing [`Resource`]; [`List`] and [`Get`] are then
//! available on it through blanket implementations.

mod get;
mod list;

pub use get::Get;
pub use list::List;

use crate::identify::{Finder, DEFAULT_MAX_PAGES};
use crate::query::Identified;
use crate::record::Record;
use crate::resolver::NestedResource;

/// A top-level Golf Genius resource.
pub trait Resource: From<Record> + Identified + Send + Sync + Sized {
    /// Human-readable name, used in errors and logs.
    const NAME: &'static str;
    /// Listing path, relative to the credential.
    const PATH: &'static str;
    /// Key wrapping each listed item.
    const ITEM_KEY: Option<&'static str> = None;
    /// Key holding the listing array.
    const LIST_KEY: Option<&'static str> = None;
    /// Page size of a paginated listing; `None` for single-response listings.
    const PAGE_SIZE: Option<u32> = None;
    /// Fields an identifier may match when looking a record up.
    const MATCH_FIELDS: &'static [&'static str] = &["id"];
    /// Boolean filter selecting archived records, if the resource has any.
    const ARCHIVE_FILTER: Option<&'static str> = None;
    /// Pages scanned by a lookup before giving up.
    const MAX_PAGES: u32 = DEFAULT_MAX_PAGES;

    /// The listing as a resolvable resource.
    fn listing() -> NestedResource {
        let mut listing = NestedResource::collection(Self::NAME, Self::PATH);
        if let Some(key) = Self::ITEM_KEY {
            listing = listing.item_key(key);
        }
        if let Some(key) = Self::LIST_KEY {
            listing = listing.list_key(key);
        }
        if let Some(size) = Self::PAGE_SIZE {
            listing = listing.paginate(size);
        }
        listing
    }

    /// Lookup policy for [`Get`].
    fn finder() -> Finder {
        Finder::new(Self::NAME)
            .match_fields(Self::MATCH_FIELDS)
            .per_page(Self::PAGE_SIZE)
            .max_pages(Self::MAX_PAGES)
            .archive_filter(Self::ARCHIVE_FILTER)
    }
}
