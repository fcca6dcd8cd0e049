//! Golf Genius API client library.
//!
//! A Rust library for the Golf Genius API v2. Payloads are exposed as
//! dynamic [`Record`]s wrapped in typed models; pagination, lookups by
//! identifier and nested resources are handled by a small engine that each
//! resource configures declaratively.
//!
//! # Quick Start
//!
//! ```no_run
//! use golfgenius::{Event, Get, GolfGeniusClient, List, Query};
//!
//! #[tokio::main]
//! async fn main() -> golfgenius::Result<()> {
//!     // Create client from environment variables
//!     let client = GolfGeniusClient::from_env()?;
//!
//!     // List every event of a season (all pages)
//!     let events = Event::list(&client, Query::new().with("season", "2024")).await?;
//!     println!("Found {} events", events.len());
//!
//!     // Look an event up by id or ggid, archived events included
//!     let event = Event::get(&client, &"event_001").await?;
//!
//!     // Walk its nested resources
//!     for round in event.rounds(&client, Query::new()).await? {
//!         let tournaments = round.tournaments(&client, Query::new()).await?;
//!         println!("{:?}: {} tournaments", round.name(), tournaments.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Record`] converts JSON payloads into immutable attribute maps with
//!   get-or-derive lookup (`record.get("archived?")`).
//! - [`Paginator`] fetches one page, all pages, or walks pages lazily, and
//!   stops on empty, short or repeated pages.
//! - [`NestedResource`] declares a resource relationship: path template,
//!   envelope, aliases, parent injection, sorting and client-side filters.
//! - [`Finder`] emulates fetch-by-id on list-only endpoints.
//! - [`List`] and [`Get`] are implemented for every [`Resource`].
//!
//! Everything talks to the network through the [`Transport`] trait;
//! [`GolfGeniusClient`] is the reqwest implementation.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GOLF_GENIUS_API_KEY` (required unless passed per call) - Your API key
//! - `GOLF_GENIUS_BASE_URL` (optional) - Base URL (defaults to
//!   `https://www.golfgenius.com/api_v2`)
//! - `GOLF_GENIUS_TIMEOUT_SECS` (optional) - Request timeout
//!
//! A per-call key is passed as [`Query::credential`]; records remember the
//! key they were fetched with and reuse it for their nested resources.

mod client;
mod error;
mod identify;
mod models;
mod pagination;
mod query;
mod record;
mod resolver;
mod traits;
mod transport;

pub mod cli;
pub mod config;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

#[cfg(test)]
mod testing;

// Re-export core types
pub use client::GolfGeniusClient;
pub use config::Config;
pub use error::{ErrorKind, GolfGeniusError, Result};
pub use identify::{Finder, PageSource, ScanOutcome, DEFAULT_MAX_PAGES};
pub use pagination::{Envelope, Page, PageCursor, Paginator, MAX_PAGES};
pub use query::{Identified, Param, Query, Reserved};
pub use record::{canonical_key, is_date_attribute, Record, Timestamp, Value};
pub use resolver::{BoundResource, ClientFilter, NestedResource, PathTemplate, Resolved, Shape};
pub use transport::{Method, QueryParams, Transport};

// Re-export traits
pub use traits::{Get, List, Resource};

// Re-export models
pub use models::{
    // Catalog
    Category,
    Directory,
    Season,
    // Events
    Event,
    EVENT_PAGE_SIZE,
    // Rosters
    MasterRosterMember,
    RosterMember,
    ROSTER_PAGE_SIZE,
    // Event-scoped resources
    Course,
    Division,
    PairingGroup,
    Round,
    Tournament,
};

// Re-export convenience functions
pub use models::{get_courses, get_directory_events, get_divisions, get_roster, get_rounds};
pub use models::{get_tee_sheet, get_tournaments};
