//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! golfgenius binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::error::{GolfGeniusError, Result};
use crate::query::Query;
use crate::traits::Resource;

/// Golf Genius API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "golfgenius", about = "Golf Genius API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// API key (defaults to GOLF_GENIUS_API_KEY).
    #[arg(long, global = true, env = "GOLF_GENIUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL (defaults to GOLF_GENIUS_BASE_URL, then the public API).
    #[arg(long, global = true, env = "GOLF_GENIUS_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Client configuration: environment defaults overridden by flags.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        config
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The ID (or the value of the --by field).
        id: String,

        /// Match on this field instead of the default ones (e.g. ggid).
        #[arg(long)]
        by: Option<String>,

        /// Search archived records only (events).
        #[arg(long)]
        archived: bool,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        #[command(flatten)]
        filters: ListFilters,
    },
}

/// Filters and parents for `list`.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct ListFilters {
    /// Page number (1-indexed); all pages when omitted.
    #[arg(long)]
    pub page: Option<u32>,

    /// Parent event (required for event-scoped entities).
    #[arg(long)]
    pub event: Option<String>,

    /// Parent round (required for tournaments and tee sheets).
    #[arg(long)]
    pub round: Option<String>,

    /// Parent directory (lists the directory's events).
    #[arg(long)]
    pub directory: Option<String>,

    /// Filter events by season ID.
    #[arg(long)]
    pub season: Option<String>,

    /// Filter events by category ID.
    #[arg(long)]
    pub category: Option<String>,

    /// List archived events.
    #[arg(long)]
    pub archived: bool,

    /// Keep only waitlisted (true) or registered (false) players.
    #[arg(long)]
    pub waitlist: Option<bool>,
}

impl ListFilters {
    /// Query parameters for the listing; parents are not included.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(page) = self.page {
            query = query.page(page);
        }
        if let Some(season) = &self.season {
            query = query.with("season", season.as_str());
        }
        if let Some(category) = &self.category {
            query = query.with("category", category.as_str());
        }
        if self.archived {
            query = query.with("archived", true);
        }
        if let Some(waitlist) = self.waitlist {
            query = query.with("waitlist", waitlist);
        }
        query
    }
}

/// Lookup query for `get`; `--archived` pins the resource's archive filter.
///
/// # Errors
///
/// `InvalidArgument` when `archived` is set for a resource without archived
/// records.
pub fn lookup_query<T: Resource>(archived: bool) -> Result<Query> {
    if !archived {
        return Ok(Query::new());
    }
    match T::ARCHIVE_FILTER {
        Some(filter) => Ok(Query::new().with(filter, true)),
        None => Err(GolfGeniusError::invalid(format!(
            "--archived is not supported for {}",
            T::NAME
        ))),
    }
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A season.
    #[value(alias = "seasons")]
    Season,
    /// An event category.
    #[value(alias = "categories")]
    Category,
    /// A directory of events.
    #[value(alias = "directories")]
    Directory,
    /// An event.
    #[value(alias = "events")]
    Event,
    /// A player on an event roster.
    #[value(alias = "players")]
    Roster,
    /// A member of the master roster.
    #[value(name = "master-roster", alias = "members")]
    MasterRoster,
    /// A round of an event.
    #[value(alias = "rounds")]
    Round,
    /// A course of an event.
    #[value(alias = "courses")]
    Course,
    /// A division of an event.
    #[value(alias = "divisions")]
    Division,
    /// A tournament within a round.
    #[value(alias = "tournaments")]
    Tournament,
    /// The pairing groups of a round.
    #[value(name = "tee-sheet", alias = "pairings")]
    TeeSheet,
}

impl Entity {
    /// Whether `get` can look this entity up on its own.
    pub fn is_top_level(self) -> bool {
        matches!(
            self,
            Entity::Season
                | Entity::Category
                | Entity::Directory
                | Entity::Event
                | Entity::MasterRoster
        )
    }
}
