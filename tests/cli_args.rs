//! CLI argument parsing tests.

use clap::Parser;
use golfgenius::cli::{lookup_query, Cli, Command, Entity, ListFilters};
use golfgenius::{Category, Event, GolfGeniusError, Param, Season};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["golfgenius", "get", "event", "event_001"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get {
            entity,
            id,
            by,
            archived,
        } => {
            assert_eq!(entity, Entity::Event);
            assert_eq!(id, "event_001");
            assert_eq!(by, None);
            assert!(!archived);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_get_by_field() {
    let cli = Cli::parse_from([
        "golfgenius",
        "get",
        "master-roster",
        "GHIN-1001",
        "--by",
        "handicap_network_id",
    ]);

    match cli.command {
        Command::Get { entity, by, .. } => {
            assert_eq!(entity, Entity::MasterRoster);
            assert_eq!(by.as_deref(), Some("handicap_network_id"));
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["golfgenius", "list", "events"]);

    match cli.command {
        Command::List { entity, filters } => {
            assert_eq!(entity, Entity::Event);
            assert_eq!(filters, ListFilters::default());
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_nested_list_parents() {
    let cli = Cli::parse_from([
        "golfgenius",
        "list",
        "tee-sheet",
        "--event",
        "event_001",
        "--round",
        "r1",
    ]);

    match cli.command {
        Command::List { entity, filters } => {
            assert_eq!(entity, Entity::TeeSheet);
            assert_eq!(filters.event.as_deref(), Some("event_001"));
            assert_eq!(filters.round.as_deref(), Some("r1"));
            assert!(!entity.is_top_level());
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_entity_aliases() {
    for (arg, expected) in [
        ("seasons", Entity::Season),
        ("categories", Entity::Category),
        ("players", Entity::Roster),
        ("members", Entity::MasterRoster),
        ("pairings", Entity::TeeSheet),
        ("tournaments", Entity::Tournament),
    ] {
        let cli = Cli::parse_from(["golfgenius", "list", arg]);
        match cli.command {
            Command::List { entity, .. } => assert_eq!(entity, expected, "alias {arg}"),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_cli_json_flag_is_global() {
    let cli = Cli::parse_from(["golfgenius", "list", "seasons", "--json"]);
    assert!(cli.json);

    let cli = Cli::parse_from(["golfgenius", "--json", "get", "season", "s1"]);
    assert!(cli.json);
}

#[test]
fn test_cli_flags_override_config() {
    let cli = Cli::parse_from([
        "golfgenius",
        "--api-key",
        "flag-key",
        "--base-url",
        "http://localhost:9999",
        "list",
        "seasons",
    ]);

    let config = cli.config();
    assert_eq!(config.api_key.as_deref(), Some("flag-key"));
    assert_eq!(config.base_url, "http://localhost:9999");
}

#[test]
fn test_list_filters_to_query() {
    let cli = Cli::parse_from([
        "golfgenius",
        "list",
        "events",
        "--season",
        "s2025",
        "--archived",
        "--page",
        "2",
    ]);

    let Command::List { filters, .. } = cli.command else {
        panic!("Expected List command");
    };
    let query = filters.to_query();

    assert_eq!(query.get("season"), Some(&Param::from("s2025")));
    assert_eq!(query.get("archived"), Some(&Param::Bool(true)));
    assert_eq!(query.get("page"), Some(&Param::Int(2)));
    assert!(!query.contains("category"));
}

#[test]
fn test_list_filters_waitlist_takes_a_value() {
    let cli = Cli::parse_from([
        "golfgenius",
        "list",
        "roster",
        "--event",
        "event_001",
        "--waitlist",
        "false",
    ]);

    let Command::List { filters, .. } = cli.command else {
        panic!("Expected List command");
    };
    assert_eq!(filters.waitlist, Some(false));
    assert_eq!(filters.to_query().get("waitlist"), Some(&Param::Bool(false)));
    // Parents never become query parameters
    assert!(!filters.to_query().contains("event"));
}

#[test]
fn test_cli_rejects_unknown_entity() {
    let result = Cli::try_parse_from(["golfgenius", "list", "scorecards"]);
    assert!(result.is_err());
}

#[test]
fn test_get_archived_pins_the_archive_filter() {
    assert!(lookup_query::<Event>(false).unwrap().is_empty());

    let query = lookup_query::<Event>(true).unwrap();
    assert_eq!(query.get("archived"), Some(&Param::Bool(true)));
}

#[test]
fn test_get_archived_rejected_without_archive_filter() {
    let err = lookup_query::<Season>(true).unwrap_err();
    assert!(matches!(err, GolfGeniusError::InvalidArgument(_)));
    assert!(err.to_string().contains("season"));

    assert!(lookup_query::<Category>(false).unwrap().is_empty());
}
