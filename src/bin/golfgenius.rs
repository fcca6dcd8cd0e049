//! Golf Genius API CLI binary.
//!
//! A command-line interface for browsing the Golf Genius API.

use clap::Parser;
use golfgenius::cli::{lookup_query, Cli, Command, Entity, ListFilters};
use golfgenius::output::{display_value, PrettyPrint};
use golfgenius::{
    Category, Directory, Event, Get, GolfGeniusClient, GolfGeniusError, List, MasterRosterMember,
    Param, Record, Resource, Season,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Deref;
use std::process::ExitCode;
use tabled::builder::Builder;
use tracing_subscriber::EnvFilter;

/// Columns shown first when present.
const PREFERRED_COLUMNS: &[&str] = &["id", "name", "ggid", "index", "date", "tee_time"];
/// Most columns a table shows.
const MAX_COLUMNS: usize = 6;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match GolfGeniusClient::new(cli.config()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, GolfGeniusError::ConfigMissing(_)) {
                eprintln!("Hint: Set GOLF_GENIUS_API_KEY or pass --api-key");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GolfGeniusClient, cli: Cli) -> golfgenius::Result<()> {
    match cli.command {
        Command::Get {
            entity,
            id,
            by,
            archived,
        } => handle_get(client, entity, &id, by.as_deref(), archived, cli.json).await,
        Command::List { entity, filters } => handle_list(client, entity, &filters, cli.json).await,
    }
}

async fn handle_get(
    client: &GolfGeniusClient,
    entity: Entity,
    id: &str,
    by: Option<&str>,
    archived: bool,
    json: bool,
) -> golfgenius::Result<()> {
    match entity {
        Entity::Season => output_single(&lookup::<Season>(client, id, by, archived).await?, json),
        Entity::Category => {
            output_single(&lookup::<Category>(client, id, by, archived).await?, json)
        }
        Entity::Directory => {
            output_single(&lookup::<Directory>(client, id, by, archived).await?, json)
        }
        Entity::Event => output_single(&lookup::<Event>(client, id, by, archived).await?, json),
        Entity::MasterRoster => {
            output_single(&lookup::<MasterRosterMember>(client, id, by, archived).await?, json)
        }
        other => {
            eprintln!("Error: {other:?} entries can only be listed through their parent");
            eprintln!("Hint: Use 'golfgenius list {other:?} --event <id>'");
            Err(GolfGeniusError::invalid(format!(
                "get {other:?} is not supported"
            )))
        }
    }
}

async fn lookup<T: Resource>(
    client: &GolfGeniusClient,
    id: &str,
    by: Option<&str>,
    archived: bool,
) -> golfgenius::Result<T> {
    let query = lookup_query::<T>(archived)?;
    match by {
        Some(field) => T::find_by(client, field, Param::from(id), query).await,
        None => T::get_with(client, &id, query).await,
    }
}

async fn handle_list(
    client: &GolfGeniusClient,
    entity: Entity,
    filters: &ListFilters,
    json: bool,
) -> golfgenius::Result<()> {
    let query = filters.to_query();

    match entity {
        Entity::Season => output_list(&Season::list(client, query).await?, json),
        Entity::Category => output_list(&Category::list(client, query).await?, json),
        Entity::Directory => output_list(&Directory::list(client, query).await?, json),
        Entity::Event => match &filters.directory {
            Some(directory) => output_list(
                &golfgenius::get_directory_events(client, directory, query).await?,
                json,
            ),
            None => output_list(&Event::list(client, query).await?, json),
        },
        Entity::MasterRoster => output_list(&MasterRosterMember::list(client, query).await?, json),
        Entity::Roster => {
            let event = require(&filters.event, "--event")?;
            output_list(&golfgenius::get_roster(client, event, query).await?, json)
        }
        Entity::Round => {
            let event = require(&filters.event, "--event")?;
            output_list(&golfgenius::get_rounds(client, event, query).await?, json)
        }
        Entity::Course => {
            let event = require(&filters.event, "--event")?;
            output_list(&golfgenius::get_courses(client, event, query).await?, json)
        }
        Entity::Division => {
            let event = require(&filters.event, "--event")?;
            output_list(&golfgenius::get_divisions(client, event, query).await?, json)
        }
        Entity::Tournament => {
            let event = require(&filters.event, "--event")?;
            let round = require(&filters.round, "--round")?;
            output_list(
                &golfgenius::get_tournaments(client, event, round, query).await?,
                json,
            )
        }
        Entity::TeeSheet => {
            let event = require(&filters.event, "--event")?;
            let round = require(&filters.round, "--round")?;
            output_list(
                &golfgenius::get_tee_sheet(client, event, round, query).await?,
                json,
            )
        }
    }
}

fn require<'a>(value: &'a Option<String>, flag: &str) -> golfgenius::Result<&'a String> {
    value
        .as_ref()
        .ok_or_else(|| GolfGeniusError::invalid(format!("{flag} is required for this entity")))
}

fn output_single<T>(item: &T, json: bool) -> golfgenius::Result<()>
where
    T: Serialize + PrettyPrint,
{
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T>(items: &[T], json: bool) -> golfgenius::Result<()>
where
    T: Serialize + Deref<Target = Record>,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    let records: Vec<&Record> = items.iter().map(Deref::deref).collect();
    let columns = table_columns(&records);

    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for record in &records {
        builder.push_record(columns.iter().map(|column| {
            record
                .attribute(column)
                .map(display_value)
                .unwrap_or_default()
        }));
    }
    println!("{}", builder.build());
    println!("\n{} item(s)", records.len());
    Ok(())
}

/// Preferred columns first, then other scalar attributes in payload order.
fn table_columns(records: &[&Record]) -> Vec<String> {
    let present: BTreeSet<&str> = records.iter().flat_map(|r| r.keys()).collect();
    let mut columns: Vec<String> = PREFERRED_COLUMNS
        .iter()
        .filter(|c| present.contains(*c))
        .map(|c| (*c).to_string())
        .collect();

    if let Some(first) = records.first() {
        for (key, value) in first.iter() {
            if columns.len() >= MAX_COLUMNS {
                break;
            }
            let scalar = !matches!(
                value,
                golfgenius::Value::Record(_) | golfgenius::Value::List(_)
            );
            if scalar && !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}
