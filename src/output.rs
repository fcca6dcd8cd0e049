//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::record::{Record, Value};
use crate::{Category, Course, Directory, Division, Event, MasterRosterMember, PairingGroup};
use crate::{RosterMember, Round, Season, Tournament};

/// Width of the label column.
const LABEL_WIDTH: usize = 16;

/// Trait for human-readable key-value output.
///
/// Implemented by records and model types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// Short single-line rendering of a value, for tables and summaries.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Record(record) => record
            .get_str("name")
            .map(str::to_string)
            .or_else(|| record.id())
            .unwrap_or_else(|| "{…}".to_string()),
        Value::List(items) => format!("[{} items]", items.len()),
        other => other.to_string(),
    }
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn line(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<width$}{}", format!("{label}:"), value, width = LABEL_WIDTH)
}

/// Every attribute, one per line.
fn attribute_lines(record: &Record) -> Vec<String> {
    record
        .iter()
        .map(|(key, value)| line(key, display_value(value)))
        .collect()
}

impl PrettyPrint for Record {
    fn pretty_print(&self) -> String {
        let title = self
            .id()
            .map_or_else(|| "Record".to_string(), |id| format!("Record {id}"));
        let mut lines = header(title);
        lines.extend(attribute_lines(self));
        lines.join("\n")
    }
}

impl PrettyPrint for Event {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Event: {}", self.name().unwrap_or("(unnamed)")));

        if let Some(id) = self.id() {
            lines.push(line("ID", id));
        }
        if let Some(ggid) = self.ggid() {
            lines.push(line("GGID", ggid));
        }
        if let Some(event_type) = self.event_type() {
            lines.push(line("Type", event_type));
        }
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) if start != end => {
                lines.push(line("Dates", format!("{start} to {end}")));
            }
            (Some(start), _) => lines.push(line("Date", start)),
            _ => {}
        }
        if let Some(season) = self.season().and_then(|s| s.get_str("name")) {
            lines.push(line("Season", season));
        }
        if let Some(category) = self.category().and_then(|c| c.get_str("name")) {
            lines.push(line("Category", category));
        }
        if self.is_archived() {
            lines.push(line("Status", "archived"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for RosterMember {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!(
            "Player: {}",
            self.full_name().unwrap_or_else(|| "(unnamed)".to_string())
        ));

        if let Some(id) = self.id() {
            lines.push(line("ID", id));
        }
        if let Some(email) = self.email() {
            lines.push(line("Email", email));
        }
        if let Some(handicap) = self.handicap_index() {
            lines.push(line("Handicap", format!("{handicap:.1}")));
        }
        if self.is_waitlisted() {
            lines.push(line("Status", "waitlisted"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Round {
    fn pretty_print(&self) -> String {
        let title = match (self.index(), self.name()) {
            (Some(index), Some(name)) => format!("Round {index}: {name}"),
            (None, Some(name)) => format!("Round: {name}"),
            (Some(index), None) => format!("Round {index}"),
            (None, None) => "Round".to_string(),
        };
        let mut lines = header(title);

        if let Some(id) = self.id() {
            lines.push(line("ID", id));
        }
        if let Some(date) = self.date() {
            lines.push(line("Date", date));
        }
        if let Some(status) = self.status() {
            lines.push(line("Status", status));
        }
        if let Some(event_id) = self.event_id() {
            lines.push(line("Event", event_id));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for PairingGroup {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Tee time {}", self.tee_time().unwrap_or("TBD")));
        if let Some(hole) = self.starting_hole() {
            lines.push(line("Hole", hole));
        }
        for player in self.players() {
            lines.push(line("Player", display_value(player)));
        }
        lines.join("\n")
    }
}

/// Models without a dedicated layout print their name, then all attributes.
macro_rules! pretty_print_by_name {
    ($($model:ident => $label:literal),* $(,)?) => {
        $(impl PrettyPrint for $model {
            fn pretty_print(&self) -> String {
                let name = self.get_str("name").unwrap_or("(unnamed)");
                let mut lines = header(format!("{}: {}", $label, name));
                lines.extend(attribute_lines(self));
                lines.join("\n")
            }
        })*
    };
}

pretty_print_by_name! {
    Season => "Season",
    Category => "Category",
    Directory => "Directory",
    MasterRosterMember => "Member",
    Course => "Course",
    Division => "Division",
    Tournament => "Tournament",
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> Event {
        Event::from(
            Record::from_json(
                json!({
                    "id": 10,
                    "name": "Spring Invitational",
                    "start_date": "2024-04-12",
                    "end_date": "2024-04-14",
                    "archived": true
                }),
                None,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_event_pretty_print_format() {
        let output = event().pretty_print();
        assert!(output.starts_with("Event: Spring Invitational"));
        assert!(output.contains("Dates:"));
        assert!(output.contains("2024-04-12 to 2024-04-14"));
        assert!(output.contains("archived"));
    }

    #[test]
    fn test_record_pretty_print_lists_attributes() {
        let record = Record::from_json(
            json!({"id": "s1", "name": "2024", "events": [1, 2, 3], "owner": {"name": "Club"}}),
            None,
        )
        .unwrap();

        let output = record.pretty_print();
        assert!(output.starts_with("Record s1"));
        assert!(output.contains("[3 items]"));
        assert!(output.contains("owner:"));
        assert!(output.contains("Club"));
    }

    #[test]
    fn test_season_uses_name_header() {
        let season = Season::from(Record::from_json(json!({"id": 1, "name": "2025"}), None).unwrap());
        assert!(season.pretty_print().starts_with("Season: 2025"));
    }
}
