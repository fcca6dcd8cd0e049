//! Basic example demonstrating the Golf Genius API client.
//!
//! Run with:
//! ```
//! GOLF_GENIUS_API_KEY=your-key cargo run --example basic
//! ```

use golfgenius::{Event, GolfGeniusClient, List, Query, Season};

#[tokio::main]
async fn main() -> golfgenius::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Golf Genius client...");
    let client = GolfGeniusClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Seasons are a single unpaginated listing
    println!("\n--- Seasons ---");
    let seasons = Season::list(&client, Query::new()).await?;
    for season in &seasons {
        let marker = if season.is_current() { " (current)" } else { "" };
        println!("  - {}{}", season.name().unwrap_or("?"), marker);
    }

    // First page of events of the current season
    let current = seasons.iter().find(|s| s.is_current());
    let mut query = Query::new();
    if let Some(season) = current {
        query = query.with_ref("season", season)?;
    }

    println!("\n--- Events (first page) ---");
    let page = Event::list_page(&client, query, 1).await?;
    println!("Found {} events (more: {})", page.len(), page.has_more);
    for event in &page {
        println!(
            "  - {} [{}]",
            event.name().unwrap_or("(unnamed)"),
            event.ggid().unwrap_or_default()
        );
    }

    // Drill into the first event
    if let Some(event) = page.items.first() {
        println!("\n--- Event Details ---");
        println!("Event: {}", event.name().unwrap_or("(unnamed)"));

        let roster = event.roster(&client, Query::new()).await?;
        let waitlisted = roster.iter().filter(|p| p.is_waitlisted()).count();
        println!("  Players: {} ({} waitlisted)", roster.len(), waitlisted);

        let rounds = event.rounds(&client, Query::new()).await?;
        println!("  Rounds: {}", rounds.len());

        for round in rounds.iter().take(3) {
            let tournaments = round.tournaments(&client, Query::new()).await?;
            let tee_sheet = round.tee_sheet(&client, Query::new()).await?;
            println!(
                "    {}. {} - {} tournaments, {} tee times",
                round.index().unwrap_or_default(),
                round.name().unwrap_or("(unnamed)"),
                tournaments.len(),
                tee_sheet.len()
            );
        }
    }

    println!("\nDone!");
    Ok(())
}
