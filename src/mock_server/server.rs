//! Mock Golf Genius API server.
//!
//! Provides an axum-based HTTP server that simulates the Golf Genius API v2.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Golf Genius API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL as the client's base URL; the API key becomes the first
    /// path segment.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        state.seasons = scenario.seasons;
        state.categories = scenario.categories;
        state.events = scenario.events;
        state.master_roster = scenario.master_roster;

        for (directory, event_ids) in scenario.directories {
            let ids: Vec<&str> = event_ids.iter().map(String::as_str).collect();
            state = state.with_directory(directory, &ids);
        }

        state.rosters.extend(scenario.rosters);
        state.rounds.extend(scenario.rounds);
        state.tournaments.extend(scenario.tournaments);
        state.tee_sheets.extend(scenario.tee_sheets);
        state.courses.extend(scenario.courses);
        state.divisions.extend(scenario.divisions);

        state
    }

    /// Create the axum router with all routes.
    pub fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Catalog routes
            .route("/:api_key/seasons", get(handlers::list_seasons))
            .route("/:api_key/categories", get(handlers::list_categories))
            .route("/:api_key/directories", get(handlers::list_directories))
            .route(
                "/:api_key/directories/:directory_id/events",
                get(handlers::list_directory_events),
            )
            // Event routes
            .route("/:api_key/events", get(handlers::list_events))
            .route("/:api_key/events/:event_id/courses", get(handlers::list_courses))
            .route(
                "/:api_key/events/:event_id/divisions",
                get(handlers::list_divisions),
            )
            // Roster routes
            .route("/:api_key/events/:event_id/roster", get(handlers::list_roster))
            .route("/:api_key/master_roster", get(handlers::list_master_roster))
            // Round routes
            .route("/:api_key/events/:event_id/rounds", get(handlers::list_rounds))
            .route(
                "/:api_key/events/:event_id/rounds/:round_id/tournaments",
                get(handlers::list_tournaments),
            )
            .route(
                "/:api_key/events/:event_id/rounds/:round_id/tee_sheet",
                get(handlers::get_tee_sheet),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
