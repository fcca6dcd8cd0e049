//! Mock Golf Genius API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Golf
//! Genius API v2 for integration and end-to-end testing. Unlike wiremock,
//! which mocks at the HTTP level per test, this server keeps state across
//! requests and implements real paging, the archived event partition and
//! the nested event resources.
//!
//! # Example
//!
//! ```ignore
//! use golfgenius::mock_server::MockServer;
//! use golfgenius::{Config, Event, Get, GolfGeniusClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GolfGeniusClient::new(
//!         Config::default().with_api_key("test-key").with_base_url(server.url()),
//!     )
//!     .unwrap();
//!
//!     // Server comes with default fixtures
//!     let event = Event::get(&client, &"event_001").await.unwrap();
//!     assert_eq!(event.name(), Some("Event 1"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, ACTIVE_EVENT_COUNT, ROSTER_SIZE};
pub use server::MockServer;
pub use state::{MockState, EVENTS_PER_PAGE, ROSTER_PER_PAGE};
