//! Client configuration.
//!
//! A [`Config`] is an immutable snapshot. The process-wide default is created
//! lazily from the environment and can only be swapped through [`configure`]
//! or [`reset`]; calls read a cloned `Arc` and never hold the lock.

use std::env;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.golfgenius.com/api_v2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const API_KEY_VAR: &str = "GOLF_GENIUS_API_KEY";
const BASE_URL_VAR: &str = "GOLF_GENIUS_BASE_URL";
const TIMEOUT_VAR: &str = "GOLF_GENIUS_TIMEOUT_SECS";

static DEFAULT: OnceLock<RwLock<Arc<Config>>> = OnceLock::new();

/// Connection settings for the Golf Genius API.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// API key used when a call does not override it.
    pub api_key: Option<String>,
    /// Base URL, without the API key segment.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// Uses `GOLF_GENIUS_API_KEY`, `GOLF_GENIUS_BASE_URL` and
    /// `GOLF_GENIUS_TIMEOUT_SECS`; unset or unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty());
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = env::var(TIMEOUT_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            api_key,
            base_url,
            timeout,
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn slot() -> &'static RwLock<Arc<Config>> {
    DEFAULT.get_or_init(|| RwLock::new(Arc::new(Config::from_env())))
}

/// Snapshot of the process-wide default configuration.
pub fn current() -> Arc<Config> {
    match slot().read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

/// Replace the process-wide default configuration.
///
/// Snapshots already handed out keep their old values.
pub fn configure(config: Config) {
    let next = Arc::new(config);
    match slot().write() {
        Ok(mut guard) => *guard = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
    tracing::debug!("Golf Genius default configuration replaced");
}

/// Re-read the process-wide default from the environment.
pub fn reset() {
    configure(Config::from_env());
}
