//! Error types for Golf Genius API operations.

use thiserror::Error;

/// Errors that can occur during Golf Genius API operations.
#[derive(Debug, Error)]
pub enum GolfGeniusError {
    /// Configuration is missing or incomplete.
    #[error("Golf Genius configuration required: {0}")]
    ConfigMissing(String),

    /// A caller-supplied argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fewer (or more) parent identifiers than the path template needs.
    #[error("Path '{template}' expects {expected} parent identifier(s), got {given}")]
    Arity {
        template: String,
        expected: usize,
        given: usize,
    },

    /// Resource not found, either by a 404 or after an exhaustive scan.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// Response body does not have the shape of an API payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The API rejected the credential (401/403).
    #[error("Authentication failed: {message}")]
    Auth { message: String, status_code: u16 },

    /// The API rejected the request parameters (400/422).
    #[error("Validation failed: {message}")]
    Validation { message: String, status_code: u16 },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The API failed on its side (5xx).
    #[error("Golf Genius server error: {message}")]
    Server { message: String, status_code: u16 },

    /// Any other unsuccessful status.
    #[error("Golf Genius API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Coarse classification of a [`GolfGeniusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    NotFound,
    InvalidArgument,
    MalformedResponse,
    Auth,
    Validation,
    RateLimit,
    Server,
    Connection,
}

impl GolfGeniusError {
    /// Shorthand for a `NotFound` on a named resource.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Shorthand for an `InvalidArgument`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing(_) | Self::UrlError(_) => ErrorKind::Config,
            Self::InvalidArgument(_) | Self::Arity { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedResponse(_) | Self::ParseError(_) => ErrorKind::MalformedResponse,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::Server { .. } | Self::ApiError { .. } => ErrorKind::Server,
            Self::Connection(_) => ErrorKind::Connection,
        }
    }

    /// True when the resource is definitely absent.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// True when the outcome of a lookup could not be determined
    /// (bad payload or a transport failure), as opposed to a clean miss.
    pub fn is_indeterminate(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::InvalidArgument | ErrorKind::Config
        )
    }
}

/// Result type alias for Golf Genius operations.
pub type Result<T> = core::result::Result<T, GolfGeniusError>;
