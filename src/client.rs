//! Golf Genius API client.
//!
//! Low-level HTTP client that turns [`Transport::execute`] calls into
//! requests. Resource semantics live in the resolver and the model types.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::{self, Config};
use crate::error::{GolfGeniusError, Result};
use crate::transport::{Method, QueryParams, Transport};

const USER_AGENT: &str = concat!("golfgenius/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`Transport`] for the Golf Genius API v2.
///
/// Requests go to `{base_url}/{api_key}{path}`; the key is part of the path,
/// not a header. This struct is cheaply cloneable; clones reference the same
/// underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use golfgenius::{Config, GolfGeniusClient};
///
/// # fn example() -> golfgenius::Result<()> {
/// // Create from environment variables
/// let client = GolfGeniusClient::from_env()?;
///
/// // Or configure manually
/// let client = GolfGeniusClient::new(Config::default().with_api_key("your-api-key"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GolfGeniusClient {
    http: Client,
    base_url: Arc<Url>,
    config: Arc<Config>,
}

impl std::fmt::Debug for GolfGeniusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GolfGeniusClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GolfGeniusClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GOLF_GENIUS_API_KEY` for authentication and optionally
    /// `GOLF_GENIUS_BASE_URL` and `GOLF_GENIUS_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `GOLF_GENIUS_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env();
        if config.api_key.is_none() {
            return Err(GolfGeniusError::ConfigMissing(
                "GOLF_GENIUS_API_KEY environment variable not set".to_string(),
            ));
        }
        Self::new(config)
    }

    /// Create a client from the process-wide default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn with_default_config() -> Result<Self> {
        Self::new(Config::clone(&config::current()))
    }

    /// Create a new client.
    ///
    /// A config without an API key is accepted; every call must then carry
    /// its own credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .build()
            .map_err(GolfGeniusError::Connection)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            config: Arc::new(config),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for `path` under `credential`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url_for(&self, credential: &str, path: &str) -> Result<Url> {
        let relative = format!(
            "{}/{}",
            urlencoding::encode(credential),
            path.trim_start_matches('/')
        );
        Ok(self.base_url.join(&relative)?)
    }

    /// Check response status and convert errors.
    async fn check_response(path: &str, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(GolfGeniusError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        let status_code = status.as_u16();
        Err(match status_code {
            401 | 403 => GolfGeniusError::Auth {
                message,
                status_code,
            },
            404 => GolfGeniusError::not_found("resource", path),
            400 | 422 => GolfGeniusError::Validation {
                message,
                status_code,
            },
            500..=599 => GolfGeniusError::Server {
                message,
                status_code,
            },
            _ => GolfGeniusError::ApiError {
                message,
                status_code: Some(status_code),
            },
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<JsonValue>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

#[async_trait]
impl Transport for GolfGeniusClient {
    #[tracing::instrument(skip(self, method, query, credential), fields(method = method.as_str()))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        credential: Option<&str>,
    ) -> Result<JsonValue> {
        let credential = credential
            .map(str::to_string)
            .or_else(|| self.default_credential())
            .ok_or_else(|| {
                GolfGeniusError::ConfigMissing(
                    "no API key given and none configured (set GOLF_GENIUS_API_KEY)".to_string(),
                )
            })?;
        let url = self.url_for(&credential, path)?;

        let request = match method {
            Method::Get => self.http.get(url),
        };
        let response = request.query(query).send().await?;
        let response = Self::check_response(path, response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            GolfGeniusError::MalformedResponse(format!("{path}: response is not JSON ({e})"))
        })
    }

    fn default_credential(&self) -> Option<String> {
        self.config.api_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(key: Option<&str>) -> GolfGeniusClient {
        let mut config = Config::default();
        config.api_key = key.map(str::to_string);
        GolfGeniusClient::new(config).unwrap()
    }

    #[test]
    fn test_client_debug() {
        let client = client(Some("test-token"));
        let debug = format!("{:?}", client);
        assert!(debug.contains("GolfGeniusClient"));
        assert!(debug.contains("base_url"));
        // Key should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 =
            GolfGeniusClient::new(Config::default().with_base_url("https://example.com/api_v2"))
                .unwrap();
        let client2 =
            GolfGeniusClient::new(Config::default().with_base_url("https://example.com/api_v2/"))
                .unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_url_puts_credential_before_path() {
        let client = client(Some("k"));
        let url = client.url_for("abc123", "/events/e1/roster").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.golfgenius.com/api_v2/abc123/events/e1/roster"
        );
    }

    #[test]
    fn test_missing_credential_fails_before_request() {
        let client = client(None);
        let err = tokio_test::block_on(client.execute(
            Method::Get,
            "/seasons",
            &QueryParams::new(),
            None,
        ))
        .unwrap_err();
        assert!(matches!(err, GolfGeniusError::ConfigMissing(_)));
    }

    #[test]
    fn test_default_credential_comes_from_client_config() {
        assert_eq!(client(Some("own-key")).default_credential().as_deref(), Some("own-key"));
        assert_eq!(client(None).default_credential(), None);
    }
}
