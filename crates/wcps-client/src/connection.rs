//! Blocking connection to a WCPS endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, instrument, warn};
use wcps_common::{WcpsError, WcpsResult};

use crate::config::ConnectionConfig;
use crate::response::WcpsResponse;
use crate::QUERY_FIELD;

/// Anything that can submit WCPS query text and hand back the server response.
pub trait QueryTransport {
    /// Submit `query` and wait for the response.
    ///
    /// Transport failures are returned as [`WcpsError::Transport`]; a response
    /// with a non-success status is still `Ok`.
    fn send(&self, query: &str) -> WcpsResult<WcpsResponse>;
}

/// Connection to a WCPS server endpoint.
///
/// Holds no per-query state and can be shared by any number of builders.
#[derive(Debug, Clone)]
pub struct Connection {
    endpoint: Url,
    client: Client,
}

impl Connection {
    /// Create a connection with default settings.
    ///
    /// TLS certificate verification is disabled, matching the default of
    /// [`ConnectionConfig`].
    pub fn new(endpoint: &str) -> WcpsResult<Self> {
        Self::from_config(&ConnectionConfig::new(endpoint))
    }

    /// Create a connection from a full configuration.
    pub fn from_config(config: &ConnectionConfig) -> WcpsResult<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;

        let mut builder =
            Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| WcpsError::Transport(format!("failed to create HTTP client: {}", e)))?;

        if config.accept_invalid_certs {
            debug!(endpoint = %endpoint, "TLS certificate verification disabled");
        }

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl QueryTransport for Connection {
    #[instrument(skip(self, query), fields(endpoint = %self.endpoint, query_len = query.len()))]
    fn send(&self, query: &str) -> WcpsResult<WcpsResponse> {
        if query.trim().is_empty() {
            return Err(WcpsError::EmptyQuery);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[(QUERY_FIELD, query)])
            .send()
            .map_err(|e| {
                warn!(error = %e, "WCPS request failed");
                WcpsError::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| {
            warn!(error = %e, status = status, "Failed to read WCPS response body");
            WcpsError::Transport(e.to_string())
        })?;

        if (200..300).contains(&status) {
            debug!(status = status, bytes = body.len(), "Received WCPS response");
        } else {
            warn!(status = status, bytes = body.len(), "WCPS server returned an error status");
        }

        Ok(WcpsResponse::new(status, body))
    }
}

fn parse_endpoint(endpoint: &str) -> WcpsResult<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(WcpsError::InvalidEndpoint("endpoint is empty".to_string()));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| WcpsError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(WcpsError::InvalidEndpoint(format!(
            "unsupported scheme '{}' in {}",
            other, endpoint
        ))),
    }
}
