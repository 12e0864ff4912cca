//! The HTTP session: one wire call per invocation, no caching, no
//! retries.

use crate::core::domain::command::Command;
use crate::core::domain::config::ClientConfig;
use crate::core::domain::error::{BmcError, BmcResult, ValidationError};
use crate::core::domain::model::bmc_connection::{BmcConnection, Protocol};
use crate::core::infrastructure::envelope;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Session to one cluster's BMC.
///
/// Owns the configured HTTP client and the connection parameters.
/// Performs exactly one network round trip per call; classifying the
/// response shape is left to [`envelope`] and the typed models.
pub(crate) struct Session {
    http_client: Client,
    connection: Arc<BmcConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl Session {
    /// Builds the HTTP client from the connection parameters and config.
    pub(crate) fn new(connection: BmcConnection, config: &ClientConfig) -> BmcResult<Self> {
        let mut builder =
            Client::builder().danger_accept_invalid_certs(connection.accepts_invalid_certs());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| BmcError::Transport(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(limit) => {
                let per_second = NonZeroU32::new(limit.requests_per_second).ok_or_else(|| {
                    ValidationError::Field {
                        field: "requests_per_second".to_string(),
                        message: "Rate limit must be at least 1 request per second".to_string(),
                    }
                })?;
                let burst = NonZeroU32::new(limit.burst_size).ok_or_else(|| {
                    ValidationError::Field {
                        field: "burst_size".to_string(),
                        message: "Burst size must be at least 1".to_string(),
                    }
                })?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub(crate) fn connection(&self) -> &BmcConnection {
        &self.connection
    }

    /// Builds the query for `command` under this session's protocol and
    /// performs it.
    pub(crate) async fn execute(&self, command: &Command) -> BmcResult<Value> {
        self.request(&command.query(self.connection.protocol()))
            .await
    }

    /// Performs one API request and returns the unwrapped payload.
    ///
    /// `query` is the relative URL below `/api/`, including the query
    /// string. A non-200 status or connection failure is a transport
    /// error; an undecodable or mis-shaped body is a protocol error.
    pub(crate) async fn request(&self, query: &str) -> BmcResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.connection.url().join(&format!("api/{}", query));
        debug!(%url, "issuing BMC request");

        let request = match self.connection.protocol() {
            Protocol::Current => {
                let mut request = self.http_client.get(&url);
                if let (Some(username), Some(password)) =
                    (self.connection.username(), self.connection.password())
                {
                    request = request.basic_auth(username.as_str(), Some(password.as_str()));
                }
                request
            }
            // First-generation firmware only answered unauthenticated POST.
            Protocol::Legacy => self.http_client.post(&url),
        };

        let response = request
            .send()
            .await
            .map_err(|e| BmcError::Transport(format!("HTTP request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            return Err(BmcError::Transport(format!(
                "Non-200 response received: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BmcError::Protocol(format!("response body is not valid JSON: {}", e)))?;

        envelope::unwrap(body)
    }

    /// Fetches an absolute URL as plain text, without authentication.
    ///
    /// Used for the firmware release feed, which lives outside the
    /// board's API.
    pub(crate) async fn fetch_text(&self, url: &str) -> BmcResult<String> {
        debug!(%url, "fetching external resource");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| BmcError::Transport(format!("HTTP request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            return Err(BmcError::Transport(format!(
                "Non-200 response received: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| BmcError::Transport(format!("failed to read response body: {}", e)))
    }
}
