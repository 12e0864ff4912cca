use crate::core::domain::error::{BmcResult, ValidationError};
use std::fmt;

/// A validated base URL for the BMC HTTP API.
///
/// Always normalized to end without a trailing slash, so joining a
/// relative query is a plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmcUrl(String);

impl BmcUrl {
    /// Builds the base URL `{scheme}://{host}` for the given scheme.
    pub fn new(scheme: &str, host: &str) -> BmcResult<Self> {
        let url = format!("{}://{}", scheme, host);
        validate_url(&url)?;
        Ok(Self(url))
    }

    /// Creates a `BmcUrl` without validation. Test-only escape hatch for
    /// pointing the client at a mock server.
    #[cfg(test)]
    pub(crate) fn new_unchecked(url: String) -> Self {
        Self(url.trim_end_matches('/').to_string())
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a relative path (including any query string) onto the base.
    pub fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.0, relative.trim_start_matches('/'))
    }
}

impl fmt::Display for BmcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn validate_url(value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme '{}'. Must be one of: http, https",
            scheme
        ))),
    }
}
