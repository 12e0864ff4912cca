use crate::core::domain::error::{BmcResult, ValidationError};
use std::fmt;
use std::net::Ipv4Addr;

const MAX_HOSTNAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// A validated BMC host address.
///
/// Accepts either an IPv4 literal (the common case for a board on the
/// local network) or an RFC 1035 hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmcHost(String);

impl BmcHost {
    /// Creates a new `BmcHost`, validating the address.
    pub fn new(host: impl Into<String>) -> BmcResult<Self> {
        let host = host.into();
        validate_host(&host)?;
        Ok(Self(host))
    }

    /// Creates a `BmcHost` without validation. Test-only escape hatch.
    #[cfg(test)]
    pub(crate) fn new_unchecked(host: String) -> Self {
        Self(host)
    }

    /// Returns the host as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BmcHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn validate_host(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "host".to_string(),
            message: "Host cannot be empty".to_string(),
        });
    }

    // An IPv4 literal is always acceptable as-is.
    if value.parse::<Ipv4Addr>().is_ok() {
        return Ok(());
    }

    if value.len() > MAX_HOSTNAME_LENGTH {
        return Err(ValidationError::ConstraintViolation(format!(
            "Host length exceeds maximum of {} characters",
            MAX_HOSTNAME_LENGTH
        )));
    }

    for label in value.split('.') {
        validate_label(label)?;
    }

    Ok(())
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        return Err(ValidationError::Format(format!(
            "Label must be between 1 and {} characters",
            MAX_LABEL_LENGTH
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::Format(
            "Label can only contain alphanumeric characters and hyphens".to_string(),
        ));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::Format(
            "Label cannot start or end with hyphen".to_string(),
        ));
    }

    Ok(())
}
