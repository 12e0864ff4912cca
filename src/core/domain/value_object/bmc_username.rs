use crate::core::domain::error::{BmcResult, ValidationError};
use std::fmt;

const MAX_USERNAME_LENGTH: usize = 64;

/// A validated BMC username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmcUsername(String);

impl BmcUsername {
    /// Creates a new `BmcUsername`, validating the value.
    pub fn new(username: impl Into<String>) -> BmcResult<Self> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self(username))
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(username: String) -> Self {
        Self(username)
    }

    /// Returns the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BmcUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }

    if value.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::ConstraintViolation(format!(
            "Username length exceeds maximum of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }

    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(ValidationError::Format(
            "Username cannot contain whitespace or control characters".to_string(),
        ));
    }

    Ok(())
}
