use crate::core::domain::error::{BmcResult, ValidationError};
use std::fmt;

/// A validated BMC password.
///
/// Boards ship with firmware-assigned credentials, so the only rule is
/// non-emptiness. The `Debug` and `Display` impls redact the value to
/// keep it out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BmcPassword(String);

impl BmcPassword {
    /// Creates a new `BmcPassword`, validating the value.
    pub fn new(password: impl Into<String>) -> BmcResult<Self> {
        let password = password.into();
        validate_password(&password)?;
        Ok(Self(password))
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(password: String) -> Self {
        Self(password)
    }

    /// Returns the password as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BmcPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BmcPassword(***)")
    }
}

impl fmt::Display for BmcPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

pub(crate) fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "password".to_string(),
            message: "Password cannot be empty".to_string(),
        });
    }

    Ok(())
}
