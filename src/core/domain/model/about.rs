//! Domain model for the `about` endpoint: installed firmware identity.

use crate::core::domain::error::{BmcResult, ValidationError};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

/// Installed firmware identity as reported by the `about` endpoint.
///
/// Every field is required; a missing key is a validation error. The
/// `version` string is what [`Cluster::update_available`] compares
/// against the published release feed.
///
/// [`Cluster::update_available`]: crate::Cluster::update_available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct About {
    api: String,
    version: String,
    build_version: String,
    buildroot: String,
    buildtime: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawAbout {
    api: String,
    version: String,
    build_version: String,
    buildroot: String,
    buildtime: String,
}

pub(crate) fn parse_buildtime(value: &str) -> Result<NaiveDateTime, ValidationError> {
    // The firmware has emitted both ISO-8601 forms over its history.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ValidationError::Field {
            field: "buildtime".to_string(),
            message: format!("'{}' is not a valid build timestamp", value),
        })
}

impl About {
    pub(crate) fn from_payload(payload: &Value) -> BmcResult<Self> {
        let raw: RawAbout = serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::Format(format!("invalid about payload: {}", e)))?;

        Ok(Self {
            api: raw.api,
            version: raw.version,
            build_version: raw.build_version,
            buildroot: raw.buildroot,
            buildtime: parse_buildtime(&raw.buildtime)?,
        })
    }

    /// The BMC API version.
    pub fn api(&self) -> &str {
        &self.api
    }

    /// The installed firmware version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The firmware build identifier.
    pub fn build_version(&self) -> &str {
        &self.build_version
    }

    /// The buildroot release the firmware was built from.
    pub fn buildroot(&self) -> &str {
        &self.buildroot
    }

    /// When the firmware was built.
    pub fn buildtime(&self) -> NaiveDateTime {
        self.buildtime
    }
}
