//! Domain model for the `other` endpoint.

use crate::core::domain::error::{BmcResult, ValidationError};
use crate::core::domain::model::about::parse_buildtime;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

/// Secondary board identity as reported by the `other` endpoint.
///
/// Unlike [`About`](crate::About), the firmware is known to omit `mac`
/// and `version` from this payload; those fields deserialize to `None`
/// rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Other {
    api: String,
    build_version: String,
    buildroot: String,
    buildtime: NaiveDateTime,
    ip: std::net::Ipv4Addr,
    mac: Option<String>,
    version: Option<String>,
}

#[derive(Deserialize)]
struct RawOther {
    api: String,
    build_version: String,
    buildroot: String,
    buildtime: String,
    ip: String,
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl Other {
    pub(crate) fn from_payload(payload: &Value) -> BmcResult<Self> {
        let raw: RawOther = serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::Format(format!("invalid other payload: {}", e)))?;

        let ip = raw.ip.parse().map_err(|_| ValidationError::Field {
            field: "ip".to_string(),
            message: format!("'{}' is not a valid IPv4 address", raw.ip),
        })?;

        Ok(Self {
            api: raw.api,
            build_version: raw.build_version,
            buildroot: raw.buildroot,
            buildtime: parse_buildtime(&raw.buildtime)?,
            ip,
            mac: raw.mac,
            version: raw.version,
        })
    }

    /// The BMC API version.
    pub fn api(&self) -> &str {
        &self.api
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

    /// The board's IPv4 address.
    pub fn ip(&self) -> std::net::Ipv4Addr {
        self.ip
    }

    /// The board's MAC address, when the firmware reports one.
    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    /// The firmware version, when the firmware reports one here.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
