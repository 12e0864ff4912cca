//! Domain model for one network interface's identity.

use crate::core::domain::error::{BmcResult, ValidationError};
use serde::Deserialize;
use serde_json::Value;
use std::net::Ipv4Addr;

/// One network interface as reported by the `info` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDetails {
    device: String,
    ip: Ipv4Addr,
    mac: String,
}

#[derive(Deserialize)]
struct RawInterface {
    device: String,
    ip: String,
    mac: String,
}

impl InterfaceDetails {
    pub(crate) fn from_payload(payload: &Value) -> BmcResult<Self> {
        let raw: RawInterface = serde_json::from_value(payload.clone()).map_err(|e| {
            ValidationError::Format(format!("invalid interface payload: {}", e))
        })?;

        let ip = raw.ip.parse::<Ipv4Addr>().map_err(|_| ValidationError::Field {
            field: "ip".to_string(),
            message: format!("'{}' is not a valid IPv4 address", raw.ip),
        })?;

        // The firmware pads MAC addresses with trailing whitespace.
        let mac = raw.mac.trim().to_string();
        if mac.is_empty() {
            return Err(ValidationError::Field {
                field: "mac".to_string(),
                message: "MAC address cannot be empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            device: raw.device,
            ip,
            mac,
        })
    }

    /// The interface device name (e.g. `eth0`).
    pub fn device(&self) -> &str {
        &self.device
    }

    /// The interface's IPv4 address.
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// The interface's MAC address.
    pub fn mac(&self) -> &str {
        &self.mac
    }
}
