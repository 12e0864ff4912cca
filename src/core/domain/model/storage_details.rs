//! Domain model for storage usage of one device.

use crate::core::domain::error::{BmcResult, ValidationError};
use serde::Deserialize;
use serde_json::Value;

/// Free/used/total byte counts for a storage device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDetails {
    name: String,
    free_bytes: u64,
    total_bytes: u64,
    used_bytes: u64,
}

/// Wire shape of the `sdcard` payload.
#[derive(Deserialize)]
struct RawSdCard {
    free: u64,
    total: u64,
    #[serde(rename = "use")]
    used: u64,
}

impl StorageDetails {
    /// Creates storage details. When `used_bytes` is not supplied it is
    /// derived as `total_bytes - free_bytes` (saturating at zero).
    pub fn new(
        name: impl Into<String>,
        free_bytes: u64,
        total_bytes: u64,
        used_bytes: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            free_bytes,
            total_bytes,
            used_bytes: used_bytes.unwrap_or_else(|| total_bytes.saturating_sub(free_bytes)),
        }
    }

    /// Parses the `sdcard` endpoint payload (`free`, `total`, `use`).
    pub(crate) fn from_sdcard_payload(payload: &Value) -> BmcResult<Self> {
        let raw: RawSdCard = serde_json::from_value(payload.clone()).map_err(|e| {
            ValidationError::Format(format!("invalid sdcard payload: {}", e))
        })?;
        Ok(Self::new("SD Card", raw.free, raw.total, Some(raw.used)))
    }

    /// The zero-valued placeholder returned when the caller opts into
    /// defaulting on failure.
    pub(crate) fn zeroed(name: impl Into<String>) -> Self {
        Self::new(name, 0, 0, Some(0))
    }

    /// The name of the storage device.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free space in bytes.
    pub fn free_bytes(&self) -> u64 {
        self.free_bytes
    }

    /// Total capacity in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Used space in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }
}
