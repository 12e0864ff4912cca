//! Domain model for the `info` endpoint: network interfaces and
//! storage devices.

use crate::core::domain::error::{BmcResult, ValidationError};
use crate::core::domain::model::interface_details::InterfaceDetails;
use crate::core::domain::model::storage_details::StorageDetails;
use serde::Deserialize;
use serde_json::Value;

/// Aggregate of the board's network interfaces and storage devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    interfaces: Vec<InterfaceDetails>,
    storage: Vec<StorageDetails>,
}

#[derive(Deserialize)]
struct RawInfo {
    ip: Vec<Value>,
    storage: Vec<RawStorageEntry>,
}

/// Storage entries in the `info` payload use different key names than
/// the `sdcard` endpoint and omit the used count.
#[derive(Deserialize)]
struct RawStorageEntry {
    name: String,
    bytes_free: u64,
    total_bytes: u64,
}

impl Info {
    pub(crate) fn from_payload(payload: &Value) -> BmcResult<Self> {
        let raw: RawInfo = serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::Format(format!("invalid info payload: {}", e)))?;

        let interfaces = raw
            .ip
            .iter()
            .map(InterfaceDetails::from_payload)
            .collect::<BmcResult<Vec<_>>>()?;

        let storage = raw
            .storage
            .into_iter()
            .map(|entry| StorageDetails::new(entry.name, entry.bytes_free, entry.total_bytes, None))
            .collect();

        Ok(Self {
            interfaces,
            storage,
        })
    }

    /// The board's network interfaces.
    pub fn interfaces(&self) -> &[InterfaceDetails] {
        &self.interfaces
    }

    /// The board's storage devices.
    pub fn storage(&self) -> &[StorageDetails] {
        &self.storage
    }
}
