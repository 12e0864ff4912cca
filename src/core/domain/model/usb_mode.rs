//! Domain models for USB multiplexer routing.

use crate::core::domain::command::wire_index_to_slot;
use crate::core::domain::error::{BmcResult, ValidationError};
use crate::core::domain::model::node::Node;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Which side of the USB link a node's port is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbModeKind {
    /// The node acts as USB host.
    Host,
    /// The node acts as USB device.
    Device,
}

impl UsbModeKind {
    fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_lowercase().as_str() {
            "host" => Ok(Self::Host),
            "device" => Ok(Self::Device),
            other => Err(ValidationError::Field {
                field: "mode".to_string(),
                message: format!("'{}' is not a USB mode", other),
            }),
        }
    }
}

impl fmt::Display for UsbModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Device => f.write_str("device"),
        }
    }
}

/// Which bus a node's USB port is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbRoute {
    /// The BMC-internal bus.
    Bmc,
    /// The external USB-A connector.
    UsbA,
}

impl UsbRoute {
    fn parse(value: &str) -> Result<Self, ValidationError> {
        // The firmware writes "USB-A"; fold case and drop the dash.
        match value.to_ascii_lowercase().replace('-', "").as_str() {
            "bmc" => Ok(Self::Bmc),
            "usba" => Ok(Self::UsbA),
            other => Err(ValidationError::Field {
                field: "route".to_string(),
                message: format!("'{}' is not a USB route", other),
            }),
        }
    }
}

impl fmt::Display for UsbRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bmc => f.write_str("bmc"),
            Self::UsbA => f.write_str("usb-a"),
        }
    }
}

/// The USB multiplexer state reported by the `usb` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbMode {
    node: Node,
    mode: UsbModeKind,
    route: UsbRoute,
}

#[derive(Deserialize)]
struct RawUsbMode {
    mode: String,
    node: Value,
    #[serde(default)]
    route: Option<String>,
}

impl UsbMode {
    pub(crate) fn new(node: Node, mode: UsbModeKind, route: UsbRoute) -> Self {
        Self { node, mode, route }
    }

    /// Parses the `usb` endpoint payload, resolving the payload's node
    /// reference against the cached node set.
    ///
    /// The node field has carried two shapes across firmware versions: a
    /// display string such as `"Node 3"` (1-based) and a bare zero-based
    /// index. Both resolve to the same physical slot.
    pub(crate) fn from_payload(payload: &Value, nodes: &[Node]) -> BmcResult<Self> {
        let raw: RawUsbMode = serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::Format(format!("invalid usb payload: {}", e)))?;

        let slot = resolve_slot(&raw.node)?;
        let node = nodes
            .iter()
            .find(|node| node.slot() == slot)
            .cloned()
            .ok_or_else(|| {
                ValidationError::ConstraintViolation(format!(
                    "usb payload references slot {} but the cluster has {} nodes",
                    slot,
                    nodes.len()
                ))
            })?;

        let route = match raw.route {
            Some(route) => UsbRoute::parse(&route)?,
            // Older firmware omits the route; the mux idles on the BMC bus.
            None => UsbRoute::Bmc,
        };

        Ok(Self {
            node,
            mode: UsbModeKind::parse(&raw.mode)?,
            route,
        })
    }

    /// The node the USB port is currently routed to.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Host or device side.
    pub fn mode(&self) -> UsbModeKind {
        self.mode
    }

    /// BMC bus or external USB-A.
    pub fn route(&self) -> UsbRoute {
        self.route
    }
}

fn resolve_slot(node: &Value) -> Result<usize, ValidationError> {
    let invalid = || ValidationError::Field {
        field: "node".to_string(),
        message: format!("'{}' is not a node reference", node),
    };

    match node {
        Value::String(s) => match s.strip_prefix("Node ") {
            // Display form carries the 1-based slot number directly.
            Some(n) => n.trim().parse::<usize>().map_err(|_| invalid()),
            None => {
                let index = s.trim().parse::<usize>().map_err(|_| invalid())?;
                Ok(wire_index_to_slot(index))
            }
        },
        Value::Number(n) => {
            let index = n.as_u64().ok_or_else(invalid)? as usize;
            Ok(wire_index_to_slot(index))
        }
        _ => Err(invalid()),
    }
}

/// One of the eight mode/route/flash combinations accepted by the
/// `set usb` endpoint. The discriminants are the literal wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UsbConfig {
    /// Node as host on the USB-A connector.
    HostUsbA = 0,
    /// Node as device on the USB-A connector.
    DeviceUsbA = 1,
    /// Node as host on USB-A with the flash pin held.
    FlashHostUsbA = 2,
    /// Node as device on USB-A with the flash pin held.
    FlashDeviceUsbA = 3,
    /// Node as host on the BMC bus.
    HostBmc = 4,
    /// Node as device on the BMC bus.
    DeviceBmc = 5,
    /// Node as host on the BMC bus with the flash pin held.
    FlashHostBmc = 6,
    /// Node as device on the BMC bus with the flash pin held.
    FlashDeviceBmc = 7,
}

impl UsbConfig {
    /// The wire code sent as the `mode` query parameter.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for UsbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HostUsbA => "host on usb-a",
            Self::DeviceUsbA => "device on usb-a",
            Self::FlashHostUsbA => "flash host on usb-a",
            Self::FlashDeviceUsbA => "flash device on usb-a",
            Self::HostBmc => "host on bmc",
            Self::DeviceBmc => "device on bmc",
            Self::FlashHostBmc => "flash host on bmc",
            Self::FlashDeviceBmc => "flash device on bmc",
        };
        f.write_str(label)
    }
}
