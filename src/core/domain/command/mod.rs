//! Pure mapping from logical operations to relative query-string URLs.
//!
//! Every endpoint the client can hit is a variant here; nothing in this
//! module performs I/O. Node slots are 1-based throughout the crate;
//! the zero-based conversion some endpoints require on the wire happens
//! here and nowhere else.

use crate::core::domain::model::bmc_connection::Protocol;
use crate::core::domain::model::usb_mode::UsbConfig;

/// Converts a 1-based model slot to the zero-based wire index.
pub(crate) fn slot_to_wire_index(slot: usize) -> usize {
    slot.saturating_sub(1)
}

/// Converts a zero-based wire index to the 1-based model slot.
pub(crate) fn wire_index_to_slot(index: usize) -> usize {
    index + 1
}

/// One logical BMC operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    GetPower,
    /// One `&{name}={0|1}` pair per affected node, in order.
    SetPower { levels: Vec<(String, bool)> },
    GetUsb,
    SetUsb { slot: usize, config: UsbConfig },
    GetStorage,
    GetAbout,
    GetInfo,
    GetOther,
    NetworkReset,
    Reload,
    Reboot,
    /// Node reset carries the slot as-is; the zero-based family below
    /// does not.
    ResetNode { slot: usize },
    ClearUsbBoot { slot: usize },
    NodeToMsd { slot: usize },
    UsbBoot { slot: usize },
}

impl Command {
    /// The relative URL for this operation under the given protocol.
    pub(crate) fn query(&self, protocol: Protocol) -> String {
        match self {
            Self::GetPower => "bmc?opt=get&type=power".to_string(),
            Self::SetPower { levels } => {
                let mut query = String::from("bmc?opt=set&type=power");
                for (name, on) in levels {
                    query.push_str(&format!("&{}={}", name, u8::from(*on)));
                }
                query
            }
            Self::GetUsb => "bmc?opt=get&type=usb".to_string(),
            Self::SetUsb { slot, config } => format!(
                "bmc?opt=set&type=usb&mode={}&node={}",
                config.code(),
                slot_to_wire_index(*slot)
            ),
            Self::GetStorage => "bmc?opt=get&type=sdcard".to_string(),
            Self::GetAbout => "bmc?opt=get&type=about".to_string(),
            Self::GetInfo => "bmc?opt=get&type=info".to_string(),
            Self::GetOther => "bmc?opt=get&type=other".to_string(),
            Self::NetworkReset => match protocol {
                Protocol::Current => "bmc?opt=set&type=network".to_string(),
                Protocol::Legacy => "bmc?opt=set&type=network&cmd=reset".to_string(),
            },
            Self::Reload => "bmc?opt=set&type=reload".to_string(),
            Self::Reboot => "bmc?opt=set&type=reboot".to_string(),
            Self::ResetNode { slot } => format!("bmc?opt=set&type=reset&node={}", slot),
            Self::ClearUsbBoot { slot } => format!(
                "bmc?opt=set&type=clear_usb_boot&node={}",
                slot_to_wire_index(*slot)
            ),
            Self::NodeToMsd { slot } => format!(
                "bmc?opt=set&type=node_to_msd&node={}",
                slot_to_wire_index(*slot)
            ),
            Self::UsbBoot { slot } => {
                format!("bmc?opt=set&type=usb_boot&node={}", slot_to_wire_index(*slot))
            }
        }
    }
}
