pub mod about;
pub mod bmc_connection;
pub mod info;
pub mod interface_details;
pub mod node;
pub mod other;
pub mod storage_details;
pub mod usb_mode;
