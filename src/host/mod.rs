//! # Host Module
//!
//! What the daemon needs to know about, and do to, the host before it starts
//! sending: which interfaces to announce on, and silencing NIC firmware that
//! runs its own LLDP agent.

pub mod firmware;
pub mod interfaces;

pub use firmware::stop_firmware_lldp;
pub use interfaces::{SYS_CLASS_NET, interface_by_name, up_ethernet_interfaces};
