//! # Link Layer Transport Module
//!
//! Raw `AF_PACKET` sockets for sending LLDP frames and for promiscuous
//! capture of received ones. Linux only.

pub mod capture;
pub mod raw;
mod sys;
pub mod traits;

pub use capture::PacketCapture;
pub use raw::RawSocketTransport;
pub use traits::*;
