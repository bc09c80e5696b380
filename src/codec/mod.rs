//! # LLDP Codec Module
//!
//! Encoding and decoding of LLDP data units and the ethernet frames carrying
//! them.
//!
//! ## Key Types
//!
//! - [`Tlv`] - 2 byte header (7 bit type, 9 bit length) plus value
//! - [`Lldpdu`] - Chassis ID, Port ID, TTL and the optional description TLVs
//! - [`EthernetFrame`] - Ethernet II framing, optionally 802.1Q tagged
//! - [`LldpEncode`] / [`LldpDecode`] - Traits for wire encoding
//!
//! ## Example
//!
//! ```ignore
//! use lldpd::codec::build_frame;
//!
//! let frame = build_frame(&identity, &interface, Duration::from_secs(2))?;
//! ```

pub mod builder;
pub mod ethernet;
pub mod lldpdu;
pub mod tlv;
pub mod traits;

pub use builder::{build, build_frame, lldpdu, ttl_for};
pub use ethernet::EthernetFrame;
pub use lldpdu::{ChassisId, Lldpdu, PortId};
pub use tlv::{Tlv, TlvReader, TlvRef};
pub use traits::{LldpDecode, LldpEncode};
