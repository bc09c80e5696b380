//! # LLDP Discovery Module
//!
//! Receive side of the daemon. A [`DiscoveryListener`] reads frames from a
//! [`CaptureSource`](crate::transport::CaptureSource), keeps the LLDP ones
//! and pushes their SysName and SysDescription onto a bounded channel.
//!
//! ```ignore
//! let capture = PacketCapture::open(&interface, ETHER_TYPE_LLDP)?;
//! let (tx, mut rx) = mpsc::channel(16);
//! let (cancel, signal) = cancel_pair();
//! DiscoveryListener::new(&interface.name, capture).start(tx, signal);
//! while let Some(neighbor) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::*;
