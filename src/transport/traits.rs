use crate::error::Result;
use crate::model::InterfaceHandle;
use std::future::Future;

/// Trait representing a link-layer transmit path scoped to one interface.
/// Implemented by the raw socket transport and by fakes in tests.
pub trait LinkTransport: Send + 'static {
    /// Open a socket on `interface`. Receives nothing until bound.
    fn open(&mut self, interface: &InterfaceHandle) -> Result<()>;

    /// Set the EtherType filter and, best effort, the transmit priority.
    fn bind(&mut self, ether_type: u16, priority: Option<i32>) -> Result<()>;

    /// Transmit exactly one frame. Fails with `NotBound` before `bind`.
    fn write(&mut self, frame: &[u8]) -> impl Future<Output = Result<usize>> + Send;

    /// Release the socket. Idempotent.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Ethernet,
    Other(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    pub link_type: LinkType,
    pub data: Vec<u8>,
}

impl CapturedPacket {
    pub fn ethernet(data: Vec<u8>) -> Self {
        CapturedPacket {
            link_type: LinkType::Ethernet,
            data,
        }
    }
}

/// A promiscuous packet source on one interface.
///
/// `next_packet` yields `Ok(None)` once the underlying handle is gone; the
/// source is then restarted with `reopen`, never reused in place.
pub trait CaptureSource: Send + 'static {
    fn next_packet(&mut self) -> impl Future<Output = Result<Option<CapturedPacket>>> + Send;

    fn reopen(&mut self) -> Result<()>;

    fn close(&mut self);
}
