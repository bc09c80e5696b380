use super::sys;
use super::traits::{CaptureSource, CapturedPacket, LinkType};
use crate::error::{LldpError, Result};
use crate::model::InterfaceHandle;
use crate::protocol::ARPHRD_ETHER;
use log::{debug, warn};
use socket2::{Domain, Protocol, Socket, Type};
use std::os::fd::AsRawFd;
use tokio::io::unix::AsyncFd;

/// Largest frame we expect to capture.
pub const SNAPLEN: usize = 65536;

/// Promiscuous `AF_PACKET` capture filtered to one EtherType.
pub struct PacketCapture {
    interface: InterfaceHandle,
    ether_type: u16,
    fd: Option<AsyncFd<Socket>>,
    buf: Vec<u8>,
}

impl PacketCapture {
    pub fn open(interface: &InterfaceHandle, ether_type: u16) -> Result<Self> {
        let mut capture = PacketCapture {
            interface: interface.clone(),
            ether_type,
            fd: None,
            buf: vec![0u8; SNAPLEN],
        };
        capture.reopen()?;
        Ok(capture)
    }

    fn open_socket(&self) -> std::io::Result<AsyncFd<Socket>> {
        // The kernel only hands us frames with our EtherType, the equivalent
        // of a "ether proto 0x88cc" filter.
        let socket = Socket::new(
            Domain::PACKET,
            Type::RAW,
            Some(Protocol::from(sys::protocol(self.ether_type))),
        )?;
        socket.set_nonblocking(true)?;
        sys::bind_link_layer(socket.as_raw_fd(), self.interface.index, self.ether_type)?;
        sys::add_promiscuous_membership(socket.as_raw_fd(), self.interface.index)?;
        AsyncFd::new(socket)
    }

    pub fn is_open(&self) -> bool {
        self.fd.is_some()
    }
}

impl CaptureSource for PacketCapture {
    async fn next_packet(&mut self) -> Result<Option<CapturedPacket>> {
        let Some(fd) = &self.fd else {
            return Ok(None);
        };
        let buf = &mut self.buf;
        let received = loop {
            let mut guard = fd.readable().await.map_err(LldpError::CaptureRead)?;
            match guard.try_io(|inner| sys::recv_frame(inner.as_raw_fd(), &mut buf[..])) {
                Ok(result) => break result,
                Err(_would_block) => continue,
            }
        };

        match received {
            Ok((0, _)) => {
                self.close();
                Ok(None)
            }
            Ok((len, hatype)) => {
                let link_type = if hatype == ARPHRD_ETHER {
                    LinkType::Ethernet
                } else {
                    LinkType::Other(hatype)
                };
                Ok(Some(CapturedPacket {
                    link_type,
                    data: self.buf[..len].to_vec(),
                }))
            }
            Err(e) if sys::is_link_gone(&e) => {
                warn!("[{}] capture handle lost: {}", self.interface.name, e);
                self.close();
                Ok(None)
            }
            Err(e) => Err(LldpError::CaptureRead(e)),
        }
    }

    fn reopen(&mut self) -> Result<()> {
        self.close();
        let fd = self.open_socket().map_err(|source| LldpError::CaptureOpen {
            interface: self.interface.name.clone(),
            source,
        })?;
        debug!(
            "[{}] capture opened in promiscuous mode, ether type {:#06x}",
            self.interface.name, self.ether_type
        );
        self.fd = Some(fd);
        Ok(())
    }

    fn close(&mut self) {
        if self.fd.take().is_some() {
            debug!("[{}] capture closed", self.interface.name);
        }
    }
}
