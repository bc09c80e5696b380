use super::sys;
use super::traits::LinkTransport;
use crate::error::{LldpError, Result};
use crate::model::InterfaceHandle;
use log::{debug, warn};
use socket2::{Domain, Protocol, Socket, Type};
use std::os::fd::AsRawFd;
use tokio::io::unix::AsyncFd;

enum State {
    Closed,
    Open(Socket),
    Bound(AsyncFd<Socket>),
}

/// `AF_PACKET` raw socket transport bound to a single interface.
pub struct RawSocketTransport {
    state: State,
    interface: String,
    ifindex: u32,
}

impl RawSocketTransport {
    pub fn new() -> Self {
        RawSocketTransport {
            state: State::Closed,
            interface: String::new(),
            ifindex: 0,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, State::Bound(_))
    }

    fn open_error(&self, source: std::io::Error) -> LldpError {
        LldpError::Open {
            interface: self.interface.clone(),
            source,
        }
    }

    fn bind_error(&self, source: std::io::Error) -> LldpError {
        LldpError::Bind {
            interface: self.interface.clone(),
            source,
        }
    }
}

impl Default for RawSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkTransport for RawSocketTransport {
    fn open(&mut self, interface: &InterfaceHandle) -> Result<()> {
        self.close();
        self.interface = interface.name.clone();
        self.ifindex = interface.index;

        // Protocol 0: the socket receives nothing until bind() sets the
        // EtherType and interface.
        let socket = Socket::new(Domain::PACKET, Type::RAW, Some(Protocol::from(0)))
            .map_err(|e| self.open_error(e))?;
        socket.set_nonblocking(true).map_err(|e| self.open_error(e))?;
        self.state = State::Open(socket);
        Ok(())
    }

    fn bind(&mut self, ether_type: u16, priority: Option<i32>) -> Result<()> {
        let socket = match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(socket) => socket,
            other => {
                self.state = other;
                return Err(self.bind_error(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "socket is not open",
                )));
            }
        };

        if let Some(priority) = priority {
            if let Err(e) = sys::set_priority(socket.as_raw_fd(), priority) {
                warn!("[{}] unable to set socket priority {}: {}", self.interface, priority, e);
            }
        }

        sys::bind_link_layer(socket.as_raw_fd(), self.ifindex, ether_type)
            .map_err(|e| self.bind_error(e))?;
        let fd = AsyncFd::new(socket).map_err(|e| self.bind_error(e))?;
        debug!("[{}] raw socket bound, ether type {:#06x}", self.interface, ether_type);
        self.state = State::Bound(fd);
        Ok(())
    }

    async fn write(&mut self, frame: &[u8]) -> Result<usize> {
        let State::Bound(fd) = &self.state else {
            return Err(LldpError::NotBound);
        };
        loop {
            let mut guard = fd.writable().await.map_err(LldpError::Write)?;
            match guard.try_io(|inner| inner.get_ref().send(frame)) {
                Ok(result) => return result.map_err(LldpError::Write),
                Err(_would_block) => continue,
            }
        }
    }

    fn close(&mut self) {
        if !matches!(self.state, State::Closed) {
            debug!("[{}] closing raw socket", self.interface);
        }
        self.state = State::Closed;
    }

    fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }
}
