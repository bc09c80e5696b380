#![allow(dead_code)]

use lldpd::transport::{CaptureSource, CapturedPacket, LinkTransport};
use lldpd::{Identity, InterfaceHandle, LldpError, MacAddr, Result};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{self, Instant};

pub fn interface(name: &str, index: u32) -> InterfaceHandle {
    InterfaceHandle::new(name, MacAddr([0x02, 0x00, 0x5e, 0x10, 0x00, index as u8]), index)
}

pub fn identity() -> Identity {
    Identity::new("0b4f2f4e-1c3a-4d4c-9d3e-2f0a6a7b8c9d", "provisioned since 2020-04-01T12:00:00Z")
}

/// What a [`FakeTransport`] saw, shared with the test.
#[derive(Default)]
pub struct TransportLog {
    pub writes: Mutex<Vec<(Instant, Vec<u8>)>>,
    /// Every write call, failed ones included.
    pub attempts: AtomicUsize,
    pub opened: AtomicUsize,
    pub bound: AtomicUsize,
    pub closed: AtomicUsize,
}

impl TransportLog {
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn write_times(&self) -> Vec<Instant> {
        self.writes.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeTransport {
    pub log: Arc<TransportLog>,
    write_delay: Option<Duration>,
    fail_bind: bool,
    // Cycled over write attempts, `true` fails that attempt
    write_failures: Vec<bool>,
    closed: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport {
            log: Arc::new(TransportLog::default()),
            write_delay: None,
            fail_bind: false,
            write_failures: Vec::new(),
            closed: false,
        }
    }

    /// Every write completes only after `delay`.
    pub fn slow(delay: Duration) -> Self {
        FakeTransport {
            write_delay: Some(delay),
            ..FakeTransport::new()
        }
    }

    /// Write attempt `n` fails when `pattern[n % pattern.len()]` is true.
    pub fn failing_writes(pattern: &[bool]) -> Self {
        FakeTransport {
            write_failures: pattern.to_vec(),
            ..FakeTransport::new()
        }
    }

    pub fn failing_bind() -> Self {
        FakeTransport {
            fail_bind: true,
            ..FakeTransport::new()
        }
    }
}

impl LinkTransport for FakeTransport {
    fn open(&mut self, _interface: &InterfaceHandle) -> Result<()> {
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        self.closed = false;
        Ok(())
    }

    fn bind(&mut self, _ether_type: u16, _priority: Option<i32>) -> Result<()> {
        if self.fail_bind {
            return Err(LldpError::Bind {
                interface: "fake".to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.log.bound.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn write(&mut self, frame: &[u8]) -> Result<usize> {
        let attempt = self.log.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.write_delay {
            time::sleep(delay).await;
        }
        if !self.write_failures.is_empty() && self.write_failures[attempt % self.write_failures.len()] {
            return Err(LldpError::Write(io::Error::from(io::ErrorKind::WouldBlock)));
        }
        self.log.writes.lock().unwrap().push((Instant::now(), frame.to_vec()));
        Ok(frame.len())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.log.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Default)]
pub struct CaptureLog {
    pub reopened: AtomicUsize,
    pub closed: AtomicBool,
}

/// Replays a script of packets. `None` entries end the stream once, an
/// exhausted script blocks forever.
pub struct FakeCapture {
    script: VecDeque<Option<CapturedPacket>>,
    pub log: Arc<CaptureLog>,
    fail_reopen: bool,
}

impl FakeCapture {
    pub fn new(script: Vec<Option<CapturedPacket>>) -> Self {
        FakeCapture {
            script: script.into(),
            log: Arc::new(CaptureLog::default()),
            fail_reopen: false,
        }
    }

    pub fn failing_reopen(script: Vec<Option<CapturedPacket>>) -> Self {
        FakeCapture {
            fail_reopen: true,
            ..FakeCapture::new(script)
        }
    }
}

impl CaptureSource for FakeCapture {
    async fn next_packet(&mut self) -> Result<Option<CapturedPacket>> {
        match self.script.pop_front() {
            Some(next) => Ok(next),
            None => std::future::pending().await,
        }
    }

    fn reopen(&mut self) -> Result<()> {
        self.log.reopened.fetch_add(1, Ordering::SeqCst);
        if self.fail_reopen {
            return Err(LldpError::CaptureOpen {
                interface: "fake".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }

    fn close(&mut self) {
        self.log.closed.store(true, Ordering::SeqCst);
    }
}

/// An LLDP frame as a neighbor would send it.
pub fn neighbor_frame(system_name: &str, system_description: &str) -> CapturedPacket {
    let frame = lldpd::build_frame(
        &Identity::new(system_name, system_description),
        &interface("swp1", 9),
        Duration::from_secs(30),
    )
    .unwrap();
    CapturedPacket::ethernet(frame)
}
