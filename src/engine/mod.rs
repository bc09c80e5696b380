//! # Transmit Engine
//!
//! One engine per interface. The LLDP frame is encoded once at construction
//! and written on every tick of a fixed interval until the engine is stopped.
//!
//! ## Lifecycle
//!
//! 1. `TransmitEngine::new(identity, interface, interval, transport)` encodes the frame
//! 2. `start()` opens and binds the transport, then spawns the send loop
//! 3. `stop().await` cancels the loop and closes the transport
//!
//! Writes are serialized: at most one frame is in flight per engine. Ticks
//! missed while a write is pending fire back to back once it completes.

use crate::codec::build_frame;
use crate::error::{LldpError, Result};
use crate::model::{Identity, InterfaceHandle};
use crate::protocol::{ETHER_TYPE_LLDP, TC_PRIO_CONTROL};
use crate::signal::{CancelHandle, CancelSignal, cancel_pair, cancelled};
use crate::transport::LinkTransport;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Created,
    Running,
    Stopped,
}

impl EngineState {
    fn as_str(&self) -> &'static str {
        match self {
            EngineState::Created => "created",
            EngineState::Running => "running",
            EngineState::Stopped => "stopped",
        }
    }
}

pub struct TransmitEngine<T: LinkTransport> {
    interface: InterfaceHandle,
    interval: Duration,
    frame: Arc<[u8]>,
    priority: Option<i32>,
    state: EngineState,
    // Present while Created
    transport: Option<T>,
    // Present while Running
    cancel: Option<CancelHandle>,
    task: Option<JoinHandle<()>>,
}

impl<T: LinkTransport> TransmitEngine<T> {
    pub fn new(
        identity: &Identity,
        interface: InterfaceHandle,
        interval: Duration,
        transport: T,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(LldpError::Config(format!(
                "send interval for interface {} must not be zero",
                interface.name
            )));
        }
        let frame = build_frame(identity, &interface, interval)?;

        Ok(TransmitEngine {
            interface,
            interval,
            frame: frame.into(),
            priority: Some(TC_PRIO_CONTROL),
            state: EngineState::Created,
            transport: Some(transport),
            cancel: None,
            task: None,
        })
    }

    /// Socket priority applied at bind time, `None` leaves the default.
    pub fn with_priority(mut self, priority: Option<i32>) -> Self {
        self.priority = priority;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn interface(&self) -> &InterfaceHandle {
        &self.interface
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The precomputed ethernet frame written on every tick.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Open and bind the transport and spawn the send loop. Must be called
    /// from within a tokio runtime. On failure the engine stays `Created`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != EngineState::Created {
            return Err(LldpError::EngineState {
                interface: self.interface.name.clone(),
                state: self.state.as_str(),
            });
        }
        let Some(mut transport) = self.transport.take() else {
            return Err(LldpError::EngineState {
                interface: self.interface.name.clone(),
                state: self.state.as_str(),
            });
        };

        let opened = transport
            .open(&self.interface)
            .and_then(|_| transport.bind(ETHER_TYPE_LLDP, self.priority));
        if let Err(e) = opened {
            transport.close();
            self.transport = Some(transport);
            return Err(e);
        }

        let (cancel, signal) = cancel_pair();
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let task = tokio::spawn(send_loop(
            transport,
            self.frame.clone(),
            ticker,
            signal,
            self.interface.name.clone(),
        ));

        info!("[{}] lldp started, interval {:?}", self.interface.name, self.interval);
        self.cancel = Some(cancel);
        self.task = Some(task);
        self.state = EngineState::Running;
        Ok(())
    }

    /// Stop sending. Once this returns no further frame is written and the
    /// transport is closed.
    pub async fn stop(&mut self) {
        match self.state {
            EngineState::Running => {
                if let Some(cancel) = self.cancel.take() {
                    let _ = cancel.send(true);
                }
                if let Some(task) = self.task.take() {
                    if let Err(e) = task.await {
                        error!("[{}] send loop terminated abnormally: {}", self.interface.name, e);
                    }
                }
                info!("[{}] lldp stopped", self.interface.name);
            }
            EngineState::Created => {
                if let Some(mut transport) = self.transport.take() {
                    transport.close();
                }
            }
            EngineState::Stopped => {}
        }
        self.state = EngineState::Stopped;
    }
}

impl<T: LinkTransport> Drop for TransmitEngine<T> {
    fn drop(&mut self) {
        // Dropping the sender cancels the loop, which closes the transport.
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
    }
}

async fn send_loop<T: LinkTransport>(
    mut transport: T,
    frame: Arc<[u8]>,
    mut ticker: Interval,
    mut signal: CancelSignal,
    interface: String,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancelled(&mut signal) => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            _ = cancelled(&mut signal) => break,
            written = transport.write(&frame) => match written {
                Ok(n) => debug!("[{}] lldp frame sent, {} bytes", interface, n),
                Err(e) => warn!("[{}] failed to send lldp frame: {}", interface, e),
            },
        }
    }
    transport.close();
    debug!("[{}] send loop finished", interface);
}
