use crate::codec::{EthernetFrame, LldpDecode, Lldpdu};
use crate::error::Result;
use crate::signal::{CancelSignal, cancelled};
use crate::transport::{CaptureSource, CapturedPacket, LinkType};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

/// Optional SysName and SysDescription TLVs of one received LLDP frame.
/// Absent TLVs decode to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryResult {
    pub sys_name: String,
    pub sys_description: String,
}

impl DiscoveryResult {
    pub fn new(sys_name: impl Into<String>, sys_description: impl Into<String>) -> Self {
        DiscoveryResult {
            sys_name: sys_name.into(),
            sys_description: sys_description.into(),
        }
    }
}

/// Extracts a discovery result from a captured packet.
///
/// `Ok(None)` for packets that are not LLDP over ethernet, `Err` for LLDP
/// frames that do not decode.
pub fn decode_packet(packet: &CapturedPacket) -> Result<Option<DiscoveryResult>> {
    if packet.link_type != LinkType::Ethernet {
        return Ok(None);
    }
    let frame = EthernetFrame::decode(&packet.data)?;
    if !frame.is_lldp() {
        return Ok(None);
    }
    let pdu = Lldpdu::decode(&frame.payload)?;
    Ok(Some(DiscoveryResult {
        sys_name: pdu.system_name.unwrap_or_default(),
        sys_description: pdu.system_description.unwrap_or_default(),
    }))
}

pub const DEFAULT_REOPEN_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_REOPEN_ATTEMPTS: u32 = 5;

/// Turns packets of a capture source into a stream of discovery results.
pub struct DiscoveryListener<S: CaptureSource> {
    interface: String,
    source: S,
    reopen_delay: Duration,
    max_reopen_attempts: u32,
}

impl<S: CaptureSource> DiscoveryListener<S> {
    pub fn new(interface: impl Into<String>, source: S) -> Self {
        DiscoveryListener {
            interface: interface.into(),
            source,
            reopen_delay: DEFAULT_REOPEN_DELAY,
            max_reopen_attempts: DEFAULT_MAX_REOPEN_ATTEMPTS,
        }
    }

    /// Delay before every reopen of an ended capture, and how many
    /// consecutive failed reopens end the listener.
    pub fn with_reopen_policy(mut self, delay: Duration, max_attempts: u32) -> Self {
        self.reopen_delay = delay;
        self.max_reopen_attempts = max_attempts.max(1);
        self
    }

    /// Spawns the listener. The output stream closes when the listener ends.
    pub fn start(
        self,
        results: mpsc::Sender<DiscoveryResult>,
        cancel: CancelSignal,
    ) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run(results, cancel))
    }

    pub async fn run(
        mut self,
        results: mpsc::Sender<DiscoveryResult>,
        mut cancel: CancelSignal,
    ) -> Result<()> {
        info!("[{}] lldp discovery started", self.interface);

        let outcome = loop {
            let next = tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => break Ok(()),
                next = self.source.next_packet() => next,
            };

            let packet = match next {
                Ok(Some(packet)) => packet,
                Ok(None) => {
                    debug!("[{}] capture stream ended, reopening", self.interface);
                    match self.reopen(&mut cancel).await {
                        Ok(true) => continue,
                        Ok(false) => break Ok(()),
                        Err(e) => break Err(e),
                    }
                }
                Err(e) => {
                    warn!("[{}] capture failed, reopening: {}", self.interface, e);
                    match self.reopen(&mut cancel).await {
                        Ok(true) => continue,
                        Ok(false) => break Ok(()),
                        Err(e) => break Err(e),
                    }
                }
            };

            #[cfg(feature = "packet-dump")]
            log::trace!("[{}] captured {} bytes: {:02x?}", self.interface, packet.data.len(), packet.data);

            let result = match decode_packet(&packet) {
                Ok(Some(result)) => result,
                Ok(None) => continue,
                Err(e) => {
                    debug!("[{}] skipping malformed lldp frame: {}", self.interface, e);
                    continue;
                }
            };

            debug!("[{}] received lldp info {:?}", self.interface, result);
            tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => break Ok(()),
                sent = results.send(result) => {
                    if sent.is_err() {
                        debug!("[{}] discovery consumer is gone", self.interface);
                        break Ok(());
                    }
                }
            }
        };

        // Release the stream before the capture, so nobody waits on a
        // stream that will never be fed again.
        drop(results);
        self.source.close();
        warn!("[{}] terminating lldp discovery", self.interface);
        outcome
    }

    /// Reopens the capture, waiting `reopen_delay` before every attempt.
    /// `Ok(false)` when cancelled while waiting.
    async fn reopen(&mut self, cancel: &mut CancelSignal) -> Result<bool> {
        let mut attempts = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancelled(cancel) => return Ok(false),
                _ = time::sleep(self.reopen_delay) => {}
            }
            match self.source.reopen() {
                Ok(()) => return Ok(true),
                Err(e) => {
                    attempts += 1;
                    warn!(
                        "[{}] reopening capture failed ({}/{}): {}",
                        self.interface, attempts, self.max_reopen_attempts, e
                    );
                    if attempts >= self.max_reopen_attempts {
                        return Err(e);
                    }
                }
            }
        }
    }
}

