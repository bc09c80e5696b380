//! # LLDP Runtime Module
//!
//! Runs one transmit engine, and optionally one discovery listener, per
//! interface.
//!
//! ## Lifecycle
//!
//! 1. Load configuration: `DaemonConfig::load("lldpd.json")` and `InstallConfig::load(path)`
//! 2. Start: `LldpRuntime::start(&identity, &interfaces, &config)`
//! 3. Stop gracefully: `runtime.shutdown().await`
//!
//! Failing interfaces are logged and skipped, the others keep running.
//!
//! ## Example
//!
//! ```ignore
//! let identity = Identity::from_install(&InstallConfig::load(&config.install_path)?);
//! let interfaces = host::up_ethernet_interfaces(&config.sysfs_net_path)?;
//! let mut runtime = LldpRuntime::start(&identity, &interfaces, &config)?;
//! // ...
//! runtime.shutdown().await;
//! ```

pub mod config;

pub use config::{DaemonConfig, InstallConfig};

use crate::discovery::{DiscoveryListener, DiscoveryResult};
use crate::engine::{EngineState, TransmitEngine};
use crate::error::Result;
use crate::model::{Identity, InterfaceHandle};
use crate::protocol::ETHER_TYPE_LLDP;
use crate::signal::{CancelHandle, cancel_pair};
use crate::transport::{CaptureSource, LinkTransport, PacketCapture, RawSocketTransport};
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct ListenerHandle {
    interface: String,
    cancel: CancelHandle,
    task: JoinHandle<Result<()>>,
}

pub struct LldpRuntime<T: LinkTransport = RawSocketTransport> {
    config: DaemonConfig,
    engines: Vec<TransmitEngine<T>>,
    listeners: Vec<ListenerHandle>,
    consumers: Vec<JoinHandle<()>>,
}

impl LldpRuntime<RawSocketTransport> {
    /// Starts sending on every interface through raw sockets. With `listen`
    /// set, neighbors seen on the running interfaces are logged.
    pub fn start(identity: &Identity, interfaces: &[InterfaceHandle], config: &DaemonConfig) -> Result<Self> {
        let mut runtime = Self::start_with(identity, interfaces, config, |_| RawSocketTransport::new())?;
        if !config.listen {
            return Ok(runtime);
        }

        let running: Vec<InterfaceHandle> = runtime
            .engines
            .iter()
            .filter(|engine| engine.state() == EngineState::Running)
            .map(|engine| engine.interface().clone())
            .collect();
        for interface in running {
            match PacketCapture::open(&interface, ETHER_TYPE_LLDP) {
                Ok(capture) => {
                    let results = runtime.attach_listener(&interface.name, capture);
                    runtime.log_results(&interface.name, results);
                }
                Err(e) => warn!("[{}] not listening for neighbors: {}", interface.name, e),
            }
        }
        Ok(runtime)
    }
}

impl<T: LinkTransport> LldpRuntime<T> {
    /// Like [`LldpRuntime::start`], with the transport of each interface
    /// made by `make_transport`. Must be called from within a tokio runtime.
    pub fn start_with<F>(
        identity: &Identity,
        interfaces: &[InterfaceHandle],
        config: &DaemonConfig,
        mut make_transport: F,
    ) -> Result<Self>
    where
        F: FnMut(&InterfaceHandle) -> T,
    {
        config.validate()?;
        let mut runtime = LldpRuntime {
            config: config.clone(),
            engines: Vec::new(),
            listeners: Vec::new(),
            consumers: Vec::new(),
        };

        if interfaces.len() < config.min_interfaces {
            info!(
                "only {} interface(s) up, at least {} needed, not sending lldp",
                interfaces.len(),
                config.min_interfaces
            );
            return Ok(runtime);
        }

        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
        info!("starting lldp on interfaces {:?}", names);

        for interface in interfaces {
            let transport = make_transport(interface);
            let engine = TransmitEngine::new(identity, interface.clone(), config.interval(), transport);
            let mut engine = match engine {
                Ok(engine) => engine.with_priority(config.tx_priority),
                Err(e) => {
                    error!("[{}] could not create lldp engine: {}", interface.name, e);
                    continue;
                }
            };
            if let Err(e) = engine.start() {
                error!("[{}] could not start lldp: {}", interface.name, e);
                continue;
            }
            runtime.engines.push(engine);
        }

        if runtime.engines.is_empty() {
            warn!("lldp could not be started on any interface");
        }
        Ok(runtime)
    }

    /// Starts a discovery listener on `source` and hands out its stream.
    /// The stream closes when the listener ends or the runtime shuts down.
    pub fn attach_listener<S: CaptureSource>(&mut self, interface: &str, source: S) -> mpsc::Receiver<DiscoveryResult> {
        let (tx, rx) = mpsc::channel(self.config.discovery_buffer);
        let (cancel, signal) = cancel_pair();
        let task = DiscoveryListener::new(interface, source)
            .with_reopen_policy(self.config.reopen_delay(), self.config.max_reopen_attempts)
            .start(tx, signal);
        self.listeners.push(ListenerHandle {
            interface: interface.to_string(),
            cancel,
            task,
        });
        rx
    }

    fn log_results(&mut self, interface: &str, mut results: mpsc::Receiver<DiscoveryResult>) {
        let interface = interface.to_string();
        self.consumers.push(tokio::spawn(async move {
            while let Some(result) = results.recv().await {
                info!(
                    "[{}] neighbor {:?}: {:?}",
                    interface, result.sys_name, result.sys_description
                );
            }
        }));
    }

    /// Names of the interfaces with a running engine.
    pub fn running_interfaces(&self) -> Vec<String> {
        self.engines
            .iter()
            .filter(|engine| engine.state() == EngineState::Running)
            .map(|engine| engine.interface().name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Stops every engine and listener and waits for them to finish.
    pub async fn shutdown(&mut self) {
        for engine in &mut self.engines {
            engine.stop().await;
        }
        for listener in self.listeners.drain(..) {
            let _ = listener.cancel.send(true);
            match listener.task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("[{}] discovery ended with error: {}", listener.interface, e),
                Err(e) => error!("[{}] discovery task failed: {}", listener.interface, e),
            }
        }
        for consumer in self.consumers.drain(..) {
            let _ = consumer.await;
        }
        info!("lldp runtime stopped");
    }
}
