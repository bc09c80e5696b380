use crate::error::{LldpError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Written by the installer once the machine is provisioned.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    #[serde(rename = "machineuuid")]
    pub machine_uuid: String,
    pub timestamp: String,
}

impl InstallConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LldpError::Config(format!("unable to open install config {}: {}", path.display(), e))
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| {
            LldpError::Config(format!("unable to parse install config {}: {}", path.display(), e))
        })
    }
}

/// Daemon settings
/// All values have defaults, an absent settings file is the same as `{}`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Seconds between two LLDP frames (default: 2)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_install_path")]
    pub install_path: PathBuf,
    #[serde(default = "default_debugfs_path")]
    pub debugfs_path: PathBuf,
    #[serde(default = "default_sysfs_net_path")]
    pub sysfs_net_path: PathBuf,
    /// Below this many up interfaces nothing is sent (default: 2)
    #[serde(default = "default_min_interfaces")]
    pub min_interfaces: usize,
    /// Also capture and log LLDP frames of the neighbors
    #[serde(default)]
    pub listen: bool,
    #[serde(default = "default_reopen_delay")]
    pub reopen_delay_ms: u64,
    #[serde(default = "default_max_reopen_attempts")]
    pub max_reopen_attempts: u32,
    /// Capacity of each discovery stream
    #[serde(default = "default_discovery_buffer")]
    pub discovery_buffer: usize,
    /// SO_PRIORITY of the send socket, `null` keeps the kernel default (default: 7)
    #[serde(default = "default_tx_priority")]
    pub tx_priority: Option<i32>,
    /// Log at debug level unless RUST_LOG says otherwise (default: true)
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        DaemonConfig {
            interval_secs: default_interval_secs(),
            install_path: default_install_path(),
            debugfs_path: default_debugfs_path(),
            sysfs_net_path: default_sysfs_net_path(),
            min_interfaces: default_min_interfaces(),
            listen: false,
            reopen_delay_ms: default_reopen_delay(),
            max_reopen_attempts: default_max_reopen_attempts(),
            discovery_buffer: default_discovery_buffer(),
            tx_priority: default_tx_priority(),
            debug: default_debug(),
        }
    }
}

fn default_interval_secs() -> u64 { 2 }
fn default_install_path() -> PathBuf { PathBuf::from("/etc/metal/install.yaml") }
fn default_debugfs_path() -> PathBuf { PathBuf::from("/sys/kernel/debug") }
fn default_sysfs_net_path() -> PathBuf { PathBuf::from("/sys/class/net") }
fn default_min_interfaces() -> usize { 2 }
fn default_reopen_delay() -> u64 { 1000 }
fn default_max_reopen_attempts() -> u32 { 5 }
fn default_discovery_buffer() -> usize { 16 }
fn default_tx_priority() -> Option<i32> { Some(7) }
fn default_debug() -> bool { true }

impl DaemonConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LldpError::Config(format!("unable to open settings {}: {}", path.display(), e))
        })?;
        let config: DaemonConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            LldpError::Config(format!("unable to parse settings {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(LldpError::Config("interval_secs must not be zero".to_string()));
        }
        if self.discovery_buffer == 0 {
            return Err(LldpError::Config("discovery_buffer must not be zero".to_string()));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn reopen_delay(&self) -> Duration {
        Duration::from_millis(self.reopen_delay_ms)
    }
}
