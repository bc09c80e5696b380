use crate::error::Result;
use crate::host;
use crate::protocol::MacAddr;
use crate::runtime::config::InstallConfig;

/// What this machine announces. Shared read-only by every engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub machine_id: String,
    pub description: String,
}

impl Identity {
    pub fn new(machine_id: impl Into<String>, description: impl Into<String>) -> Self {
        Identity {
            machine_id: machine_id.into(),
            description: description.into(),
        }
    }

    pub fn from_install(install: &InstallConfig) -> Self {
        Identity {
            machine_id: install.machine_uuid.clone(),
            description: format!("provisioned since {}", install.timestamp),
        }
    }
}

/// A network interface resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceHandle {
    pub name: String,
    pub hardware_address: MacAddr,
    pub index: u32,
}

impl InterfaceHandle {
    pub fn new(name: impl Into<String>, hardware_address: MacAddr, index: u32) -> Self {
        InterfaceHandle {
            name: name.into(),
            hardware_address,
            index,
        }
    }

    /// Resolves `name` under `/sys/class/net`.
    pub fn by_name(name: &str) -> Result<Self> {
        host::interface_by_name(host::SYS_CLASS_NET, name)
    }
}
