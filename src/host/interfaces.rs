use crate::error::{LldpError, Result};
use crate::model::InterfaceHandle;
use crate::protocol::{ARPHRD_ETHER, MacAddr};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::Path;

pub const SYS_CLASS_NET: &str = "/sys/class/net";

fn read_attribute(dir: &Path, name: &str) -> io::Result<String> {
    Ok(fs::read_to_string(dir.join(name))?.trim().to_string())
}

fn invalid(dir: &Path, what: &str, value: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: invalid {} {:?}", dir.display(), what, value),
    )
}

fn read_handle(dir: &Path, name: &str) -> io::Result<InterfaceHandle> {
    let address = read_attribute(dir, "address")?;
    let hardware_address: MacAddr = address.parse().map_err(|_| invalid(dir, "address", &address))?;
    let index = read_attribute(dir, "ifindex")?;
    let index: u32 = index.parse().map_err(|_| invalid(dir, "ifindex", &index))?;
    Ok(InterfaceHandle::new(name, hardware_address, index))
}

/// Physical ethernet interfaces whose operstate is `up`, sorted by name.
///
/// `sysfs_root` is normally [`SYS_CLASS_NET`]. Virtual links (no `device`
/// entry) and non-ethernet links are ignored, interfaces that are down are
/// logged and ignored.
pub fn up_ethernet_interfaces(sysfs_root: impl AsRef<Path>) -> Result<Vec<InterfaceHandle>> {
    let mut interfaces = Vec::new();
    for entry in fs::read_dir(sysfs_root.as_ref())? {
        let entry = entry?;
        let dir = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if !dir.join("device").exists() {
            debug!("[{}] not a physical device, skipping", name);
            continue;
        }
        match read_attribute(&dir, "type").map(|t| t.parse::<u16>()) {
            Ok(Ok(ARPHRD_ETHER)) => {}
            _ => {
                debug!("[{}] not an ethernet link, skipping", name);
                continue;
            }
        }
        let operstate = read_attribute(&dir, "operstate").unwrap_or_default();
        if operstate != "up" {
            info!("[{}] interface is not up (operstate {}), skipping", name, operstate);
            continue;
        }

        match read_handle(&dir, &name) {
            Ok(handle) => interfaces.push(handle),
            Err(e) => warn!("[{}] unable to read interface attributes, skipping: {}", name, e),
        }
    }
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(interfaces)
}

/// Resolves a single interface regardless of its state.
pub fn interface_by_name(sysfs_root: impl AsRef<Path>, name: &str) -> Result<InterfaceHandle> {
    let dir = sysfs_root.as_ref().join(name);
    if name.is_empty() || name.contains('/') || !dir.is_dir() {
        return Err(LldpError::InterfaceNotFound(name.to_string()));
    }
    read_handle(&dir, name).map_err(|e| {
        debug!("[{}] unable to read interface attributes: {}", name, e);
        LldpError::InterfaceNotFound(name.to_string())
    })
}
