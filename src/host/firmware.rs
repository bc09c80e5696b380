use log::{error, info, warn};
use std::ffi::CString;
use std::fs;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// `DEBUGFS_MAGIC` from linux/magic.h
pub const DEBUGFS_MAGIC: i64 = 0x6462_6720;

/// Drivers whose firmware runs an LLDP agent that swallows LLDP frames.
pub const FIRMWARE_LLDP_DRIVERS: &[&str] = &["i40e"];

const STOP_COMMAND: &[u8] = b"lldp stop";

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

fn is_debugfs(path: &Path) -> io::Result<bool> {
    let path = c_path(path)?;
    let mut stat = MaybeUninit::<libc::statfs>::zeroed();
    // statfs only writes into the buffer we hand it.
    let err = unsafe { libc::statfs(path.as_ptr(), stat.as_mut_ptr()) };
    if err < 0 {
        return Err(io::Error::last_os_error());
    }
    let stat = unsafe { stat.assume_init() };
    Ok(stat.f_type as i64 == DEBUGFS_MAGIC)
}

fn mount_debugfs(path: &Path) -> io::Result<()> {
    let target = c_path(path)?;
    let fstype = c"debugfs";
    let err = unsafe {
        libc::mount(
            fstype.as_ptr(),
            target.as_ptr(),
            fstype.as_ptr(),
            0,
            std::ptr::null(),
        )
    };
    if err < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn unmount_debugfs(path: &Path) {
    info!("unmounting debugfs");
    let result = c_path(path).and_then(|target| {
        if unsafe { libc::umount2(target.as_ptr(), libc::MNT_FORCE) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    });
    if let Err(e) = result {
        error!("unable to unmount debugfs: {}", e);
    }
}

/// Writes `lldp stop` into every file named `command` below `dir`.
/// Returns how many writes succeeded.
pub fn write_stop_commands(dir: &Path) -> io::Result<usize> {
    let mut stopped = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            match write_stop_commands(&path) {
                Ok(n) => stopped += n,
                Err(e) => warn!("opening/reading {} failed: {}", path.display(), e),
            }
        } else if entry.file_name() == "command" {
            info!("writing lldp stop to {}", path.display());
            match fs::write(&path, STOP_COMMAND) {
                Ok(()) => stopped += 1,
                Err(e) => error!("writing lldp stop to {} failed: {}", path.display(), e),
            }
        }
    }
    Ok(stopped)
}

/// Stops the firmware LLDP agent of known drivers until the next reboot.
///
/// Mounts debugfs at `debugfs` if it is not mounted yet, and unmounts it
/// again when done. Nothing here is fatal, failures are logged.
pub fn stop_firmware_lldp(debugfs: impl AsRef<Path>) {
    let debugfs = debugfs.as_ref();
    let mounted = match is_debugfs(debugfs) {
        Ok(mounted) => mounted,
        Err(e) => {
            error!("could not check whether debugfs is mounted: {}", e);
            return;
        }
    };

    if !mounted {
        info!("mounting debugfs at {}", debugfs.display());
        if let Err(e) = mount_debugfs(debugfs) {
            error!("mounting debugfs failed: {}", e);
            return;
        }
    }

    stop_driver_agents(debugfs);

    if !mounted {
        unmount_debugfs(debugfs);
    }
}

/// The walk part of [`stop_firmware_lldp`], for an already mounted debugfs.
pub fn stop_driver_agents(debugfs: &Path) -> usize {
    let mut stopped = 0;
    for driver in FIRMWARE_LLDP_DRIVERS {
        let dir = debugfs.join(driver);
        if !dir.is_dir() {
            info!("no {} directory in debugfs, nothing to stop", driver);
            continue;
        }
        match write_stop_commands(&dir) {
            Ok(n) => {
                info!("stopped firmware lldp on {} {} device(s)", n, driver);
                stopped += n;
            }
            Err(e) => error!("unable to walk through {}: {}", dir.display(), e),
        }
    }
    stopped
}
