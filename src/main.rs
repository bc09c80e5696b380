use lldpd::host;
use lldpd::logging;
use lldpd::signal::{cancel_pair, cancelled};
use lldpd::{DaemonConfig, Identity, InstallConfig, LldpRuntime};
use log::{error, info};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => DaemonConfig::load(path),
        None => Ok(DaemonConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            logging::init(false);
            error!("{}", e);
            process::exit(1);
        }
    };

    logging::init(config.debug);
    info!("lldpd version {}", env!("CARGO_PKG_VERSION"));

    let install = match InstallConfig::load(&config.install_path) {
        Ok(install) => install,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let identity = Identity::from_install(&install);

    host::stop_firmware_lldp(&config.debugfs_path);

    let interfaces = match host::up_ethernet_interfaces(&config.sysfs_net_path) {
        Ok(interfaces) => interfaces,
        Err(e) => {
            error!("unable to list interfaces: {}", e);
            process::exit(1);
        }
    };

    let mut runtime = match LldpRuntime::start(&identity, &interfaces, &config) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    if runtime.is_empty() {
        info!("exiting, nothing to send");
        return;
    }

    let (shutdown, mut signal) = cancel_pair();
    let shutdown = Arc::new(shutdown);
    let handler = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("shutting down...");
        let _ = handler.send(true);
    }) {
        error!("unable to install signal handler: {}", e);
    }

    cancelled(&mut signal).await;
    runtime.shutdown().await;
}
