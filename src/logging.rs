use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the process wide logger.
///
/// Lines look like `2024-05-02T09:14:03.512Z info lldpd::engine [lan0] lldp started`.
/// `debug` lowers the default filter from `info` to `debug`, `RUST_LOG`
/// overrides both. Calling this twice is harmless.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let _ = Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {} {}",
                buf.timestamp_millis(),
                record.level().as_str().to_lowercase(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
