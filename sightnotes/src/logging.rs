//! Log setup.
//!
//! The TUI owns stderr, so log output goes to `sightnotes.log` inside the
//! state directory instead. The filter comes from `SIGHTNOTES_LOG`
//! (e.g. `SIGHTNOTES_LOG=sightnotes_core=debug`) and defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SIGHTNOTES_LOG";
const LOG_FILE: &str = "sightnotes.log";

/// Installs the global subscriber writing to `<dir>/sightnotes.log`.
///
/// # Errors
///
/// Returns `Err` if the directory or log file cannot be created, or a global
/// subscriber is already installed.
pub fn init(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(std::io::Error::other)
}
