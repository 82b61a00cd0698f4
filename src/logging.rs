//! Log sink: a file rewritten on every start, mirrored to stderr.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_PATH: &str = "program.log";

const DEFAULT_FILTER: &str = "homework_bot=debug,info";

/// Installs the subscriber for as long as the returned guard lives.
///
/// The runtime is single-threaded, so a scoped default covers every
/// component; dropping the guard at the end of `main` flushes and detaches
/// the sink.
pub fn init<P: AsRef<Path>>(path: P) -> Result<DefaultGuard> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let guard = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .set_default();

    Ok(guard)
}
