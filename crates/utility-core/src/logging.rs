//! Provider logging.
//!
//! Records go to `$XDG_STATE_HOME/utility-provider/utility-provider.log`, or to
//! stderr when that file cannot be opened. stdout is never written; it carries
//! the JSON responses. Header values never reach a log record.

use anyhow::{Context, Result};
use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter directives for this provider; `RUST_LOG` is the fallback.
pub const FILTER_ENV: &str = "UTILITY_PROVIDER_LOG";

const DEFAULT_FILTER: &str = "info,utility_core=debug,utility_provider=debug";
const LOG_FILE: &str = "utility-provider.log";

/// Where records end up after `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File(PathBuf),
    Stderr,
}

/// Install the global subscriber. Never fails: an unusable state dir only
/// moves logging to stderr.
pub fn init() -> LogSink {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false);

    match open_log_file() {
        Ok((path, file)) => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::info!(path = %path.display(), "logging to file");
            LogSink::File(path)
        }
        Err(err) => {
            builder.with_writer(io::stderr).init();
            tracing::warn!(error = %format!("{:#}", err), "file logging unavailable, using stderr");
            LogSink::Stderr
        }
    }
}

/// Log file location, with its directory created.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("utility-provider")?;
    dirs.place_state_file(LOG_FILE)
        .context("failed to create log directory")
}

fn open_log_file() -> Result<(PathBuf, File)> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok((path, file))
}

fn filter() -> EnvFilter {
    let directives = env::var(FILTER_ENV).or_else(|_| env::var("RUST_LOG")).ok();
    filter_from(directives.as_deref())
}

/// Unset or unparsable directives fall back to the default filter.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
