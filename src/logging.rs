//! Log setup for the binary.
//!
//! The terminal UI owns stdout and stderr, so log lines go to a file given
//! with `--log-file`. Without one, no subscriber is installed.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `LINKDECK_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "linkdeck=info";

/// Pick the filter directive: `LINKDECK_LOG` wins over `RUST_LOG`.
pub fn filter_directive(linkdeck_log: Option<String>, rust_log: Option<String>) -> String {
    linkdeck_log
        .or(rust_log)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber writing to `log_file`, appending.
///
/// Does nothing when `log_file` is `None`.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let directive = filter_directive(
        std::env::var("LINKDECK_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Logging already initialised")?;

    Ok(())
}
