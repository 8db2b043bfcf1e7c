use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex, sync::Once};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "CAPYGOTCHI_LOG";

static INIT: Once = Once::new();

/// Sends logs to `log_path` so the terminal UI stays clean.
///
/// `CAPYGOTCHI_LOG` overrides `fallback_filter`, e.g.
/// `CAPYGOTCHI_LOG=capygotchi=debug`. Only the first call installs a
/// subscriber.
pub fn init_logging(log_path: &Path, fallback_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(fallback_filter))
            .unwrap_or_else(|_| EnvFilter::new("capygotchi=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
    Ok(())
}
