//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use ktspec_core::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.filter`. Commands log to stderr
/// so stdout stays clean for `--json`. The interactive explorer owns the
/// terminal, so it logs to `logging.file` or not at all.
pub fn initialize(config: &LoggingConfig, interactive: bool) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if !interactive {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(());
    }

    let Some(path) = &config.file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}
