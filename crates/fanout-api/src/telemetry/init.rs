use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const LOG_FILE_NAME: &str = "fanout.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "fanout=debug,tower_http=debug".into())
}

/// Initialize tracing: compact console output, plus `<log_dir>/fanout.log` when a log
/// directory is configured.
pub fn init_telemetry(log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    let file_fmt = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_fmt)
        .with(file_fmt)
        .try_init()?;

    match log_dir {
        Some(dir) => tracing::info!(log_dir = %dir.display(), "File logging enabled"),
        None => tracing::debug!("File logging disabled"),
    }

    Ok(())
}
