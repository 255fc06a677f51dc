//! Tracing setup: stdout plus an optional log file under the data directory.

use prosperez_core::config::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "prosperez.log";

/// Install the global subscriber. `RUST_LOG` overrides `logging.level`.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = if config.logging.file {
        let dir = config.session.logs_dir();
        std::fs::create_dir_all(&dir)?;
        let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// Route panics through tracing so they land in the log file too.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        default_hook(info);
    }));
}
