//! Logging infrastructure for pcmix

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, LogLevel};

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "PCMIX_LOG";

/// Filter used when `PCMIX_LOG` is unset: pcmix's own crates and the
/// `mixer`/`sink` targets at `level`, everything else (cpal, alsa) at warn.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    format!(
        "warn,pcmix={level},pcmix_core={level},pcmix_audio={level},mixer={level},sink={level}"
    )
}

fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Initialize the logging system based on configuration
pub fn init(config: &Config) {
    let level = match config.debug.log_level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().with_target(true));

    let file = config
        .debug
        .log_to_file
        .then(|| std::fs::File::create(&config.debug.log_path).ok())
        .flatten();
    match file {
        Some(file) => {
            let file_layer = fmt::layer().with_writer(file).with_ansi(false);
            let _ = subscriber.with(file_layer).try_init();
        }
        None => {
            let _ = subscriber.try_init();
        }
    }
}

/// Console-only logging at info, used when the config cannot be read
pub fn init_default() {
    let _ = tracing_subscriber::registry()
        .with(filter_for(Level::INFO))
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Log a mixer trace message
#[macro_export]
macro_rules! mixer_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "mixer", $($arg)*)
    };
}

/// Log a mixer debug message
#[macro_export]
macro_rules! mixer_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "mixer", $($arg)*)
    };
}

/// Log a sink debug message
#[macro_export]
macro_rules! sink_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "sink", $($arg)*)
    };
}

/// Log a sink warning
#[macro_export]
macro_rules! sink_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "sink", $($arg)*)
    };
}
