//! Initialisation du système de logs
//!
//! `RUST_LOG` prend le pas sur la configuration lorsqu'il est défini ;
//! sinon le niveau minimum vient de `host.logger.min_level`.

use sfconfig::get_config;
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum (ERROR, WARN, INFO, DEBUG, TRACE)
    pub min_level: String,
    /// Activer la sortie console
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: "INFO".to_string(),
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Options lues depuis la configuration globale
    pub fn from_config() -> Self {
        let config = get_config();
        Self {
            min_level: config.get_log_min_level(),
            enable_console: config.get_log_enable_console(),
        }
    }
}

/// Initialise le subscriber `tracing` global
///
/// Un second appel (tests, plusieurs binaires dans le même processus) est
/// sans effet.
///
/// ```rust,no_run
/// use sfserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions::from_config());
/// ```
pub fn init_logging(options: LoggingOptions) {
    let level = string_to_level(&options.min_level)
        .map(level_to_levelfilter)
        .unwrap_or(LevelFilter::INFO);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = Registry::default().with(filter);

    let result = if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("❌ Failed to initialise logging: {}", e);
    }
}

pub fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" | "WARNING" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_levelfilter(level: Level) -> LevelFilter {
    match level {
        Level::ERROR => LevelFilter::ERROR,
        Level::WARN => LevelFilter::WARN,
        Level::INFO => LevelFilter::INFO,
        Level::DEBUG => LevelFilter::DEBUG,
        Level::TRACE => LevelFilter::TRACE,
    }
}
