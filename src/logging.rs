// src/logging.rs
//! Logging macros and subscriber setup

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "cv_builder=info,rocket::server=off";

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Open an info-level span: `app_span!("name", key = %value)`
#[macro_export]
macro_rules! app_span {
    ($($arg:tt)+) => {
        ::tracing::info_span!($($arg)+)
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; anything other than `json` means pretty output
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber on stderr. `RUST_LOG` wins over the default filter.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false)
        }))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .try_init()?;

    Ok(())
}
