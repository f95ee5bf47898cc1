//! Log output for binaries built on the minimap crates.
//!
//! Library code logs through `log` and, with the `tracing` feature, opens
//! spans around each pipeline stage. [`init_tracing`] sends both to a single
//! fmt subscriber on stderr, so stdout stays free for reports.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Line format of the stderr subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, fields flattened.
    Json,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global stderr subscriber and the `log` bridge.
///
/// `RUST_LOG` overrides `default_level` when set. Fails if a subscriber or a
/// `log` logger is already installed.
pub fn init_tracing(default_level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = env_filter(default_level);
    match format {
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_installs_once() {
        assert!(init_tracing("warn", LogFormat::Text).is_ok());
        log::warn!("bridged through the subscriber");
        assert!(init_tracing("debug", LogFormat::Json).is_err());
    }
}
