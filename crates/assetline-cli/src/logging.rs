//! Logging initialization for the CLI.
//!
//! Library crates never log; the binary owns the subscriber. Logs always go
//! to stderr so stdout stays reserved for pipeline output.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// * `verbosity` - 0 = WARN, 1 = DEBUG, 2+ = TRACE for this crate's targets
/// * `json` - emit JSON lines instead of human-readable text
///
/// `RUST_LOG` is honoured; the verbosity flag is layered on top of it.
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Ok(directive) = format!("assetline_cli={level}").parse() {
        filter = filter.add_directive(directive);
    }

    let registry = tracing_subscriber::registry().with(filter);

    // Already initialised is fine.
    let _ = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
}
