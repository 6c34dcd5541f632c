//! Tracing setup for the binaries.
//!
//! Output format is picked by `TYPEMODEL_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `json`: one JSON object per event
//!
//! ```bash
//! TYPEMODEL_LOG=debug typemodel convert -i graph.json
//! TYPEMODEL_LOG="typemodel::converter=trace" TYPEMODEL_LOG_FORMAT=json typemodel convert -i graph.json
//! ```
//!
//! Nothing is installed unless `TYPEMODEL_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("TYPEMODEL_LOG_FORMAT").unwrap_or_default())
    }
}

/// `TYPEMODEL_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TYPEMODEL_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Installs the global subscriber. Output goes to stderr; stdout carries the
/// command's own results.
pub fn init_tracing() {
    let has_own_log = std::env::var("TYPEMODEL_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_own_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            // a second init (tests, embedding) keeps the first subscriber
            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
