//! Tracing configuration for debugging rule decisions.
//!
//! Supports three output formats controlled by `EDA_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, one level per
//!   span (unit, binder, checker)
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Why was this access not reported?
//! EDA_LOG=debug EDA_LOG_FORMAT=tree cargo test -p eda-checker shadowed
//!
//! # Every visited node
//! EDA_LOG="eda_checker::direct_access=trace" EDA_LOG_FORMAT=tree ...
//!
//! # JSON for tooling
//! EDA_LOG=debug EDA_LOG_FORMAT=json ...
//! ```
//!
//! The subscriber is only initialised when `EDA_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("EDA_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `EDA_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("EDA_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `EDA_LOG` nor `RUST_LOG` is set, or when a
/// global subscriber is already installed. Output goes to stderr.
pub fn init_tracing() {
    let has_eda_log = std::env::var("EDA_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_eda_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    // try_init: hosts and test binaries may already own the global subscriber
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            let _ = Registry::default().with(filter).with(tree_layer).try_init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

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
