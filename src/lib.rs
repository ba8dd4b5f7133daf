//! Forbids optional chaining and destructuring on protected property paths.
//!
//! Build-time replacement of `process.env.API_KEY` or `import.meta.env.MODE`
//! only works when every access is written out directly. This crate checks
//! JavaScript sources for the two patterns that defeat it:
//!
//! ```text
//! process.env?.API_KEY               // optional chaining
//! const { API_KEY } = process.env    // destructuring
//! ```
//!
//! The pipeline is layered: `eda-scanner` → `eda-parser` → `eda-binder`
//! → `eda-checker`. This crate wires them together and renders results.

pub use eda_binder as binder;
pub use eda_checker as checker;
pub use eda_common as common;
pub use eda_parser as parser;
pub use eda_scanner as scanner;

pub use eda_checker::{
    DirectAccessOptions, DirectAccessViolation, OptionsIssue, ProtectedPaths, ViolationKind,
};
pub use eda_common::{Diagnostic, DiagnosticCategory};

// Parse → bind → check for single units and batches
pub mod pipeline;
pub use pipeline::{SourceUnit, UnitOutcome, check_source, check_sources};
#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;

// Text rendering with code frames
pub mod reporter;
pub use reporter::{Reporter, format_diagnostic};
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;
