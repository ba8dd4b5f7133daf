//! Common types and utilities for the enforce-direct-access workspace.
//!
//! This crate provides foundational types used across all eda crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message formatting)
//! - Centralized limits for tree and scope walks
//! - Line/column positions for source locations

// Diagnostic records shared by the parser and the checker
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range};

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
