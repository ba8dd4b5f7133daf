//! Parse, bind and check source units.
//!
//! Each unit is independent: it gets its own arena and binder, and only the
//! protected paths are shared. `check_sources` fans units out over rayon.

use eda_binder::BinderState;
use eda_checker::{DirectAccessChecker, DirectAccessOptions, ProtectedPaths};
use eda_common::Diagnostic;
use eda_parser::{ParseDiagnostic, ParserState};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info_span};

/// One file to check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub file_name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> SourceUnit {
        SourceUnit {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

/// Result of checking one unit. `diagnostic` is the first parse error or
/// violation, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    pub file_name: String,
    pub diagnostic: Option<Diagnostic>,
}

impl UnitOutcome {
    pub fn is_clean(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Check one source text.
pub fn check_source(
    file_name: &str,
    source: &str,
    options: &DirectAccessOptions,
) -> Result<(), Diagnostic> {
    let paths = ProtectedPaths::from_options(options);
    check_with_paths(file_name, source, &paths)
}

/// Check independent units in parallel. Outcomes are in input order.
pub fn check_sources(units: &[SourceUnit], options: &DirectAccessOptions) -> Vec<UnitOutcome> {
    let _span = info_span!("check_sources", units = units.len()).entered();
    let paths = ProtectedPaths::from_options(options);

    units
        .par_iter()
        .map(|unit| UnitOutcome {
            file_name: unit.file_name.clone(),
            diagnostic: check_with_paths(&unit.file_name, &unit.source, &paths).err(),
        })
        .collect()
}

#[tracing::instrument(level = "debug", skip(source, paths), fields(len = source.len()))]
fn check_with_paths(
    file_name: &str,
    source: &str,
    paths: &ProtectedPaths,
) -> Result<(), Diagnostic> {
    if paths.is_empty() {
        return Ok(());
    }

    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    if let Some(error) = parser.get_diagnostics().first() {
        debug!(code = error.code, "parse failed; unit not checked");
        return Err(parse_diagnostic_to_diagnostic(file_name, error));
    }

    let arena = parser.get_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(arena, root);

    DirectAccessChecker::new(arena, &binder, paths)
        .check_source_file(root)
        .map_err(|violation| violation.into_diagnostic(file_name))
}

fn parse_diagnostic_to_diagnostic(file_name: &str, error: &ParseDiagnostic) -> Diagnostic {
    Diagnostic::error(
        file_name.to_string(),
        error.start,
        error.length,
        error.message.clone(),
        error.code,
    )
}
