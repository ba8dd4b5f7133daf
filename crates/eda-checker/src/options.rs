//! Rule options.
//!
//! ```json
//! { "paths": ["process.env", "import.meta.env"] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Options for the direct-access rule.
///
/// Absent or empty `paths` leave the rule inert.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectAccessOptions {
    pub paths: Option<Vec<String>>,
}

impl DirectAccessOptions {
    pub fn with_paths<I, S>(paths: I) -> DirectAccessOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DirectAccessOptions {
            paths: Some(paths.into_iter().map(Into::into).collect()),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<DirectAccessOptions> {
        serde_json::from_str(json)
    }

    /// Parse options, falling back to inert options on malformed input.
    pub fn from_json_lossy(json: &str) -> DirectAccessOptions {
        match Self::from_json(json) {
            Ok(options) => options,
            Err(err) => {
                warn!(%err, "malformed direct-access options; rule disabled");
                DirectAccessOptions::default()
            }
        }
    }

    /// Whether at least one path is configured.
    pub fn is_active(&self) -> bool {
        self.paths.as_ref().is_some_and(|paths| !paths.is_empty())
    }

    /// Advisory checks on the configured paths. Never fatal: entries that
    /// cannot match simply never fire.
    pub fn validate(&self) -> Vec<OptionsIssue> {
        let Some(paths) = self.paths.as_ref().filter(|paths| !paths.is_empty()) else {
            return vec![OptionsIssue::NoPaths];
        };

        let mut issues = Vec::new();
        for (index, path) in paths.iter().enumerate() {
            if path.trim().is_empty() {
                issues.push(OptionsIssue::EmptyEntry { index });
                continue;
            }
            if path.trim() != path {
                issues.push(OptionsIssue::SurroundingWhitespace {
                    index,
                    path: path.clone(),
                });
            }
            if path.split('.').any(|segment| segment.trim().is_empty()) {
                issues.push(OptionsIssue::EmptySegment {
                    index,
                    path: path.clone(),
                });
            }
        }
        issues
    }
}

/// A problem found by [`DirectAccessOptions::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionsIssue {
    NoPaths,
    EmptyEntry { index: usize },
    SurroundingWhitespace { index: usize, path: String },
    /// `process..env`, `.env`, `process.`
    EmptySegment { index: usize, path: String },
}

impl fmt::Display for OptionsIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsIssue::NoPaths => f.write_str(
                "'paths' cannot be empty. Please provide at least one path to check.",
            ),
            OptionsIssue::EmptyEntry { index } => {
                write!(f, "'paths[{index}]' is empty and will be ignored.")
            }
            OptionsIssue::SurroundingWhitespace { index, path } => write!(
                f,
                "'paths[{index}]' ({path:?}) has surrounding whitespace and will never match."
            ),
            OptionsIssue::EmptySegment { index, path } => write!(
                f,
                "'paths[{index}]' ({path:?}) contains an empty segment and will never match."
            ),
        }
    }
}
