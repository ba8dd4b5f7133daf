//! The configured set of protected paths.

use crate::options::DirectAccessOptions;
use indexmap::IndexSet;

/// Protected dotted paths, de-duplicated, in configured order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtectedPaths {
    paths: IndexSet<String>,
}

impl ProtectedPaths {
    /// Build from raw entries. Blank entries are dropped.
    pub fn new<I, S>(paths: I) -> ProtectedPaths
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths = paths
            .into_iter()
            .map(Into::into)
            .filter(|path: &String| !path.trim().is_empty())
            .collect();
        ProtectedPaths { paths }
    }

    pub fn from_options(options: &DirectAccessOptions) -> ProtectedPaths {
        match &options.paths {
            Some(paths) => ProtectedPaths::new(paths.iter().cloned()),
            None => ProtectedPaths::default(),
        }
    }

    /// No paths configured: every check is a no-op.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.paths.iter().map(String::as_str)
    }

    /// Exact membership.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// The configured path that `path` equals or descends from.
    ///
    /// When several configured paths are ancestors of `path`, the longest
    /// one wins.
    pub fn match_path(&self, path: &str) -> Option<&str> {
        if let Some(exact) = self.paths.get(path) {
            return Some(exact.as_str());
        }
        self.paths
            .iter()
            .filter(|protected| path_starts_with(path, protected))
            .max_by_key(|protected| protected.len())
            .map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ProtectedPaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ProtectedPaths::new(iter)
    }
}

/// Segment-aligned prefix test: `process.env.A` starts with `process.env`,
/// `process.environment` does not.
pub fn path_starts_with(full_path: &str, prefix: &str) -> bool {
    full_path == prefix
        || full_path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}
