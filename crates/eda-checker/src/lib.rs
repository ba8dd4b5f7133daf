//! Direct-access rule for the enforce-direct-access workspace.
//!
//! This crate provides:
//! - `DirectAccessChecker` - walks a bound file and reports the first unsafe
//!   access to a protected path
//! - `ProtectedPaths` / `DirectAccessOptions` - configuration
//! - `resolve_access_path` - static dotted paths of member chains
//! - `BindingResolver` - scope lookup used to skip shadowed bases
//! - `DirectAccessViolation` / `ViolationKind` - what went wrong, and where

pub mod access_path;
pub use access_path::{PathBase, ResolvedPath, is_optional_chain_access, resolve_access_path};

pub mod direct_access;
pub use direct_access::DirectAccessChecker;

pub mod global_reference;
pub use global_reference::{BindingLookup, BindingResolver, NoBindings, is_global_reference};

pub mod options;
pub use options::{DirectAccessOptions, OptionsIssue};

pub mod protected_paths;
pub use protected_paths::{ProtectedPaths, path_starts_with};

pub mod violations;
pub use violations::{DirectAccessViolation, ViolationKind};

#[cfg(test)]
#[path = "../tests/access_path_tests.rs"]
mod access_path_tests;

#[cfg(test)]
#[path = "../tests/protected_paths_tests.rs"]
mod protected_paths_tests;

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;

#[cfg(test)]
#[path = "../tests/violations_tests.rs"]
mod violations_tests;

#[cfg(test)]
#[path = "../tests/direct_access_tests.rs"]
mod direct_access_tests;
