use crate::options::DirectAccessOptions;
use crate::protected_paths::{ProtectedPaths, path_starts_with};

#[test]
fn test_segment_aligned_prefix() {
    assert!(path_starts_with("process.env", "process.env"));
    assert!(path_starts_with("process.env.API_KEY", "process.env"));
    assert!(path_starts_with("process.env.A.B", "process"));
    assert!(!path_starts_with("process.environment", "process.env"));
    assert!(!path_starts_with("process", "process.env"));
    assert!(!path_starts_with("xprocess.env", "process.env"));
}

#[test]
fn test_exact_match_wins() {
    let paths = ProtectedPaths::new(["process", "process.env"]);
    assert_eq!(paths.match_path("process.env"), Some("process.env"));
    assert_eq!(paths.match_path("process"), Some("process"));
}

#[test]
fn test_longest_ancestor_wins() {
    let paths = ProtectedPaths::new(["process", "process.env"]);
    assert_eq!(paths.match_path("process.env.API_KEY"), Some("process.env"));
    assert_eq!(paths.match_path("process.argv"), Some("process"));

    // Order of configuration does not matter
    let reversed = ProtectedPaths::new(["process.env", "process"]);
    assert_eq!(reversed.match_path("process.env.API_KEY"), Some("process.env"));
}

#[test]
fn test_unrelated_paths_do_not_match() {
    let paths = ProtectedPaths::new(["process.env"]);
    assert_eq!(paths.match_path("process"), None);
    assert_eq!(paths.match_path("process.environment"), None);
    assert_eq!(paths.match_path("import.meta.env"), None);
}

#[test]
fn test_contains_is_exact() {
    let paths = ProtectedPaths::new(["process.env.API_KEY"]);
    assert!(paths.contains("process.env.API_KEY"));
    assert!(!paths.contains("process.env"));
    assert!(!paths.contains("process.env.API_KEY.length"));
}

#[test]
fn test_blank_entries_are_dropped_and_duplicates_collapsed() {
    let paths: ProtectedPaths = ["process.env", "", "   ", "process.env", "import.meta.env"]
        .into_iter()
        .collect();
    assert_eq!(paths.len(), 2);
    assert_eq!(
        paths.iter().collect::<Vec<_>>(),
        vec!["process.env", "import.meta.env"]
    );
}

#[test]
fn test_from_options() {
    assert!(ProtectedPaths::from_options(&DirectAccessOptions::default()).is_empty());
    assert!(ProtectedPaths::from_options(&DirectAccessOptions::with_paths(Vec::<String>::new())).is_empty());

    let paths = ProtectedPaths::from_options(&DirectAccessOptions::with_paths(["process.env"]));
    assert_eq!(paths.len(), 1);
    assert!(paths.contains("process.env"));
}
