//! Property-based tests for version and path handling.
//!
//! - Peer suffix stripping never keeps a `(` and is idempotent
//! - Path suffix membership holds for any prefix and rejects sibling packages
//! - Catalog extraction keeps declaration order and always leads with `default`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use lockscope_workspaces::{extract_catalogs, is_path_suffix, strip_peer_suffix};
use proptest::prelude::*;
use std::path::PathBuf;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate semver-like versions
fn version_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}".prop_map(String::from)
}

/// Generate peer resolution suffixes like `(react@18.3.1)(typescript@5.5.4)`
fn peer_suffix_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z][a-z-]{0,8}", version_strategy()), 1..4).prop_map(|peers| {
        peers
            .into_iter()
            .map(|(name, version)| format!("({name}@{version})"))
            .collect()
    })
}

/// Generate relative directory paths
fn dir_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..4).prop_map(|parts| parts.join("/"))
}

/// Generate distinct catalog names other than `default`
fn catalog_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("c[a-z0-9]{1,8}", 1..6)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

// =============================================================================
// Peer suffixes
// =============================================================================

proptest! {
    #[test]
    fn strip_peer_suffix_recovers_version(version in version_strategy(), peers in peer_suffix_strategy()) {
        let locked = format!("{version}{peers}");
        prop_assert_eq!(strip_peer_suffix(&locked), version.as_str());
    }

    #[test]
    fn strip_peer_suffix_is_idempotent(input in "[ -~]{0,40}") {
        let once = strip_peer_suffix(&input);
        prop_assert!(!once.contains('('));
        prop_assert_eq!(strip_peer_suffix(once), once);
    }
}

// =============================================================================
// Path suffix membership
// =============================================================================

proptest! {
    #[test]
    fn member_path_matches_under_any_root(root in dir_strategy(), package_dir in dir_strategy()) {
        let package_file = PathBuf::from(&package_dir).join("package.json");
        let member = PathBuf::from("/").join(&root).join(&package_file);
        prop_assert!(is_path_suffix(&member, &package_file));
    }

    #[test]
    fn sibling_package_does_not_match(root in dir_strategy(), name in "[a-z]{1,8}") {
        let member = PathBuf::from("/").join(&root).join(format!("{name}/package.json"));
        let other = PathBuf::from(format!("{name}-other/package.json"));
        prop_assert!(!is_path_suffix(&member, &other));
    }
}

// =============================================================================
// Catalog ordering
// =============================================================================

proptest! {
    #[test]
    fn catalogs_keep_declaration_order(names in catalog_names_strategy()) {
        let mut yaml = String::from("catalogs:\n");
        for name in &names {
            yaml.push_str(&format!("  {name}:\n    react: 18.0.0\n"));
        }

        let catalogs = extract_catalogs(&yaml).unwrap();
        let extracted: Vec<&str> = catalogs.iter().map(|c| c.name.as_str()).collect();

        prop_assert_eq!(extracted[0], "default");
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(&extracted[1..], expected.as_slice());
    }
}
