//! Workspace discovery for pnpm.
//!
//! Resolution runs in three steps, each usable on its own:
//!
//! 1. [`find_workspace`] locates `pnpm-workspace.yaml` and its sibling lockfile
//! 2. [`extract_filters`] reads the `packages` glob list
//! 3. [`resolve_member_packages`] expands the globs into member manifest paths
//!
//! [`WorkspaceAnnotator`] drives all three for a batch of package files.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lockscope_workspaces::{PackageFileRecord, ResolverConfig, WorkspaceAnnotator, WorkspaceMatchCache};
//!
//! let annotator = WorkspaceAnnotator::new(ResolverConfig::new("/repo"));
//! let mut records = vec![PackageFileRecord::new("packages/a/package.json")];
//! annotator.annotate(&mut records, &mut WorkspaceMatchCache::new());
//! ```

use crate::core::traits::GlobExpander;
use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod annotator;
pub mod filters;
pub mod locator;
pub mod matcher;

pub use annotator::{WorkspaceAnnotator, annotate_all};
pub use filters::extract_filters;
pub use locator::{find_workspace, locate_workspace};
pub use matcher::resolve_member_packages;

/// Patterns used when a workspace declares no usable `packages` list.
pub const DEFAULT_PACKAGE_PATTERNS: [&str; 2] = [".", "**"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Filesystem [`GlobExpander`] built on `walkdir` and `glob`.
///
/// A directory is a package when it holds the manifest file. Ignore globs of
/// the form `**/<dir>/**` prune the walk so dependency caches are never
/// traversed.
#[derive(Debug, Clone)]
pub struct WalkdirGlobExpander {
    manifest_file_name: String,
}

impl WalkdirGlobExpander {
    /// Creates an expander recognizing packages by `manifest_file_name`.
    #[must_use]
    pub fn new(manifest_file_name: impl Into<String>) -> Self {
        Self {
            manifest_file_name: manifest_file_name.into(),
        }
    }

    fn is_package_dir(&self, dir: &Path) -> bool {
        dir.join(&self.manifest_file_name).is_file()
    }
}

impl Default for WalkdirGlobExpander {
    fn default() -> Self {
        Self::new(crate::config::MANIFEST_FILE_NAME)
    }
}

impl GlobExpander for WalkdirGlobExpander {
    fn expand(
        &self,
        base_dir: &Path,
        patterns: Option<&[String]>,
        ignore: &[String],
    ) -> Result<Vec<PathBuf>> {
        let patterns: Vec<String> = patterns.map_or_else(
            || DEFAULT_PACKAGE_PATTERNS.iter().map(ToString::to_string).collect(),
            <[String]>::to_vec,
        );

        let mut include_root = false;
        let mut inclusion_patterns = Vec::new();
        let mut exclusion_patterns = ignore
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>>>()?;

        for raw in &patterns {
            if let Some(stripped) = raw.trim().strip_prefix('!') {
                exclusion_patterns.push(compile_pattern(normalize_pattern(stripped))?);
                continue;
            }
            let pattern = normalize_pattern(raw);
            if pattern.is_empty() || pattern == "." {
                include_root = true;
            } else {
                inclusion_patterns.push(compile_pattern(pattern)?);
            }
        }

        let pruned = pruned_dir_names(ignore);
        let mut matched_paths = BTreeSet::new();

        if include_root && self.is_package_dir(base_dir) {
            matched_paths.insert(base_dir.to_path_buf());
        }

        let walker = WalkDir::new(base_dir).follow_links(false);
        for entry in walker
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_str().unwrap_or("");
                e.depth() == 0 || !(e.file_type().is_dir() && pruned.contains(&name))
            })
            .filter_map(std::result::Result::ok)
        {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let Ok(rel_path) = path.strip_prefix(base_dir) else {
                continue;
            };

            if exclusion_patterns
                .iter()
                .any(|p| p.matches_path_with(rel_path, MATCH_OPTIONS))
            {
                continue;
            }

            let is_included = inclusion_patterns
                .iter()
                .any(|p| p.matches_path_with(rel_path, MATCH_OPTIONS));
            if is_included && self.is_package_dir(path) {
                matched_paths.insert(path.to_path_buf());
            }
        }

        Ok(matched_paths.into_iter().collect())
    }
}

fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| Error::GlobPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })
}

/// Trims `./` prefixes and trailing slashes so `./packages/*/` matches like `packages/*`.
fn normalize_pattern(pattern: &str) -> &str {
    let mut pattern = pattern.trim();
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern.trim_end_matches('/')
}

/// Directory names that can be skipped outright, from `**/<name>/**` ignores.
fn pruned_dir_names(ignore: &[String]) -> Vec<&str> {
    ignore
        .iter()
        .filter_map(|p| p.strip_prefix("**/").and_then(|p| p.strip_suffix("/**")))
        .filter(|name| !name.contains(['*', '?', '[', '/']))
        .collect()
}

/// Reads and parses a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Yaml`] if it
/// is not valid YAML for `T`.
pub fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::Io {
        source: e,
        path: Some(path.to_path_buf()),
        operation: "reading yaml file".to_string(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| Error::Yaml {
        source: e,
        path: Some(path.to_path_buf()),
    })
}
