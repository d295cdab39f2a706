//! Traits for the collaborators this crate delegates to.

use crate::core::types::DependencyDetails;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Expands workspace package filters into package directories.
///
/// # Example
///
/// ```rust,ignore
/// use lockscope_workspaces::GlobExpander;
/// use std::path::{Path, PathBuf};
///
/// struct FixedExpander(Vec<PathBuf>);
///
/// impl GlobExpander for FixedExpander {
///     fn expand(
///         &self,
///         _base_dir: &Path,
///         _patterns: Option<&[String]>,
///         _ignore: &[String],
///     ) -> Result<Vec<PathBuf>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait GlobExpander {
    /// Returns the package directories under `base_dir` matched by `patterns`.
    ///
    /// `None` means every package under `base_dir`, the root included.
    /// Patterns prefixed with `!` exclude matches. `ignore` globs are applied
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or the tree cannot be scanned.
    fn expand(
        &self,
        base_dir: &Path,
        patterns: Option<&[String]>,
        ignore: &[String],
    ) -> Result<Vec<PathBuf>>;
}

impl<T: GlobExpander + ?Sized> GlobExpander for &T {
    fn expand(
        &self,
        base_dir: &Path,
        patterns: Option<&[String]>,
        ignore: &[String],
    ) -> Result<Vec<PathBuf>> {
        (**self).expand(base_dir, patterns, ignore)
    }
}

/// Normalizes dependency names and derives lookup details from version specs.
pub trait DependencyEnricher {
    /// Canonical dependency name for a key found under `dep_type`.
    fn normalize_name(&self, dep_type: &str, key: &str) -> String;

    /// Lookup details for `dep_name` requested as `spec`.
    fn extract_details(&self, dep_type: &str, dep_name: &str, spec: &str) -> DependencyDetails;
}
