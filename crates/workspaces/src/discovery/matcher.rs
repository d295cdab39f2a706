//! Expands workspace filters into member manifest paths.

use crate::core::traits::GlobExpander;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Resolves the manifest path of every package matched by `filters`.
///
/// `filters = None` scans with the default patterns. `ignore` globs are always
/// applied. Callers scanning many package files should cache the result per
/// workspace root, as [`WorkspaceAnnotator`](crate::WorkspaceAnnotator) does.
///
/// # Errors
///
/// Propagates the expander's error, e.g. for an invalid glob.
pub fn resolve_member_packages<E: GlobExpander + ?Sized>(
    expander: &E,
    base_dir: &Path,
    filters: Option<&[String]>,
    ignore: &[String],
    manifest_file_name: &str,
) -> Result<Vec<PathBuf>> {
    let package_dirs = expander.expand(base_dir, filters, ignore)?;
    tracing::trace!(
        base_dir = %base_dir.display(),
        count = package_dirs.len(),
        "Expanded workspace packages"
    );
    Ok(package_dirs
        .into_iter()
        .map(|dir| dir.join(manifest_file_name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingExpander {
        calls: RefCell<Vec<(PathBuf, Option<Vec<String>>, Vec<String>)>>,
    }

    impl GlobExpander for RecordingExpander {
        fn expand(
            &self,
            base_dir: &Path,
            patterns: Option<&[String]>,
            ignore: &[String],
        ) -> Result<Vec<PathBuf>> {
            self.calls.borrow_mut().push((
                base_dir.to_path_buf(),
                patterns.map(<[String]>::to_vec),
                ignore.to_vec(),
            ));
            Ok(vec![base_dir.join("packages/a"), base_dir.join("packages/b")])
        }
    }

    struct FailingExpander;

    impl GlobExpander for FailingExpander {
        fn expand(&self, _: &Path, _: Option<&[String]>, _: &[String]) -> Result<Vec<PathBuf>> {
            Err(Error::GlobPattern {
                pattern: "[".to_string(),
                message: "invalid range pattern".to_string(),
            })
        }
    }

    #[test]
    fn maps_directories_to_manifests() {
        let expander = RecordingExpander::default();
        let ignore = vec!["**/node_modules/**".to_string()];
        let filters = vec!["packages/*".to_string()];

        let paths = resolve_member_packages(
            &expander,
            Path::new("/repo"),
            Some(&filters),
            &ignore,
            "package.json",
        )
        .unwrap();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/repo/packages/a/package.json"),
                PathBuf::from("/repo/packages/b/package.json"),
            ]
        );
        let calls = expander.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, Some(filters));
        assert_eq!(calls[0].2, ignore);
    }

    #[test]
    fn passes_missing_filters_through() {
        let expander = RecordingExpander::default();
        resolve_member_packages(&expander, Path::new("/repo"), None, &[], "package.json").unwrap();
        assert_eq!(expander.calls.borrow()[0].1, None);
    }

    #[test]
    fn propagates_expander_errors() {
        let result =
            resolve_member_packages(&FailingExpander, Path::new("/repo"), None, &[], "package.json");
        assert!(matches!(result, Err(Error::GlobPattern { .. })));
    }
}
