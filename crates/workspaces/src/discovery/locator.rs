//! Locates the pnpm workspace governing a package file.

use crate::config::ResolverConfig;
use crate::core::types::WorkspaceDescriptor;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Finds the workspace configuration and sibling lockfile for `package_file`.
///
/// Searches the package file's directory and then each ancestor, up to the
/// project root, for the workspace configuration file. Returns `None` when no
/// configuration exists or when it has no sibling lockfile; both cases are
/// logged at trace level.
///
/// # Example
///
/// ```no_run
/// use lockscope_workspaces::{find_workspace, ResolverConfig};
/// use std::path::Path;
///
/// let config = ResolverConfig::new("/repo");
/// if let Some(workspace) = find_workspace(&config, Path::new("packages/a/package.json")) {
///     println!("locked by {}", workspace.lock_file_path.display());
/// }
/// ```
#[must_use]
pub fn find_workspace(config: &ResolverConfig, package_file: &Path) -> Option<WorkspaceDescriptor> {
    match locate_workspace(config, package_file) {
        Ok(workspace) => Some(workspace),
        Err(Error::WorkspaceNotFound { package_file, .. }) => {
            tracing::trace!(
                package_file = %package_file.display(),
                "Failed to locate {} in a parent directory",
                config.workspace_file_name
            );
            None
        }
        Err(Error::LockfileNotFound { path }) => {
            tracing::trace!(
                package_file = %package_file.display(),
                lock_file = %path.display(),
                "Failed to find a {} sibling for the workspace",
                config.lock_file_name
            );
            None
        }
        Err(err) => {
            tracing::trace!(package_file = %package_file.display(), "Workspace lookup failed: {err}");
            None
        }
    }
}

/// [`find_workspace`] with the cause of a miss as an error.
///
/// # Errors
///
/// Returns [`Error::WorkspaceNotFound`] if no ancestor holds the workspace
/// configuration, or [`Error::LockfileNotFound`] if the lockfile next to it
/// is missing.
pub fn locate_workspace(config: &ResolverConfig, package_file: &Path) -> Result<WorkspaceDescriptor> {
    let workspace_config_path =
        find_sibling_or_parent(config, package_file, &config.workspace_file_name).ok_or_else(
            || Error::WorkspaceNotFound {
                package_file: package_file.to_path_buf(),
                file_name: config.workspace_file_name.clone(),
            },
        )?;

    let lock_file_path = workspace_config_path.with_file_name(&config.lock_file_name);
    if !config.local_path(&lock_file_path).is_file() {
        return Err(Error::LockfileNotFound {
            path: lock_file_path,
        });
    }

    Ok(WorkspaceDescriptor {
        workspace_config_path,
        lock_file_path,
    })
}

fn find_sibling_or_parent(
    config: &ResolverConfig,
    package_file: &Path,
    file_name: &str,
) -> Option<PathBuf> {
    package_file
        .ancestors()
        .skip(1)
        .map(|dir| dir.join(file_name))
        .find(|candidate| config.local_path(candidate).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_workspace_in_ancestor() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "pnpm-workspace.yaml");
        touch(temp.path(), "pnpm-lock.yaml");

        let config = ResolverConfig::new(temp.path());
        let workspace = find_workspace(&config, Path::new("packages/a/package.json")).unwrap();

        assert_eq!(workspace.workspace_config_path, PathBuf::from("pnpm-workspace.yaml"));
        assert_eq!(workspace.lock_file_path, PathBuf::from("pnpm-lock.yaml"));
    }

    #[test]
    fn finds_sibling_workspace() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "frontend/pnpm-workspace.yaml");
        touch(temp.path(), "frontend/pnpm-lock.yaml");

        let config = ResolverConfig::new(temp.path());
        let workspace = find_workspace(&config, Path::new("frontend/package.json")).unwrap();

        assert_eq!(
            workspace.lock_file_path,
            PathBuf::from("frontend/pnpm-lock.yaml")
        );
    }

    #[test]
    fn nearest_workspace_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "pnpm-workspace.yaml");
        touch(temp.path(), "pnpm-lock.yaml");
        touch(temp.path(), "nested/pnpm-workspace.yaml");
        touch(temp.path(), "nested/pnpm-lock.yaml");

        let config = ResolverConfig::new(temp.path());
        let workspace =
            find_workspace(&config, Path::new("nested/packages/x/package.json")).unwrap();

        assert_eq!(
            workspace.workspace_config_path,
            PathBuf::from("nested/pnpm-workspace.yaml")
        );
    }

    #[test]
    fn missing_workspace_is_none() {
        let temp = TempDir::new().unwrap();
        let config = ResolverConfig::new(temp.path());

        assert!(find_workspace(&config, Path::new("package.json")).is_none());
        assert!(matches!(
            locate_workspace(&config, Path::new("package.json")),
            Err(Error::WorkspaceNotFound { .. })
        ));
    }

    #[test]
    fn missing_lockfile_is_none() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "pnpm-workspace.yaml");
        let config = ResolverConfig::new(temp.path());

        assert!(find_workspace(&config, Path::new("packages/a/package.json")).is_none());
        match locate_workspace(&config, Path::new("packages/a/package.json")) {
            Err(Error::LockfileNotFound { path }) => {
                assert_eq!(path, PathBuf::from("pnpm-lock.yaml"));
            }
            other => panic!("Expected LockfileNotFound, got: {other:?}"),
        }
    }
}
