//! Reads the `packages` filter list from `pnpm-workspace.yaml`.

use crate::config::ResolverConfig;
use crate::discovery::read_yaml_file;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct PnpmWorkspaceFilters {
    packages: Vec<String>,
}

/// Returns the `packages` globs of a workspace configuration.
///
/// `None` when the file cannot be read or decoded, or when `packages` is
/// missing or not a list of strings. Each cause is logged at trace level.
#[must_use]
pub fn extract_filters(config: &ResolverConfig, workspace_config_path: &Path) -> Option<Vec<String>> {
    match read_filters(&config.local_path(workspace_config_path)) {
        Ok(packages) => Some(packages),
        Err(Error::InvalidWorkspaceConfig { message, .. }) => {
            tracing::trace!(
                file_name = %workspace_config_path.display(),
                "Failed to find required \"packages\" array in {}: {message}",
                config.workspace_file_name
            );
            None
        }
        Err(err) => {
            tracing::trace!(
                file_name = %workspace_config_path.display(),
                "Failed to parse {}: {err}",
                config.workspace_file_name
            );
            None
        }
    }
}

fn read_filters(path: &Path) -> Result<Vec<String>> {
    let document: serde_yaml::Value = read_yaml_file(path)?;
    serde_yaml::from_value::<PnpmWorkspaceFilters>(document)
        .map(|workspace| workspace.packages)
        .map_err(|e| Error::InvalidWorkspaceConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
