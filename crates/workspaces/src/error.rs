//! Error types for workspace operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving pnpm workspaces, lockfiles and catalogs.
///
/// None of these escape the public extraction surface: callers of
/// [`find_workspace`](crate::find_workspace), [`WorkspaceAnnotator`](crate::WorkspaceAnnotator),
/// [`parse_lock`](crate::parse_lock) and [`extract_workspace_file`](crate::extract_workspace_file)
/// only ever observe absence values. [`locate_workspace`](crate::locate_workspace),
/// [`extract_catalogs`](crate::extract_catalogs) and the glob expanders return it.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No workspace configuration in any ancestor directory.
    #[error("No {file_name} found for package file: {package_file}")]
    #[diagnostic(
        code(lockscope::workspaces::workspace_not_found),
        help("Workspace detection walks from the package file's directory up to the repository root")
    )]
    WorkspaceNotFound {
        /// Package file the search started from.
        package_file: PathBuf,
        /// Workspace configuration file name that was searched for.
        file_name: String,
    },

    /// Workspace configuration exists but its sibling lockfile does not.
    #[error("Lockfile not found at path: {path}")]
    #[diagnostic(
        code(lockscope::workspaces::lockfile_not_found),
        help("Run 'pnpm install' in the workspace root to generate pnpm-lock.yaml")
    )]
    LockfileNotFound {
        /// The path where the lockfile was expected.
        path: PathBuf,
    },

    /// Workspace configuration is well-formed YAML but has the wrong shape.
    #[error("Invalid workspace configuration at {path}: {message}")]
    #[diagnostic(
        code(lockscope::workspaces::invalid_config),
        help("Check pnpm-workspace.yaml for missing or mistyped fields")
    )]
    InvalidWorkspaceConfig {
        /// Path to the invalid configuration file.
        path: PathBuf,
        /// Description of what is invalid.
        message: String,
    },

    /// A workspace package filter is not a valid glob.
    #[error("Invalid package glob '{pattern}': {message}")]
    #[diagnostic(
        code(lockscope::workspaces::glob_pattern),
        help("Workspace package filters use glob syntax, e.g. 'packages/*' or '!**/test/**'")
    )]
    GlobPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the pattern error.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(lockscope::workspaces::io_error),
        help("Check that the referenced paths exist and that you have permission to read them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(lockscope::workspaces::yaml_error),
        help("Ensure the YAML has valid syntax")
    )]
    Yaml {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Yaml { source, path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn test_workspace_not_found_error() {
        let error = Error::WorkspaceNotFound {
            package_file: PathBuf::from("packages/a/package.json"),
            file_name: "pnpm-workspace.yaml".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("No pnpm-workspace.yaml found"));
        assert!(message.contains("packages/a/package.json"));
    }

    #[test]
    fn test_lockfile_not_found_error() {
        let error = Error::LockfileNotFound {
            path: PathBuf::from("/workspace/pnpm-lock.yaml"),
        };

        let message = error.to_string();
        assert!(message.contains("Lockfile not found"));
        assert!(message.contains("pnpm-lock.yaml"));
    }

    #[test]
    fn test_glob_pattern_error() {
        let error = Error::GlobPattern {
            pattern: "packages/[".to_string(),
            message: "invalid range pattern".to_string(),
        };

        assert!(error.to_string().contains("packages/["));
        assert_eq!(
            error.code().map(|c| c.to_string()),
            Some("lockscope::workspaces::glob_pattern".to_string())
        );
    }

    #[test]
    fn test_io_error_no_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = Error::Io {
            source: io_error,
            path: None,
            operation: "reading pnpm-workspace.yaml".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("I/O error during reading pnpm-workspace.yaml"));
        assert!(!message.contains(" at "));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: Error = yaml_error.into();

        match error {
            Error::Yaml { source: _, path } => assert_eq!(path, None),
            _ => panic!("Expected Yaml error variant"),
        }
    }

    #[test]
    fn test_diagnostic_help_messages() {
        let errors = [
            Error::WorkspaceNotFound {
                package_file: PathBuf::from("package.json"),
                file_name: "pnpm-workspace.yaml".to_string(),
            },
            Error::LockfileNotFound {
                path: PathBuf::from("/test"),
            },
            Error::InvalidWorkspaceConfig {
                path: PathBuf::from("/test"),
                message: "test".to_string(),
            },
        ];

        for error in &errors {
            assert!(error.code().is_some());
            assert!(error.help().is_some());
        }
    }
}
