//! Locked versions from `pnpm-lock.yaml`.
//!
//! Handles every lockfile generation pnpm has written:
//!
//! - single-project lockfiles with top-level `dependencies` (v5 and earlier)
//! - monorepo lockfiles with per-project `importers`
//! - bare version strings (`foo: 1.0.0`) and `{specifier, version}` objects (v9)
//! - numeric (`5.4`) and textual (`'6.0'`) `lockfileVersion` values
//!
//! Peer-resolution suffixes such as `1.0.0(react@18.2.0)` are stripped.

use crate::core::types::{
    DependencyCategory, LockedVersions, PnpmLock, ROOT_SCOPE, ScopeVersions,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Highest lockfile schema this parser has been verified against.
pub const HIGHEST_KNOWN_LOCKFILE_VERSION: f64 = 9.0;

const LOCKFILE_MARKER: &str = "lockfileVersion";

/// pnpm releases writing each lockfile schema, newest first.
const PNPM_VERSIONS_BY_LOCKFILE: [(f64, &str); 6] = [
    (9.0, ">=9"),
    (6.0, ">=7.24.2 <9"),
    (5.4, ">=7 <8"),
    (5.3, ">=6 <7"),
    (5.2, ">=5.10.0 <6"),
    (5.1, ">=3.5.0 <5.9.3"),
];

/// Outcome of reading a lockfile. Never an error: failures carry their cause.
#[derive(Debug, Clone, PartialEq)]
pub enum LockfileOutcome {
    /// The lockfile was understood.
    Parsed(PnpmLock),
    /// The file could not be read.
    Unreadable {
        /// I/O error description.
        message: String,
    },
    /// The content is not valid YAML.
    DecodeFailed {
        /// Decoder error description.
        message: String,
    },
    /// The document is empty or has no `lockfileVersion`.
    MissingMarker,
    /// The document is a lockfile but a field has an unexpected shape.
    InvalidShape {
        /// Description of the offending field.
        message: String,
    },
}

impl LockfileOutcome {
    /// Whether the lockfile was understood.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// The parsed lockfile, if any.
    #[must_use]
    pub fn lock(&self) -> Option<&PnpmLock> {
        match self {
            Self::Parsed(lock) => Some(lock),
            _ => None,
        }
    }

    /// The parsed lockfile, or an empty one without a version on failure.
    #[must_use]
    pub fn into_lock(self) -> PnpmLock {
        match self {
            Self::Parsed(lock) => lock,
            _ => PnpmLock::default(),
        }
    }
}

impl fmt::Display for LockfileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(lock) => write!(
                f,
                "parsed lockfile with {} scope(s)",
                lock.locked_versions_with_path.len()
            ),
            Self::Unreadable { message } => write!(f, "unreadable lockfile: {message}"),
            Self::DecodeFailed { message } => write!(f, "invalid YAML: {message}"),
            Self::MissingMarker => write!(f, "missing {LOCKFILE_MARKER}"),
            Self::InvalidShape { message } => write!(f, "unexpected lockfile shape: {message}"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LockfileVersion {
    Number(f64),
    Text(String),
}

impl LockfileVersion {
    fn normalize(&self) -> Option<f64> {
        let version = match self {
            Self::Number(number) => *number,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        version.is_finite().then_some(version)
    }
}

/// A locked dependency: a bare version or an object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionCarrier {
    Bare(String),
    Detailed { version: String },
}

impl VersionCarrier {
    fn version(&self) -> &str {
        match self {
            Self::Bare(version) | Self::Detailed { version } => version,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependencySet {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, VersionCarrier>>,
    #[serde(default)]
    dev_dependencies: Option<BTreeMap<String, VersionCarrier>>,
    #[serde(default)]
    optional_dependencies: Option<BTreeMap<String, VersionCarrier>>,
}

impl RawDependencySet {
    fn get(&self, category: DependencyCategory) -> Option<&BTreeMap<String, VersionCarrier>> {
        match category {
            DependencyCategory::Dependencies => self.dependencies.as_ref(),
            DependencyCategory::DevDependencies => self.dev_dependencies.as_ref(),
            DependencyCategory::OptionalDependencies => self.optional_dependencies.as_ref(),
        }
    }

    fn locked_versions(&self) -> ScopeVersions {
        let mut scope = ScopeVersions::default();
        for category in DependencyCategory::ALL {
            let Some(entries) = self.get(category) else {
                continue;
            };
            let versions = scope.get_mut(category);
            for (name, carrier) in entries {
                versions.insert(name.clone(), strip_peer_suffix(carrier.version()).to_string());
            }
        }
        scope
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLockfileHeader {
    lockfile_version: LockfileVersion,
    /// Only a non-empty mapping selects the monorepo shape.
    #[serde(default)]
    importers: Option<serde_yaml::Value>,
}

impl RawLockfileHeader {
    fn importers(&self) -> Option<&serde_yaml::Value> {
        self.importers
            .as_ref()
            .filter(|value| value.as_mapping().is_some_and(|m| !m.is_empty()))
    }
}

/// Truncates a locked version at its peer-resolution suffix.
///
/// # Example
///
/// ```
/// use lockscope_workspaces::strip_peer_suffix;
///
/// assert_eq!(strip_peer_suffix("1.0.0(bar@2.0.0)"), "1.0.0");
/// assert_eq!(strip_peer_suffix("link:../shared"), "link:../shared");
/// ```
#[must_use]
pub fn strip_peer_suffix(version: &str) -> &str {
    version.split('(').next().unwrap_or(version).trim()
}

/// Parses lockfile content into locked versions per importer scope.
///
/// Never fails: an unusable document yields a non-[`Parsed`](LockfileOutcome::Parsed)
/// outcome, logged at debug level.
///
/// # Example
///
/// ```
/// use lockscope_workspaces::{parse_lock, DependencyCategory};
///
/// let lock = parse_lock("lockfileVersion: '6.0'\ndependencies:\n  foo: 1.0.0\n").into_lock();
/// assert_eq!(lock.lockfile_version, Some(6.0));
///
/// let root = lock.locked_versions_with_path.scope(".").unwrap();
/// assert_eq!(root.version(DependencyCategory::Dependencies, "foo"), Some("1.0.0"));
/// ```
#[must_use]
pub fn parse_lock(content: &str) -> LockfileOutcome {
    let outcome = decode_lock(content);
    log_outcome(&outcome, None);
    outcome
}

/// Reads and parses a lockfile from disk.
#[must_use]
pub fn read_lock(path: &Path) -> LockfileOutcome {
    let outcome = match fs::read_to_string(path) {
        Ok(content) => decode_lock(&content),
        Err(e) => LockfileOutcome::Unreadable {
            message: e.to_string(),
        },
    };
    log_outcome(&outcome, Some(path));
    outcome
}

/// pnpm version range that writes lockfiles of `lockfile_version`.
///
/// # Example
///
/// ```
/// use lockscope_workspaces::pnpm_constraint;
///
/// assert_eq!(pnpm_constraint(6.0), Some(">=7.24.2 <9"));
/// assert_eq!(pnpm_constraint(4.0), None);
/// ```
#[must_use]
pub fn pnpm_constraint(lockfile_version: f64) -> Option<&'static str> {
    PNPM_VERSIONS_BY_LOCKFILE
        .iter()
        .find(|(version, _)| (version - lockfile_version).abs() < f64::EPSILON)
        .map(|(_, constraint)| *constraint)
}

fn decode_lock(content: &str) -> LockfileOutcome {
    let document: serde_yaml::Value = match serde_yaml::from_str(content) {
        Ok(document) => document,
        Err(e) => {
            return LockfileOutcome::DecodeFailed {
                message: e.to_string(),
            };
        }
    };

    let has_marker = document
        .as_mapping()
        .is_some_and(|mapping| mapping.contains_key(LOCKFILE_MARKER));
    if !has_marker {
        return LockfileOutcome::MissingMarker;
    }

    let header = match RawLockfileHeader::deserialize(&document) {
        Ok(header) => header,
        Err(e) => return invalid_shape(e),
    };

    let Some(lockfile_version) = header.lockfile_version.normalize() else {
        return LockfileOutcome::InvalidShape {
            message: format!("{LOCKFILE_MARKER} is not numeric: {:?}", header.lockfile_version),
        };
    };
    if lockfile_version > HIGHEST_KNOWN_LOCKFILE_VERSION {
        tracing::warn!(
            "Encountered pnpm lockfile version '{lockfile_version}' which is newer than the highest tested version ({HIGHEST_KNOWN_LOCKFILE_VERSION}). Locked versions may be incomplete.",
        );
    }

    let mut locked = LockedVersions::new();
    match header.importers() {
        Some(importers) => {
            let importers = match BTreeMap::<String, RawDependencySet>::deserialize(importers) {
                Ok(importers) => importers,
                Err(e) => return invalid_shape(e),
            };
            for (scope, set) in importers {
                locked.insert(scope, set.locked_versions());
            }
        }
        None => {
            let root = match RawDependencySet::deserialize(&document) {
                Ok(root) => root,
                Err(e) => return invalid_shape(e),
            };
            locked.insert(ROOT_SCOPE, root.locked_versions());
        }
    }

    LockfileOutcome::Parsed(PnpmLock {
        lockfile_version: Some(lockfile_version),
        locked_versions_with_path: locked,
    })
}

fn invalid_shape(error: serde_yaml::Error) -> LockfileOutcome {
    LockfileOutcome::InvalidShape {
        message: error.to_string(),
    }
}

fn log_outcome(outcome: &LockfileOutcome, path: Option<&Path>) {
    let path = path.map(|p| p.display().to_string()).unwrap_or_default();
    match outcome {
        LockfileOutcome::Parsed(lock) => tracing::trace!(
            path = %path,
            lockfile_version = ?lock.lockfile_version,
            scopes = lock.locked_versions_with_path.len(),
            "pnpm lockfile parsed"
        ),
        failure => tracing::debug!(path = %path, "Invalid or empty lockfile: {failure}"),
    }
}
