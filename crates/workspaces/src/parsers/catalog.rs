//! Catalogs declared in `pnpm-workspace.yaml`.
//!
//! ```yaml
//! catalog:
//!   react: ^18.3.0
//! catalogs:
//!   react17:
//!     react: ^17.0.2
//! ```

use crate::config::ResolverConfig;
use crate::core::traits::DependencyEnricher;
use crate::core::types::{
    CATALOG_DEPENDENCY_TYPE, Catalog, CatalogDependency, DEFAULT_CATALOG_NAME,
    WorkspaceFileContent,
};
use crate::enrichment::NpmDependencyEnricher;
use crate::error::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

type CatalogEntries = IndexMap<String, String>;

#[derive(Debug, Default, Deserialize)]
struct PnpmCatalogs {
    #[serde(default)]
    catalog: Option<CatalogEntries>,
    #[serde(default)]
    catalogs: Option<IndexMap<String, CatalogEntries>>,
}

/// Decodes the catalogs of a workspace configuration.
///
/// The first catalog is always [`DEFAULT_CATALOG_NAME`], empty when the
/// document has no `catalog` field; named catalogs follow in declaration
/// order. Entries of a named catalog called `default` are merged into the
/// default catalog, keeping top-level `catalog` values on conflict.
///
/// # Errors
///
/// Returns [`Error::Yaml`](crate::Error::Yaml) if the content is not valid
/// YAML or the catalog fields are not string maps.
///
/// # Example
///
/// ```
/// use lockscope_workspaces::extract_catalogs;
///
/// let catalogs = extract_catalogs("catalog:\n  react: 18.3.0\n")?;
/// assert_eq!(catalogs.len(), 1);
/// assert_eq!(catalogs[0].name, "default");
/// # Ok::<(), lockscope_workspaces::Error>(())
/// ```
pub fn extract_catalogs(content: &str) -> Result<Vec<Catalog>> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    let raw: PnpmCatalogs = if document.is_null() {
        PnpmCatalogs::default()
    } else {
        serde_yaml::from_value(document)?
    };

    let mut default_entries = raw.catalog.unwrap_or_default();
    let mut named = Vec::new();
    for (name, dependencies) in raw.catalogs.unwrap_or_default() {
        if name == DEFAULT_CATALOG_NAME {
            for (dep_name, spec) in dependencies {
                default_entries.entry(dep_name).or_insert(spec);
            }
        } else {
            named.push(Catalog { name, dependencies });
        }
    }

    let mut catalogs = Vec::with_capacity(named.len() + 1);
    catalogs.push(Catalog {
        name: DEFAULT_CATALOG_NAME.to_string(),
        dependencies: default_entries,
    });
    catalogs.extend(named);
    Ok(catalogs)
}

/// Turns catalog entries into dependencies using [`NpmDependencyEnricher`].
#[must_use]
pub fn build_catalog_dependencies(catalogs: &[Catalog]) -> Vec<CatalogDependency> {
    build_catalog_dependencies_with(catalogs, &NpmDependencyEnricher)
}

/// Turns catalog entries into dependencies, in catalog then entry order.
#[must_use]
pub fn build_catalog_dependencies_with<D: DependencyEnricher + ?Sized>(
    catalogs: &[Catalog],
    enricher: &D,
) -> Vec<CatalogDependency> {
    let mut deps = Vec::new();
    for catalog in catalogs {
        for (key, spec) in &catalog.dependencies {
            let dep_name = enricher.normalize_name(CATALOG_DEPENDENCY_TYPE, key);
            let details = enricher.extract_details(CATALOG_DEPENDENCY_TYPE, &dep_name, spec);
            let original_key = (dep_name != *key).then(|| key.clone());
            deps.push(CatalogDependency {
                dep_name,
                dep_type: CATALOG_DEPENDENCY_TYPE.to_string(),
                catalog_name: catalog.name.clone(),
                original_key,
                details,
            });
        }
    }
    deps
}

/// Extracts catalog dependencies from a workspace configuration file.
///
/// Returns `None` when the content cannot be decoded or declares no catalog
/// entries at all.
#[must_use]
pub fn extract_workspace_file(
    content: &str,
    package_file: &Path,
    config: &ResolverConfig,
) -> Option<WorkspaceFileContent> {
    extract_workspace_file_with(content, package_file, config, &NpmDependencyEnricher)
}

/// [`extract_workspace_file`] with a custom enricher.
#[must_use]
pub fn extract_workspace_file_with<D: DependencyEnricher + ?Sized>(
    content: &str,
    package_file: &Path,
    config: &ResolverConfig,
    enricher: &D,
) -> Option<WorkspaceFileContent> {
    tracing::trace!(package_file = %package_file.display(), "Extracting pnpm workspace file");

    let catalogs = match extract_catalogs(content) {
        Ok(catalogs) => catalogs,
        Err(err) => {
            tracing::debug!(
                package_file = %package_file.display(),
                "Invalid pnpm workspace YAML: {err}"
            );
            return None;
        }
    };

    let deps = build_catalog_dependencies_with(&catalogs, enricher);
    if deps.is_empty() {
        tracing::trace!(package_file = %package_file.display(), "No catalog dependencies found");
        return None;
    }

    let lock_file = package_file.with_file_name(&config.lock_file_name);
    let lock_file = config.local_path(&lock_file).is_file().then_some(lock_file);

    Some(WorkspaceFileContent {
        deps,
        package_file: package_file.to_path_buf(),
        lock_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DependencyDetails;
    use crate::error::Error;

    struct UppercaseEnricher;

    impl DependencyEnricher for UppercaseEnricher {
        fn normalize_name(&self, _dep_type: &str, key: &str) -> String {
            key.to_uppercase()
        }

        fn extract_details(&self, _: &str, _: &str, spec: &str) -> DependencyDetails {
            DependencyDetails {
                current_value: Some(spec.to_string()),
                ..DependencyDetails::default()
            }
        }
    }

    #[test]
    fn default_catalog_only() {
        let catalogs = extract_catalogs("catalog:\n  react: 18.3.0\n").unwrap();
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].name, "default");
        assert_eq!(catalogs[0].dependencies.get("react").map(String::as_str), Some("18.3.0"));
    }

    #[test]
    fn default_catalog_always_present() {
        let catalogs = extract_catalogs("catalogs:\n  react17:\n    react: 17.0.2\n").unwrap();
        let names: Vec<_> = catalogs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["default", "react17"]);
        assert!(catalogs[0].dependencies.is_empty());
    }

    #[test]
    fn named_catalogs_keep_declaration_order() {
        let catalogs = extract_catalogs(
            "catalogs:\n  zeta:\n    a: '1'\n  alpha:\n    b: '2'\n  mid:\n    c: '3'\n",
        )
        .unwrap();
        let names: Vec<_> = catalogs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["default", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn named_default_merges_into_default() {
        let catalogs = extract_catalogs(
            "catalog:\n  react: 18.3.0\ncatalogs:\n  default:\n    react: 17.0.0\n    vue: 3.4.0\n",
        )
        .unwrap();
        assert_eq!(catalogs.len(), 1);
        let default = &catalogs[0].dependencies;
        assert_eq!(default.get("react").map(String::as_str), Some("18.3.0"));
        assert_eq!(default.get("vue").map(String::as_str), Some("3.4.0"));
    }

    #[test]
    fn mistyped_catalog_is_error() {
        assert!(matches!(
            extract_catalogs("catalog:\n  - react\n"),
            Err(Error::Yaml { .. })
        ));
        assert!(matches!(
            extract_catalogs("catalog: {"),
            Err(Error::Yaml { .. })
        ));
    }

    #[test]
    fn original_key_only_when_normalized() {
        let catalogs = extract_catalogs("catalog:\n  react: 18.3.0\n").unwrap();

        let plain = build_catalog_dependencies(&catalogs);
        assert_eq!(plain[0].dep_name, "react");
        assert_eq!(plain[0].original_key, None);

        let renamed = build_catalog_dependencies_with(&catalogs, &UppercaseEnricher);
        assert_eq!(renamed[0].dep_name, "REACT");
        assert_eq!(renamed[0].original_key.as_deref(), Some("react"));
        assert_eq!(renamed[0].details.current_value.as_deref(), Some("18.3.0"));
    }
}
