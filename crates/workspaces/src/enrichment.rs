//! Default dependency enrichment for npm-style version specs.

use crate::core::traits::DependencyEnricher;
use crate::core::types::{DependencyDetails, SkipReason};

/// Datasource for packages published to an npm registry.
pub const NPM_DATASOURCE: &str = "npm";

/// Datasource for GitHub repositories pinned to a tag.
pub const GITHUB_TAGS_DATASOURCE: &str = "github-tags";

/// Classifies npm version specs the way `package.json` dependencies are read.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmDependencyEnricher;

impl DependencyEnricher for NpmDependencyEnricher {
    fn normalize_name(&self, dep_type: &str, key: &str) -> String {
        if dep_type != "resolutions" {
            return key.to_string();
        }
        // `**/foo`, `a/b/@scope/c` -> trailing package name
        let mut segments = key.rsplit('/');
        let name = segments.next().unwrap_or(key);
        match segments.next() {
            Some(scope) if scope.starts_with('@') => format!("{scope}/{name}"),
            _ => name.to_string(),
        }
    }

    fn extract_details(&self, _dep_type: &str, _dep_name: &str, spec: &str) -> DependencyDetails {
        let spec = spec.trim();
        if spec.is_empty() {
            return skipped(SkipReason::Empty, None);
        }
        if spec.starts_with("workspace:") {
            return skipped(SkipReason::Workspace, Some(spec));
        }
        if spec.starts_with("catalog:") {
            return skipped(SkipReason::CatalogReference, Some(spec));
        }
        if is_local_path(spec) {
            return skipped(SkipReason::File, Some(spec));
        }
        if let Some(alias) = spec.strip_prefix("npm:") {
            return npm_alias(alias);
        }
        if let Some(repo) = git_repository(spec) {
            return github_reference(repo);
        }

        DependencyDetails {
            datasource: Some(NPM_DATASOURCE.to_string()),
            current_value: Some(spec.to_string()),
            ..DependencyDetails::default()
        }
    }
}

fn skipped(reason: SkipReason, current_value: Option<&str>) -> DependencyDetails {
    DependencyDetails {
        current_value: current_value.map(ToString::to_string),
        skip_reason: Some(reason),
        ..DependencyDetails::default()
    }
}

fn is_local_path(spec: &str) -> bool {
    ["file:", "link:", "./", "../", "/", "~/"]
        .iter()
        .any(|prefix| spec.starts_with(prefix))
}

fn npm_alias(alias: &str) -> DependencyDetails {
    // the leading '@' of a scoped name is not a version separator
    let split = alias
        .char_indices()
        .skip(1)
        .filter(|(_, c)| *c == '@')
        .map(|(i, _)| i)
        .last();
    let (package_name, current_value) = match split {
        Some(idx) => (&alias[..idx], Some(&alias[idx + 1..])),
        None => (alias, None),
    };

    DependencyDetails {
        datasource: Some(NPM_DATASOURCE.to_string()),
        current_value: current_value.map(ToString::to_string),
        package_name: Some(package_name.to_string()),
        skip_reason: None,
    }
}

/// Strips git prefixes, returning `owner/repo[#ref]` for GitHub references.
fn git_repository(spec: &str) -> Option<&str> {
    const PREFIXES: [&str; 5] = [
        "github:",
        "git+https://github.com/",
        "git+ssh://git@github.com/",
        "https://github.com/",
        "git://github.com/",
    ];
    if let Some(rest) = PREFIXES.iter().find_map(|p| spec.strip_prefix(p)) {
        return Some(rest);
    }
    if spec.starts_with("git+") || spec.starts_with("git://") || spec.starts_with("git@") {
        return Some(spec);
    }
    // bare `owner/repo` shorthand
    let (path, _) = spec.split_once('#').unwrap_or((spec, ""));
    let is_shorthand = !path.starts_with('@')
        && path.matches('/').count() == 1
        && !path.contains(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '^' | '~'));
    is_shorthand.then_some(spec)
}

fn github_reference(repo: &str) -> DependencyDetails {
    let (path, reference) = match repo.split_once('#') {
        Some((path, reference)) if !reference.is_empty() => (path, Some(reference)),
        _ => (repo, None),
    };
    let is_github = !path.contains(':') && !path.starts_with("git@");

    match reference {
        Some(tag) if is_github => DependencyDetails {
            datasource: Some(GITHUB_TAGS_DATASOURCE.to_string()),
            current_value: Some(tag.to_string()),
            package_name: Some(path.trim_end_matches(".git").to_string()),
            skip_reason: None,
        },
        _ => skipped(SkipReason::GitDependency, None),
    }
}
