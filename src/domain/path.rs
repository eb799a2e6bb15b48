use std::collections::{BTreeMap, HashMap};

use glob::Pattern;
use percent_encoding::percent_decode_str;

use crate::error::{AppError, AppResult};

/// Converts `\` to `/` and collapses runs of `/`.
pub fn normalize_separators(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if !prev_slash {
                normalized.push(ch);
            }
            prev_slash = true;
        } else {
            normalized.push(ch);
            prev_slash = false;
        }
    }
    normalized
}

/// Path of `full_path` relative to the project rooted at `root_prefix`.
///
/// The root prefix is stripped first. When the root does not itself end in a
/// segment named `project_name`, a leading `project_name` segment is dropped
/// too, so `/trunk/web/src/Main.java` under root `/trunk` for project `web`
/// becomes `src/Main.java`. Paths outside the root keep every segment.
pub fn trim_to_project_relative(full_path: &str, root_prefix: &str, project_name: &str) -> String {
    let normalized = normalize_separators(full_path);
    let root = normalize_separators(root_prefix);
    let root = root.trim_end_matches('/');

    let relative = match normalized.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => normalized.as_str(),
    };
    let mut segments: Vec<&str> = relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let root_names_project = root.rsplit('/').next() == Some(project_name);
    if !root_names_project && segments.first() == Some(&project_name) {
        segments.remove(0);
    }
    segments.join("/")
}

/// True when `path` is `root` itself or lives below it. A root of `/` holds everything.
pub fn is_under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return true;
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Repository path of `location_url` relative to `repository_root_url`, decoded.
pub fn root_prefix_from_urls(location_url: &str, repository_root_url: &str) -> AppResult<String> {
    let location = location_url.trim_end_matches('/');
    let root = repository_root_url.trim_end_matches('/');
    let rest = location.strip_prefix(root).ok_or_else(|| {
        AppError::RepositoryConnect(format!(
            "location {location_url} is not inside repository root {repository_root_url}"
        ))
    })?;

    let decoded = percent_decode_str(rest).decode_utf8().map_err(|err| {
        AppError::RepositoryConnect(format!("location path is not valid UTF-8: {err}"))
    })?;

    let normalized = normalize_separators(&format!("/{decoded}"));
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionRule {
    /// Matches the path itself and everything below it.
    Prefix(String),
    Glob(Pattern),
}

impl ExclusionRule {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let normalized = normalize_separators(raw.trim());
        let cleaned = normalized.trim_matches('/');
        if cleaned.is_empty() {
            return Err(AppError::Configuration(format!(
                "exclusion rule '{raw}' is empty"
            )));
        }

        if cleaned.contains(['*', '?', '[']) {
            let pattern = Pattern::new(cleaned).map_err(|err| {
                AppError::Configuration(format!("invalid exclusion pattern '{raw}': {err}"))
            })?;
            Ok(ExclusionRule::Glob(pattern))
        } else {
            Ok(ExclusionRule::Prefix(cleaned.to_string()))
        }
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        match self {
            ExclusionRule::Prefix(prefix) => match relative_path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            ExclusionRule::Glob(pattern) => pattern.matches(relative_path),
        }
    }
}

/// Exclusion rules applied to every project plus per-project lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionConfig {
    defaults: Vec<ExclusionRule>,
    projects: HashMap<String, Vec<ExclusionRule>>,
}

impl ExclusionConfig {
    pub fn new(defaults: &[String], projects: &BTreeMap<String, Vec<String>>) -> AppResult<Self> {
        let defaults = defaults
            .iter()
            .map(|raw| ExclusionRule::parse(raw))
            .collect::<AppResult<Vec<_>>>()?;
        let projects = projects
            .iter()
            .map(|(name, rules)| {
                let parsed = rules
                    .iter()
                    .map(|raw| ExclusionRule::parse(raw))
                    .collect::<AppResult<Vec<_>>>()?;
                Ok((name.clone(), parsed))
            })
            .collect::<AppResult<HashMap<_, _>>>()?;

        Ok(Self { defaults, projects })
    }

    pub fn rules_for<'a>(&'a self, project_name: &str) -> impl Iterator<Item = &'a ExclusionRule> {
        self.defaults
            .iter()
            .chain(self.projects.get(project_name).into_iter().flatten())
    }
}

/// Whether a project-relative path must be ignored for `project_name`.
pub fn is_excluded(project_name: &str, relative_path: &str, config: &ExclusionConfig) -> bool {
    config
        .rules_for(project_name)
        .any(|rule| rule.matches(relative_path))
}
