use std::fmt;

use url::Url;

use crate::domain::path::{ExclusionConfig, normalize_separators};
use crate::error::{AppError, AppResult};

/// Per-query settings for one tracked project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub name: String,
    /// Repository path the project lives under; resolved from the repository when unset.
    pub root_prefix: Option<String>,
    pub exclusions: ExclusionConfig,
}

impl ProjectContext {
    pub fn new(name: impl Into<String>, exclusions: ExclusionConfig) -> Self {
        Self {
            name: name.into(),
            root_prefix: None,
            exclusions,
        }
    }

    pub fn with_root_prefix(mut self, root_prefix: &str) -> Self {
        let normalized = normalize_separators(&format!("/{}", root_prefix.trim()));
        let trimmed = normalized.trim_end_matches('/');
        self.root_prefix = Some(if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation(Url);

impl RepositoryLocation {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let url = Url::parse(raw.trim()).map_err(|err| {
            AppError::RepositoryConnect(format!("malformed repository URL '{raw}': {err}"))
        })?;
        match url.scheme() {
            "http" | "https" | "svn" | "svn+ssh" | "file" => Ok(Self(url)),
            other => Err(AppError::RepositoryConnect(format!(
                "unsupported repository scheme '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Last non-empty path segment, decoded.
    pub fn last_segment(&self) -> Option<String> {
        self.0
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| {
                percent_encoding::percent_decode_str(segment)
                    .decode_utf8_lossy()
                    .into_owned()
            })
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}
