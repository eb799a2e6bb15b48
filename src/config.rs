use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::path::ExclusionConfig;
use crate::domain::project::ProjectContext;
use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "revsync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_SVN_BINARY: &str = "svn";

pub const ENV_CONFIG_PATH: &str = "REVSYNC_CONFIG";
pub const ENV_SVN_URL: &str = "REVSYNC_SVN_URL";
pub const ENV_SVN_USERNAME: &str = "REVSYNC_SVN_USERNAME";
pub const ENV_SVN_PASSWORD: &str = "REVSYNC_SVN_PASSWORD";
pub const ENV_SVN_BINARY: &str = "REVSYNC_SVN_BINARY";

/// On-disk configuration, `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    pub svn_binary: Option<String>,
    pub repository: RepositorySettings,
    pub exclusions: ExclusionSettings,
    pub projects: BTreeMap<String, ProjectSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionSettings {
    /// Applied to every project.
    pub defaults: Vec<String>,
    pub projects: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub root: Option<String>,
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("unable to locate config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    match env::var_os(ENV_CONFIG_PATH) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_directory()?.join(CONFIG_FILE_NAME)),
    }
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Effective configuration: the stored file with environment overrides applied.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub repository_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub svn_binary: String,
    pub exclusions: ExclusionConfig,
    pub project_roots: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repository_url: None,
            username: None,
            password: None,
            svn_binary: DEFAULT_SVN_BINARY.to_string(),
            exclusions: ExclusionConfig::default(),
            project_roots: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_stored(StoredConfig::load()?, |key| env::var(key).ok())
    }

    pub fn from_stored(
        stored: StoredConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let lookup = |key: &str| env_lookup(key).filter(|value| !value.trim().is_empty());

        let exclusions =
            ExclusionConfig::new(&stored.exclusions.defaults, &stored.exclusions.projects)?;
        let project_roots = stored
            .projects
            .into_iter()
            .filter_map(|(name, settings)| settings.root.map(|root| (name, root)))
            .collect();

        Ok(Self {
            repository_url: lookup(ENV_SVN_URL).or(stored.repository.url),
            username: lookup(ENV_SVN_USERNAME).or(stored.repository.username),
            password: lookup(ENV_SVN_PASSWORD).or(stored.repository.password),
            svn_binary: lookup(ENV_SVN_BINARY)
                .or(stored.svn_binary)
                .unwrap_or_else(|| DEFAULT_SVN_BINARY.to_string()),
            exclusions,
            project_roots,
        })
    }

    pub fn project_context(&self, name: &str) -> ProjectContext {
        let context = ProjectContext::new(name, self.exclusions.clone());
        match self.project_roots.get(name) {
            Some(root) => context.with_root_prefix(root),
            None => context,
        }
    }
}
