use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::share::{ModuleRequirement, ShareError, ShareScopes, SharedLoader, provider_fn};

/// Default filter for the `version-range` binary when `--log-level` is absent
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Shared module manifest: what the consumer requires and what each share
/// scope provides
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Manifest {
    /// Consumer requirements keyed by module name
    pub shared: IndexMap<String, SharedConfig>,
    /// scope name -> module name -> provided versions, in preference order
    pub scopes: IndexMap<String, IndexMap<String, Vec<String>>>,
}

/// Consumer-side configuration of one shared module
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SharedConfig {
    /// Range a shared version must satisfy
    pub required_version: Option<String>,
    /// Whether the consumer's own copy may be used as a fallback
    pub import: bool,
    /// Version of the consumer's own copy
    pub version: Option<String>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            required_version: None,
            import: true,
            version: None,
        }
    }
}

/// Where a module resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Scope(String),
    Local,
}

/// Module value produced by manifest-backed providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub name: String,
    pub version: String,
    pub origin: Origin,
}

impl fmt::Display for ResolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Origin::Scope(scope) => write!(f, "{}@{} (scope {})", self.name, self.version, scope),
            Origin::Local => write!(f, "{}@{} (local)", self.name, self.version),
        }
    }
}

impl Manifest {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a loader whose providers describe the manifest entries
    pub fn build_loader(&self) -> Result<SharedLoader<ResolvedModule>, ShareError> {
        let mut scopes = ShareScopes::new();
        for (scope, modules) in &self.scopes {
            for (name, versions) in modules {
                for version in versions {
                    let module = ResolvedModule {
                        name: name.clone(),
                        version: version.clone(),
                        origin: Origin::Scope(scope.clone()),
                    };
                    scopes.register(
                        scope,
                        name,
                        version,
                        Arc::new(provider_fn(move || Ok(module.clone()))),
                    )?;
                }
            }
        }

        let loader = self
            .shared
            .iter()
            .fold(SharedLoader::new(scopes), |loader, (name, config)| {
                let mut requirement = ModuleRequirement::new(config.required_version.clone());
                if let Some(version) = &config.version {
                    let module = ResolvedModule {
                        name: name.clone(),
                        version: version.clone(),
                        origin: Origin::Local,
                    };
                    requirement =
                        requirement.with_local(Arc::new(provider_fn(move || Ok(module.clone()))));
                }
                if !config.import {
                    requirement = requirement.without_import();
                }
                loader.with_requirement(name, requirement)
            });

        Ok(loader)
    }
}

/// Returns the path to the data directory for version-range.
/// Uses $XDG_DATA_HOME/version-range if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-range,
/// or ./version-range if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-range.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-range")
}
