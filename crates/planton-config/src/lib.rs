//! Planton CLI configuration
//!
//! Locates and loads the optional CLI config file and discovers provider
//! credentials (see [`credentials`]).

pub mod credentials;
pub mod error;

pub use credentials::{resolve_aws, resolve_digitalocean};
pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "PLANTON_CONFIG_PATH";

/// Planton's global config directory (`~/.config/planton` on Linux)
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("planton"))
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// Find the CLI config file
///
/// Search order:
/// 1. `PLANTON_CONFIG_PATH`
/// 2. current directory: `planton.yaml`, `.planton.yaml`
/// 3. `./.planton/config.yaml`
/// 4. `~/.config/planton/config.yaml`
pub fn find_cli_config() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["planton.yaml", ".planton.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let project_config = current_dir.join(".planton").join("config.yaml");
    if project_config.is_file() {
        return Ok(project_config);
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Settings read from the CLI config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Directory holding stack state; `./.planton` when unset
    pub backend_dir: Option<PathBuf>,

    /// Stack used when `--stack` is not given
    pub default_stack: Option<String>,
}

impl CliConfig {
    pub const DEFAULT_STACK: &'static str = "dev";

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the discovered config file, or the defaults when there is none
    pub fn load() -> Result<Self> {
        match find_cli_config() {
            Ok(path) => {
                debug!(path = %path.display(), "Loading CLI config");
                Self::from_file(&path)
            }
            Err(ConfigError::ConfigFileNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn stack<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_stack.as_deref())
            .unwrap_or(Self::DEFAULT_STACK)
    }

    pub fn backend_dir(&self, project_root: &Path) -> PathBuf {
        match &self.backend_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project_root.join(dir),
            None => project_root.join(".planton"),
        }
    }
}
