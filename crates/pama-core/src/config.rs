//! User configuration
//!
//! Loaded from `$PAMA_CONFIG`, or `<config dir>/pama/config.toml` when the
//! variable is unset. A missing file yields the defaults.
//!
//! ```toml
//! cache_dir = "/var/tmp/pama"
//! editor = "nvim"
//! apply_cmd = "git -C %r am -3"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PAMA_CONFIG";

/// Environment variable overriding `cache_dir`.
pub const CACHE_DIR_ENV: &str = "PAMA_CACHE_DIR";

const APP_DIR: &str = "pama";
const STORE_FILE: &str = "projects.sqlite3";
const WORKTREES_DIR: &str = "worktrees";

/// Patch manager settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the project store and worktrees.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Editor used for interactive rebases. Falls back to `$VISUAL`,
    /// `$EDITOR`, then `vi`.
    #[serde(default)]
    pub editor: Option<String>,

    /// Apply command used instead of the backend's default. `%r` expands to
    /// the project root.
    #[serde(default)]
    pub apply_cmd: Option<String>,
}

impl Config {
    /// Parse a config from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config from the default location and apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml")));

        let mut config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Some(dir) = env::var_os(CACHE_DIR_ENV) {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    /// Load the config at `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Self::parse(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolved cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .map(|dir| dir.join(APP_DIR))
            .ok_or(Error::NoCacheDir)
    }

    /// Location of the project store.
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(STORE_FILE))
    }

    /// Editor command for interactive rebases.
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| env::var("VISUAL").ok())
            .or_else(|| env::var("EDITOR").ok())
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string())
    }
}

/// Directory a worktree project named `name` is checked out to.
pub fn worktree_root(cache_dir: &Path, name: &str) -> PathBuf {
    cache_dir.join(WORKTREES_DIR).join(name)
}
