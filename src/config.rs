use serde::Deserialize;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::guard::AscentGuard;
use crate::traverse::walk_up_guarded;

pub const CONFIG_FILE: &str = ".walkup.json";

/// Search for the config file never climbs past a repository root.
const CONFIG_BOUNDARY: &str = ".git";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Defaults for command-line walks, overridable per project via `.walkup.json`.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_depth: Option<usize>,
    pub stop_at: Vec<String>,
    pub include_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: None,
            stop_at: Vec::new(),
            include_hidden: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectConfig {
    max_depth: Option<usize>,
    stop_at: Option<Vec<String>>,
    include_hidden: Option<bool>,
}

impl Config {
    /// Falls back to defaults when no config is found or it cannot be used.
    pub fn load(start: &Path) -> Self {
        let default = Self::default();
        let Some(config_path) = Self::find_config(start) else {
            return default;
        };
        debug!(path = %config_path.display(), "loading config");
        match Self::load_from(&config_path) {
            Ok(project) => default.merge(project),
            Err(e) => {
                warn!("ignoring config: {}", e);
                default
            }
        }
    }

    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut guard = AscentGuard::new().stop_at([CONFIG_BOUNDARY]);
        let found = walk_up_guarded(
            start,
            |p| p.file_name() == Some(OsStr::new(CONFIG_FILE)) && p.is_file(),
            |dir| guard.allow(dir),
        );
        match found {
            Ok(path) => path,
            Err(e) => {
                // The walk itself reports the same listing failure.
                debug!("config search stopped: {}", e);
                None
            }
        }
    }

    fn load_from(path: &Path) -> Result<ProjectConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn merge(mut self, project: ProjectConfig) -> Self {
        if project.max_depth.is_some() {
            self.max_depth = project.max_depth;
        }
        if let Some(stop_at) = project.stop_at {
            self.stop_at = stop_at;
        }
        if let Some(include_hidden) = project.include_hidden {
            self.include_hidden = include_hidden;
        }
        self
    }
}
