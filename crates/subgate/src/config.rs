//! Runtime configuration.
//!
//! Layers, later wins: built-in defaults, the TOML file, `SUBGATE_*`
//! environment variables (`__` separates nested keys, e.g.
//! `SUBGATE_RUNNER__PROGRAM=bun`).
//!
//! The review policy itself (deny-list, markers) is not configurable.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::DEFAULT_WORKSPACE_PREFIX;

pub const DEFAULT_CONFIG_FILE: &str = "subgate.toml";
pub const DEFAULT_RUNNER_SCRIPT: &str = "runner.js";
const ENV_PREFIX: &str = "SUBGATE_";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Directory scanned for the newest archive when none is given.
    pub watch_dir: PathBuf,
    pub workspace_prefix: String,
    pub runner: RunnerConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub program: String,
    /// Script passed as the first argument. `None` means `runner.js` next to
    /// the running executable.
    pub script: Option<PathBuf>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let home = home::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            watch_dir: home.join("submissions"),
            workspace_prefix: DEFAULT_WORKSPACE_PREFIX.to_string(),
            runner: RunnerConfig::default(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            script: None,
        }
    }
}

impl ReviewConfig {
    /// Load with an explicit file, or `subgate.toml` in the working directory
    /// when present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::figment(&file)
            .extract()
            .map_err(|e| Error::Config(Box::new(e)))
    }

    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

impl RunnerConfig {
    pub fn script_path(&self) -> Result<PathBuf> {
        if let Some(script) = &self.script {
            return Ok(script.clone());
        }
        let exe = std::env::current_exe()
            .map_err(|_| Error::RunnerLocation(PathBuf::from(DEFAULT_RUNNER_SCRIPT)))?;
        let dir = exe
            .parent()
            .ok_or_else(|| Error::RunnerLocation(exe.clone()))?;
        Ok(dir.join(DEFAULT_RUNNER_SCRIPT))
    }
}
