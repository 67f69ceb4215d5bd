// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.wit/config.toml` and includes:
//! - `actor`: identity recorded on link events and checked against space owners
//! - `default_space`: space used when a command is run without `--space`
//! - `[engine]`: tunables handed to the engine as an [`EngineConfig`]

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wit_core::EngineConfig;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".wit";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "wit.db";

/// Project configuration stored in `.wit/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Actor name; falls back to the detected user name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// ID of the space used when `--space` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_space: Option<String>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Loads configuration from the given `.wit/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config
            .engine
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Saves configuration to the given `.wit/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .wit directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .wit directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

pub fn get_db_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DB_FILE_NAME)
}

/// Initialize a new .wit directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
