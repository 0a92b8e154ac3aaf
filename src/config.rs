use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::CommandLine;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "Unable to read config {}: {}", path.display(), source),
            Self::Parse { path, source } => write!(f, "Invalid config {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the roster lives and where its log goes. Built once in `main` and
/// handed to everything that needs it.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("Student_data.csv"),
            log_file: PathBuf::from("Log.log"),
            log_level: String::from("debug"),
        }
    }
}

impl Config {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Defaults, then the `--config` file, then explicit flags.
    pub fn resolve(args: &CommandLine) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        if let Some(file) = &args.file {
            config.data_file = file.clone();
        }
        if let Some(log_file) = &args.log_file {
            config.log_file = log_file.clone();
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}
