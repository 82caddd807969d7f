//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level from explicit
//!   overrides with per-user defaults under `$HOME/.taskpad`.
//!
//! # Invariants
//! - Resolved paths are absolute.
//! - `log_level` is always one of the levels `init_logging` accepts.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const APP_DIR_NAME: &str = ".taskpad";
const DB_FILE_NAME: &str = "taskpad.db";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// A default was needed but `HOME` is not set.
    MissingHome,
    /// Relative override could not be anchored to the working directory.
    WorkingDir(std::io::Error),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHome => write!(f, "HOME environment variable not set"),
            Self::WorkingDir(err) => write!(f, "cannot resolve working directory: {err}"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDir(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl CoreConfig {
    /// Resolves configuration from optional overrides and `HOME`.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with_home(
            db_path,
            log_dir,
            log_level,
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    fn resolve_with_home(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<&str>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let app_dir = || {
            home.as_deref()
                .map(|home| home.join(APP_DIR_NAME))
                .ok_or(ConfigError::MissingHome)
        };

        let db_path = match db_path {
            Some(path) => absolutize(path)?,
            None => app_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match log_dir {
            Some(path) => absolutize(path)?,
            None => app_dir()?.join(LOG_DIR_NAME),
        };
        let log_level = match log_level {
            Some(level) => normalize_level(level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
    Ok(cwd.join(path))
}
