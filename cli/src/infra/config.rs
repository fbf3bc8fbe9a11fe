//! Loads `cjob.yml` into validated [`Settings`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{CONFIG_FILE_NAMES, RawSettings, Settings};
use crate::domain::error::ConfigError;

/// Environment variable that points at a config file explicitly.
pub const CONFIG_ENV: &str = "CJOB_CONFIG";

type EnvLookup = fn(&str) -> Option<String>;

/// Finds and parses the settings file.
///
/// The environment is read through `env` so tests never touch the process
/// environment.
pub struct SettingsLoader<E = EnvLookup> {
    cwd: PathBuf,
    home: Option<PathBuf>,
    env: E,
}

impl SettingsLoader {
    /// Loader over the real working directory, home and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn from_process() -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        Ok(Self {
            cwd,
            home: dirs::home_dir(),
            env: |key| std::env::var(key).ok(),
        })
    }
}

impl<E: Fn(&str) -> Option<String>> SettingsLoader<E> {
    pub fn new(cwd: impl Into<PathBuf>, home: Option<PathBuf>, env: E) -> Self {
        Self {
            cwd: cwd.into(),
            home,
            env,
        }
    }

    /// `$CJOB_CONFIG` if set, else the first config file name present in the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no candidate exists.
    pub fn path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(explicit) = (self.env)(CONFIG_ENV).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(explicit);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(ConfigError::NotFound {
                    searched: path.display().to_string(),
                })
            };
        }
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.cwd.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                searched: CONFIG_FILE_NAMES
                    .iter()
                    .map(|n| self.cwd.join(n).display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Read, parse and validate the settings file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a missing, unreadable, unparseable or
    /// invalid file.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let path = self.path()?;
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        self.parse(&path, &content)
    }

    /// Parse YAML `content` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed or fails validation.
    pub fn parse(&self, path: &Path, content: &str) -> Result<Settings, ConfigError> {
        let mut raw: RawSettings = if content.trim().is_empty() {
            RawSettings::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };

        if raw.profile.as_deref().is_none_or(str::is_empty) {
            if raw.access_key_id.as_deref().is_none_or(str::is_empty) {
                raw.access_key_id = (self.env)("AWS_ACCESS_KEY_ID");
            }
            if raw.secret_access_key.as_deref().is_none_or(str::is_empty) {
                raw.secret_access_key = (self.env)("AWS_SECRET_ACCESS_KEY");
            }
        }
        raw.key_file_path = raw
            .key_file_path
            .map(|p| expand_tilde(&p, self.home.as_deref()));

        Settings::try_from(raw)
    }
}

/// Replace a leading `~` with the home directory.
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&Path>) -> String {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{rest}", home.display())
        }
        _ => path.to_string(),
    }
}
