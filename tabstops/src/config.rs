//! Configuration for tabstop conversion.
//!
//! Settings resolve per buffer in two layers:
//!
//! 1. The `emacs_tabstops` table in the buffer's settings store
//! 2. Global [`Defaults`], loaded from `config.toml`
//!
//! # Loading defaults
//!
//! [`Defaults::load_with_overrides`] picks the file: CLI override > discovered
//! path > the `config.toml` embedded at build time.
//!
//! # Resolution
//!
//! [`Settings`] resolves key by key. A key found in neither layer is a
//! [`ConfigError::MissingKey`], never a silent fallback: converting with a
//! guessed tabstop would mangle indentation.

use crate::{buffer::BufferId, host::Host};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Buffer setting holding the user's per-buffer overrides.
pub const SETTINGS_KEY: &str = "emacs_tabstops";

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key absent from both the buffer settings and the defaults
    #[error("Setting not found: {0}")]
    MissingKey(String),

    /// Key present but of the wrong shape
    #[error("Invalid value for setting '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Tabstop of zero columns
    #[error("Tabstop must be a positive integer")]
    InvalidTabstop,

    /// Failed to read a config file
    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to parse a config file
    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// When to collapse spaces back to tabs before writing a buffer to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertOnSave {
    Never,
    /// Only buffers this plugin last converted to spaces.
    #[default]
    Auto,
    Always,
}

impl<'de> Deserialize<'de> for ConvertOnSave {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        // Older settings files store a plain boolean.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(ConvertOnSave::Always),
            Repr::Flag(false) => Ok(ConvertOnSave::Never),
            Repr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "never" => Ok(ConvertOnSave::Never),
                "auto" => Ok(ConvertOnSave::Auto),
                "always" => Ok(ConvertOnSave::Always),
                _ => Err(D::Error::unknown_variant(
                    &name,
                    &["never", "auto", "always"],
                )),
            },
        }
    }
}

/// Global defaults, loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// Columns one tab stands for.
    pub tabstop: usize,
    pub convert_on_save: ConvertOnSave,
    pub convert_on_load: bool,
    /// Syntax names exempt from automatic conversion.
    pub skip_filetypes: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            tabstop: 8,
            convert_on_save: ConvertOnSave::Auto,
            convert_on_load: true,
            skip_filetypes: vec!["Python".to_string(), "Cython".to_string()],
        }
    }
}

impl Defaults {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load defaults with priority: CLI override > discovered path > embedded.
    pub fn load_with_overrides(
        cli_override: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        if let Some(path) = discovered_path {
            return Self::load(path);
        }
        Self::load_embedded()
    }

    fn load_embedded() -> Result<Self, ConfigError> {
        let source = include_str!("../../config.toml");
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<embedded config.toml>"),
            source,
        })
    }

    /// The defaults as a settings table, for key-by-key lookup.
    pub fn to_table(&self) -> toml::Table {
        match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => table,
            _ => toml::Table::new(),
        }
    }
}

/// Two-layer settings view for one buffer.
#[derive(Debug, Clone)]
pub struct Settings {
    buffer: toml::Table,
    defaults: toml::Table,
}

impl Settings {
    pub fn new(buffer: toml::Table, defaults: toml::Table) -> Self {
        Self { buffer, defaults }
    }

    /// Collect the buffer's overrides over `defaults`.
    pub fn for_buffer<H: Host>(
        host: &H,
        id: BufferId,
        defaults: &Defaults,
    ) -> Result<Self, ConfigError> {
        let buffer = match host.setting(id, SETTINGS_KEY) {
            None => toml::Table::new(),
            Some(toml::Value::Table(table)) => table,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: SETTINGS_KEY.to_string(),
                    message: format!("expected a table, found {}", other.type_str()),
                })
            }
        };
        Ok(Self::new(buffer, defaults.to_table()))
    }

    /// Look up `key`, buffer layer first.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .buffer
            .get(key)
            .or_else(|| self.defaults.get(key))
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;

        value
            .clone()
            .try_into()
            .map_err(|err: toml::de::Error| ConfigError::InvalidValue {
                key: key.to_string(),
                message: err.message().to_string(),
            })
    }
}

/// Fully resolved configuration for one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    pub tabstop: usize,
    pub convert_on_save: ConvertOnSave,
    pub convert_on_load: bool,
    pub skip_filetypes: Vec<String>,
}

impl BufferConfig {
    pub fn resolve<H: Host>(
        host: &H,
        id: BufferId,
        defaults: &Defaults,
    ) -> Result<Self, ConfigError> {
        Self::from_settings(&Settings::for_buffer(host, id, defaults)?)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let tabstop: usize = settings.get("tabstop")?;
        if tabstop == 0 {
            return Err(ConfigError::InvalidTabstop);
        }

        Ok(Self {
            tabstop,
            convert_on_save: settings.get("convert_on_save")?,
            convert_on_load: settings.get("convert_on_load")?,
            skip_filetypes: settings.get("skip_filetypes")?,
        })
    }
}
