//! TOML-based configuration for Trellis.
//!
//! Supports a config file (trellis.toml) with environment variable
//! expansion in schema paths.
//!
//! Example configuration:
//! ```toml
//! [schemas.shop]
//! path = "./data/shop.db"
//! description = "Retail demo database"
//!
//! [schemas.warehouse]
//! path = "${WAREHOUSE_DB_PATH}"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::metadata::{MetadataError, SqliteSchemaProvider};
use crate::navigator::Navigator;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("failed to determine config directory")]
    NoConfigDir,

    #[error("schema not found in config: {0}")]
    SchemaNotFound(String),

    #[error("failed to open schema '{schema}': {source}")]
    OpenFailed {
        schema: String,
        source: MetadataError,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named schemas available to the navigator.
    pub schemas: HashMap<String, SchemaSettings>,
}

/// Configuration for one named schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaSettings {
    /// Path to the SQLite database file. Supports `${VAR}` expansion.
    pub path: String,

    /// Human-readable description, shown when listing schemas.
    #[serde(default)]
    pub description: Option<String>,
}

impl Settings {
    /// Default config location: `~/.trellis/trellis.toml`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let base = dirs::home_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join(".trellis").join("trellis.toml"))
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Look up one schema's settings.
    pub fn schema(&self, name: &str) -> Result<&SchemaSettings, SettingsError> {
        self.schemas
            .get(name)
            .ok_or_else(|| SettingsError::SchemaNotFound(name.to_string()))
    }

    /// Build a navigator with one SQLite provider registered per configured
    /// schema. Paths are env-expanded at this point.
    pub fn build_navigator(&self) -> Result<Navigator, SettingsError> {
        let navigator = Navigator::new();
        for (name, schema) in &self.schemas {
            let path = expand_env_vars(&schema.path)?;
            let provider =
                SqliteSchemaProvider::open(&path).map_err(|source| SettingsError::OpenFailed {
                    schema: name.clone(),
                    source,
                })?;
            navigator.register(name.clone(), Arc::new(provider));
        }
        Ok(navigator)
    }
}

/// Expand `${VAR}` references in a value against the process environment.
///
/// Unterminated `${` sequences are left untouched; a reference to an unset
/// variable is an error.
pub fn expand_env_vars(value: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                let expanded = env::var(var)
                    .map_err(|_| SettingsError::MissingEnvVar(var.to_string()))?;
                result.push_str(&expanded);
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    Ok(result)
}
