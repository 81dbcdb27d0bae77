use crate::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DB_PATH_ENV: &str = "DOCMETA_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigV1 {
    pub schema_version: u32,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Upper bound, in characters, for text previews such as the first PDF page.
    pub preview_chars: usize,
}

fn default_db_path() -> String {
    "docmeta.sqlite".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { preview_chars: 200 }
    }
}

impl Default for ConfigV1 {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            db_path: default_db_path(),
            log: LogConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl ConfigV1 {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.db_path)
    }
}

/// Loads the config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> AppResult<ConfigV1> {
    let Some(path) = path else {
        return Ok(ConfigV1::default());
    };

    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::new(
                "DM_CONFIG_MISSING",
                "config",
                "config file is missing",
                false,
                serde_json::json!({ "path": path }),
            )
        } else {
            AppError::new(
                "DM_CONFIG_INVALID",
                "config",
                "failed to read config file",
                false,
                serde_json::json!({ "error": e.to_string(), "path": path }),
            )
        }
    })?;

    let config: ConfigV1 = serde_json::from_slice(&bytes).map_err(|e| {
        AppError::new(
            "DM_CONFIG_INVALID",
            "config",
            "failed to parse config file",
            false,
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;

    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(AppError::new(
            "DM_CONFIG_INVALID",
            "config",
            "unsupported config schema_version",
            false,
            serde_json::json!({ "expected": [CONFIG_SCHEMA_VERSION], "actual": config.schema_version }),
        ));
    }
    if config.extract.preview_chars == 0 {
        return Err(AppError::new(
            "DM_CONFIG_INVALID",
            "config",
            "extract.preview_chars must be positive",
            false,
            serde_json::json!({ "path": path }),
        ));
    }

    Ok(config)
}

pub fn apply_env_overrides(config: &mut ConfigV1) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

pub fn apply_overrides_from(config: &mut ConfigV1, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
        config.db_path = db_path;
    }
}
