//! User preferences persisted next to the data directory.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, config_file_in, data_dir_in, ensure_dir},
    errors::LedgerError,
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Overrides where the collections are stored. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_undo_window_secs")]
    pub undo_window_secs: u64,
    #[serde(default)]
    pub seed_sample_data: bool,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
}

impl Config {
    pub fn default_undo_window_secs() -> u64 {
        5
    }

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    /// Resolves the storage directory against `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| data_dir_in(base))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            undo_window_secs: Self::default_undo_window_secs(),
            seed_sample_data: false,
            currency_symbol: Self::default_currency_symbol(),
        }
    }
}

/// Loads and saves [`Config`] under an application base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Uses the resolved application directory, or `None` when the host has
    /// no durable location at all.
    pub fn new() -> Option<Self> {
        app_data_dir().map(Self::with_base_dir)
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        let path = config_file_in(&base);
        Self { base, path }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| LedgerError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    /// Like [`ConfigManager::load`] but falls back to defaults, logging why.
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "using default configuration");
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config.resolve_data_dir(&self.base)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
