//! Application configuration.
//!
//! Read from `<os-config-dir>/com.dieor.inventoryapp/config.yaml` when it
//! exists, then overridden by `DIEOR_INVENTORY_MODE` and
//! `DIEOR_INVENTORY_DATA_DIR`. A missing or malformed file falls back to
//! defaults; configuration problems never stop the app from starting.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::host::paths::{DataDirs, RunMode, APP_IDENTIFIER};

pub const ENV_MODE: &str = "DIEOR_INVENTORY_MODE";
pub const ENV_DATA_DIR: &str = "DIEOR_INVENTORY_DATA_DIR";

const DEFAULT_LOG_FILTER: &str = "dieor_inventory=info,warn";

/// Main window settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Open devtools when the window is created. Defaults to on in development.
    pub devtools: Option<bool>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dieor Inventory App".to_string(),
            width: 1000.0,
            height: 800.0,
            devtools: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: RunMode,
    /// Explicit data root; wins over the mode's rule.
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
    pub channel_capacity: usize,
    pub window: WindowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::from_build(),
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            channel_capacity: 32,
            window: WindowConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Self {
        let mut config = match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load from `path`, or return defaults if it is missing or invalid.
    ///
    /// Runs before tracing is initialised, so problems go to stderr.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_yaml::from_str::<Self>(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!(
                    "dieor-inventory: ignoring invalid config {}: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ENV_MODE) {
            match RunMode::parse(&raw) {
                Some(mode) => self.mode = mode,
                None => eprintln!("dieor-inventory: ignoring unknown {ENV_MODE}={raw}"),
            }
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Resolve the data directories once for this run.
    pub fn data_dirs(&self) -> DataDirs {
        DataDirs::resolve(self.mode, self.data_dir.as_deref())
    }

    pub fn devtools(&self) -> bool {
        self.window
            .devtools
            .unwrap_or(self.mode == RunMode::Development)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_IDENTIFIER).join("config.yaml"))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
