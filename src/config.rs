use crate::error::Result;
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// All simulation settings
    pub settings: SimulationSettings,
}

impl RunConfig {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            version: 1,
            settings,
        }
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Per-user config file, `<config_dir>/dla-simulation/config.json`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-simulation").join("config.json"))
    }

    /// Load the per-user config if one exists
    pub fn load_user_config() -> Result<Option<Self>> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path).map(Some),
            _ => Ok(None),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}
