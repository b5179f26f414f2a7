use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    errors::{FaturaError, Result},
    utils::{app_data_dir, ensure_dir, write_atomic},
};

const CONFIG_FILE: &str = "config.json";

/// Runtime category configuration. The category set is an open set of string
/// labels; every classification result must be a member of it (or the credit
/// sentinel, which is never stored). Adding or removing categories is an
/// explicit administrative operation, never a side effect of classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub categories: Vec<String>,
    /// Catch-all returned when no classifier layer matches.
    pub default_category: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: vec![
                "Alimentação".into(),
                "Transporte".into(),
                "Entretenimento".into(),
                "Self Care".into(),
                "Roupas".into(),
                "Outros".into(),
            ],
            default_category: "Outros".into(),
        }
    }
}

impl Config {
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }
}

/// Loads and saves the category configuration as a JSON document.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn add_category(&self, name: &str) -> Result<bool> {
        let mut config = self.load()?;
        if config.has_category(name) {
            return Ok(false);
        }
        config.categories.push(name.to_string());
        self.save(&config)?;
        Ok(true)
    }

    /// Removing the configured default is refused; the classifier must always
    /// have a valid fallback.
    pub fn remove_category(&self, name: &str) -> Result<bool> {
        let mut config = self.load()?;
        if name == config.default_category {
            return Err(FaturaError::InvalidOperation(format!(
                "cannot remove default category `{}`",
                name
            )));
        }
        let before = config.categories.len();
        config.categories.retain(|c| c != name);
        if config.categories.len() == before {
            return Ok(false);
        }
        self.save(&config)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert!(config.has_category("Alimentação"));
        assert_eq!(config.default_category, "Outros");
    }

    #[test]
    fn add_and_remove_category_round_trip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(manager.add_category("Viagem").unwrap());
        assert!(!manager.add_category("Viagem").unwrap());
        assert!(manager.load().unwrap().has_category("Viagem"));
        assert!(manager.remove_category("Viagem").unwrap());
        assert!(!manager.load().unwrap().has_category("Viagem"));
    }

    #[test]
    fn default_category_cannot_be_removed() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let err = manager.remove_category("Outros").unwrap_err();
        assert!(matches!(err, FaturaError::InvalidOperation(_)));
    }
}
