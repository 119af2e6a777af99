use crate::error::{BudgetError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "budget-planner";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: Option<PathBuf>,
    pub currency_symbol: String,
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: None,
            currency_symbol: "$".to_string(),
            chart_width: 40,
        }
    }
}

impl Config {
    /// Reads a TOML config. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.is_file() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            BudgetError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            BudgetError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| app_dir().join("budget.db"))
    }
}

pub fn default_config_path() -> PathBuf {
    app_dir().join("config.toml")
}

fn app_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.database_path().ends_with("budget.db"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "database = \"/tmp/custom.db\"\ncurrency_symbol = \"€\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.chart_width, 40);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chart_width = \"wide\"").unwrap();

        let result = Config::load_from_file(&path);
        assert!(matches!(result, Err(BudgetError::Config(_))));
    }
}
