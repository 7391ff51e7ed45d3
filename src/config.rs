use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::engine::constants::DEFAULT_LABOR_RATE;
use crate::engine::{CostAnalyzer, OperationType};
use crate::error::{PlantifyError, Result};

/// Database bundled with the crate, used when neither the CLI nor the config names one.
pub const DEFAULT_DATABASE: &str = "data/ingredients_database.json";

fn default_labor_rate() -> f64 {
    DEFAULT_LABOR_RATE
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    #[serde(default)]
    pub operation_type: OperationType,
    /// EUR per hour.
    #[serde(default = "default_labor_rate")]
    pub labor_rate_per_hour: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            operation_type: OperationType::default(),
            labor_rate_per_hour: DEFAULT_LABOR_RATE,
        }
    }
}

/// Settings read from an optional TOML file.
///
/// ```toml
/// database = "data/ingredients_database.json"
///
/// [cost]
/// operation_type = "restaurant"
/// labor_rate_per_hour = 24.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub cost: CostConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The file's settings, or defaults when no file is given.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        let rate = self.cost.labor_rate_per_hour;
        if !rate.is_finite() || rate < 0.0 {
            return Err(PlantifyError::InvalidInput(format!(
                "labor_rate_per_hour must be non-negative, got {}",
                rate
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        operation_type: Option<OperationType>,
        labor_rate: Option<f64>,
    ) -> Result<Self> {
        if database.is_some() {
            self.database = database;
        }
        if let Some(operation_type) = operation_type {
            self.cost.operation_type = operation_type;
        }
        if let Some(rate) = labor_rate {
            self.cost.labor_rate_per_hour = rate;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    pub fn cost_analyzer(&self) -> CostAnalyzer {
        CostAnalyzer::new(self.cost.operation_type, self.cost.labor_rate_per_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path(), PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.cost.operation_type, OperationType::Cafe);
        assert!((config.cost.labor_rate_per_hour - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str("[cost]\noperation_type = \"bakery\"\n").unwrap();
        assert_eq!(config.cost.operation_type, OperationType::Bakery);
        assert!((config.cost.labor_rate_per_hour - 20.0).abs() < 1e-12);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_load_from_file_and_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database = \"custom.json\"\n[cost]\noperation_type = \"restaurant\"\nlabor_rate_per_hour = 24.0"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("custom.json"));

        let config = config
            .with_overrides(None, Some(OperationType::Canteen), None)
            .unwrap();
        assert_eq!(config.cost.operation_type, OperationType::Canteen);
        assert!((config.cost_analyzer().labor_rate - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_rates() {
        assert!(matches!(
            AppConfig::from_toml_str("colour = \"blue\""),
            Err(PlantifyError::Toml(_))
        ));
        assert!(AppConfig::from_toml_str("[cost]\nlabor_rate_per_hour = -3.0").is_err());
        assert!(AppConfig::default()
            .with_overrides(None, None, Some(f64::NAN))
            .is_err());
    }
}
