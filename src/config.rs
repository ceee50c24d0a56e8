//! Run configuration.
//!
//! Everything has a compiled-in default. A `floatlog.yaml` in the working
//! directory overrides any subset of the fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ItemDescriptor;

pub const CONFIG_FILE: &str = "floatlog.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("parsing config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub item: ItemDescriptor,
    /// Listings requested per page.
    pub page_size: u32,
    /// Listings requested by the count probe, only `total_count` is used.
    pub probe_count: u32,
    /// Upper bound of inspections in flight at once.
    pub concurrency: usize,
    /// `converted_price` is in currency subunits, this many make one unit.
    pub price_divisor: f64,
    pub currency_suffix: String,
    /// Steam currency code, 3 is EUR.
    pub currency: u32,
    pub country: String,
    pub language: String,
    pub market_url: String,
    pub float_url: String,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            item: ItemDescriptor::default(),
            page_size: 100,
            probe_count: 1,
            concurrency: 100,
            price_divisor: 100.0,
            currency_suffix: "€".to_string(),
            currency: 3,
            country: "CZ".to_string(),
            language: "english".to_string(),
            market_url: "https://steamcommunity.com/market/listings".to_string(),
            float_url: "https://floats.gainskins.com/".to_string(),
            output_dir: PathBuf::from("./output"),
            log_level: "info".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Also rejects NaN.
        if !(self.price_divisor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "price_divisor must be positive, got {}",
                self.price_divisor
            )));
        }
        Ok(())
    }

    /// Loads the file at `path`, falling back to the defaults if it does not
    /// exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Condition;

    #[test]
    fn partial_override() {
        let content = r#"
item:
  stattrak: true
  weapon: AK-47
  finish: Asiimov
  wear: field-tested
page_size: 50
log_level: debug
"#;

        let config = Config::from_yaml(content).unwrap();

        assert!(config.item.stattrak);
        assert_eq!(730, config.item.app_id);
        assert_eq!(Condition::FieldTested, config.item.wear);
        assert_eq!(50, config.page_size);
        assert_eq!("CZ", config.country);
        assert_eq!(tracing::Level::DEBUG, config.tracing_level());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load("does/not/exist/floatlog.yaml").unwrap();

        assert_eq!(100, config.page_size);
        assert_eq!(ItemDescriptor::default(), config.item);
    }

    #[test]
    fn bad_level_falls_back() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Default::default()
        };

        assert_eq!(tracing::Level::INFO, config.tracing_level());
    }

    #[test]
    fn non_positive_divisor_rejected() {
        for divisor in ["0", "-87", ".nan"] {
            let content = format!("price_divisor: {divisor}");

            assert!(matches!(
                Config::from_yaml(&content),
                Err(ConfigError::Invalid(_))
            ));
        }

        assert_eq!(87.0, Config::from_yaml("price_divisor: 87").unwrap().price_divisor);
    }
}
