use crate::error::Result;
use crate::models::YearRange;
use crate::readers::DatasetPaths;
use crate::utils::constants::{
    ALL_CITIES_FILE, DEFAULT_DATA_DIR, ENV_PREFIX, ENV_SEPARATOR, MONTHLY_FILE, SEASONAL_FILE,
    YEARLY_FILE, YEAR_MAX, YEAR_MIN,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application settings, layered: built-in defaults, then an optional TOML
/// file, then `WEATHER_TRENDS__*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub yearly_file: String,
    pub monthly_file: String,
    pub seasonal_file: String,
    pub all_cities_file: String,
    pub year_min: i32,
    pub year_max: i32,
}

impl AppConfig {
    /// Load settings. A file given explicitly must exist.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("yearly_file", YEARLY_FILE)?
            .set_default("monthly_file", MONTHLY_FILE)?
            .set_default("seasonal_file", SEASONAL_FILE)?
            .set_default("all_cities_file", ALL_CITIES_FILE)?
            .set_default("year_min", i64::from(YEAR_MIN))?
            .set_default("year_max", i64::from(YEAR_MAX))?;

        if let Some(path) = file {
            debug!(path = %path.display(), "reading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?
            .try_deserialize()?;

        config.years()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Historical bounds every selection is clamped to.
    pub fn years(&self) -> Result<YearRange> {
        YearRange::new(self.year_min, self.year_max)
    }

    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            yearly: self.data_dir.join(&self.yearly_file),
            monthly: self.data_dir.join(&self.monthly_file),
            seasonal: self.data_dir.join(&self.seasonal_file),
            all_cities: self.data_dir.join(&self.all_cities_file),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            yearly_file: YEARLY_FILE.to_string(),
            monthly_file: MONTHLY_FILE.to_string(),
            seasonal_file: SEASONAL_FILE.to_string(),
            all_cities_file: ALL_CITIES_FILE.to_string(),
            year_min: YEAR_MIN,
            year_max: YEAR_MAX,
        }
    }
}
