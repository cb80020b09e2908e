use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, MonthlyRecord, SeasonalRecord, YearlyRecord};
use crate::readers::{TableCache, TableReader};
use crate::utils::constants::{ALL_CITIES_FILE, MONTHLY_FILE, SEASONAL_FILE, YEARLY_FILE};
use crate::utils::progress::ProgressReporter;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Locations of the four input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub yearly: PathBuf,
    pub monthly: PathBuf,
    pub seasonal: PathBuf,
    pub all_cities: PathBuf,
}

impl DatasetPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            yearly: dir.join(YEARLY_FILE),
            monthly: dir.join(MONTHLY_FILE),
            seasonal: dir.join(SEASONAL_FILE),
            all_cities: dir.join(ALL_CITIES_FILE),
        }
    }
}

/// The four source tables. Immutable once loaded; clones share storage.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub yearly: Arc<Vec<YearlyRecord>>,
    pub monthly: Arc<Vec<MonthlyRecord>>,
    pub seasonal: Arc<Vec<SeasonalRecord>>,
    pub all_cities: Arc<Vec<DailyRecord>>,
}

impl Dataset {
    pub fn new(
        yearly: Vec<YearlyRecord>,
        monthly: Vec<MonthlyRecord>,
        seasonal: Vec<SeasonalRecord>,
        all_cities: Vec<DailyRecord>,
    ) -> Self {
        Self {
            yearly: Arc::new(yearly),
            monthly: Arc::new(monthly),
            seasonal: Arc::new(seasonal),
            all_cities: Arc::new(all_cities),
        }
    }

    /// Distinct cities of the time-series table, sorted.
    pub fn cities(&self) -> Vec<String> {
        self.all_cities
            .iter()
            .map(|r| r.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn has_city(&self, city: &str) -> bool {
        self.all_cities.iter().any(|r| r.city == city)
            || self.yearly.iter().any(|r| r.city == city)
    }

    /// City used when none is requested: the first in sorted order.
    pub fn default_city(&self) -> Result<String> {
        self.cities()
            .into_iter()
            .next()
            .ok_or_else(|| AnalyticsError::InsufficientData {
                context: "city list".to_string(),
                points: 0,
            })
    }

    pub fn total_rows(&self) -> usize {
        self.yearly.len() + self.monthly.len() + self.seasonal.len() + self.all_cities.len()
    }
}

/// Loads datasets through per-table caches, so repeated loads of the same
/// paths never touch storage again.
pub struct DatasetLoader {
    reader: TableReader,
    yearly: TableCache<YearlyRecord>,
    monthly: TableCache<MonthlyRecord>,
    seasonal: TableCache<SeasonalRecord>,
    all_cities: TableCache<DailyRecord>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            reader: TableReader::new(),
            yearly: TableCache::new(),
            monthly: TableCache::new(),
            seasonal: TableCache::new(),
            all_cities: TableCache::new(),
        }
    }

    pub fn with_reader(mut self, reader: TableReader) -> Self {
        self.reader = reader;
        self
    }

    /// Load all four tables. Any failure aborts the whole load.
    pub fn load(&self, paths: &DatasetPaths, progress: Option<&ProgressReporter>) -> Result<Dataset> {
        let step = |message: &str| {
            if let Some(p) = progress {
                p.set_message(message);
            }
        };

        step("Reading yearly table...");
        let yearly = self
            .yearly
            .get_or_load(&paths.yearly, |p| self.reader.read_yearly(p))?;

        step("Reading monthly table...");
        let monthly = self
            .monthly
            .get_or_load(&paths.monthly, |p| self.reader.read_monthly(p))?;

        step("Reading seasonal table...");
        let seasonal = self
            .seasonal
            .get_or_load(&paths.seasonal, |p| self.reader.read_seasonal(p))?;

        step("Reading time series...");
        let all_cities = self
            .all_cities
            .get_or_load(&paths.all_cities, |p| self.reader.read_all_cities(p))?;

        let dataset = Dataset {
            yearly,
            monthly,
            seasonal,
            all_cities,
        };

        info!(
            yearly = dataset.yearly.len(),
            monthly = dataset.monthly.len(),
            seasonal = dataset.seasonal.len(),
            all_cities = dataset.all_cities.len(),
            "dataset loaded"
        );

        Ok(dataset)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricValues;
    use chrono::NaiveDate;

    fn daily(city: &str, year: i32) -> DailyRecord {
        let time = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        DailyRecord::new(city, time, MetricValues::new())
    }

    #[test]
    fn test_cities_sorted_and_distinct() {
        let dataset = Dataset::new(
            vec![],
            vec![],
            vec![],
            vec![
                daily("Pune", 2015),
                daily("Delhi", 2015),
                daily("Pune", 2016),
                daily("Bengaluru", 2016),
            ],
        );

        assert_eq!(dataset.cities(), vec!["Bengaluru", "Delhi", "Pune"]);
        assert_eq!(dataset.default_city().unwrap(), "Bengaluru");
        assert!(dataset.has_city("Delhi"));
        assert!(!dataset.has_city("Jaipur"));
    }

    #[test]
    fn test_default_city_on_empty_dataset() {
        let dataset = Dataset::new(vec![], vec![], vec![], vec![]);
        assert!(dataset.default_city().is_err());
    }

    #[test]
    fn test_paths_in_dir() {
        let paths = DatasetPaths::in_dir(Path::new("data"));
        assert_eq!(paths.yearly, Path::new("data/yearly_weather.csv"));
        assert_eq!(paths.all_cities, Path::new("data/all_cities_weather.csv"));
    }
}
