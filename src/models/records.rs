use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use validator::Validate;

use super::calendar::{Month, Season};
use super::metric::{Metric, MetricValues};

/// One row of the pre-aggregated yearly table.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct YearlyRecord {
    #[validate(length(min = 1))]
    pub city: String,
    pub year: i32,
    pub values: MetricValues,
}

impl YearlyRecord {
    pub fn new(city: impl Into<String>, year: i32, values: MetricValues) -> Self {
        Self {
            city: city.into(),
            year,
            values,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}

/// One row of the monthly climatology table (aggregated across years).
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct MonthlyRecord {
    #[validate(length(min = 1))]
    pub city: String,
    pub month: Month,
    pub values: MetricValues,
}

impl MonthlyRecord {
    pub fn new(city: impl Into<String>, month: Month, values: MetricValues) -> Self {
        Self {
            city: city.into(),
            month,
            values,
        }
    }

    pub fn season(&self) -> Season {
        self.month.season()
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}

/// One row of the pre-aggregated seasonal table.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct SeasonalRecord {
    #[validate(length(min = 1))]
    pub city: String,
    pub season: Season,
    pub values: MetricValues,
}

impl SeasonalRecord {
    pub fn new(city: impl Into<String>, season: Season, values: MetricValues) -> Self {
        Self {
            city: city.into(),
            season,
            values,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}

/// One row of the finest-grain time series. Year and month are derived from `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct DailyRecord {
    #[validate(length(min = 1))]
    pub city: String,
    pub time: NaiveDateTime,
    pub year: i32,
    pub month: Month,
    pub values: MetricValues,
}

impl DailyRecord {
    pub fn new(city: impl Into<String>, time: NaiveDateTime, values: MetricValues) -> Self {
        Self {
            city: city.into(),
            time,
            year: time.year(),
            month: Month::of(&time),
            values,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}
