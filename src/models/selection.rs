use serde::Serialize;
use validator::Validate;

use super::metric::Metric;
use crate::error::{AnalyticsError, Result};
use crate::utils::constants::{YEAR_MAX, YEAR_MIN};

/// Inclusive year interval, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(AnalyticsError::InvalidYearRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The historical range covered by the bundled datasets.
    pub fn full() -> Self {
        Self {
            min: YEAR_MIN,
            max: YEAR_MAX,
        }
    }

    /// Every representable year.
    pub fn unbounded() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    /// Restrict the range to `bounds`; a range entirely outside collapses onto the nearest edge.
    pub fn clamp_to(&self, bounds: YearRange) -> Self {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(bounds.min, bounds.max);
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Request context for one dashboard render: city, metric and year range,
/// passed explicitly to every pipeline step.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Selection {
    #[validate(length(min = 1))]
    pub city: String,
    pub metric: Metric,
    pub years: YearRange,
}

impl Selection {
    pub fn new(city: impl Into<String>, metric: Metric, years: YearRange) -> Result<Self> {
        let selection = Self {
            city: city.into(),
            metric,
            years,
        };
        selection.validate()?;
        Ok(selection)
    }

    pub fn builder(city: impl Into<String>) -> SelectionBuilder {
        SelectionBuilder::new(city)
    }
}

/// Builds a [`Selection`] from loosely typed input such as CLI arguments.
pub struct SelectionBuilder {
    city: String,
    metric: Option<String>,
    year_from: Option<i32>,
    year_to: Option<i32>,
    bounds: YearRange,
}

impl SelectionBuilder {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            metric: None,
            year_from: None,
            year_to: None,
            bounds: YearRange::full(),
        }
    }

    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn year_from(mut self, year: Option<i32>) -> Self {
        self.year_from = year;
        self
    }

    pub fn year_to(mut self, year: Option<i32>) -> Self {
        self.year_to = year;
        self
    }

    pub fn bounds(mut self, bounds: YearRange) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn build(self) -> Result<Selection> {
        let metric = match self.metric {
            Some(name) => name.parse::<Metric>()?,
            None => Metric::TemperatureMax,
        };
        let years = YearRange::new(
            self.year_from.unwrap_or(self.bounds.min),
            self.year_to.unwrap_or(self.bounds.max),
        )?
        .clamp_to(self.bounds);

        Selection::new(self.city, metric, years)
    }
}
