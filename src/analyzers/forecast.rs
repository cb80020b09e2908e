use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, Metric, YearRange};
use crate::processors::{city_aggregates, city_year_aggregate, CityYearAggregate};
use serde::Serialize;
use tracing::debug;

/// Ordinary least-squares line `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
    /// Number of (year, value) pairs the line was fitted on.
    pub observations: usize,
}

impl LinearModel {
    /// Evaluate the line at any year, inside or beyond the fitted range.
    pub fn predict(&self, year: f64) -> f64 {
        self.slope * year + self.intercept
    }
}

/// Fit `values` against `years` by least squares.
///
/// Every input must be finite, and at least two years must differ in value;
/// otherwise the line is not determined and `InsufficientData` is returned.
pub fn fit_linear(years: &[f64], values: &[f64]) -> Result<LinearModel> {
    if years.len() != values.len() {
        return Err(AnalyticsError::LengthMismatch {
            years: years.len(),
            values: values.len(),
        });
    }

    for (i, (year, value)) in years.iter().zip(values).enumerate() {
        if !year.is_finite() || !value.is_finite() {
            return Err(AnalyticsError::NonFinite {
                context: format!("regression input at position {}", i),
            });
        }
    }

    let distinct = distinct_count(years);
    if distinct < 2 {
        return Err(AnalyticsError::InsufficientData {
            context: "linear fit".to_string(),
            points: distinct,
        });
    }

    let n = years.len() as f64;
    let year_mean = years.iter().sum::<f64>() / n;
    let value_mean = values.iter().sum::<f64>() / n;

    // Centred sums keep precision with year-sized x values
    let (sxy, sxx) = years
        .iter()
        .zip(values)
        .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
            let dx = x - year_mean;
            (sxy + dx * (y - value_mean), sxx + dx * dx)
        });

    if sxx <= 0.0 {
        return Err(AnalyticsError::InsufficientData {
            context: "linear fit".to_string(),
            points: distinct,
        });
    }

    let slope = sxy / sxx;
    let intercept = value_mean - slope * year_mean;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(AnalyticsError::NonFinite {
            context: "fitted line".to_string(),
        });
    }

    Ok(LinearModel {
        slope,
        intercept,
        observations: years.len(),
    })
}

/// Numerically distinct values; `0.0` and `-0.0` count once. Inputs are finite.
fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| a == b);
    sorted.len()
}

/// The fitted line at each of `years`.
pub fn predict_in_sample(model: &LinearModel, years: &[i32]) -> Vec<f64> {
    years.iter().map(|&y| model.predict(f64::from(y))).collect()
}

/// Extrapolate one year past `last_observed_year`: `(next year, predicted value)`.
pub fn predict_next_year(model: &LinearModel, last_observed_year: i32) -> (i32, f64) {
    let next = last_observed_year + 1;
    (next, model.predict(f64::from(next)))
}

/// Observed history, fitted trend line and next-year extrapolation of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    pub metric: Metric,
    pub model: LinearModel,
    pub historical: Vec<(i32, f64)>,
    pub fitted: Vec<(i32, f64)>,
    pub next_year: i32,
    pub predicted: f64,
}

impl ForecastSeries {
    /// Fit and extrapolate over `(year, value)` pairs, which need not be sorted.
    pub fn from_history(metric: Metric, mut historical: Vec<(i32, f64)>) -> Result<Self> {
        historical.sort_by_key(|(year, _)| *year);
        let context = || format!("{} forecast", metric);
        let Some(&(last_year, _)) = historical.last() else {
            return Err(AnalyticsError::InsufficientData {
                context: context(),
                points: 0,
            });
        };

        let years: Vec<f64> = historical.iter().map(|(y, _)| f64::from(*y)).collect();
        let values: Vec<f64> = historical.iter().map(|(_, v)| *v).collect();
        let model = fit_linear(&years, &values).map_err(|e| match e {
            AnalyticsError::InsufficientData { points, .. } => AnalyticsError::InsufficientData {
                context: context(),
                points,
            },
            other => other,
        })?;

        let observed_years: Vec<i32> = historical.iter().map(|(y, _)| *y).collect();
        let fitted = observed_years
            .iter()
            .copied()
            .zip(predict_in_sample(&model, &observed_years))
            .collect();

        let (next_year, predicted) = predict_next_year(&model, last_year);

        Ok(Self {
            metric,
            model,
            historical,
            fitted,
            next_year,
            predicted,
        })
    }
}

/// Independent next-year forecasts of max temperature and rainfall for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityForecast {
    pub city: String,
    pub temperature: ForecastSeries,
    pub rainfall: ForecastSeries,
}

/// Builds per-city forecasts from the time series: daily rows are rolled up per
/// year first (mean max temperature, summed rainfall), then each metric gets
/// its own line.
pub struct Forecaster {
    years: YearRange,
}

impl Forecaster {
    pub fn new() -> Self {
        Self {
            years: YearRange::full(),
        }
    }

    pub fn with_years(years: YearRange) -> Self {
        Self { years }
    }

    pub fn forecast_city(&self, rows: &[DailyRecord], city: &str) -> Result<CityForecast> {
        let aggregates = city_year_aggregate(rows);
        Ok(CityForecast {
            city: city.to_string(),
            temperature: self.forecast_metric(&aggregates, city, Metric::TemperatureMax)?,
            rainfall: self.forecast_metric(&aggregates, city, Metric::Precipitation)?,
        })
    }

    /// Forecast one metric from precomputed (city, year) aggregates.
    pub fn forecast_metric(
        &self,
        aggregates: &[CityYearAggregate],
        city: &str,
        metric: Metric,
    ) -> Result<ForecastSeries> {
        let history: Vec<(i32, f64)> = city_aggregates(aggregates, city)
            .into_iter()
            .filter(|a| self.years.contains(a.year))
            .filter_map(|a| a.value(metric).map(|v| (a.year, v)))
            .collect();

        debug!(city, metric = %metric, points = history.len(), "fitting trend");
        ForecastSeries::from_history(metric, history)
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}
