use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;
use crate::processors::Aggregation;

/// The closed set of weather columns that can be selected for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "temperature_2m_max")]
    TemperatureMax,
    #[serde(rename = "temperature_2m_min")]
    TemperatureMin,
    #[serde(rename = "precipitation_sum")]
    Precipitation,
    #[serde(rename = "relative_humidity_2m_mean")]
    Humidity,
    #[serde(rename = "wind_speed_10m_max")]
    WindSpeedMax,
    #[serde(rename = "pressure_msl_mean")]
    Pressure,
    #[serde(rename = "wind_direction_10m_dominant")]
    WindDirection,
}

impl Metric {
    pub const COUNT: usize = 7;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TemperatureMax,
        Metric::TemperatureMin,
        Metric::Precipitation,
        Metric::Humidity,
        Metric::WindSpeedMax,
        Metric::Pressure,
        Metric::WindDirection,
    ];

    /// Column name used by every input table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::TemperatureMax => "temperature_2m_max",
            Metric::TemperatureMin => "temperature_2m_min",
            Metric::Precipitation => "precipitation_sum",
            Metric::Humidity => "relative_humidity_2m_mean",
            Metric::WindSpeedMax => "wind_speed_10m_max",
            Metric::Pressure => "pressure_msl_mean",
            Metric::WindDirection => "wind_direction_10m_dominant",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::TemperatureMax => "Max Temperature",
            Metric::TemperatureMin => "Min Temperature",
            Metric::Precipitation => "Rainfall",
            Metric::Humidity => "Relative Humidity",
            Metric::WindSpeedMax => "Max Wind Speed",
            Metric::Pressure => "Mean Sea-Level Pressure",
            Metric::WindDirection => "Dominant Wind Direction",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Metric::TemperatureMax | Metric::TemperatureMin => "°C",
            Metric::Precipitation => "mm",
            Metric::Humidity => "%",
            Metric::WindSpeedMax => "km/h",
            Metric::Pressure => "hPa",
            Metric::WindDirection => "°",
        }
    }

    /// How the metric is rolled up when daily rows are grouped into a year.
    ///
    /// Rainfall is additive over the window; the other quantities are intensive
    /// and are averaged. Wind direction is circular and is not rolled up.
    pub fn yearly_aggregation(&self) -> Option<Aggregation> {
        match self {
            Metric::Precipitation => Some(Aggregation::Sum),
            Metric::WindDirection => None,
            _ => Some(Aggregation::Mean),
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.column_name() == s.trim())
            .ok_or_else(|| AnalyticsError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One optional reading per metric, indexed by [`Metric`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues([Option<f64>; Metric::COUNT]);

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.0[metric.index()] = value;
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }
}
