use crate::models::{Metric, Month, MonthlyRecord, Season, SeasonalRecord, YearRange, YearlyRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint<K> {
    pub key: K,
    /// `None` is a gap: the row exists but the metric was not recorded.
    pub value: Option<f64>,
}

impl<K> SeriesPoint<K> {
    pub fn new(key: K, value: Option<f64>) -> Self {
        Self { key, value }
    }
}

/// Ordered values of one metric, keyed by year, month or season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<K> {
    pub metric: Metric,
    pub points: Vec<SeriesPoint<K>>,
}

impl<K: Copy> Series<K> {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Points that carry a value.
    pub fn observed(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.key, v)))
    }
}

/// Rows of `city` with year inside `years`, ascending by year.
/// No matching rows gives an empty series.
pub fn yearly_series(
    table: &[YearlyRecord],
    city: &str,
    years: YearRange,
    metric: Metric,
) -> Series<i32> {
    let mut points: Vec<SeriesPoint<i32>> = table
        .iter()
        .filter(|r| r.city == city && years.contains(r.year))
        .map(|r| SeriesPoint::new(r.year, r.value(metric)))
        .collect();
    points.sort_by_key(|p| p.key);

    Series { metric, points }
}

/// Rows of `city` from the monthly table, Jan to Dec. Input order is not assumed.
pub fn monthly_series(table: &[MonthlyRecord], city: &str, metric: Metric) -> Series<Month> {
    let mut points: Vec<SeriesPoint<Month>> = table
        .iter()
        .filter(|r| r.city == city)
        .map(|r| SeriesPoint::new(r.month, r.value(metric)))
        .collect();
    points.sort_by_key(|p| p.key);

    Series { metric, points }
}

/// Rows of `city` from the pre-aggregated seasonal table, in display order.
pub fn seasonal_table_series(
    table: &[SeasonalRecord],
    city: &str,
    metric: Metric,
) -> Series<Season> {
    let mut points: Vec<SeriesPoint<Season>> = table
        .iter()
        .filter(|r| r.city == city)
        .map(|r| SeriesPoint::new(r.season, r.value(metric)))
        .collect();
    points.sort_by_key(|p| p.key);

    Series { metric, points }
}
