use crate::models::{DailyRecord, Metric, MetricValues};
use crate::processors::series::{Series, SeriesPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reducer applied to the values of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Sum,
}

impl Aggregation {
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Sum => "total",
        }
    }
}

/// Running sum and count of the present values of one group.
///
/// Absent values are skipped. A group with no present value has no result,
/// for sums as well as means.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(&self, aggregation: Aggregation) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match aggregation {
            Aggregation::Mean => Some(self.sum / self.count as f64),
            Aggregation::Sum => Some(self.sum),
        }
    }
}

impl FromIterator<Option<f64>> for Accumulator {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        for value in iter {
            acc.push(value);
        }
        acc
    }
}

/// Per-(city, year) roll-up of the time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityYearAggregate {
    pub city: String,
    pub year: i32,
    pub rows: usize,
    pub values: MetricValues,
}

impl CityYearAggregate {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}

/// Group the time series by (city, year) and roll each metric up with its
/// yearly aggregation: rainfall summed, the other metrics averaged.
/// Metrics without a yearly aggregation are left absent.
///
/// Output is ordered by city, then year.
pub fn city_year_aggregate(rows: &[DailyRecord]) -> Vec<CityYearAggregate> {
    let mut groups: BTreeMap<(&str, i32), (usize, [Accumulator; Metric::COUNT])> = BTreeMap::new();

    for row in rows {
        let (count, accumulators) = groups
            .entry((row.city.as_str(), row.year))
            .or_insert_with(|| (0, [Accumulator::new(); Metric::COUNT]));
        *count += 1;
        for metric in Metric::ALL {
            accumulators[metric.index()].push(row.value(metric));
        }
    }

    groups
        .into_iter()
        .map(|((city, year), (count, accumulators))| {
            let mut values = MetricValues::new();
            for metric in Metric::ALL {
                if let Some(aggregation) = metric.yearly_aggregation() {
                    values.set(metric, accumulators[metric.index()].finish(aggregation));
                }
            }
            CityYearAggregate {
                city: city.to_string(),
                year,
                rows: count,
                values,
            }
        })
        .collect()
}

/// Aggregates of one city, ordered by year.
pub fn city_aggregates<'a>(
    aggregates: &'a [CityYearAggregate],
    city: &str,
) -> Vec<&'a CityYearAggregate> {
    let mut rows: Vec<&CityYearAggregate> =
        aggregates.iter().filter(|a| a.city == city).collect();
    rows.sort_by_key(|a| a.year);
    rows
}

/// One yearly series per city, for comparing cities on a single metric.
pub fn comparison_series(
    aggregates: &[CityYearAggregate],
    metric: Metric,
) -> BTreeMap<String, Series<i32>> {
    let mut by_city: BTreeMap<String, Series<i32>> = BTreeMap::new();

    for aggregate in aggregates {
        by_city
            .entry(aggregate.city.clone())
            .or_insert_with(|| Series::new(metric))
            .points
            .push(SeriesPoint::new(aggregate.year, aggregate.value(metric)));
    }

    for series in by_city.values_mut() {
        series.points.sort_by_key(|p| p.key);
    }

    by_city
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(city: &str, year: i32, month: u32, day: u32, tmax: f64, rain: Option<f64>) -> DailyRecord {
        let time = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut values = MetricValues::new()
            .with(Metric::TemperatureMax, tmax)
            .with(Metric::WindDirection, 180.0);
        values.set(Metric::Precipitation, rain);
        DailyRecord::new(city, time, values)
    }

    #[test]
    fn test_accumulator_skips_absent_values() {
        let acc: Accumulator = vec![Some(2.0), None, Some(4.0)].into_iter().collect();
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.finish(Aggregation::Mean), Some(3.0));
        assert_eq!(acc.finish(Aggregation::Sum), Some(6.0));
    }

    #[test]
    fn test_empty_accumulator_has_no_result() {
        let acc: Accumulator = vec![None, None].into_iter().collect();
        assert_eq!(acc.finish(Aggregation::Sum), None);
        assert_eq!(acc.finish(Aggregation::Mean), None);
    }

    #[test]
    fn test_rainfall_summed_temperature_averaged() {
        let rows = vec![
            daily("Delhi", 2020, 1, 1, 20.0, Some(1.5)),
            daily("Delhi", 2020, 6, 1, 40.0, Some(10.0)),
            daily("Delhi", 2020, 7, 1, 36.0, None),
            daily("Delhi", 2021, 1, 1, 21.0, Some(0.0)),
        ];

        let aggregates = city_year_aggregate(&rows);

        assert_eq!(aggregates.len(), 2);
        let first = &aggregates[0];
        assert_eq!((first.city.as_str(), first.year, first.rows), ("Delhi", 2020, 3));
        assert_eq!(first.value(Metric::Precipitation), Some(11.5));
        assert_eq!(first.value(Metric::TemperatureMax), Some(32.0));
        assert_eq!(first.value(Metric::WindDirection), None);
        assert_eq!(aggregates[1].value(Metric::Precipitation), Some(0.0));
    }

    #[test]
    fn test_aggregate_ordered_by_city_then_year() {
        let rows = vec![
            daily("Pune", 2016, 1, 1, 30.0, None),
            daily("Delhi", 2017, 1, 1, 25.0, None),
            daily("Delhi", 2015, 1, 1, 24.0, None),
        ];

        let keys: Vec<(String, i32)> = city_year_aggregate(&rows)
            .into_iter()
            .map(|a| (a.city, a.year))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Delhi".to_string(), 2015),
                ("Delhi".to_string(), 2017),
                ("Pune".to_string(), 2016)
            ]
        );
    }

    #[test]
    fn test_comparison_series_per_city() {
        let rows = vec![
            daily("Pune", 2016, 1, 1, 30.0, None),
            daily("Delhi", 2016, 1, 1, 25.0, None),
            daily("Delhi", 2015, 1, 1, 24.0, None),
        ];
        let aggregates = city_year_aggregate(&rows);

        let series = comparison_series(&aggregates, Metric::TemperatureMax);

        assert_eq!(series.len(), 2);
        let delhi: Vec<i32> = series["Delhi"].points.iter().map(|p| p.key).collect();
        assert_eq!(delhi, vec![2015, 2016]);
        assert_eq!(series["Pune"].points[0].value, Some(30.0));
    }
}
