use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, Metric};
use crate::processors::{Accumulator, Aggregation, CityYearAggregate};
use serde::Serialize;
use std::collections::BTreeMap;

/// The winning group of an argmax and its reduced value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme<K> {
    pub group: K,
    pub value: f64,
}

/// Group `rows` by `group_key`, reduce `value` per group, and return the group
/// with the largest reduced value.
///
/// Groups are visited in ascending key order and only a strictly larger value
/// replaces the current best, so exact ties go to the smallest key. Groups
/// with no present value take no part. No eligible group at all is reported
/// as insufficient data.
pub fn argmax_by_group<R, K, G, V>(
    rows: &[R],
    group_key: G,
    value: V,
    reducer: Aggregation,
) -> Result<Extreme<K>>
where
    K: Ord,
    G: Fn(&R) -> K,
    V: Fn(&R) -> Option<f64>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(group_key(row)).or_default().push(value(row));
    }

    let mut best: Option<Extreme<K>> = None;

    for (group, acc) in groups {
        let Some(reduced) = acc.finish(reducer) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| reduced > b.value) {
            best = Some(Extreme {
                group,
                value: reduced,
            });
        }
    }

    best.ok_or_else(|| AnalyticsError::InsufficientData {
        context: "argmax by group".to_string(),
        points: 0,
    })
}

pub struct StatisticsExtractor;

impl StatisticsExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn hottest_city(&self, aggregates: &[CityYearAggregate]) -> Result<Extreme<String>> {
        self.city_extreme(aggregates, Metric::TemperatureMax, Aggregation::Mean)
    }

    pub fn wettest_city(&self, aggregates: &[CityYearAggregate]) -> Result<Extreme<String>> {
        self.city_extreme(aggregates, Metric::Precipitation, Aggregation::Sum)
    }

    pub fn most_humid_city(&self, aggregates: &[CityYearAggregate]) -> Result<Extreme<String>> {
        self.city_extreme(aggregates, Metric::Humidity, Aggregation::Mean)
    }

    pub fn hottest_year(&self, rows: &[DailyRecord]) -> Result<Extreme<i32>> {
        argmax_by_group(
            rows,
            |r| r.year,
            |r| r.value(Metric::TemperatureMax),
            Aggregation::Mean,
        )
    }

    pub fn wettest_year(&self, rows: &[DailyRecord]) -> Result<Extreme<i32>> {
        argmax_by_group(
            rows,
            |r| r.year,
            |r| r.value(Metric::Precipitation),
            Aggregation::Sum,
        )
    }

    fn city_extreme(
        &self,
        aggregates: &[CityYearAggregate],
        metric: Metric,
        reducer: Aggregation,
    ) -> Result<Extreme<String>> {
        argmax_by_group(aggregates, |a| a.city.clone(), |a| a.value(metric), reducer).map_err(
            |e| match e {
                AnalyticsError::InsufficientData { points, .. } => {
                    AnalyticsError::InsufficientData {
                        context: format!("highest {} by city", metric),
                        points,
                    }
                }
                other => other,
            },
        )
    }
}

impl Default for StatisticsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricValues;
    use crate::processors::city_year_aggregate;
    use chrono::NaiveDate;

    fn aggregate(city: &str, year: i32, tmax: f64, rain: f64) -> CityYearAggregate {
        CityYearAggregate {
            city: city.to_string(),
            year,
            rows: 1,
            values: MetricValues::new()
                .with(Metric::TemperatureMax, tmax)
                .with(Metric::Precipitation, rain),
        }
    }

    fn daily(city: &str, year: i32, tmax: f64, rain: f64) -> DailyRecord {
        let time = NaiveDate::from_ymd_opt(year, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        DailyRecord::new(
            city,
            time,
            MetricValues::new()
                .with(Metric::TemperatureMax, tmax)
                .with(Metric::Precipitation, rain),
        )
    }

    #[test]
    fn test_argmax_picks_highest_mean() {
        let rows = vec![("A", 30.0), ("B", 35.0), ("C", 32.0)];

        let extreme =
            argmax_by_group(&rows, |r| r.0, |r| Some(r.1), Aggregation::Mean).unwrap();

        assert_eq!(extreme.group, "B");
        assert_eq!(extreme.value, 35.0);
    }

    #[test]
    fn test_argmax_reduces_per_group() {
        let rows = vec![("A", 10.0), ("A", 10.0), ("B", 15.0)];

        let by_sum = argmax_by_group(&rows, |r| r.0, |r| Some(r.1), Aggregation::Sum).unwrap();
        let by_mean = argmax_by_group(&rows, |r| r.0, |r| Some(r.1), Aggregation::Mean).unwrap();

        assert_eq!((by_sum.group, by_sum.value), ("A", 20.0));
        assert_eq!((by_mean.group, by_mean.value), ("B", 15.0));
    }

    #[test]
    fn test_argmax_tie_goes_to_smallest_key() {
        let rows = vec![("Pune", 33.0), ("Agra", 33.0), ("Kota", 33.0)];

        let extreme =
            argmax_by_group(&rows, |r| r.0, |r| Some(r.1), Aggregation::Mean).unwrap();

        assert_eq!(extreme.group, "Agra");
    }

    #[test]
    fn test_argmax_on_empty_input_is_insufficient() {
        let rows: Vec<(&str, f64)> = vec![];
        let result = argmax_by_group(&rows, |r| r.0, |r| Some(r.1), Aggregation::Mean);
        assert!(matches!(result, Err(AnalyticsError::InsufficientData { .. })));
    }

    #[test]
    fn test_argmax_ignores_groups_without_values() {
        let rows = vec![("A", None), ("B", Some(-5.0))];

        let extreme = argmax_by_group(&rows, |r| r.0, |r| r.1, Aggregation::Sum).unwrap();

        assert_eq!(extreme.group, "B");
    }

    #[test]
    fn test_argmax_counts_no_usable_points_when_all_values_missing() {
        let rows: Vec<(&str, Option<f64>)> = vec![("A", None), ("B", None), ("B", None)];

        let result = argmax_by_group(&rows, |r| r.0, |r| r.1, Aggregation::Mean);

        match result {
            Err(AnalyticsError::InsufficientData { context, points }) => {
                assert_eq!(context, "argmax by group");
                assert_eq!(points, 0);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_city_highlights() {
        let aggregates = vec![
            aggregate("Chennai", 2020, 34.0, 1400.0),
            aggregate("Chennai", 2021, 34.4, 1300.0),
            aggregate("Delhi", 2020, 32.0, 800.0),
            aggregate("Mumbai", 2020, 31.0, 2300.0),
            aggregate("Mumbai", 2021, 31.2, 2500.0),
        ];
        let extractor = StatisticsExtractor::new();

        let hottest = extractor.hottest_city(&aggregates).unwrap();
        assert_eq!(hottest.group, "Chennai");
        assert!((hottest.value - 34.2).abs() < 1e-9);

        let wettest = extractor.wettest_city(&aggregates).unwrap();
        assert_eq!(wettest.group, "Mumbai");
        assert!((wettest.value - 4800.0).abs() < 1e-9);

        // no humidity values anywhere
        assert!(matches!(
            extractor.most_humid_city(&aggregates),
            Err(AnalyticsError::InsufficientData { points: 0, .. })
        ));
    }

    #[test]
    fn test_extreme_years() {
        let rows = vec![
            daily("Delhi", 2019, 40.0, 10.0),
            daily("Mumbai", 2019, 30.0, 100.0),
            daily("Delhi", 2020, 36.0, 50.0),
            daily("Mumbai", 2020, 36.0, 90.0),
        ];
        let extractor = StatisticsExtractor::new();

        let hottest = extractor.hottest_year(&rows).unwrap();
        let wettest = extractor.wettest_year(&rows).unwrap();

        assert_eq!((hottest.group, hottest.value), (2020, 36.0));
        assert_eq!((wettest.group, wettest.value), (2020, 140.0));
    }

    #[test]
    fn test_hottest_city_from_raw_rows() {
        let rows = vec![
            daily("Jaipur", 2020, 30.0, 0.0),
            daily("Jaipur", 2020, 40.0, 0.0),
            daily("Kochi", 2020, 31.0, 0.0),
        ];

        let hottest = StatisticsExtractor::new()
            .hottest_city(&city_year_aggregate(&rows))
            .unwrap();

        assert_eq!(hottest.group, "Jaipur");
        assert_eq!(hottest.value, 35.0);
    }
}
