use crate::models::{Metric, MonthlyRecord, Season};
use crate::processors::aggregate::{Accumulator, Aggregation};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalAverage {
    pub city: String,
    pub season: Season,
    pub value: f64,
    /// Monthly rows that contributed a value.
    pub months: usize,
}

/// Mean of `metric` per (city, season), with the season derived from each
/// monthly row's month.
///
/// Ordered by city, then season in display order. Groups without any value
/// are absent rather than zero-filled.
pub fn seasonal_average(table: &[MonthlyRecord], metric: Metric) -> Vec<SeasonalAverage> {
    group_by_season(table.iter(), metric)
}

/// Seasonal means of a single city, Winter, Summer, Monsoon, Post-Monsoon.
pub fn city_seasonal_average(
    table: &[MonthlyRecord],
    city: &str,
    metric: Metric,
) -> Vec<SeasonalAverage> {
    group_by_season(table.iter().filter(|r| r.city == city), metric)
}

fn group_by_season<'a>(
    rows: impl Iterator<Item = &'a MonthlyRecord>,
    metric: Metric,
) -> Vec<SeasonalAverage> {
    let mut groups: BTreeMap<(&str, Season), Accumulator> = BTreeMap::new();

    for row in rows {
        groups
            .entry((row.city.as_str(), row.season()))
            .or_default()
            .push(row.value(metric));
    }

    groups
        .into_iter()
        .filter_map(|((city, season), acc)| {
            acc.finish(Aggregation::Mean).map(|value| SeasonalAverage {
                city: city.to_string(),
                season,
                value,
                months: acc.count(),
            })
        })
        .collect()
}
