use crate::models::YearRange;
use crate::readers::Dataset;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub row_counts: TableCounts,
    pub cities: BTreeSet<String>,
    pub violations: Vec<ConsistencyViolation>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TableCounts {
    pub yearly: usize,
    pub monthly: usize,
    pub seasonal: usize,
    pub all_cities: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyViolation {
    pub table: &'static str,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// A city present in some tables is missing from this one.
    MissingCity,
    /// More than one row for the same key.
    DuplicateKey,
    /// A year outside the configured historical bounds.
    YearOutOfBounds,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

/// Cross-table checks the pipeline does not assume: the same city set in all
/// four tables, unique keys in the yearly and monthly tables, and years inside
/// the historical bounds. Violations are reported, never fatal.
pub struct ConsistencyChecker {
    bounds: YearRange,
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self {
            bounds: YearRange::full(),
        }
    }

    pub fn with_bounds(bounds: YearRange) -> Self {
        Self { bounds }
    }

    pub fn check(&self, dataset: &Dataset) -> ConsistencyReport {
        let per_table: [(&'static str, BTreeSet<&str>); 4] = [
            ("yearly", dataset.yearly.iter().map(|r| r.city.as_str()).collect()),
            ("monthly", dataset.monthly.iter().map(|r| r.city.as_str()).collect()),
            ("seasonal", dataset.seasonal.iter().map(|r| r.city.as_str()).collect()),
            ("all_cities", dataset.all_cities.iter().map(|r| r.city.as_str()).collect()),
        ];

        let all: BTreeSet<&str> = per_table
            .iter()
            .flat_map(|(_, cities)| cities.iter().copied())
            .collect();

        let mut violations = Vec::new();

        for (table, cities) in &per_table {
            for city in all.difference(cities) {
                violations.push(ConsistencyViolation {
                    table: *table,
                    violation_type: ViolationType::MissingCity,
                    details: format!("city '{}' has no rows", city),
                });
            }
        }

        self.check_duplicates(
            "yearly",
            dataset.yearly.iter().map(|r| (r.city.as_str(), r.year.to_string())),
            &mut violations,
        );
        self.check_duplicates(
            "monthly",
            dataset
                .monthly
                .iter()
                .map(|r| (r.city.as_str(), r.month.to_string())),
            &mut violations,
        );

        self.check_years(
            "yearly",
            dataset.yearly.iter().map(|r| (r.city.as_str(), r.year)),
            &mut violations,
        );
        self.check_years(
            "all_cities",
            dataset.all_cities.iter().map(|r| (r.city.as_str(), r.year)),
            &mut violations,
        );

        for violation in &violations {
            warn!(table = violation.table, "{}", violation.details);
        }

        ConsistencyReport {
            row_counts: TableCounts {
                yearly: dataset.yearly.len(),
                monthly: dataset.monthly.len(),
                seasonal: dataset.seasonal.len(),
                all_cities: dataset.all_cities.len(),
            },
            cities: all.into_iter().map(str::to_string).collect(),
            violations,
        }
    }

    fn check_duplicates<'a>(
        &self,
        table: &'static str,
        keys: impl Iterator<Item = (&'a str, String)>,
        violations: &mut Vec<ConsistencyViolation>,
    ) {
        let mut counts: BTreeMap<(&str, String), usize> = BTreeMap::new();
        for key in keys {
            *counts.entry(key).or_default() += 1;
        }

        for ((city, key), count) in counts {
            if count > 1 {
                violations.push(ConsistencyViolation {
                    table,
                    violation_type: ViolationType::DuplicateKey,
                    details: format!("{} rows for ({}, {})", count, city, key),
                });
            }
        }
    }

    fn check_years<'a>(
        &self,
        table: &'static str,
        rows: impl Iterator<Item = (&'a str, i32)>,
        violations: &mut Vec<ConsistencyViolation>,
    ) {
        let outside: BTreeSet<(&str, i32)> = rows
            .filter(|(_, year)| !self.bounds.contains(*year))
            .collect();

        for (city, year) in outside {
            violations.push(ConsistencyViolation {
                table,
                violation_type: ViolationType::YearOutOfBounds,
                details: format!(
                    "{} year {} is outside [{}, {}]",
                    city, year, self.bounds.min, self.bounds.max
                ),
            });
        }
    }
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}
