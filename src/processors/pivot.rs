use crate::models::{Metric, Month, MonthlyRecord, YearlyRecord};
use crate::processors::aggregate::{Accumulator, Aggregation};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A heatmap cell. `NoData` marks a (row, column) pair with no contributing
/// value and is never the same thing as `Value(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PivotCell {
    Value(f64),
    NoData,
}

impl PivotCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            PivotCell::Value(v) => Some(*v),
            PivotCell::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PivotCell::NoData)
    }
}

impl From<Option<f64>> for PivotCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(PivotCell::NoData, PivotCell::Value)
    }
}

impl fmt::Display for PivotCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotCell::Value(v) => write!(f, "{:.1}", v),
            PivotCell::NoData => write!(f, "n/a"),
        }
    }
}

impl Serialize for PivotCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PivotCell::Value(v) => serializer.serialize_f64(*v),
            PivotCell::NoData => serializer.serialize_none(),
        }
    }
}

/// How pivot rows are laid out.
#[derive(Debug, Clone)]
pub enum RowOrder<K> {
    /// Exactly these rows, in this order, even when some have no data.
    Fixed(Vec<K>),
    /// The keys present in the input, ascending.
    Observed,
}

/// Two-dimensional aggregate: `cells[r][c]` is the aggregate of all rows with
/// row key `rows[r]` and column key `columns[c]`. Columns are ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable<K> {
    pub metric: Metric,
    pub aggregation: Aggregation,
    pub rows: Vec<K>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<PivotCell>>,
}

impl<K: PartialEq> PivotTable<K> {
    /// `None` when the row or column key is not part of the table.
    pub fn cell(&self, row: &K, column: &str) -> Option<PivotCell> {
        let r = self.rows.iter().position(|k| k == row)?;
        let c = self.columns.iter().position(|k| k == column)?;
        Some(self.cells[r][c])
    }
}

impl<K> PivotTable<K> {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Build a pivot table over `rows`.
pub fn pivot<R, K, FR, FC, FV>(
    rows: &[R],
    row_key: FR,
    column_key: FC,
    value: FV,
    metric: Metric,
    aggregation: Aggregation,
    row_order: RowOrder<K>,
) -> PivotTable<K>
where
    K: Ord + Clone,
    FR: Fn(&R) -> K,
    FC: Fn(&R) -> &str,
    FV: Fn(&R) -> Option<f64>,
{
    let mut groups: BTreeMap<(K, &str), Accumulator> = BTreeMap::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();

    for row in rows {
        let column = column_key(row);
        columns.insert(column);
        groups
            .entry((row_key(row), column))
            .or_default()
            .push(value(row));
    }

    let row_keys: Vec<K> = match row_order {
        RowOrder::Fixed(keys) => keys,
        RowOrder::Observed => groups
            .keys()
            .map(|(k, _)| k.clone())
            .collect::<BTreeSet<K>>()
            .into_iter()
            .collect(),
    };

    let cells: Vec<Vec<PivotCell>> = row_keys
        .iter()
        .map(|k| {
            columns
                .iter()
                .map(|c| {
                    PivotCell::from(
                        groups
                            .get(&(k.clone(), *c))
                            .and_then(|acc| acc.finish(aggregation)),
                    )
                })
                .collect()
        })
        .collect();

    PivotTable {
        metric,
        aggregation,
        rows: row_keys,
        columns: columns.into_iter().map(str::to_string).collect(),
        cells,
    }
}

/// Month x city means of the monthly table. Always twelve rows, Jan to Dec.
pub fn month_city_pivot(table: &[MonthlyRecord], metric: Metric) -> PivotTable<Month> {
    pivot(
        table,
        |r| r.month,
        |r| r.city.as_str(),
        |r| r.value(metric),
        metric,
        Aggregation::Mean,
        RowOrder::Fixed(Month::all().collect()),
    )
}

/// Year x city means of the yearly table, years ascending.
pub fn year_city_pivot(table: &[YearlyRecord], metric: Metric) -> PivotTable<i32> {
    pivot(
        table,
        |r| r.year,
        |r| r.city.as_str(),
        |r| r.value(metric),
        metric,
        Aggregation::Mean,
        RowOrder::Observed,
    )
}
