pub mod aggregate;
pub mod consistency_checker;
pub mod pivot;
pub mod seasonal;
pub mod series;

pub use aggregate::{
    city_aggregates, city_year_aggregate, comparison_series, Accumulator, Aggregation,
    CityYearAggregate,
};
pub use consistency_checker::{
    ConsistencyChecker, ConsistencyReport, ConsistencyViolation, TableCounts, ViolationType,
};
pub use pivot::{month_city_pivot, pivot, year_city_pivot, PivotCell, PivotTable, RowOrder};
pub use seasonal::{city_seasonal_average, seasonal_average, SeasonalAverage};
pub use series::{monthly_series, seasonal_table_series, yearly_series, Series, SeriesPoint};
