pub mod calendar;
pub mod metric;
pub mod records;
pub mod selection;

pub use calendar::{Month, Season};
pub use metric::{Metric, MetricValues};
pub use records::{DailyRecord, MonthlyRecord, SeasonalRecord, YearlyRecord};
pub use selection::{Selection, SelectionBuilder, YearRange};
