pub mod dashboard;
pub mod section;

pub use dashboard::{
    Dashboard, DashboardReport, ExtremeYears, ForecastReport, Highlights, TemperatureRainfall,
};
pub use section::Section;
