pub mod forecast;
pub mod statistics;

pub use forecast::{
    fit_linear, predict_in_sample, predict_next_year, CityForecast, ForecastSeries, Forecaster,
    LinearModel,
};
pub use statistics::{argmax_by_group, Extreme, StatisticsExtractor};
