use crate::analyzers::{Extreme, ForecastSeries, Forecaster, StatisticsExtractor};
use crate::error::{AnalyticsError, Result};
use crate::models::{DailyRecord, Metric, Month, Season, Selection, YearRange};
use crate::processors::{
    city_seasonal_average, city_year_aggregate, comparison_series, month_city_pivot,
    monthly_series, seasonal_table_series, year_city_pivot, yearly_series, CityYearAggregate,
    PivotTable, SeasonalAverage, Series,
};
use crate::readers::Dataset;
use crate::report::Section;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Yearly max temperature next to yearly rainfall for one city, all years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRainfall {
    pub temperature: Series<i32>,
    pub rainfall: Series<i32>,
}

/// City extremes over all years. Each one is computed on its own, so a metric
/// without values only blanks its own line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    /// Highest mean of yearly mean max temperature.
    pub hottest_city: Section<Extreme<String>>,
    /// Highest total rainfall over all years.
    pub wettest_city: Section<Extreme<String>>,
    /// Highest mean of yearly mean humidity.
    pub most_humid_city: Section<Extreme<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeYears {
    /// Highest mean daily max temperature across all cities.
    pub hottest_year: Section<Extreme<i32>>,
    /// Highest rainfall summed across all cities.
    pub wettest_year: Section<Extreme<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub city: String,
    pub years: YearRange,
    pub temperature: Section<ForecastSeries>,
    pub rainfall: Section<ForecastSeries>,
}

/// Every derived output of one selection, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub selection: Selection,
    pub yearly_trend: Series<i32>,
    pub monthly_pattern: Series<Month>,
    pub seasonal_profile: Vec<SeasonalAverage>,
    pub seasonal_table: Series<Season>,
    pub monthly_heatmap: PivotTable<Month>,
    pub yearly_heatmap: PivotTable<i32>,
    pub city_comparison: BTreeMap<String, Series<i32>>,
    pub highlights: Highlights,
    pub extreme_years: ExtremeYears,
    pub temperature_vs_rainfall: TemperatureRainfall,
    pub forecast: ForecastReport,
}

impl DashboardReport {
    /// Sections that could not be computed for this selection.
    pub fn unavailable_sections(&self) -> Vec<&'static str> {
        let h = &self.highlights;
        let y = &self.extreme_years;
        [
            ("hottest_city", h.hottest_city.is_ready()),
            ("wettest_city", h.wettest_city.is_ready()),
            ("most_humid_city", h.most_humid_city.is_ready()),
            ("hottest_year", y.hottest_year.is_ready()),
            ("wettest_year", y.wettest_year.is_ready()),
            ("temperature_forecast", self.forecast.temperature.is_ready()),
            ("rainfall_forecast", self.forecast.rainfall.is_ready()),
        ]
        .into_iter()
        .filter(|(_, ready)| !ready)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Runs the whole pipeline for one selection over a loaded dataset. Stateless:
/// every call recomputes from the source tables.
pub struct Dashboard<'a> {
    dataset: &'a Dataset,
    statistics: StatisticsExtractor,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            statistics: StatisticsExtractor::new(),
        }
    }

    pub fn build(&self, selection: &Selection) -> Result<DashboardReport> {
        self.check_city(&selection.city)?;
        info!(
            city = %selection.city,
            metric = %selection.metric,
            from = selection.years.min,
            to = selection.years.max,
            "building dashboard"
        );

        let dataset = self.dataset;
        let city = selection.city.as_str();
        let metric = selection.metric;
        let aggregates = city_year_aggregate(&dataset.all_cities);
        debug!(groups = aggregates.len(), "aggregated time series by city and year");

        let report = DashboardReport {
            selection: selection.clone(),
            yearly_trend: yearly_series(&dataset.yearly, city, selection.years, metric),
            monthly_pattern: monthly_series(&dataset.monthly, city, metric),
            seasonal_profile: city_seasonal_average(&dataset.monthly, city, metric),
            seasonal_table: seasonal_table_series(&dataset.seasonal, city, metric),
            monthly_heatmap: month_city_pivot(&dataset.monthly, metric),
            yearly_heatmap: year_city_pivot(&dataset.yearly, metric),
            city_comparison: comparison_series(&aggregates, Metric::TemperatureMax),
            highlights: self.highlights(&aggregates),
            extreme_years: self.extreme_years(&dataset.all_cities),
            temperature_vs_rainfall: TemperatureRainfall {
                temperature: yearly_series(
                    &dataset.yearly,
                    city,
                    YearRange::unbounded(),
                    Metric::TemperatureMax,
                ),
                rainfall: yearly_series(
                    &dataset.yearly,
                    city,
                    YearRange::unbounded(),
                    Metric::Precipitation,
                ),
            },
            forecast: self.forecast_from(&aggregates, selection),
        };

        Ok(report)
    }

    /// Only the two next-year forecasts of the selection.
    pub fn forecast(&self, selection: &Selection) -> Result<ForecastReport> {
        self.check_city(&selection.city)?;
        let aggregates = city_year_aggregate(&self.dataset.all_cities);
        Ok(self.forecast_from(&aggregates, selection))
    }

    fn highlights(&self, aggregates: &[CityYearAggregate]) -> Highlights {
        let stats = &self.statistics;
        Highlights {
            hottest_city: Section::from_result("hottest_city", stats.hottest_city(aggregates)),
            wettest_city: Section::from_result("wettest_city", stats.wettest_city(aggregates)),
            most_humid_city: Section::from_result(
                "most_humid_city",
                stats.most_humid_city(aggregates),
            ),
        }
    }

    fn extreme_years(&self, rows: &[DailyRecord]) -> ExtremeYears {
        ExtremeYears {
            hottest_year: Section::from_result("hottest_year", self.statistics.hottest_year(rows)),
            wettest_year: Section::from_result("wettest_year", self.statistics.wettest_year(rows)),
        }
    }

    fn forecast_from(
        &self,
        aggregates: &[CityYearAggregate],
        selection: &Selection,
    ) -> ForecastReport {
        let forecaster = Forecaster::with_years(selection.years);
        let city = selection.city.as_str();

        ForecastReport {
            city: selection.city.clone(),
            years: selection.years,
            temperature: Section::from_result(
                "temperature_forecast",
                forecaster.forecast_metric(aggregates, city, Metric::TemperatureMax),
            ),
            rainfall: Section::from_result(
                "rainfall_forecast",
                forecaster.forecast_metric(aggregates, city, Metric::Precipitation),
            ),
        }
    }

    fn check_city(&self, city: &str) -> Result<()> {
        if self.dataset.has_city(city) {
            Ok(())
        } else {
            Err(AnalyticsError::UnknownCity(city.to_string()))
        }
    }
}
