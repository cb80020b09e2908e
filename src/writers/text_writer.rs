use crate::analyzers::{Extreme, ForecastSeries};
use crate::models::Metric;
use crate::processors::{ConsistencyReport, PivotTable, SeasonalAverage, Series};
use crate::report::{DashboardReport, ForecastReport, Section};
use std::fmt::{Display, Write};

const NO_DATA: &str = "n/a";
const MAX_LISTED_VIOLATIONS: usize = 10;

/// Plain-text rendering of reports for the terminal.
pub struct TextWriter {
    precision: usize,
}

impl TextWriter {
    pub fn new() -> Self {
        Self { precision: 1 }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn render_dashboard(&self, report: &DashboardReport) -> String {
        let selection = &report.selection;
        let metric = selection.metric;
        let mut out = String::new();

        let title = format!(
            "WEATHER TRENDS: {} ({}, {}-{})",
            selection.city,
            metric.display_name(),
            selection.years.min,
            selection.years.max
        );
        out.push_str(&title);
        out.push('\n');
        out.push_str(&"=".repeat(title.chars().count()));
        out.push_str("\n\n");

        out.push_str(&self.render_series("Yearly Trend", &report.yearly_trend));
        out.push_str(&self.render_series("Monthly Pattern", &report.monthly_pattern));
        out.push_str(&self.render_seasonal(metric, &report.seasonal_profile));
        out.push_str(&self.render_series("Seasonal Table", &report.seasonal_table));
        out.push_str(&self.render_pivot("Monthly Heatmap", &report.monthly_heatmap));
        out.push_str(&self.render_pivot("Yearly Heatmap", &report.yearly_heatmap));

        out.push_str("City Comparison (yearly mean max temperature):\n");
        if report.city_comparison.is_empty() {
            out.push_str("  no data\n");
        }
        for (city, series) in &report.city_comparison {
            let points: Vec<String> = series
                .points
                .iter()
                .map(|p| format!("{}={}", p.key, self.format_value(p.value)))
                .collect();
            let _ = writeln!(out, "  {}: {}", city, points.join(", "));
        }
        out.push('\n');

        out.push_str("Highlights:\n");
        let h = &report.highlights;
        out.push_str(&self.render_extreme("Hottest city", &h.hottest_city, Metric::TemperatureMax));
        out.push_str(&self.render_extreme("Wettest city", &h.wettest_city, Metric::Precipitation));
        out.push_str(&self.render_extreme("Most humid city", &h.most_humid_city, Metric::Humidity));
        let y = &report.extreme_years;
        out.push_str(&self.render_extreme("Hottest year", &y.hottest_year, Metric::TemperatureMax));
        out.push_str(&self.render_extreme("Wettest year", &y.wettest_year, Metric::Precipitation));
        out.push('\n');

        out.push_str(&self.render_series(
            "Temperature vs Rainfall: temperature",
            &report.temperature_vs_rainfall.temperature,
        ));
        out.push_str(&self.render_series(
            "Temperature vs Rainfall: rainfall",
            &report.temperature_vs_rainfall.rainfall,
        ));

        out.push_str(&self.render_forecast(&report.forecast));
        out
    }

    pub fn render_forecast(&self, report: &ForecastReport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Forecast for {} (fitted on {}-{}):",
            report.city, report.years.min, report.years.max
        );
        for section in [&report.temperature, &report.rainfall] {
            match section {
                Section::Ready(series) => out.push_str(&self.render_forecast_series(series)),
                Section::Unavailable { reason } => {
                    let _ = writeln!(out, "  unavailable: {}", reason);
                }
            }
        }
        out
    }

    pub fn render_consistency(&self, report: &ConsistencyReport) -> String {
        let mut out = String::new();

        out.push_str("=== Consistency Check Report ===\n");
        let _ = writeln!(out, "Yearly rows: {}", report.row_counts.yearly);
        let _ = writeln!(out, "Monthly rows: {}", report.row_counts.monthly);
        let _ = writeln!(out, "Seasonal rows: {}", report.row_counts.seasonal);
        let _ = writeln!(out, "Time series rows: {}", report.row_counts.all_cities);
        let _ = writeln!(out, "Cities: {}", report.cities.len());
        let _ = writeln!(out, "\nViolations: {}", report.violations.len());

        if !report.violations.is_empty() {
            let _ = writeln!(out, "\nFirst {} violations:", MAX_LISTED_VIOLATIONS);
            for (i, violation) in report
                .violations
                .iter()
                .take(MAX_LISTED_VIOLATIONS)
                .enumerate()
            {
                let _ = writeln!(
                    out,
                    "  {}. [{}] {}",
                    i + 1,
                    violation.table,
                    violation.details
                );
            }
        }

        out
    }

    pub fn render_cities(&self, cities: &[String]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} cities:", cities.len());
        for city in cities {
            let _ = writeln!(out, "  {}", city);
        }
        out
    }

    pub fn render_metrics(&self) -> String {
        let mut out = String::new();
        for metric in Metric::ALL {
            let _ = writeln!(
                out,
                "{:<30} {:<26} {}",
                metric.column_name(),
                metric.display_name(),
                metric.units()
            );
        }
        out
    }

    fn render_series<K: Display + Copy>(&self, title: &str, series: &Series<K>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({}, {}):",
            title,
            series.metric.display_name(),
            series.metric.units()
        );
        if series.is_empty() {
            out.push_str("  no data\n");
        }
        for point in &series.points {
            let _ = writeln!(
                out,
                "  {:<14} {}",
                point.key.to_string(),
                self.format_value(point.value)
            );
        }
        out.push('\n');
        out
    }

    fn render_seasonal(&self, metric: Metric, averages: &[SeasonalAverage]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Seasonal Averages ({}, {}):",
            metric.display_name(),
            metric.units()
        );
        if averages.is_empty() {
            out.push_str("  no data\n");
        }
        for average in averages {
            let _ = writeln!(
                out,
                "  {:<14} {} ({} months)",
                average.season.label(),
                self.format_value(Some(average.value)),
                average.months
            );
        }
        out.push('\n');
        out
    }

    fn render_pivot<K: Display>(&self, title: &str, table: &PivotTable<K>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({} {}, {}):",
            title,
            table.aggregation.label(),
            table.metric.display_name(),
            table.metric.units()
        );
        if table.is_empty() {
            out.push_str("  no data\n\n");
            return out;
        }

        let width = table
            .columns
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);

        let _ = write!(out, "  {:<6}", "");
        for column in &table.columns {
            let _ = write!(out, " {:>width$}", column, width = width);
        }
        out.push('\n');

        for (row, cells) in table.rows.iter().zip(&table.cells) {
            let _ = write!(out, "  {:<6}", row.to_string());
            for cell in cells {
                let _ = write!(
                    out,
                    " {:>width$}",
                    self.format_value(cell.value()),
                    width = width
                );
            }
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn render_extreme<K: Display>(
        &self,
        label: &str,
        extreme: &Section<Extreme<K>>,
        metric: Metric,
    ) -> String {
        match extreme {
            Section::Ready(extreme) => format!(
                "  - {}: {} ({} {})\n",
                label,
                extreme.group,
                self.format_value(Some(extreme.value)),
                metric.units()
            ),
            Section::Unavailable { reason } => format!("  - {}: unavailable: {}\n", label, reason),
        }
    }

    fn render_forecast_series(&self, series: &ForecastSeries) -> String {
        let mut out = String::new();
        let metric = series.metric;
        let _ = writeln!(
            out,
            "  {}: {} {} predicted for {} (slope {:+.3} {}/year, {} years)",
            metric.display_name(),
            self.format_value(Some(series.predicted)),
            metric.units(),
            series.next_year,
            series.model.slope,
            metric.units(),
            series.model.observations
        );
        for ((year, observed), (_, fitted)) in series.historical.iter().zip(&series.fitted) {
            let _ = writeln!(
                out,
                "    {}  observed {:>10}  trend {:>10}",
                year,
                self.format_value(Some(*observed)),
                self.format_value(Some(*fitted))
            );
        }
        out
    }

    fn format_value(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.*}", self.precision, v),
            None => NO_DATA.to_string(),
        }
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}
