use clap::Parser;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weather_trends::analyzers::fit_linear;
use weather_trends::cli::{run, Cli};
use weather_trends::config::AppConfig;
use weather_trends::error::AnalyticsError;
use weather_trends::models::{Metric, Season, Selection, YearRange};
use weather_trends::processors::{ConsistencyChecker, PivotCell, ViolationType};
use weather_trends::readers::{DatasetLoader, DatasetPaths};
use weather_trends::report::{Dashboard, Section};
use weather_trends::writers::{JsonWriter, TextWriter};

const HEADER: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,relative_humidity_2m_mean,wind_speed_10m_max,pressure_msl_mean,wind_direction_10m_dominant";

fn write_table(dir: &Path, name: &str, keys: &str, rows: &[String]) {
    let mut contents = format!("{},{}\n", keys, HEADER);
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join(name), contents).unwrap();
}

/// Three cities over 2015..=2019. Chennai is hottest, Mumbai wettest, and
/// Delhi warms by 0.5 degC per year.
fn write_fixture(dir: &Path) {
    let cities = [("Chennai", 34.0, 3.0), ("Delhi", 31.0, 2.0), ("Mumbai", 31.5, 8.0)];

    let mut yearly = Vec::new();
    let mut daily = Vec::new();
    for (city, tmax, rain) in cities {
        for (i, year) in (2015..=2019).enumerate() {
            let trend = if city == "Delhi" { 0.5 * i as f64 } else { 0.0 };
            yearly.push(format!(
                "{},{},{},{},{},70,12,1008,180",
                city,
                year,
                tmax + trend,
                tmax - 8.0,
                rain * 365.0
            ));
            for month in [1, 7] {
                daily.push(format!(
                    "{},{}-{:02}-01,{},{},{},70,12,1008,180",
                    city,
                    year,
                    month,
                    tmax + trend,
                    tmax - 8.0,
                    rain
                ));
            }
        }
    }
    // Missing humidity token on one Mumbai row
    daily.push("Mumbai,2019-12-01,31.5,23.5,8,nan,12,1008,180".to_string());

    let mut monthly = Vec::new();
    for (city, tmax, rain) in cities {
        for month in 1..=11 {
            monthly.push(format!(
                "{},{},{},{},{},65,10,1009,200",
                city,
                month,
                tmax + month as f64 * 0.1,
                tmax - 8.0,
                rain * 30.0
            ));
        }
    }

    let mut seasonal = Vec::new();
    for (city, tmax, rain) in cities {
        for season in ["Post-Monsoon", "Winter", "Monsoon", "Summer"] {
            seasonal.push(format!(
                "{},{},{},{},{},65,10,1009,200",
                city,
                season,
                tmax,
                tmax - 8.0,
                rain * 90.0
            ));
        }
    }

    write_table(dir, "yearly_weather.csv", "city,year", &yearly);
    write_table(dir, "monthly_weather.csv", "city,month", &monthly);
    write_table(dir, "seasonal_weather.csv", "city,season", &seasonal);
    write_table(dir, "all_cities_weather.csv", "city,time", &daily);
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_fixture(dir.path());
    dir
}

#[test]
fn test_load_dataset() {
    let dir = fixture();
    let dataset = DatasetLoader::new()
        .load(&DatasetPaths::in_dir(dir.path()), None)
        .unwrap();

    assert_eq!(dataset.yearly.len(), 15);
    assert_eq!(dataset.monthly.len(), 33);
    assert_eq!(dataset.seasonal.len(), 12);
    assert_eq!(dataset.all_cities.len(), 31);
    assert_eq!(dataset.cities(), vec!["Chennai", "Delhi", "Mumbai"]);
}

#[test]
fn test_loader_reuses_cached_tables() {
    let dir = fixture();
    let paths = DatasetPaths::in_dir(dir.path());
    let loader = DatasetLoader::new();

    let first = loader.load(&paths, None).unwrap();
    fs::remove_file(&paths.yearly).unwrap();
    let second = loader.load(&paths, None).unwrap();

    assert!(std::sync::Arc::ptr_eq(&first.yearly, &second.yearly));
}

#[test]
fn test_missing_file_aborts_load() {
    let dir = fixture();
    let paths = DatasetPaths::in_dir(dir.path());
    fs::remove_file(&paths.seasonal).unwrap();

    let result = DatasetLoader::new().load(&paths, None);

    assert!(result.is_err());
}

#[test]
fn test_bad_timestamp_aborts_load() {
    let dir = fixture();
    write_table(
        dir.path(),
        "all_cities_weather.csv",
        "city,time",
        &["Delhi,not-a-date,30,20,1,70,12,1008,180".to_string()],
    );

    let result = DatasetLoader::new().load(&DatasetPaths::in_dir(dir.path()), None);

    assert!(matches!(
        result,
        Err(AnalyticsError::InvalidTimestamp { line: 2, .. })
    ));
}

#[test]
fn test_dashboard_end_to_end() {
    let dir = fixture();
    let dataset = DatasetLoader::new()
        .load(&DatasetPaths::in_dir(dir.path()), None)
        .unwrap();
    let selection = Selection::builder("Delhi")
        .metric("temperature_2m_max")
        .year_from(Some(2016))
        .year_to(Some(2030))
        .build()
        .unwrap();

    assert_eq!(selection.years, YearRange::new(2016, 2024).unwrap());

    let report = Dashboard::new(&dataset).build(&selection).unwrap();

    let trend: Vec<(i32, Option<f64>)> = report
        .yearly_trend
        .points
        .iter()
        .map(|p| (p.key, p.value))
        .collect();
    assert_eq!(
        trend,
        vec![
            (2016, Some(31.5)),
            (2017, Some(32.0)),
            (2018, Some(32.5)),
            (2019, Some(33.0)),
        ]
    );

    // December is absent from the monthly table
    let december = report.monthly_heatmap.rows[11];
    assert_eq!(
        report.monthly_heatmap.cell(&december, "Delhi"),
        Some(PivotCell::NoData)
    );

    let seasons: Vec<Season> = report.seasonal_table.points.iter().map(|p| p.key).collect();
    assert_eq!(seasons, Season::ALL.to_vec());

    let winter = &report.seasonal_profile[0];
    assert_eq!(winter.season, Season::Winter);
    assert_eq!(winter.months, 2);

    let highlights = &report.highlights;
    assert_eq!(highlights.hottest_city.ready().unwrap().group, "Chennai");
    let wettest = highlights.wettest_city.ready().unwrap();
    assert_eq!(wettest.group, "Mumbai");
    assert!((wettest.value - 88.0).abs() < 1e-9);
    assert!(highlights.most_humid_city.is_ready());

    let forecast = report.forecast.temperature.ready().unwrap();
    assert_eq!(forecast.next_year, 2020);
    assert!((forecast.predicted - 33.5).abs() < 1e-6);
    assert!((forecast.model.slope - 0.5).abs() < 1e-9);

    let rainfall = report.forecast.rainfall.ready().unwrap();
    assert!((rainfall.predicted - 4.0).abs() < 1e-6);

    let text = TextWriter::new().render_dashboard(&report);
    assert!(text.starts_with("WEATHER TRENDS: Delhi"));
    assert!(text.contains("Hottest city: Chennai"));
}

#[test]
fn test_forecast_unavailable_for_narrow_range() {
    let dir = fixture();
    let dataset = DatasetLoader::new()
        .load(&DatasetPaths::in_dir(dir.path()), None)
        .unwrap();
    let selection =
        Selection::new("Chennai", Metric::Precipitation, YearRange::new(2017, 2017).unwrap())
            .unwrap();

    let report = Dashboard::new(&dataset).forecast(&selection).unwrap();

    match &report.temperature {
        Section::Unavailable { reason } => assert!(reason.contains("Insufficient data")),
        Section::Ready(_) => panic!("a single year must not produce a forecast"),
    }
}

#[test]
fn test_selection_builder_rejects_unknown_metric() {
    let result = Selection::builder("Delhi").metric("snowfall_sum").build();
    assert!(matches!(result, Err(AnalyticsError::UnknownMetric(_))));
}

#[test]
fn test_cli_rejects_unknown_metric_before_reading_tables() {
    // An empty directory: any table read would fail with an I/O error instead
    let dir = TempDir::new().expect("Failed to create temp directory");
    let data_dir = dir.path().to_str().unwrap();
    let cli = Cli::parse_from([
        "weather-trends",
        "--data-dir",
        data_dir,
        "dashboard",
        "--city",
        "Delhi",
        "--metric",
        "snowfall_sum",
    ]);

    let result = run(cli);

    assert!(matches!(
        result,
        Err(AnalyticsError::UnknownMetric(ref name)) if name == "snowfall_sum"
    ));
}

#[test]
fn test_json_report_marks_missing_values() {
    let dir = fixture();
    let dataset = DatasetLoader::new()
        .load(&DatasetPaths::in_dir(dir.path()), None)
        .unwrap();
    let selection =
        Selection::new("Mumbai", Metric::Humidity, YearRange::full()).unwrap();

    let report = Dashboard::new(&dataset).build(&selection).unwrap();
    let json = JsonWriter::new().to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["selection"]["metric"], "relative_humidity_2m_mean");
    assert_eq!(value["monthly_heatmap"]["rows"][11], "Dec");
    assert!(value["monthly_heatmap"]["cells"][11][0].is_null());
    assert!(value["forecast"]["temperature"]["ready"].is_object());
}

#[test]
fn test_consistency_of_fixture() {
    let dir = fixture();
    let dataset = DatasetLoader::new()
        .load(&DatasetPaths::in_dir(dir.path()), None)
        .unwrap();

    let report = ConsistencyChecker::new().check(&dataset);

    assert!(report.is_consistent());
    assert_eq!(report.count(ViolationType::MissingCity), 0);
    assert_eq!(report.cities.len(), 3);
}

#[test]
fn test_config_points_loader_at_data_dir() {
    let dir = fixture();
    let config = AppConfig::default().with_data_dir(dir.path());

    let dataset = DatasetLoader::new()
        .load(&config.dataset_paths(), None)
        .unwrap();

    assert_eq!(dataset.default_city().unwrap(), "Chennai");
}

#[test]
fn test_linear_fit_public_api() {
    let years: Vec<f64> = (2015..=2020).map(f64::from).collect();
    let values: Vec<f64> = years.iter().map(|y| 2.0 * y - 4000.0).collect();

    let model = fit_linear(&years, &values).unwrap();

    assert!((model.slope - 2.0).abs() < 1e-9);
    assert!(fit_linear(&[2020.0], &[1.0]).is_err());
}
