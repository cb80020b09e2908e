use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{Metric, Selection, YearRange};
use crate::processors::ConsistencyChecker;
use crate::readers::{Dataset, DatasetLoader};
use crate::report::Dashboard;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonWriter, OutputFormat, TextWriter};
use serde::Serialize;
use std::io;
use tracing::{info, warn};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    let bounds = config.years()?;

    match cli.command {
        Commands::Dashboard {
            city,
            metric,
            year_from,
            year_to,
            format,
        } => {
            // Selection errors surface before any table is read
            let format: OutputFormat = format.parse()?;
            let metric: Metric = metric.parse()?;
            YearRange::new(
                year_from.unwrap_or(bounds.min),
                year_to.unwrap_or(bounds.max),
            )?;

            let dataset = load_dataset(&config)?;
            let selection = build_selection(&dataset, city, metric, year_from, year_to, bounds)?;
            let report = Dashboard::new(&dataset).build(&selection)?;

            for section in report.unavailable_sections() {
                info!(section, "section skipped for this selection");
            }

            match format {
                OutputFormat::Text => print!("{}", TextWriter::new().render_dashboard(&report)),
                OutputFormat::Json => write_json(&report)?,
            }
        }

        Commands::Forecast {
            city,
            year_from,
            year_to,
            format,
        } => {
            let format: OutputFormat = format.parse()?;
            YearRange::new(
                year_from.unwrap_or(bounds.min),
                year_to.unwrap_or(bounds.max),
            )?;

            let dataset = load_dataset(&config)?;
            let selection = build_selection(
                &dataset,
                city,
                Metric::TemperatureMax,
                year_from,
                year_to,
                bounds,
            )?;
            let report = Dashboard::new(&dataset).forecast(&selection)?;

            match format {
                OutputFormat::Text => print!("{}", TextWriter::new().render_forecast(&report)),
                OutputFormat::Json => write_json(&report)?,
            }
        }

        Commands::Cities => {
            let dataset = load_dataset(&config)?;
            print!("{}", TextWriter::new().render_cities(&dataset.cities()));
        }

        Commands::Metrics => {
            print!("{}", TextWriter::new().render_metrics());
        }

        Commands::Validate { format } => {
            let format: OutputFormat = format.parse()?;
            let dataset = load_dataset(&config)?;

            let report = ConsistencyChecker::with_bounds(bounds).check(&dataset);

            match format {
                OutputFormat::Text => {
                    println!("{}", TextWriter::new().render_consistency(&report));
                    if report.is_consistent() {
                        println!("✅ All tables are consistent");
                    } else {
                        println!(
                            "⚠️  Found {} consistency issues",
                            report.violations.len()
                        );
                    }
                }
                OutputFormat::Json => write_json(&report)?,
            }

            if !report.is_consistent() {
                warn!(
                    violations = report.violations.len(),
                    "dataset failed consistency checks"
                );
            }
        }
    }

    Ok(())
}

fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    let paths = config.dataset_paths();
    info!(data_dir = %config.data_dir.display(), "loading tables");

    let progress = ProgressReporter::new_spinner("Loading tables...", false);
    let dataset = DatasetLoader::new().load(&paths, Some(&progress))?;
    progress.finish_and_clear();

    Ok(dataset)
}

fn build_selection(
    dataset: &Dataset,
    city: Option<String>,
    metric: Metric,
    year_from: Option<i32>,
    year_to: Option<i32>,
    bounds: YearRange,
) -> Result<Selection> {
    let city = match city {
        Some(city) => city,
        None => dataset.default_city()?,
    };

    Selection::builder(city)
        .metric(metric.column_name())
        .year_from(year_from)
        .year_to(year_to)
        .bounds(bounds)
        .build()
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    JsonWriter::new().write(value, io::stdout().lock())
}
