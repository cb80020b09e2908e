use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-trends")]
#[command(about = "Weather trend analytics and forecasts for Indian cities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Directory holding the four input tables [default: data]"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the full dashboard for one city, metric and year range
    Dashboard {
        #[arg(short, long, help = "City to analyse [default: first city]")]
        city: Option<String>,

        #[arg(short, long, default_value = "temperature_2m_max")]
        metric: String,

        #[arg(long = "from", help = "First year of the range (inclusive)")]
        year_from: Option<i32>,

        #[arg(long = "to", help = "Last year of the range (inclusive)")]
        year_to: Option<i32>,

        #[arg(short, long, default_value = "text", help = "Output format: text or json")]
        format: String,
    },

    /// Fit yearly trends and predict next year's temperature and rainfall
    Forecast {
        #[arg(short, long, help = "City to forecast [default: first city]")]
        city: Option<String>,

        #[arg(long = "from", help = "First year used for the fit (inclusive)")]
        year_from: Option<i32>,

        #[arg(long = "to", help = "Last year used for the fit (inclusive)")]
        year_to: Option<i32>,

        #[arg(short, long, default_value = "text", help = "Output format: text or json")]
        format: String,
    },

    /// List the cities present in the time series
    Cities,

    /// List the metrics that can be analysed, with units
    Metrics,

    /// Load every table and check cross-table consistency
    Validate {
        #[arg(short, long, default_value = "text", help = "Output format: text or json")]
        format: String,
    },
}
