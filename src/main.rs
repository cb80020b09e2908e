use clap::Parser;
use weather_trends::cli::{run, Cli};
use weather_trends::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
