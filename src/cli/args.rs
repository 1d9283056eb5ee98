use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pm25-processor")]
#[command(about = "PM2.5 exceedance-day processor for GIOS hourly air-quality archives")]
#[command(version)]
pub struct Cli {
    #[arg(
        short,
        long,
        required = true,
        num_args = 1..,
        help = "Reporting years to clean and combine into one run"
    )]
    pub years: Vec<i32>,

    #[arg(short, long, help = "YAML report configuration file")]
    pub config: PathBuf,

    #[arg(
        short,
        long,
        default_value = "data",
        help = "Directory holding the yearly archives and the station metadata sheet"
    )]
    pub data_dir: PathBuf,

    #[arg(
        short,
        long,
        default_value = "results/pm25",
        help = "Output directory, partitioned by year"
    )]
    pub output_dir: PathBuf,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}
