//! FARS - accident file summaries and state maps from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fars::{make_filename, Fars, FarsConfig, MapOutcome, YearLoad};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fars")]
#[command(about = "Summarize and map FARS accident files", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding accident_<year>.csv.bz2 files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the file name used for a year
    Filename { year: f64 },
    /// Read one accident file and print its head
    Read { file: PathBuf },
    /// Load several years and report which ones loaded
    Years {
        #[arg(required = true)]
        years: Vec<i64>,
    },
    /// Count accidents per month, one column per year
    Summarize {
        #[arg(required = true)]
        years: Vec<i64>,
        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Plot a state's accidents for a year
    Map {
        state: i64,
        year: i64,
        /// Output PNG (default: <output_dir>/state_<state>_<year>.png)
        #[arg(long)]
        output: Option<PathBuf>,
        /// GeoJSON state outlines
        #[arg(long)]
        base_map: Option<PathBuf>,
    },
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FarsConfig> {
    let mut config = match &cli.config {
        Some(path) => FarsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FarsConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Filename { year } => {
            println!("{}", make_filename(year));
        }
        Commands::Read { file } => {
            let fars = Fars::new(config);
            let df = fars
                .read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{} rows x {} columns", df.height(), df.width());
            println!("{}", df.head(Some(10)));
        }
        Commands::Years { years } => {
            let fars = Fars::new(config);
            let read = fars.read_years(&years);
            for load in &read.tables {
                match load {
                    YearLoad::Loaded { year, table } => println!("{}: {} rows", year, table.height()),
                    YearLoad::Failed { year, reason } => println!("{}: failed ({})", year, reason),
                }
            }
        }
        Commands::Summarize { years, json } => {
            let fars = Fars::new(config);
            let summary = fars.summarize_years(&years).context("summarizing years")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
        }
        Commands::Map {
            state,
            year,
            output,
            base_map,
        } => {
            if base_map.is_some() {
                config.base_map = base_map;
            }
            let fars = Fars::new(config);
            let outcome = match output {
                Some(path) => fars.map_state_to(state, year, &path)?,
                None => fars.map_state(state, year)?,
            };
            match outcome {
                MapOutcome::Rendered {
                    path,
                    points,
                    skipped,
                } => println!(
                    "wrote {} ({} accidents plotted, {} without coordinates)",
                    path.display(),
                    points,
                    skipped
                ),
                MapOutcome::NoAccidents { state, year } => {
                    println!("no accidents to plot for state {} in {}", state, year)
                }
                MapOutcome::NoCoordinates { state, year } => println!(
                    "no accidents with known coordinates for state {} in {}",
                    state, year
                ),
            }
        }
    }

    Ok(())
}
