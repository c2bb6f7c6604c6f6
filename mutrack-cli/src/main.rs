use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use commands::layout::LayoutArgs;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "mutrack")]
#[command(about = "mutrack - layout engine for multi-sample mutation tracks")]
#[command(version)]
#[command(long_about = "
mutrack turns per-sample mutation events and the regions of a genome view into
pixel geometry: stacked copy-number/LOH/ITD intervals, labelled point markers,
sample heights and, in dense mode, radius-scaled density bins.

Examples:
  mutrack layout --input request.json --output layout.json
  mutrack layout --input request.json --mode dense --bin-width 5 --pretty
  mutrack config --example > mutrack.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one layout pass over a JSON layout request
    Layout {
        /// Layout request file (JSON)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Output file (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Display mode, overriding the request
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Coordinate system, overriding the request
        #[arg(long)]
        coordinates: Option<CoordinateArg>,

        /// Density bin width in pixels
        #[arg(long)]
        bin_width: Option<f64>,

        /// Interpolate row heights between anchors instead of stepping
        #[arg(long)]
        interpolate_rows: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration
    Config {
        /// Print the default configuration instead
        #[arg(long)]
        example: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    Dense,
    Expanded,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CoordinateArg {
    Genomic,
    Transcript,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Layout {
            input,
            output,
            mode,
            coordinates,
            bin_width,
            interpolate_rows,
            pretty,
        } => {
            commands::layout::execute(
                &config,
                LayoutArgs {
                    input,
                    output,
                    mode,
                    coordinates,
                    bin_width,
                    interpolate_rows,
                    pretty,
                },
            )?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
