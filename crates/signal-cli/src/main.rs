//! sigview: inspect sampled signals from the command line.

mod config;
mod input;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use lib_dsp::{fft, ops, SampledSignal, Signal};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sigview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format for summaries
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample spacing of single-column input (overrides nominal_dt)
    #[arg(long)]
    dt: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary quantities of a signal
    Summary {
        /// Sample file
        file: PathBuf,
    },

    /// Resample onto a regular grid
    Resample {
        /// Sample file
        file: PathBuf,

        /// Output CSV path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the Hilbert envelope
    Envelope {
        /// Sample file
        file: PathBuf,

        /// Output CSV path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write magnitude, phase and group delay per frequency bin
    Spectrum {
        /// Sample file
        file: PathBuf,

        /// Report magnitudes in dB
        #[arg(long)]
        db: bool,

        /// Output CSV path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cross-correlate two signals of equal length
    Correlate {
        /// First sample file
        a: PathBuf,

        /// Second sample file
        b: PathBuf,

        /// Zero-padding factor (result is sampled 1 + npad times finer)
        #[arg(long, default_value = "0")]
        npad: usize,

        /// Divide the correlation by this value
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Output CSV path for the correlation
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {:?}", path);
            config::load_config(path)?
        }
        None => CliConfig::default(),
    };

    let _wisdom = config.wisdom_file.as_ref().map(|path| {
        let guard = fft::load_wisdom(path);
        let planned = fft::warm_up();
        tracing::debug!("Pre-planned {} transform lengths", planned);
        guard
    });

    let dt = cli.dt.or(config.nominal_dt);

    match &cli.command {
        Commands::Summary { file } => {
            let signal = load(file, dt, &config)?;
            let summary = output::Summary::of(&signal);
            output::write_summary(&mut std::io::stdout().lock(), &summary, cli.format)?;
        }
        Commands::Resample { file, output } => {
            let signal = load(file, dt, &config)?;
            with_output(output.as_deref(), |out| output::write_samples(out, signal.even()))?;
        }
        Commands::Envelope { file, output } => {
            let signal = load(file, dt, &config)?;
            with_output(output.as_deref(), |out| {
                output::write_envelope(out, signal.even(), signal.envelope())
            })?;
        }
        Commands::Spectrum { file, db, output } => {
            let signal = load(file, dt, &config)?;
            with_output(output.as_deref(), |out| {
                output::write_spectrum(out, signal.spectrum(), *db)
            })?;
        }
        Commands::Correlate { a, b, npad, scale, output } => {
            let sa = load(a, dt, &config)?;
            let sb = load(b, dt, &config)?;
            let corr = ops::correlation(&sa, &sb, *npad, *scale)
                .with_context(|| format!("Failed to correlate {:?} with {:?}", a, b))?;

            let even = corr.even();
            if let Some(peak) = even.peak_abs(..) {
                println!(
                    "Peak correlation: {:.6} at lag {:.6e}",
                    even[peak.index],
                    even.t_at(peak.index)
                );
            }
            if let Some(path) = output {
                with_output(Some(path.as_path()), |out| output::write_samples(out, even))?;
            }
        }
    }

    Ok(())
}

/// Read a signal and put it on a regular grid according to the configuration.
fn load(path: &Path, dt: Option<f64>, config: &CliConfig) -> Result<Signal> {
    let mut signal = input::read_signal(path, dt, config.signal_config())?;

    if let Some(resample_dt) = config.resample_dt {
        let even = signal.uneven().to_even(Some(resample_dt));
        tracing::info!("Resampled to {} samples at dt = {}", even.len(), resample_dt);
        *signal.update_even() = even;
    }

    Ok(signal)
}

/// Run `write` against a file, or stdout when no path is given.
fn with_output<F>(path: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write(&mut file)?;
            tracing::info!("Wrote {:?}", path);
        }
        None => write(&mut std::io::stdout().lock())?,
    }
    Ok(())
}
