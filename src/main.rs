//! commscape command line interface
//!
//! Decode, stylize, analyze, and export audio from a single invocation.

use clap::{Parser, Subcommand};
use commscape::config::{AnalysisConfig, DecodeConfig, ExportConfig};
use commscape::core::Channels;
use commscape::{Pipeline, effects};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "commscape")]
#[command(about = "Audio stylization and analysis pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode audio and emit per-segment feature records as JSON
    Analyze {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the JSON records here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Decode target sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        rate: u32,

        /// Decode target channel layout (mono, stereo)
        #[arg(long, default_value = "stereo")]
        channels: String,

        /// Analysis window duration in seconds
        #[arg(long, default_value_t = 1.0)]
        window: f64,
    },

    /// Run the full pipeline: decode, effect chain, analysis, export
    Process {
        /// Input audio file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output audio file (.mp3 encodes via ffmpeg, anything else as WAV)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Comma-separated effect chain
        #[arg(short, long, value_delimiter = ',', default_value = "vinyl,normalize")]
        effects: Vec<String>,

        /// Decode target sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        rate: u32,

        /// Decode target channel layout (mono, stereo)
        #[arg(long, default_value = "stereo")]
        channels: String,

        /// MP3 bitrate in kbit/s
        #[arg(long, default_value_t = 192)]
        bitrate: u32,

        /// Write the JSON run report here
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("commscape {}", commscape::VERSION);

    match cli.command {
        Commands::Analyze {
            input,
            output,
            rate,
            channels,
            window,
        } => {
            let pipeline = Pipeline::new(
                DecodeConfig {
                    sample_rate: rate,
                    channels: Channels::from_name(&channels)?,
                    ..DecodeConfig::default()
                },
                AnalysisConfig {
                    window: Duration::from_secs_f64(window),
                },
                ExportConfig::default(),
            );

            let report = pipeline.run(&input, &mut [], None)?;
            let json = serde_json::to_string_pretty(&report.features)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("wrote {} records to {}", report.features.len(), path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Process {
            input,
            output,
            effects: effect_names,
            rate,
            channels,
            bitrate,
            report,
        } => {
            let pipeline = Pipeline::new(
                DecodeConfig {
                    sample_rate: rate,
                    channels: Channels::from_name(&channels)?,
                    ..DecodeConfig::default()
                },
                AnalysisConfig::default(),
                ExportConfig {
                    bitrate_kbps: bitrate,
                    ..ExportConfig::default()
                },
            );

            let mut chain = effects::chain_from_names(&effect_names)?;
            let run_report = pipeline.run(&input, &mut chain, Some(&output))?;

            if let Some(snr) = run_report.snr_db {
                println!("snr: {:.2} dB", snr);
            }
            println!("output: {}", output.display());

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&run_report)?)?;
                info!("wrote run report to {}", path.display());
            }
        }
    }

    Ok(())
}
