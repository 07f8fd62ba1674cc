//! eeg-qc: epoch extraction and quality screening from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eeg_core::RecordingMetadata;
use eeg_processing::{CancellationFlag, EpochPipeline, PipelineConfig, PipelineResult};
use eeg_simulation::{apply_artifacts, montage, Artifact, EegConfig, EegSimulator, SignalPattern};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "eeg-qc", about = "Epoch extraction and EEG quality assessment")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a recording and print its quality table
    Demo {
        /// Recording length in seconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
        #[arg(long, default_value_t = 4)]
        channels: usize,
        /// Sampling rate in Hz
        #[arg(long, default_value_t = 128.0)]
        rate: f64,
        /// Epoch length in seconds
        #[arg(long, default_value_t = 10.0)]
        epoch_length: f64,
        #[arg(long, default_value_t = 0.0)]
        overlap: f64,
        #[arg(long, default_value_t = 0.7)]
        threshold: f64,
        /// Rhythm preset: noise, resting, drowsy or alert
        #[arg(long, default_value = "resting")]
        pattern: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Recording start time (HH:MM:SS)
        #[arg(long)]
        start: Option<String>,
        /// Inject dropouts, a flatline and a dead channel
        #[arg(long)]
        corrupt: bool,
        /// Print the quality table as JSON
        #[arg(long)]
        json: bool,
        /// Pipeline configuration file; overrides the epoch and threshold flags
        #[arg(long)]
        config: Option<String>,
    },
    /// Print a preset pipeline configuration as JSON
    Config {
        /// default, screening or long-term
        #[arg(default_value = "default")]
        preset: String,
        #[arg(long, default_value_t = 128.0)]
        rate: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Demo {
            duration,
            channels,
            rate,
            epoch_length,
            overlap,
            threshold,
            pattern,
            seed,
            start,
            corrupt,
            json,
            config,
        } => {
            let config = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
                    PipelineConfig::from_json(&text)?
                }
                None => {
                    let mut config = PipelineConfig::screening(rate)
                        .with_epoch_length(epoch_length)
                        .with_quality_threshold(threshold);
                    config.epoch.overlap = overlap;
                    config
                }
            };

            let Some(pattern) = SignalPattern::preset(&pattern) else {
                bail!("unknown pattern '{}'", pattern);
            };
            let signal = EegSimulator::new(EegConfig {
                sampling_rate: config.epoch.sampling_rate,
                channel_names: montage(channels),
                pattern,
                seed: Some(seed),
                ..EegConfig::default()
            })?
            .generate(duration)?;

            let signal = if corrupt {
                apply_artifacts(signal, &demo_artifacts(channels, config.epoch.sampling_rate))?
            } else {
                signal
            };

            let pipeline = EpochPipeline::new(config)?;
            let metadata = start.map(RecordingMetadata::with_start_time);

            let cancel = CancellationFlag::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, finishing epochs already in progress");
                    on_interrupt.cancel();
                }
            });

            let result = pipeline.run_parallel(&signal, metadata.as_ref(), &cancel).await?;
            if json {
                println!("{}", result.quality.to_json()?);
            } else {
                print_table(&result);
            }
        }
        Commands::Config { preset, rate } => {
            let Some(config) = PipelineConfig::preset(&preset, rate) else {
                bail!("unknown preset '{}'", preset);
            };
            config.validate()?;
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}

/// Artifacts spread over the first channels so several metrics react
fn demo_artifacts(channels: usize, rate: f64) -> Vec<Artifact> {
    let second = rate.round() as usize;
    let mut artifacts = vec![
        Artifact::Dropout { channel: 0, start: 12 * second, len: 8 * second },
        Artifact::Spike { channel: 0, at: 45 * second, amplitude: 800.0 },
    ];
    if channels > 1 {
        artifacts.push(Artifact::Flatline { channel: 1, start: 30 * second, len: 15 * second, level: 0.0 });
    }
    if channels > 2 {
        artifacts.push(Artifact::DeadChannel { channel: channels - 1 });
    }
    artifacts
}

fn print_table(result: &PipelineResult) {
    println!(
        "{:>6} {:>9} {:>9} {:>6} {:>6} {:>8} {:>8} {:>6} {:>9} {:>5}",
        "epoch", "start", "overall", "nan", "gap", "outlier", "flatline", "sharp", "cohesion", "pass"
    );

    for report in &result.quality {
        let start = result
            .epochs
            .get(report.epoch_id())
            .and_then(|e| e.start_time())
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let s = report.scores();
        println!(
            "{:>6} {:>9} {:>9.3} {:>6.3} {:>6.3} {:>8.3} {:>8.3} {:>6.3} {:>9.3} {:>5}",
            report.epoch_id(),
            start,
            report.overall_quality(),
            s.nan_quality,
            s.gap_quality,
            s.outlier_quality,
            s.flatline_quality,
            s.sharpness_quality,
            s.cohesion_quality,
            if report.passes_threshold() { "yes" } else { "no" }
        );
    }

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }

    let summary = result.quality.summary();
    info!(
        "{} of {} assessed epochs pass ({:.0}%), {} rejected, took {:?}",
        summary.passing,
        summary.count,
        summary.pass_rate() * 100.0,
        result.rejected.len(),
        result.elapsed
    );
}
