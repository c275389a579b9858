use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use vordecoder::config::Frequency;
use vordecoder::simulation::{VorSignalParams, generate_vor_signal};
use vordecoder::wav::save_signal;

#[derive(Parser, Debug)]
#[command(name = "generate_vor_wav")]
#[command(about = "Generate a synthetic VOR capture as a WAV file")]
struct Args {
    /// Output WAV file
    output: PathBuf,

    /// TOML file with signal parameters; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearing in degrees
    #[arg(short, long, allow_hyphen_values = true)]
    bearing: Option<f64>,

    /// Signal duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// FM subcarrier frequency (e.g., "9960", "9.96khz")
    #[arg(long)]
    carrier: Option<Frequency>,

    /// AWGN SNR in dB
    #[arg(long, allow_hyphen_values = true)]
    snr: Option<f64>,

    /// Noise seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => VorSignalParams::default(),
    };

    if let Some(bearing) = args.bearing {
        params.bearing_degrees = bearing;
    }
    if let Some(duration) = args.duration {
        params.duration_secs = duration;
    }
    if let Some(rate) = args.sample_rate {
        params.sample_rate = rate;
    }
    if let Some(carrier) = args.carrier {
        params.carrier_hz = carrier.as_hz();
    }
    if let Some(snr) = args.snr {
        params.snr_db = Some(snr);
    }
    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }

    let signal = generate_vor_signal(&params).context("Failed to generate signal")?;
    save_signal(&args.output, &signal, true).context("Failed to write WAV file")?;

    log::info!(
        "Wrote {} ({:.2} s @ {} Hz, bearing {:.1}°, carrier {} Hz, SNR {})",
        args.output.display(),
        signal.duration_secs(),
        signal.rate(),
        params.bearing_degrees,
        params.carrier_hz,
        params
            .snr_db
            .map_or("clean".to_string(), |snr| format!("{:.1} dB", snr))
    );
    Ok(())
}
