use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;
use std::path::{Path, PathBuf};

use vordecoder::config::{Frequency, VorConfig};
use vordecoder::output::{DecodeReport, OutputFormat, create_formatter};
use vordecoder::signal_processing::circular_mean_degrees;
use vordecoder::vor::{Decoded, LogObserver, VorDecoder, WavDumpObserver};
use vordecoder::wav::{read_mono_wav, save_signal};

#[derive(Parser, Debug)]
#[command(name = "vordecoder")]
#[command(about = "Decode the bearing from VOR beacon audio captures", long_about = None)]
struct Args {
    /// WAV files to decode (first channel is used)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML configuration file (missing fields keep their defaults)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// FM subcarrier frequency (e.g., "9960", "9.96khz")
    #[arg(long)]
    carrier: Option<Frequency>,

    /// Rate both paths are decimated to; must divide the capture rate
    #[arg(long)]
    decimated_rate: Option<u32>,

    /// Calibration added to every bearing, in degrees
    #[arg(long, allow_hyphen_values = true)]
    angle_offset: Option<f64>,

    /// Write the baseband FM signal (real part, peak-normalized) to this WAV.
    /// With several inputs the file name is prefixed by the input's stem.
    #[arg(long)]
    export_fm: Option<PathBuf>,

    /// Write every intermediate stage as a WAV into this directory
    #[arg(long)]
    dump_stages: Option<PathBuf>,

    /// Run the reference and FM paths on separate threads
    #[arg(long)]
    parallel: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let decoder = VorDecoder::new(config).context("invalid decoder configuration")?;
    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let mut stats: Stats<f64> = Stats::new();
    let mut bearings = Vec::with_capacity(args.files.len());
    let mut failures = 0;

    for path in &args.files {
        match decode_file(&decoder, path, &args) {
            Ok(decoded) => {
                let report = DecodeReport::new(path, &decoded.bearing);
                println!("{}", formatter.format(&report));
                stats.update(decoded.bearing.degrees);
                bearings.push(decoded.bearing.degrees);
            }
            Err(e) => {
                eprintln!("{}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    if args.files.len() > 1 && matches!(args.format, OutputFormat::Text) {
        print_summary(&stats, &bearings, failures);
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed to decode", failures, args.files.len());
    }
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<VorConfig> {
    let mut config = match &args.config {
        Some(path) => VorConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => VorConfig::default(),
    };

    if let Some(carrier) = args.carrier {
        config.fm.carrier_hz = carrier.as_hz();
    }
    if let Some(rate) = args.decimated_rate {
        config.decimated_rate = rate;
    }
    if let Some(offset) = args.angle_offset {
        config.bearing.angle_offset_degrees = offset;
    }
    if args.parallel {
        config.parallel_paths = true;
    }
    Ok(config)
}

fn decode_file(decoder: &VorDecoder, path: &Path, args: &Args) -> anyhow::Result<Decoded> {
    let capture =
        read_mono_wav(path).with_context(|| format!("failed to read {}", path.display()))?;

    let decoded = match &args.dump_stages {
        Some(dir) => {
            let dir = if args.files.len() > 1 {
                dir.join(file_stem(path))
            } else {
                dir.clone()
            };
            let mut observer = WavDumpObserver::new(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let decoded = decoder.decode_with_observer(&capture, &mut observer)?;
            log::info!(
                "Wrote {} stage files to {}",
                observer.written().len(),
                dir.display()
            );
            decoded
        }
        None => decoder.decode_with_observer(&capture, &mut LogObserver)?,
    };

    if let Some(export) = &args.export_fm {
        let export = if args.files.len() > 1 {
            export.with_file_name(format!(
                "{}_{}",
                file_stem(path),
                export.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
            ))
        } else {
            export.clone()
        };
        save_signal(&export, &decoded.fm_export(), false)
            .with_context(|| format!("failed to write {}", export.display()))?;
        log::info!("Exported baseband FM to {}", export.display());
    }

    Ok(decoded)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "capture".to_string())
}

fn print_summary(stats: &Stats<f64>, bearings: &[f64], failures: usize) {
    println!();
    println!("=== Summary ===");
    println!("Decoded: {} (failed: {})", stats.count, failures);
    if stats.count == 0 {
        return;
    }
    if let Some(mean) = circular_mean_degrees(bearings) {
        println!("Circular mean: {:.1}°", mean);
    }
    println!(
        "Linear mean: {:.1}° std: {:.2}° min: {:.1}° max: {:.1}°",
        stats.mean, stats.std_dev, stats.min, stats.max
    );
}
