mod csv;
mod json;
mod text;

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::vor::BearingResult;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One decoded file, as reported by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub file: String,
    pub bearing: f64,
    pub lag: usize,
    pub correlation: f64,
    pub rate: u32,
}

impl DecodeReport {
    pub fn new(file: &Path, result: &BearingResult) -> Self {
        Self {
            file: file.display().to_string(),
            bearing: result.degrees,
            lag: result.lag,
            correlation: result.correlation,
            rate: result.rate,
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, report: &DecodeReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DecodeReport {
        DecodeReport {
            file: "vor.wav".to_string(),
            bearing: 137.34,
            lag: 381,
            correlation: 0.9876,
            rate: 6000,
        }
    }

    #[test]
    fn test_text_formatter() {
        let line = create_formatter(OutputFormat::Text, false).format(&report());
        assert_eq!(line, "vor.wav: 137.3°");

        let line = create_formatter(OutputFormat::Text, true).format(&report());
        assert_eq!(line, "vor.wav: 137.3° (lag 381 @ 6000 Hz, correlation 0.988)");
    }

    #[test]
    fn test_json_formatter() {
        let line = create_formatter(OutputFormat::Json, false).format(&report());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["file"], "vor.wav");
        assert_eq!(value["bearing"], 137.34);
        assert_eq!(value["lag"], 381);
        assert_eq!(value["rate"], 6000);
        assert!(value["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_csv_formatter() {
        let formatter = create_formatter(OutputFormat::Csv, false);
        let header = formatter.header().unwrap();
        let line = formatter.format(&report());
        assert_eq!(
            header.split(',').count(),
            line.split(',').count()
        );
        assert!(line.ends_with(",vor.wav,137.3,381,0.988,6000"));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = iso8601_timestamp();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }
}
