use super::{DecodeReport, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &DecodeReport) -> String {
        format!(
            "{},{},{:.1},{},{:.3},{}",
            iso8601_timestamp(),
            report.file,
            report.bearing,
            report.lag,
            report.correlation,
            report.rate
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,file,bearing,lag,correlation,rate")
    }
}
