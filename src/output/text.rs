use super::{DecodeReport, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &DecodeReport) -> String {
        if self.verbose {
            format!(
                "{}: {:.1}° (lag {} @ {} Hz, correlation {:.3})",
                report.file, report.bearing, report.lag, report.rate, report.correlation
            )
        } else {
            format!("{}: {:.1}°", report.file, report.bearing)
        }
    }
}
