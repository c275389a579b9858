use serde::Serialize;

use super::{DecodeReport, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    ts: String,
    #[serde(flatten)]
    report: &'a DecodeReport,
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &DecodeReport) -> String {
        let line = JsonLine {
            ts: iso8601_timestamp(),
            report,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
