use crate::error::LogError;
use crate::fields::FieldBag;
use crate::record::LogRecord;
use serde::Serialize;

/// Renders one [`LogRecord`] as a single line of text.
///
/// Sinks hold a formatter behind this trait so the output shape stays
/// swappable independently of the destination.
pub trait LineFormatter: Send + Sync {
    /// Render the record.
    ///
    /// **Returns**
    /// - `Ok(..)` with the line, without a trailing newline.
    /// - `Err(LogError::Serialization)` if a field value cannot be
    ///   rendered. No partial line is produced.
    fn format_line(&self, record: &LogRecord) -> Result<String, LogError>;
}

/// Formats records as single-line JSON objects for log-aggregation
/// pipelines.
///
/// Fixed keys: `@timestamp` (RFC 3339), `name`, `levelname`, `levelno`,
/// `message`, `filename`, `lineno`. Every entry of the record's field bag
/// is flattened alongside them at the top level.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(rename = "@timestamp")]
    timestamp: String,
    name: &'a str,
    levelname: &'a str,
    levelno: u8,
    message: &'a str,
    filename: &'a str,
    lineno: u32,
    #[serde(flatten)]
    fields: &'a FieldBag,
}

impl JsonFormatter {
    fn map_record<'a>(&self, record: &'a LogRecord) -> JsonLine<'a> {
        JsonLine {
            timestamp: record.timestamp.to_rfc3339(),
            name: &record.name,
            levelname: record.level.levelname(),
            levelno: record.level.levelno(),
            message: &record.message,
            filename: &record.file,
            lineno: record.line,
            fields: &record.fields,
        }
    }
}

impl LineFormatter for JsonFormatter {
    fn format_line(&self, record: &LogRecord) -> Result<String, LogError> {
        Ok(serde_json::to_string(&self.map_record(record))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::record::Level;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn sample_record() -> LogRecord {
        LogRecord {
            timestamp: Utc::now(),
            name: "api".to_string(),
            level: Level::Info,
            message: "event: order_placed".to_string(),
            file: "src/handlers.rs".to_string(),
            line: 42,
            fields: fields! { environment = "prod", user = "alice" },
        }
    }

    #[test]
    fn line_is_one_json_object_with_fixed_keys() {
        let line = JsonFormatter.format_line(&sample_record()).unwrap();
        assert!(!line.contains('\n'));

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert!(parsed.get("@timestamp").is_some());
        assert_eq!(parsed["name"], json!("api"));
        assert_eq!(parsed["levelname"], json!("INFO"));
        assert_eq!(parsed["levelno"], json!(20));
        assert_eq!(parsed["message"], json!("event: order_placed"));
        assert_eq!(parsed["filename"], json!("src/handlers.rs"));
        assert_eq!(parsed["lineno"], json!(42));
    }

    #[test]
    fn bag_entries_land_at_the_top_level() {
        let line = JsonFormatter.format_line(&sample_record()).unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["environment"], json!("prod"));
        assert_eq!(parsed["user"], json!("alice"));
    }

    #[test]
    fn timestamp_parses_as_rfc3339() {
        let line = JsonFormatter.format_line(&sample_record()).unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        let stamp = parsed["@timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
