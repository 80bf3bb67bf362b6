use crate::error::LogError;
use crate::fields::FieldBag;
use crate::record::{Level, LogRecord};
use crate::sink::LogSink;
use chrono::Utc;
use std::panic::Location;

/// The underlying leveled primitive: turns `(level, message, fields)` into
/// one [`LogRecord`] and hands it to every configured sink.
///
/// Calls below `min_level` are dropped before a record is built. Emission
/// is synchronous; the first sink error propagates to the caller.
pub struct Logger {
    name: String,
    min_level: Level,
    sinks: Vec<Box<dyn LogSink>>,
}

impl Logger {
    pub(crate) fn new(name: String, min_level: Level, sinks: Vec<Box<dyn LogSink>>) -> Self {
        Logger { name, min_level, sinks }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Emit one record. Call-site metadata is taken from the caller via
    /// `#[track_caller]`, so the emitted `filename`/`lineno` point at the
    /// application code, not this crate.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: FieldBag) -> Result<(), LogError> {
        if level < self.min_level {
            return Ok(());
        }
        let caller = Location::caller();
        let record = LogRecord {
            timestamp: Utc::now(),
            name: self.name.clone(),
            level,
            message: message.to_string(),
            file: caller.file().to_string(),
            line: caller.line(),
            fields,
        };
        for sink in &self.sinks {
            sink.send(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::sink::test_support::CaptureSink;

    fn logger_with(capture: &CaptureSink, min_level: Level) -> Logger {
        Logger::new("svc".to_string(), min_level, vec![Box::new(capture.clone())])
    }

    #[test]
    fn records_below_min_level_are_dropped() {
        let capture = CaptureSink::default();
        let logger = logger_with(&capture, Level::Warning);

        logger.log(Level::Info, "quiet", FieldBag::new()).unwrap();
        logger.log(Level::Error, "loud", FieldBag::new()).unwrap();

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "loud");
        assert_eq!(records[0].level, Level::Error);
    }

    #[test]
    fn every_sink_receives_the_record() {
        let first = CaptureSink::default();
        let second = CaptureSink::default();
        let logger = Logger::new(
            "svc".to_string(),
            Level::Debug,
            vec![Box::new(first.clone()), Box::new(second.clone())],
        );

        logger.log(Level::Info, "fan out", fields! { n = 1 }).unwrap();

        assert_eq!(first.records().len(), 1);
        assert_eq!(second.records().len(), 1);
    }

    #[test]
    fn call_site_points_at_the_caller() {
        let capture = CaptureSink::default();
        let logger = logger_with(&capture, Level::Debug);
        logger.log(Level::Info, "here", FieldBag::new()).unwrap();

        let records = capture.records();
        assert!(records[0].file.ends_with("logger.rs"));
        assert!(records[0].line > 0);
    }
}
