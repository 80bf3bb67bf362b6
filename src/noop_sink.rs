use crate::error::LogError;
use crate::record::LogRecord;
use crate::sink::LogSink;

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of the facade itself without any
/// I/O, and for unit tests that don't care about persistence.
#[derive(Clone, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn send(&self, _record: &LogRecord) -> Result<(), LogError> {
        Ok(())
    }
}
