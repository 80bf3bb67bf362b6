use thiserror::Error;

/// Errors surfaced by the logging facade.
///
/// `InvalidName` and `InvalidFieldContainer` are caller bugs and are raised
/// before any record is built. `Serialization` and `Io` come out of the
/// formatter or sink of the emitting call and propagate unchanged; this
/// layer adds no retry or buffering.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("logger or stat name must be non-empty after trimming")]
    InvalidName,

    #[error("`extra` must be a JSON object, got {found}")]
    InvalidFieldContainer { found: &'static str },

    #[error("failed to serialize log record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}
