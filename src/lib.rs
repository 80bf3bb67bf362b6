pub mod error;
pub mod record;
pub mod fields;
pub mod format;
pub mod sink;
pub mod console;
pub mod rotating_file;
pub mod noop_sink;
pub mod logger;
pub mod adapter;
pub mod registry;
pub mod env;

pub use adapter::LoggerAdapter;
pub use error::LogError;
pub use fields::{sanitize, FieldBag, SemanticCall, StatValue};
pub use record::{Level, LogRecord};
pub use registry::{LoggerRegistry, RegistryConfig};

// Support for the `fields!` macro.
#[doc(hidden)]
pub use serde_json as __serde_json;
