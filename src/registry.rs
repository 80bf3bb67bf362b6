use crate::adapter::LoggerAdapter;
use crate::console::{ConsoleSink, ConsoleTarget};
use crate::error::LogError;
use crate::fields::sanitize;
use crate::format::JsonFormatter;
use crate::logger::Logger;
use crate::record::Level;
use crate::rotating_file::{RotatingFileConfig, RotatingFileSink};
use crate::sink::LogSink;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Конфигурация реестра логгеров.
///
/// Управляет тем, куда каждый созданный логгер пишет отформатированные
/// JSON-строки: консольный поток подключается всегда, файловый sink с
/// ротацией по размеру подключается опционально.
///
/// **Поля**
/// - `console`: целевой поток консоли (`stdout` или `stderr`).
/// - `file`: опциональная конфигурация файлового sink; `None` отключает
///   запись в файл.
#[derive(Clone, Debug, Default)]
pub struct RegistryConfig {
    pub console: ConsoleTarget,
    pub file: Option<RotatingFileConfig>,
}

/// Process-scoped registry guaranteeing one configured [`LoggerAdapter`]
/// per logical name.
///
/// The registry is the single owner of adapter instances; callers hold
/// `Arc` references returned by [`get_or_create`](Self::get_or_create)
/// and never construct adapters directly. Entries are never evicted;
/// cardinality is bounded by the number of distinct named loggers in a
/// codebase, not by request volume.
pub struct LoggerRegistry {
    config: RegistryConfig,
    adapters: RwLock<HashMap<String, Arc<LoggerAdapter>>>,
    create_guard: Mutex<()>,
}

impl LoggerRegistry {
    /// Construct a registry whose loggers will use the given sink
    /// configuration. Build one at process start and pass it by reference
    /// to whatever needs to create loggers.
    pub fn new(config: RegistryConfig) -> Self {
        LoggerRegistry {
            config,
            adapters: RwLock::new(HashMap::new()),
            create_guard: Mutex::new(()),
        }
    }

    /// Registry with the default configuration: JSON lines on stdout,
    /// no file sink.
    pub fn with_defaults() -> Self {
        LoggerRegistry::new(RegistryConfig::default())
    }

    /// Look up an already-registered adapter without creating one.
    ///
    /// The lookup key is the sanitized form of `name`; an invalid name
    /// simply misses.
    pub fn get(&self, name: &str) -> Option<Arc<LoggerAdapter>> {
        let key = sanitize(name).ok()?;
        self.adapters.read().expect("registry lock poisoned").get(&key).cloned()
    }

    /// Return the adapter registered under the sanitized form of `name`,
    /// creating and registering it first if absent.
    ///
    /// **Parameters**
    /// - `name`: logical name; sanitized before use as the key, so two
    ///   calls differing only in whitespace resolve to the same entry.
    /// - `environment`: tag bound to every record the adapter emits.
    /// - `level`: minimum severity the adapter's logger will emit.
    ///
    /// **Returns**
    /// - `Ok(..)` with the shared adapter instance.
    /// - `Err(LogError::InvalidName)` if `name` is empty after trimming.
    /// - `Err(LogError::Io)` if the configured file sink cannot be opened.
    ///
    /// First-writer-wins: on a repeat call for the same name every other
    /// argument is ignored and the cached instance is returned as-is, so
    /// a later call with a different `environment` silently gets the
    /// earlier configuration. Concurrent creators of one name are
    /// serialized by an internal guard and all observe the same instance;
    /// the guard covers only creation, emission stays lock-free here.
    pub fn get_or_create(
        &self,
        name: &str,
        environment: &str,
        level: Level,
    ) -> Result<Arc<LoggerAdapter>, LogError> {
        let key = sanitize(name)?;

        if let Some(existing) = self.adapters.read().expect("registry lock poisoned").get(&key) {
            return Ok(Arc::clone(existing));
        }

        let _guard = self.create_guard.lock().expect("registry create guard poisoned");
        // Повторная проверка под guard'ом: создатель-конкурент мог успеть
        // зарегистрировать этот же логгер.
        if let Some(existing) = self.adapters.read().expect("registry lock poisoned").get(&key) {
            return Ok(Arc::clone(existing));
        }

        let adapter = Arc::new(self.build_adapter(&key, environment, level)?);
        self.adapters
            .write()
            .expect("registry lock poisoned")
            .insert(key, Arc::clone(&adapter));
        Ok(adapter)
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build_adapter(
        &self,
        name: &str,
        environment: &str,
        level: Level,
    ) -> Result<LoggerAdapter, LogError> {
        let mut sinks: Vec<Box<dyn LogSink>> =
            vec![Box::new(ConsoleSink::new(self.config.console, JsonFormatter))];
        if let Some(file_config) = &self.config.file {
            sinks.push(Box::new(RotatingFileSink::new(file_config.clone(), JsonFormatter)?));
        }
        let logger = Logger::new(name.to_string(), level, sinks);
        Ok(LoggerAdapter::new(logger, environment))
    }
}
