use crate::record::Level;

/// Environment variable names used by this crate for convenient
/// configuration of loggers from services.
///
/// These are purely helpers; the registry and sink types remain decoupled
/// from environment access.

/// Environment tag bound to created loggers, e.g. `prod` or `staging`.
pub const STATS_LOGGER_ENVIRONMENT_ENV: &str = "STATS_LOGGER_ENVIRONMENT";

/// Minimum level name, e.g. `DEBUG` or `WARNING`.
pub const STATS_LOGGER_LEVEL_ENV: &str = "STATS_LOGGER_LEVEL";

/// Path of the rotating log file. Unset means console-only logging.
pub const STATS_LOGGER_FILE_ENV: &str = "STATS_LOGGER_FILE";

/// Rollover threshold for the file sink in bytes; `0` disables rotation.
pub const STATS_LOGGER_FILE_MAX_BYTES_ENV: &str = "STATS_LOGGER_FILE_MAX_BYTES";

/// How many rotated backups the file sink keeps.
pub const STATS_LOGGER_FILE_BACKUPS_ENV: &str = "STATS_LOGGER_FILE_BACKUPS";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a level name from an environment variable, falling back to
/// `default` when the variable is unset or does not name a level.
pub fn level_or(key: &str, default: Level) -> Level {
    std::env::var(key)
        .ok()
        .and_then(|name| Level::from_name(&name))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_to_the_default() {
        assert_eq!(env_or("STATS_LOGGER_TEST_UNSET", "fallback"), "fallback");
        std::env::set_var("STATS_LOGGER_TEST_SET", "value");
        assert_eq!(env_or("STATS_LOGGER_TEST_SET", "fallback"), "value");
    }

    #[test]
    fn level_or_parses_names_and_falls_back() {
        std::env::set_var("STATS_LOGGER_TEST_LEVEL", "warning");
        assert_eq!(level_or("STATS_LOGGER_TEST_LEVEL", Level::Info), Level::Warning);
        std::env::set_var("STATS_LOGGER_TEST_LEVEL_BAD", "loudest");
        assert_eq!(level_or("STATS_LOGGER_TEST_LEVEL_BAD", Level::Info), Level::Info);
        assert_eq!(level_or("STATS_LOGGER_TEST_LEVEL_UNSET", Level::Error), Level::Error);
    }
}
