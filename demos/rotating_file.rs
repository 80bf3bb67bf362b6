use stats_logger::fields;
use stats_logger::rotating_file::RotatingFileConfig;
use stats_logger::{Level, LoggerRegistry, RegistryConfig};

fn main() {
    let mut file_config = RotatingFileConfig::new("/tmp/stats_logger_demo.log");
    file_config.max_bytes = 64_000;
    file_config.backup_count = 2;

    let config = RegistryConfig {
        file: Some(file_config),
        ..RegistryConfig::default()
    };

    let registry = LoggerRegistry::new(config);
    let log = registry
        .get_or_create("file demo", "dev", Level::Info)
        .expect("create logger");

    for n in 0..1000u64 {
        log.timer("write latency", n as f64 / 1000.0, fields! { iteration = n })
            .unwrap();
    }

    println!("wrote 1000 records to /tmp/stats_logger_demo.log (+ backups)");
}
