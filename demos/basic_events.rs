use stats_logger::fields;
use stats_logger::{FieldBag, Level, LoggerRegistry};

fn main() {
    let registry = LoggerRegistry::with_defaults();
    let log = registry
        .get_or_create("checkout service", "prod", Level::Info)
        .expect("create logger");

    log.info("starting service", FieldBag::new()).unwrap();

    log.event("order placed", fields! { user = "alice", amount = 42.5 })
        .unwrap();

    log.timer("checkout latency", 0.245, fields! { step = "payment" })
        .unwrap();

    log.counter("orders", fields! { region = "us-east" }).unwrap();

    log.gauge("queue depth", 17u64, fields! { region = "us-east" })
        .unwrap();

    // A second lookup under a whitespace variant returns the same logger.
    let same = registry
        .get_or_create("  checkout   service ", "ignored", Level::Debug)
        .expect("lookup logger");
    same.event("lookup hit", FieldBag::new()).unwrap();
}
