use crate::error::LogError;
use crate::fields::{self, FieldBag, SemanticCall, StatValue};
use crate::logger::Logger;
use crate::record::Level;
use serde_json::Value;

/// Wraps a [`Logger`] and binds the contextual fields every record it
/// emits must carry (currently the environment tag).
///
/// Adapters are built by the
/// [`LoggerRegistry`](crate::registry::LoggerRegistry), never directly,
/// and are immutable after construction, so concurrent use needs no
/// locking at this layer.
pub struct LoggerAdapter {
    logger: Logger,
    environment: String,
    context: FieldBag,
}

impl LoggerAdapter {
    pub(crate) fn new(logger: Logger, environment: &str) -> Self {
        let mut context = FieldBag::new();
        context.insert("environment", environment);
        LoggerAdapter {
            logger,
            environment: environment.to_string(),
            context,
        }
    }

    /// Sanitized logical name this adapter was registered under.
    pub fn name(&self) -> &str {
        self.logger.name()
    }

    /// Environment tag bound at creation.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Log an operational event at the default INFO level.
    ///
    /// `name` is sanitized and carried in the `DTM_EVENT` field; `fields`
    /// are flattened into the record per the merge rules of
    /// [`fields::merge`].
    #[track_caller]
    pub fn event(&self, name: &str, fields: FieldBag) -> Result<(), LogError> {
        self.event_at(Level::default(), name, fields)
    }

    #[track_caller]
    pub fn event_at(&self, level: Level, name: &str, fields: FieldBag) -> Result<(), LogError> {
        self.emit(level, SemanticCall::event(name)?, fields)
    }

    /// Log a timer stat (`DTM_STATS` + `stat_type = "timer"` +
    /// `stat_value`) at the default INFO level.
    #[track_caller]
    pub fn timer(
        &self,
        name: &str,
        value: impl Into<StatValue>,
        fields: FieldBag,
    ) -> Result<(), LogError> {
        self.timer_at(Level::default(), name, value, fields)
    }

    #[track_caller]
    pub fn timer_at(
        &self,
        level: Level,
        name: &str,
        value: impl Into<StatValue>,
        fields: FieldBag,
    ) -> Result<(), LogError> {
        self.emit(level, SemanticCall::timer(name, value)?, fields)
    }

    /// Log a counter stat (`DTM_STATS` + `stat_type = "counter"`) at the
    /// default INFO level.
    #[track_caller]
    pub fn counter(&self, name: &str, fields: FieldBag) -> Result<(), LogError> {
        self.counter_at(Level::default(), name, fields)
    }

    #[track_caller]
    pub fn counter_at(&self, level: Level, name: &str, fields: FieldBag) -> Result<(), LogError> {
        self.emit(level, SemanticCall::counter(name)?, fields)
    }

    /// Log a gauge stat (`DTM_STATS` + `stat_type = "gauge"` +
    /// `stat_value`) at the default INFO level.
    #[track_caller]
    pub fn gauge(
        &self,
        name: &str,
        value: impl Into<StatValue>,
        fields: FieldBag,
    ) -> Result<(), LogError> {
        self.gauge_at(Level::default(), name, value, fields)
    }

    #[track_caller]
    pub fn gauge_at(
        &self,
        level: Level,
        name: &str,
        value: impl Into<StatValue>,
        fields: FieldBag,
    ) -> Result<(), LogError> {
        self.emit(level, SemanticCall::gauge(name, value)?, fields)
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: FieldBag) -> Result<(), LogError> {
        self.log(Level::Debug, message, fields)
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: FieldBag) -> Result<(), LogError> {
        self.log(Level::Info, message, fields)
    }

    #[track_caller]
    pub fn warning(&self, message: &str, fields: FieldBag) -> Result<(), LogError> {
        self.log(Level::Warning, message, fields)
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: FieldBag) -> Result<(), LogError> {
        self.log(Level::Error, message, fields)
    }

    /// Leveled passthrough: the message goes out unchanged, the bag is
    /// the bound context plus the flattened `fields`, no envelope.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: FieldBag) -> Result<(), LogError> {
        let bag = fields::flatten(&self.context, fields)?;
        self.logger.log(level, message, bag)
    }

    /// Log an error with its rendered cause chain at ERROR level.
    ///
    /// The record carries an `exception` field: an array of strings
    /// opening with a `Traceback` marker line, followed by the error type
    /// and display text and one line per `source()` in the chain. The
    /// marker keeps the output shape compatible with ingestion pipelines
    /// that key on it.
    #[track_caller]
    pub fn exception<E>(&self, message: &str, error: &E, fields: FieldBag) -> Result<(), LogError>
    where
        E: std::error::Error + ?Sized,
    {
        let mut call_fields = fields;
        call_fields.insert("exception", Value::Array(render_exception(error)));
        self.log(Level::Error, message, call_fields)
    }

    #[track_caller]
    fn emit(&self, level: Level, call: SemanticCall, fields: FieldBag) -> Result<(), LogError> {
        let bag = fields::merge(&call, &self.context, fields)?;
        self.logger.log(level, &call.message(), bag)
    }
}

fn render_exception<E>(error: &E) -> Vec<Value>
where
    E: std::error::Error + ?Sized,
{
    let mut lines = vec![Value::String("Traceback (most recent call):".to_string())];
    lines.push(Value::String(format!("{}: {}", std::any::type_name::<E>(), error)));
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(Value::String(format!("caused by: {}", cause)));
        source = cause.source();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::sink::test_support::CaptureSink;
    use serde_json::json;

    fn adapter_with_capture(environment: &str, min_level: Level) -> (LoggerAdapter, CaptureSink) {
        let capture = CaptureSink::default();
        let logger = Logger::new(
            "test_logger".to_string(),
            min_level,
            vec![Box::new(capture.clone())],
        );
        (LoggerAdapter::new(logger, environment), capture)
    }

    #[test]
    fn event_merges_envelope_context_and_call_fields() {
        let (adapter, capture) = adapter_with_capture("prod", Level::Info);
        adapter
            .event("order placed", fields! { user = "alice", amount = 42.5 })
            .unwrap();

        let records = capture.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.message, "event: order_placed");
        assert_eq!(record.fields.get("DTM_EVENT"), Some(&json!("order_placed")));
        assert_eq!(record.fields.get("environment"), Some(&json!("prod")));
        assert_eq!(record.fields.get("user"), Some(&json!("alice")));
        assert_eq!(record.fields.get("amount"), Some(&json!(42.5)));
    }

    #[test]
    fn gauge_carries_the_full_stat_envelope() {
        let (adapter, capture) = adapter_with_capture("prod", Level::Info);
        adapter.gauge("queue depth", 17u64, fields! { region = "us-east" }).unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.fields.get("DTM_STATS"), Some(&json!("queue_depth")));
        assert_eq!(record.fields.get("stat_type"), Some(&json!("gauge")));
        assert_eq!(record.fields.get("stat_value"), Some(&json!(17)));
        assert_eq!(record.fields.get("region"), Some(&json!("us-east")));
        assert_eq!(record.message, "gauge: queue_depth");
    }

    #[test]
    fn timer_message_includes_the_value() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        adapter
            .timer("user clicked", 0.1233, fields! { action = "clicked", location = "upperleft" })
            .unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.message, "timer: user_clicked: 0.1233");
        assert_eq!(record.fields.get("DTM_STATS"), Some(&json!("user_clicked")));
        assert_eq!(record.fields.get("stat_type"), Some(&json!("timer")));
        assert_eq!(record.fields.get("stat_value"), Some(&json!(0.1233)));
        assert_eq!(record.fields.get("action"), Some(&json!("clicked")));
    }

    #[test]
    fn counter_emits_without_a_value() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        adapter.counter("something happened", fields! { seriously = true }).unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.fields.get("DTM_STATS"), Some(&json!("something_happened")));
        assert_eq!(record.fields.get("stat_type"), Some(&json!("counter")));
        assert_eq!(record.fields.get("stat_value"), None);
        assert_eq!(record.fields.get("seriously"), Some(&json!(true)));
    }

    #[test]
    fn passthrough_leaves_the_message_alone() {
        let (adapter, capture) = adapter_with_capture("dev", Level::Debug);
        adapter.info("plain old message", fields! { request_id = "abc" }).unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.message, "plain old message");
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.fields.get("environment"), Some(&json!("dev")));
        assert_eq!(record.fields.get("request_id"), Some(&json!("abc")));
        assert_eq!(record.fields.get("DTM_EVENT"), None);
    }

    #[test]
    fn extra_and_direct_fields_both_flatten() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        let mut call_fields = fields! { b = 2 };
        call_fields.insert("extra", json!({"a": 1}));
        adapter.event("flattening", call_fields).unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.fields.get("a"), Some(&json!(1)));
        assert_eq!(record.fields.get("b"), Some(&json!(2)));
        assert_eq!(record.fields.get("extra"), None);
    }

    #[test]
    fn below_min_level_semantic_calls_emit_nothing() {
        let (adapter, capture) = adapter_with_capture("", Level::Warning);
        adapter.event("quiet event", FieldBag::new()).unwrap();
        adapter.counter("quiet counter", FieldBag::new()).unwrap();
        adapter.event_at(Level::Error, "loud event", FieldBag::new()).unwrap();

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "event: loud_event");
    }

    #[test]
    fn empty_name_raises_and_emits_nothing() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        let err = adapter.event("   ", FieldBag::new()).unwrap_err();
        assert!(matches!(err, LogError::InvalidName));
        assert!(capture.records().is_empty());
    }

    #[test]
    fn non_mapping_extra_raises_and_emits_nothing() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        let mut call_fields = FieldBag::new();
        call_fields.insert("extra", json!("not a mapping"));
        let err = adapter.event("bad extra", call_fields).unwrap_err();
        assert!(matches!(err, LogError::InvalidFieldContainer { found: "string" }));
        assert!(capture.records().is_empty());
    }

    #[test]
    fn exception_renders_the_cause_chain() {
        let (adapter, capture) = adapter_with_capture("", Level::Info);
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        adapter.exception("read failed", &cause, FieldBag::new()).unwrap();

        let record = &capture.records()[0];
        assert_eq!(record.level, Level::Error);
        let exception = record.fields.get("exception").unwrap().as_array().unwrap();
        assert!(exception[0].as_str().unwrap().contains("Traceback"));
        let joined: String = exception
            .iter()
            .map(|entry| entry.as_str().unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(joined.contains("Error"));
        assert!(joined.contains("missing file"));
    }

    #[test]
    fn accessors_expose_name_and_environment() {
        let (adapter, _capture) = adapter_with_capture("staging", Level::Info);
        assert_eq!(adapter.name(), "test_logger");
        assert_eq!(adapter.environment(), "staging");
    }
}
