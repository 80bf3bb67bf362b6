use crate::error::LogError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Reserved field carrying the sanitized name of an operational event.
pub const EVENT_KEY: &str = "DTM_EVENT";
/// Reserved field carrying the sanitized name of a timer/counter/gauge stat.
pub const STATS_KEY: &str = "DTM_STATS";
/// Reserved field carrying the stat kind: `"timer"`, `"counter"` or `"gauge"`.
pub const STAT_TYPE_KEY: &str = "stat_type";
/// Reserved field carrying the numeric value of a timer or gauge.
pub const STAT_VALUE_KEY: &str = "stat_value";
/// Reserved call-field key whose object value is flattened into the bag.
pub const EXTRA_KEY: &str = "extra";

/// Normalize a logger or stat name: trim, then collapse every internal
/// whitespace run to a single `_`.
///
/// Idempotent: `sanitize(&sanitize(s)?) == sanitize(s)`. An empty or
/// whitespace-only input is a caller error.
///
/// **Returns**
/// - `Ok(..)` with the sanitized name.
/// - `Err(LogError::InvalidName)` if nothing is left after trimming.
pub fn sanitize(name: &str) -> Result<String, LogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LogError::InvalidName);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut in_run = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    Ok(out)
}

/// Flat mapping of field name to JSON value attached to one log record.
///
/// On [`merge`](FieldBag::merge) and [`insert`](FieldBag::insert) the
/// incoming value wins on key collision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldBag(BTreeMap<String, Value>);

impl FieldBag {
    pub fn new() -> Self {
        FieldBag(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fold `other` into this bag; `other` wins on key collision.
    pub fn merge(&mut self, other: FieldBag) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, Value)> for FieldBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        FieldBag(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldBag {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a [`FieldBag`] from `name = value` pairs. Values accept anything
/// `serde_json::json!` accepts.
///
/// ```
/// use stats_logger::fields;
///
/// let bag = fields! { user = "alice", attempts = 3 };
/// assert_eq!(bag.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::fields::FieldBag::new() };
    ($($key:ident = $value:expr),+ $(,)?) => {{
        let mut bag = $crate::fields::FieldBag::new();
        $(bag.insert(stringify!($key), $crate::__serde_json::json!($value));)+
        bag
    }};
}

/// Numeric primary value of a timer or gauge.
///
/// Non-finite floats have no JSON representation and map to `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatValue(Value);

impl StatValue {
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<i32> for StatValue {
    fn from(value: i32) -> Self {
        StatValue(Value::from(value))
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue(Value::from(value))
    }
}

impl From<u32> for StatValue {
    fn from(value: u32) -> Self {
        StatValue(Value::from(value))
    }
}

impl From<u64> for StatValue {
    fn from(value: u64) -> Self {
        StatValue(Value::from(value))
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue(Value::from(value))
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One semantic call: an operational event or a timer/counter/gauge stat.
///
/// The constructors sanitize the raw name, so a stored name is always in
/// its final form.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticCall {
    Event { name: String },
    Timer { name: String, value: StatValue },
    Counter { name: String },
    Gauge { name: String, value: StatValue },
}

impl SemanticCall {
    pub fn event(name: &str) -> Result<Self, LogError> {
        Ok(SemanticCall::Event { name: sanitize(name)? })
    }

    pub fn timer(name: &str, value: impl Into<StatValue>) -> Result<Self, LogError> {
        Ok(SemanticCall::Timer { name: sanitize(name)?, value: value.into() })
    }

    pub fn counter(name: &str) -> Result<Self, LogError> {
        Ok(SemanticCall::Counter { name: sanitize(name)? })
    }

    pub fn gauge(name: &str, value: impl Into<StatValue>) -> Result<Self, LogError> {
        Ok(SemanticCall::Gauge { name: sanitize(name)?, value: value.into() })
    }

    /// Fixed human-readable summary used as the record message.
    pub fn message(&self) -> String {
        match self {
            SemanticCall::Event { name } => format!("event: {}", name),
            SemanticCall::Timer { name, value } => format!("timer: {}: {}", name, value),
            SemanticCall::Counter { name } => format!("counter: {}", name),
            SemanticCall::Gauge { name, .. } => format!("gauge: {}", name),
        }
    }

    fn apply_envelope(&self, bag: &mut FieldBag) {
        match self {
            SemanticCall::Event { name } => {
                bag.insert(EVENT_KEY, name.as_str());
            }
            SemanticCall::Timer { name, value } => {
                bag.insert(STATS_KEY, name.as_str());
                bag.insert(STAT_VALUE_KEY, value.as_json().clone());
                bag.insert(STAT_TYPE_KEY, "timer");
            }
            SemanticCall::Counter { name } => {
                bag.insert(STATS_KEY, name.as_str());
                bag.insert(STAT_TYPE_KEY, "counter");
            }
            SemanticCall::Gauge { name, value } => {
                bag.insert(STATS_KEY, name.as_str());
                bag.insert(STAT_VALUE_KEY, value.as_json().clone());
                bag.insert(STAT_TYPE_KEY, "gauge");
            }
        }
    }
}

/// Build the flat field bag for one semantic call.
///
/// Applied in order, later sources winning on key collision:
/// 1. `context`: the adapter-bound fields (e.g. `environment`).
/// 2. The kind-specific envelope keys ([`EVENT_KEY`] for events,
///    [`STATS_KEY`] + [`STAT_TYPE_KEY`] and, for timers and gauges,
///    [`STAT_VALUE_KEY`]).
/// 3. `call_fields`, with an [`EXTRA_KEY`] object flattened to the top
///    level first, then its direct siblings, so a direct field wins over a
///    same-named `extra` entry.
///
/// The envelope keys are always written for their kind; a same-named call
/// field overwrites them without validation.
///
/// **Returns**
/// - `Err(LogError::InvalidFieldContainer)` if `call_fields` carries an
///   [`EXTRA_KEY`] entry that is not a JSON object.
pub fn merge(
    call: &SemanticCall,
    context: &FieldBag,
    call_fields: FieldBag,
) -> Result<FieldBag, LogError> {
    let mut bag = context.clone();
    call.apply_envelope(&mut bag);
    apply_call_fields(&mut bag, call_fields)?;
    Ok(bag)
}

/// Build the field bag for a plain leveled call: `context` plus the
/// flattened `call_fields`, no envelope.
pub fn flatten(context: &FieldBag, call_fields: FieldBag) -> Result<FieldBag, LogError> {
    let mut bag = context.clone();
    apply_call_fields(&mut bag, call_fields)?;
    Ok(bag)
}

fn apply_call_fields(bag: &mut FieldBag, mut call_fields: FieldBag) -> Result<(), LogError> {
    if let Some(extra) = call_fields.remove(EXTRA_KEY) {
        match extra {
            Value::Object(entries) => {
                for (key, value) in entries {
                    bag.insert(key, value);
                }
            }
            other => {
                return Err(LogError::InvalidFieldContainer { found: json_type_name(&other) });
            }
        }
    }
    for (key, value) in call_fields {
        bag.insert(key, value);
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
