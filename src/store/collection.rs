use serde_json::{Map, Value};

/// A single JSON object inside a collection file.
pub type Record = Map<String, Value>;

/// The three JSON array files backing the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Patients waiting to be seen.
    Queue,
    Reports,
    /// Append-only log of attended visits.
    AttendedPatients,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Queue => "queue.json",
            Collection::Reports => "reports.json",
            Collection::AttendedPatients => "attendedpatients.json",
        }
    }
}

/// How a load reacts to a missing or malformed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Missing or malformed files are errors.
    Strict,
    /// Missing, blank, or malformed files read as an empty collection.
    /// Other I/O failures are still errors.
    Lenient,
}

/// Next id for a collection: one past the largest integer id, or 1.
/// `None` once the largest id is `i64::MAX`.
pub fn next_id(records: &[Value]) -> Option<i64> {
    match records
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .max()
    {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Id comparison used when moving records. Numbers compare by value so that
/// `1` and `1.0` match; a missing id only matches another missing id.
pub fn same_id(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (a, b) => a == b,
    }
}
