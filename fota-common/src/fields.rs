//! Table-driven field normalization.
//!
//! The backend has emitted the same logical attribute under several
//! spellings over time (`startedAt`, `start_time`, `started_at`, ...). Each
//! entity gets one [`FieldSpec`] listing, per canonical attribute, the
//! candidate source keys in priority order; [`normalize`] resolves them.

use serde_json::{Map, Value};

/// A canonical attribute name and its candidate source keys, highest
/// priority first. Candidates may be dotted paths into nested objects.
pub type FieldRule = (&'static str, &'static [&'static str]);

/// Normalization table for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    rules: &'static [FieldRule],
}

impl FieldSpec {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }
}

pub const CONTACT_FIELDS: FieldSpec = FieldSpec::new(&[
    ("id", &["id"]),
    ("activationId", &["activationId", "activation_id"]),
    ("time", &["time", "timestamp", "logged_at", "qso_time", "qso_datetime"]),
    ("callsign", &["callsign", "call", "station_callsign"]),
    ("band", &["band"]),
    ("mode", &["mode"]),
    ("rstSent", &["rstSent", "rst_sent", "rst_tx"]),
    ("rstRcvd", &["rstRcvd", "rst_rcvd", "rst_rx"]),
    ("notes", &["notes", "comment", "remarks"]),
]);

pub const POST_FIELDS: FieldSpec = FieldSpec::new(&[
    ("id", &["id"]),
    ("activationId", &["activationId", "activation_id"]),
    ("content", &["content", "body"]),
    ("createdAt", &["createdAt", "created_at"]),
    ("author", &["author", "author_callsign", "user.callsign", "callsign"]),
]);

pub const ACTIVATION_FIELDS: FieldSpec = FieldSpec::new(&[
    ("id", &["id"]),
    ("siteId", &["siteId", "site_id", "site.id"]),
    ("title", &["title"]),
    ("description", &["description"]),
    ("status", &["status"]),
    ("callsign", &["callsign", "user.callsign", "operator_callsign"]),
    ("startedAt", &["startedAt", "start_time", "started_at"]),
    ("endedAt", &["endedAt", "end_time", "ended_at"]),
]);

pub const SITE_FIELDS: FieldSpec = FieldSpec::new(&[
    ("id", &["id"]),
    ("name", &["name", "site_name"]),
    ("category", &["category"]),
    ("location", &["location"]),
    ("qth", &["qth"]),
    ("active", &["active"]),
    ("createdBy", &["createdBy", "created_by"]),
    ("latitude", &["latitude", "lat"]),
    ("longitude", &["longitude", "lon", "lng"]),
]);

/// Output of [`normalize`]: only attributes that resolved are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    fields: Map<String, Value>,
}

impl CanonicalRecord {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Attribute rendered as text. Strings pass through, numbers and
    /// booleans are stringified, arrays and objects count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_text)
    }

    /// Attribute as a number; numeric strings are accepted.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Attribute as a strict boolean.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

/// Resolve every attribute of `spec` against `record`.
///
/// For each canonical attribute the first candidate present with a non-null
/// value wins. Records that are not JSON objects yield an empty result.
pub fn normalize(record: &Value, spec: &FieldSpec) -> CanonicalRecord {
    let mut fields = Map::new();

    for (canonical, candidates) in spec.rules() {
        if let Some(value) = candidates.iter().find_map(|key| lookup(record, key)) {
            fields.insert((*canonical).to_string(), value.clone());
        }
    }

    CanonicalRecord { fields }
}

/// Look up a key or a dotted path (`user.callsign`). Null counts as absent.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let object = record.as_object()?;

    // A literal key wins over path traversal.
    if let Some(value) = object.get(path) {
        return (!value.is_null()).then_some(value);
    }
    if !path.contains('.') {
        return None;
    }

    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
