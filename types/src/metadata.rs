//! Caller-supplied record metadata.
//!
//! Metadata is a schema-less JSON object read once from the source and
//! passed through to the provider and the audit log without interpretation.
//! Key order and number literals survive as written (`serde_json` is built
//! with `preserve_order` and `arbitrary_precision`).

use crate::error::KycError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque key/value metadata attached to a verification record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Empty metadata (`{}`).
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Parse metadata from its serialized form.
    ///
    /// Only a JSON object is accepted; scalars, arrays and anything that is
    /// not valid JSON are rejected.
    pub fn parse(raw: &str) -> Result<Self, KycError> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| KycError::InvalidMetadata(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(KycError::InvalidMetadata(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Compact JSON rendering, as written to the `Metadata` audit column.
impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
