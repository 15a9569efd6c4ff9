//! Response envelope used by every insights endpoint
//!
//! Endpoints answer with a JSON object carrying a `status` discriminator next
//! to the tab-specific fields:
//!
//! ```json
//! {"status": "success", "total_concepts": 18, "top_concepts": [...]}
//! ```
//!
//! Only `status == "success"` yields a [`TabPayload`]; any other status, a
//! missing status, or a non-object body is a failure.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Status value that marks a usable response.
pub const STATUS_SUCCESS: &str = "success";

/// Placeholder reported when the body had no string `status` field.
pub const STATUS_MISSING: &str = "<missing>";

/// Decoded `{status, ...fields}` object.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: String,
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Split an already-decoded JSON value into status and fields.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::envelope(STATUS_MISSING));
        };

        let status = match fields.remove("status") {
            Some(Value::String(status)) => status,
            _ => return Err(Error::envelope(STATUS_MISSING)),
        };

        Ok(Self { status, fields })
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Accept the envelope, yielding its payload only on success.
    pub fn into_payload(self) -> Result<TabPayload> {
        if self.is_success() {
            Ok(TabPayload::new(self.fields))
        } else {
            Err(Error::envelope(self.status))
        }
    }
}

/// Tab-specific fields of a successful response.
///
/// The shape differs per endpoint, so the payload stays an opaque JSON map
/// and the view looks fields up by path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabPayload {
    fields: Map<String, Value>,
}

impl TabPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a dotted path such as `"stats.total"` or `"agents.0.name"`.
    ///
    /// Numeric segments index into arrays.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Render a JSON value as a short display string.
///
/// Strings lose their quotes, floats are limited to two decimals, and
/// containers are summarised by size.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                let formatted = format!("{f:.2}");
                formatted
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string()
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(map) => format!("{} fields", map.len()),
    }
}
