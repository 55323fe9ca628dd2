//! Extra data attached to a single log entry
//!
//! Console and file output ignore it; the Sentry sink sends each field as
//! part of the event's `extra` object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named JSON values, kept in key order
///
/// ```
/// use logger_preset::LogContext;
///
/// let ctx = LogContext::new().with_field("user_id", 42).with_field("retry", true);
/// assert_eq!(ctx.get("user_id"), Some(&serde_json::json!(42)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: BTreeMap<String, Value>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under `key`.
    /// Non-finite floats are stored as `null`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LogContext
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_replace_by_key() {
        let ctx = LogContext::new()
            .with_field("attempt", 1)
            .with_field("attempt", 2)
            .with_field("host", "db-1");

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("attempt"), Some(&json!(2)));
        assert!(ctx.get("missing").is_none());
    }

    #[test]
    fn test_non_finite_float_is_null() {
        let ctx = LogContext::new().with_field("ratio", f64::NAN);
        assert_eq!(ctx.get("ratio"), Some(&Value::Null));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let ctx: LogContext = [("b", json!(2)), ("a", json!("x"))].into_iter().collect();
        assert_eq!(serde_json::to_string(&ctx).unwrap(), r#"{"a":"x","b":2}"#);
        assert!(LogContext::new().is_empty());
    }
}
