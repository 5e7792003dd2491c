//! Value escaping.
//!
//! Values travel through the builders as `serde_json::Value` and are turned
//! into SQL literals by the driver's own escape routine
//! ([`mysql_async::Value::as_sql`]).

use mysql_async::Value as SqlValue;
use serde_json::Value;

/// Escapes JSON values into MySQL literals.
///
/// Arrays render as a comma separated list of escaped elements (usable inside
/// `IN (...)`), nested arrays as parenthesized groups. Objects are stored as
/// their JSON text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Escaper {
    no_backslash_escapes: bool,
}

impl Escaper {
    /// Escaper for a server running in the default SQL mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Escaper for a server with `NO_BACKSLASH_ESCAPES` in its SQL mode.
    pub fn no_backslash_escapes(mut self, enabled: bool) -> Self {
        self.no_backslash_escapes = enabled;
        self
    }

    /// Escape a single value.
    pub fn escape(&self, value: &Value) -> String {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) => format!("({})", self.escape(item)),
                    _ => self.escape(item),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => to_sql_value(other).as_sql(self.no_backslash_escapes),
        }
    }
}

/// Convert a JSON value into the driver's value type.
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::NULL,
        Value::Bool(b) => SqlValue::Int(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                SqlValue::UInt(u)
            } else {
                n.as_f64().map_or(SqlValue::NULL, SqlValue::Double)
            }
        }
        Value::String(s) => SqlValue::Bytes(s.as_bytes().to_vec()),
        Value::Array(_) | Value::Object(_) => SqlValue::Bytes(value.to_string().into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        let e = Escaper::new();
        assert_eq!(e.escape(&json!(null)), "NULL");
        assert_eq!(e.escape(&json!(30)), "30");
        assert_eq!(e.escape(&json!(-7)), "-7");
        assert_eq!(e.escape(&json!(true)), "1");
        assert_eq!(e.escape(&json!("alice")), "'alice'");
    }

    #[test]
    fn quotes_are_escaped() {
        let e = Escaper::new();
        assert_eq!(e.escape(&json!("O'Brien")), r"'O\'Brien'");

        let e = Escaper::new().no_backslash_escapes(true);
        assert_eq!(e.escape(&json!("O'Brien")), "'O''Brien'");
    }

    #[test]
    fn arrays_render_as_lists() {
        let e = Escaper::new();
        assert_eq!(e.escape(&json!([1, "a", null])), "1, 'a', NULL");
        assert_eq!(e.escape(&json!([[1, 2], [3, 4]])), "(1, 2), (3, 4)");
    }

    #[test]
    fn objects_are_stored_as_json_text() {
        let e = Escaper::new();
        let escaped = e.escape(&json!({"k": 1}));
        assert!(escaped.starts_with("'{"));
        assert!(escaped.ends_with("}'"));
    }
}
