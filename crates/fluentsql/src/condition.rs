//! WHERE and JOIN predicates.
//!
//! A [`Condition`] renders one `field operator value` predicate; a
//! [`JoinCondition`] renders one `LEFT JOIN` / `INNER JOIN` clause.

use crate::escape::Escaper;
use serde_json::Value;
use std::fmt;

/// One predicate of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    operator: String,
    value: Value,
    escape: bool,
}

impl Condition {
    /// `field = value`, value escaped.
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, "=", value)
    }

    /// `field <operator> value`.
    ///
    /// The value is escaped unless the operator is `IN` (any case): in that
    /// case the caller must supply an already escaped, parenthesized list
    /// such as `"(1, 2, 3)"`. Prefer [`Condition::in_list`].
    pub fn new(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        let operator = if operator.is_empty() { "=" } else { operator };
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.into(),
            escape: !operator.eq_ignore_ascii_case("IN"),
        }
    }

    /// `field IN (v1, v2, ...)` with every element escaped.
    pub fn in_list<T: Into<Value>>(field: &str, values: impl IntoIterator<Item = T>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self {
            field: field.to_string(),
            operator: "IN".to_string(),
            value: Value::Array(values),
            escape: true,
        }
    }

    /// `field1 = field2` between two columns (implicit join), never escaped.
    pub fn columns_eq(field1: &str, field2: &str) -> Self {
        Self {
            field: field1.to_string(),
            operator: "=".to_string(),
            value: Value::String(field2.to_string()),
            escape: false,
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Whether the value goes through the escaper.
    pub fn escapes_value(&self) -> bool {
        self.escape
    }

    /// Render the predicate.
    pub fn render(&self, escaper: &Escaper) -> String {
        let value = match (&self.value, self.escape) {
            (Value::Array(items), true) if items.is_empty() => "(NULL)".to_string(),
            (Value::Array(_), true) => format!("({})", escaper.escape(&self.value)),
            (_, true) => escaper.escape(&self.value),
            (Value::String(raw), false) => raw.clone(),
            (other, false) => other.to_string(),
        };
        format!("{} {} {}", self.field, self.operator, value)
    }
}

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => f.write_str("INNER"),
            JoinKind::Left => f.write_str("LEFT"),
        }
    }
}

/// `<INNER|LEFT> JOIN table ON field1 = field2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub kind: JoinKind,
    pub table: String,
    pub field1: String,
    pub field2: String,
}

impl JoinCondition {
    pub fn new(kind: JoinKind, table: &str, field1: &str, field2: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            field1: field1.to_string(),
            field2: field2.to_string(),
        }
    }
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {} = {}",
            self.kind, self.table, self.field1, self.field2
        )
    }
}
