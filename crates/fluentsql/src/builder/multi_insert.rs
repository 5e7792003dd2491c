//! Multi-row INSERT builder.

use crate::builder::query::QueryBuilder;
use crate::builder::traits::{Statement, StatementKind};
use crate::db::Db;
use crate::error::{DbError, DbResult};
use crate::result::JsonRow;
use serde::Serialize;
use serde_json::Value;

/// Builds `INSERT INTO <table>(c1,c2) VALUES (..),(..)`.
///
/// Every row is rendered against the column list. A row that lacks a column,
/// or holds a falsy value for it (`null`, `false`, `0`, `""`), gets `NULL`.
#[derive(Clone, Debug)]
pub struct MultiInsertBuilder {
    table: String,
    columns: Vec<String>,
    rows: Vec<JsonRow>,
    builder: QueryBuilder,
}

impl MultiInsertBuilder {
    pub fn new(db: Db, table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
            builder: QueryBuilder::new(db),
        }
    }

    /// Set the column list and the rows to insert.
    pub fn set<T: Serialize>(mut self, columns: &[&str], rows: &[T]) -> Self {
        self.columns = columns.iter().map(|s| s.to_string()).collect();
        self.rows.clear();
        for (index, row) in rows.iter().enumerate() {
            match serde_json::to_value(row) {
                Ok(Value::Object(map)) => self.rows.push(map),
                Ok(other) => self
                    .builder
                    .fail(format!("row {index} must serialize to an object, got {other}")),
                Err(err) => self.builder.fail(format!("row {index}: {err}")),
            }
        }
        self
    }

    fn render_row(&self, row: &JsonRow) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let value = row.get(column).filter(|v| !is_falsy(v)).unwrap_or(&Value::Null);
                self.builder.escape(value)
            })
            .collect();
        format!("({})", cells.join(","))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl Statement for MultiInsertBuilder {
    const KIND: StatementKind = StatementKind::InsertMultiple;

    fn sql(&self) -> String {
        let rows: Vec<String> = self.rows.iter().map(|row| self.render_row(row)).collect();
        format!(
            "INSERT INTO {}({}) VALUES {}",
            self.table,
            self.columns.join(","),
            rows.join(",")
        )
    }

    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn into_query_builder(self) -> QueryBuilder {
        self.builder
    }

    fn validate(&self) -> DbResult<()> {
        self.builder.validate()?;
        if self.columns.is_empty() || self.rows.is_empty() {
            return Err(DbError::Other(format!(
                "INSERT INTO {} needs at least one column and one row",
                self.table
            )));
        }
        Ok(())
    }
}
