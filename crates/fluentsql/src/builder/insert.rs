//! INSERT ... SET builder.

use crate::builder::query::QueryBuilder;
use crate::builder::traits::{Statement, StatementKind};
use crate::db::Db;
use serde::Serialize;

/// Builds `INSERT INTO <table> SET k = v, ...`.
///
/// # Example
/// ```ignore
/// let user = db
///     .insert_into("users")
///     .set(&json!({"name": "John Doe", "age": 21}), &["age"])
///     .exec()
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct InsertBuilder {
    table: String,
    builder: QueryBuilder,
}

impl InsertBuilder {
    pub fn new(db: Db, table: &str) -> Self {
        Self {
            table: table.to_string(),
            builder: QueryBuilder::new(db),
        }
    }

    /// Use the fields of `obj` as column values, skipping `exclude`.
    pub fn set<T: Serialize + ?Sized>(mut self, obj: &T, exclude: &[&str]) -> Self {
        self.builder.set(obj, exclude);
        self
    }
}

impl Statement for InsertBuilder {
    const KIND: StatementKind = StatementKind::Insert;

    fn sql(&self) -> String {
        format!("INSERT INTO {}{}", self.table, self.builder.set_segment())
    }

    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn into_query_builder(self) -> QueryBuilder {
        self.builder
    }
}
