//! UPDATE builder.

use crate::builder::query::QueryBuilder;
use crate::builder::traits::{Statement, StatementKind};
use crate::condition::Condition;
use crate::db::Db;
use serde::Serialize;
use serde_json::Value;

/// Builds `UPDATE <table> SET ... WHERE ...`.
#[derive(Clone, Debug)]
pub struct UpdateBuilder {
    table: String,
    builder: QueryBuilder,
}

impl UpdateBuilder {
    pub fn new(db: Db, table: &str) -> Self {
        Self {
            table: table.to_string(),
            builder: QueryBuilder::new(db),
        }
    }

    /// Use the fields of `obj` as the new column values, skipping `exclude`.
    pub fn set<T: Serialize + ?Sized>(mut self, obj: &T, exclude: &[&str]) -> Self {
        self.builder.set(obj, exclude);
        self
    }

    /// Add WHERE: field = value
    pub fn where_(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.builder.add_condition(Condition::eq(field, value));
        self
    }

    /// Add WHERE: field <operator> value (raw value for `IN`)
    pub fn where_op(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.builder.add_condition(Condition::new(field, operator, value));
        self
    }

    /// Add WHERE: field IN (values...)
    pub fn where_in<T: Into<Value>>(
        mut self,
        field: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.builder.add_condition(Condition::in_list(field, values));
        self
    }
}

impl Statement for UpdateBuilder {
    const KIND: StatementKind = StatementKind::Update;

    fn sql(&self) -> String {
        format!(
            "UPDATE {}{}{}",
            self.table,
            self.builder.set_segment(),
            self.builder.where_segment()
        )
    }

    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn into_query_builder(self) -> QueryBuilder {
        self.builder
    }
}
