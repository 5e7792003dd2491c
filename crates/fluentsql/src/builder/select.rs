//! SELECT builder.

use crate::builder::query::QueryBuilder;
use crate::builder::traits::{Statement, StatementKind};
use crate::condition::{Condition, JoinKind};
use crate::db::Db;
use serde_json::Value;

/// Builds `SELECT <cols> FROM <table> [JOIN] [WHERE] [GROUP BY] [ORDER BY] [LIMIT]`.
///
/// Any join makes the result rows come back grouped by table.
///
/// # Example
/// ```ignore
/// let rows = db
///     .select_from("users")
///     .where_("age", 30)
///     .order_by(&["name"], true)
///     .limit(10)
///     .exec()
///     .await?
///     .into_rows();
/// ```
#[derive(Clone, Debug)]
pub struct SelectBuilder {
    table: String,
    columns: Option<Vec<String>>,
    builder: QueryBuilder,
}

impl SelectBuilder {
    pub fn new(db: Db, table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: None,
            builder: QueryBuilder::new(db),
        }
    }

    /// Set the selected columns (default `*`).
    pub fn fields(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|s| s.to_string()).collect());
        self
    }

    // ==================== WHERE ====================

    /// Add WHERE: field = value
    pub fn where_(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.builder.add_condition(Condition::eq(field, value));
        self
    }

    /// Add WHERE: field <operator> value
    ///
    /// With `IN` the value is inserted verbatim and must already be an
    /// escaped, parenthesized list. Use [`SelectBuilder::where_in`] instead
    /// whenever the values come from outside.
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

    // ==================== JOIN ====================

    /// Add WHERE: field1 = field2 (implicit join over a comma-listed FROM).
    pub fn join(mut self, field1: &str, field2: &str) -> Self {
        self.builder.join(field1, field2);
        self
    }

    /// Add LEFT JOIN table ON field1 = field2
    pub fn left_join(mut self, table: &str, field1: &str, field2: &str) -> Self {
        self.builder.add_join(JoinKind::Left, table, field1, field2);
        self
    }

    /// Add INNER JOIN table ON field1 = field2
    pub fn inner_join(mut self, table: &str, field1: &str, field2: &str) -> Self {
        self.builder.add_join(JoinKind::Inner, table, field1, field2);
        self
    }

    // ==================== GROUP / ORDER / LIMIT ====================

    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.builder.group_by(fields);
        self
    }

    pub fn order_by(mut self, fields: &[&str], ascending: bool) -> Self {
        self.builder.order_by(fields, ascending);
        self
    }

    /// Limit the returned rows; `0` or less means no limit.
    pub fn limit(mut self, rows: i64) -> Self {
        self.builder.limit(rows);
        self
    }
}

impl Statement for SelectBuilder {
    const KIND: StatementKind = StatementKind::Select;

    fn sql(&self) -> String {
        let columns = self
            .columns
            .as_ref()
            .filter(|cols| !cols.is_empty())
            .map_or_else(|| "*".to_string(), |cols| cols.join(","));

        let mut sql = format!("SELECT {} FROM {}", columns, self.table);
        sql.push_str(&self.builder.join_segment());
        sql.push_str(&self.builder.where_segment());
        sql.push_str(&self.builder.group_by_segment());
        sql.push_str(&self.builder.order_by_segment());
        sql.push_str(&self.builder.limit_segment());
        sql
    }

    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn into_query_builder(self) -> QueryBuilder {
        self.builder
    }
}
