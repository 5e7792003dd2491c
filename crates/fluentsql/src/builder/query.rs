//! Segment builder shared by every statement type.
//!
//! [`QueryBuilder`] only accumulates state. Each `*_segment` method renders one
//! clause on demand; it does not know which statement it belongs to, so the
//! per-statement builders decide which segments to concatenate.

use crate::builder::traits::StatementKind;
use crate::condition::{Condition, JoinCondition, JoinKind};
use crate::db::Db;
use crate::error::{DbError, DbResult};
use crate::escape::Escaper;
use crate::result::{ExecOutput, JsonRow, QueryOutcome, attach_insert_id};
use serde::Serialize;
use serde_json::Value;

/// Pending SET payload.
#[derive(Debug, Clone, Default)]
struct SetValues {
    object: Option<JsonRow>,
    exclude: Vec<String>,
}

/// Builds statement segments and executes the finished statement.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    db: Db,
    nest_tables: bool,
    values: SetValues,
    conditions: Vec<Condition>,
    joins: Vec<JoinCondition>,
    group_fields: Vec<String>,
    order_fields: Vec<String>,
    order_asc: bool,
    limit_rows: i64,
    build_error: Option<String>,
}

impl QueryBuilder {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            nest_tables: false,
            values: SetValues::default(),
            conditions: Vec::new(),
            joins: Vec::new(),
            group_fields: Vec::new(),
            order_fields: Vec::new(),
            order_asc: true,
            limit_rows: 0,
            build_error: None,
        }
    }

    pub fn escaper(&self) -> Escaper {
        self.db.escaper()
    }

    /// Delegates to the driver's escaping.
    pub fn escape(&self, value: &Value) -> String {
        self.escaper().escape(value)
    }

    /// Whether result rows should be grouped by table.
    pub fn nest_tables(&self) -> bool {
        self.nest_tables
    }

    // ==================== state ====================

    /// Store the SET payload; `exclude` names keys to leave out.
    ///
    /// `obj` must serialize to a JSON object. Anything else is recorded and
    /// reported by [`QueryBuilder::validate`].
    pub fn set<T: Serialize + ?Sized>(&mut self, obj: &T, exclude: &[&str]) {
        match serde_json::to_value(obj) {
            Ok(Value::Object(map)) => self.values.object = Some(map),
            Ok(other) => self.fail(format!(
                "SET payload must serialize to an object, got {other}"
            )),
            Err(err) => self.fail(err.to_string()),
        }
        self.values.exclude = exclude.iter().map(|s| s.to_string()).collect();
    }

    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// `field1 = field2` as a WHERE predicate.
    pub fn join(&mut self, field1: &str, field2: &str) {
        self.conditions.push(Condition::columns_eq(field1, field2));
        self.nest_tables = true;
    }

    pub fn add_join(&mut self, kind: JoinKind, table: &str, field1: &str, field2: &str) {
        self.joins.push(JoinCondition::new(kind, table, field1, field2));
        self.nest_tables = true;
    }

    pub fn group_by(&mut self, fields: &[&str]) {
        self.group_fields = fields.iter().map(|s| s.to_string()).collect();
    }

    pub fn order_by(&mut self, fields: &[&str], ascending: bool) {
        self.order_fields = fields.iter().map(|s| s.to_string()).collect();
        self.order_asc = ascending;
    }

    pub fn limit(&mut self, rows: i64) {
        self.limit_rows = rows;
    }

    /// Record an error to be reported at execution time. The first one wins.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if self.build_error.is_none() {
            self.build_error = Some(message.into());
        }
    }

    pub fn validate(&self) -> DbResult<()> {
        match &self.build_error {
            Some(message) => Err(DbError::serialization(message.clone())),
            None => Ok(()),
        }
    }

    // ==================== segments ====================

    /// `" SET k1 = v1, k2 = v2"`, or `" () VALUES ()"` when nothing is left.
    pub fn set_segment(&self) -> String {
        let escaper = self.escaper();
        let pairs: Vec<String> = self
            .values
            .object
            .iter()
            .flatten()
            .filter(|(key, _)| !self.values.exclude.iter().any(|e| e == *key))
            .map(|(key, value)| format!("{} = {}", key, escaper.escape(value)))
            .collect();

        if pairs.is_empty() {
            " () VALUES ()".to_string()
        } else {
            format!(" SET {}", pairs.join(", "))
        }
    }

    /// `" WHERE c1 AND c2"`, empty without conditions.
    pub fn where_segment(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let escaper = self.escaper();
        let rendered: Vec<String> = self.conditions.iter().map(|c| c.render(&escaper)).collect();
        format!(" WHERE {}", rendered.join(" AND "))
    }

    /// `" LEFT JOIN t ON a = b INNER JOIN ..."`, empty without joins.
    pub fn join_segment(&self) -> String {
        self.joins.iter().map(|j| format!(" {j}")).collect()
    }

    pub fn group_by_segment(&self) -> String {
        fields_segment(" GROUP BY ", &self.group_fields)
    }

    pub fn order_by_segment(&self) -> String {
        let statement = fields_segment(" ORDER BY ", &self.order_fields);
        if statement.is_empty() {
            return statement;
        }
        let direction = if self.order_asc { " ASC" } else { " DESC" };
        statement + direction
    }

    pub fn limit_segment(&self) -> String {
        if self.limit_rows > 0 {
            format!(" LIMIT {}", self.limit_rows)
        } else {
            String::new()
        }
    }

    // ==================== execution ====================

    /// Run `sql` on a pooled connection.
    ///
    /// INSERTs that carry a payload resolve to that payload with the generated
    /// `id` attached; everything else resolves to the driver outcome.
    pub async fn exec(self, kind: StatementKind, sql: String) -> DbResult<ExecOutput> {
        self.validate()?;

        let nest = self.result_nesting(kind);
        let outcome = self.db.run(kind, &sql, nest).await?;
        Ok(shape_output(kind, self.values.object, outcome))
    }

    /// Whether rows of a `kind` statement come back grouped by table.
    /// INSERTs never nest.
    pub(crate) fn result_nesting(&self, kind: StatementKind) -> bool {
        self.nest_tables && !kind.is_insert()
    }
}

/// Turn a driver outcome into what `exec` resolves to.
pub(crate) fn shape_output(
    kind: StatementKind,
    payload: Option<JsonRow>,
    outcome: QueryOutcome,
) -> ExecOutput {
    match (kind, payload) {
        (StatementKind::Insert, Some(payload)) => {
            ExecOutput::Entity(attach_insert_id(payload, outcome.last_insert_id))
        }
        _ => ExecOutput::Outcome(outcome),
    }
}

fn fields_segment(keyword: &str, fields: &[String]) -> String {
    if fields.is_empty() {
        String::new()
    } else {
        format!("{keyword}{}", fields.join(", "))
    }
}
