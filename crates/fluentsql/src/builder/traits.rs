//! Trait shared by the per-statement builders.

use crate::builder::query::QueryBuilder;
use crate::error::DbResult;
use crate::result::ExecOutput;
use std::fmt;

/// The kind of statement a builder produces.
///
/// Carried explicitly so execution never has to sniff the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    InsertMultiple,
    Update,
    Select,
    Delete,
}

impl StatementKind {
    /// INSERT results are post-processed to attach the generated id.
    pub fn is_insert(self) -> bool {
        matches!(self, Self::Insert | Self::InsertMultiple)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::InsertMultiple => "insert_multiple",
            Self::Update => "update",
            Self::Select => "select",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Base trait for all statement builders.
///
/// Provides SQL rendering and execution through the owning [`Db`](crate::Db).
pub trait Statement: Sized + Send {
    /// The statement kind this builder produces.
    const KIND: StatementKind;

    /// Render the complete statement.
    fn sql(&self) -> String;

    /// The shared segment builder.
    fn query_builder(&self) -> &QueryBuilder;

    /// Give up the builder for execution.
    fn into_query_builder(self) -> QueryBuilder;

    /// Validate builder state before execution.
    fn validate(&self) -> DbResult<()> {
        self.query_builder().validate()
    }

    /// Execute the statement on a pooled connection.
    ///
    /// The connection is returned to the pool before the future resolves,
    /// whether the statement succeeded or not.
    fn exec(self) -> impl std::future::Future<Output = DbResult<ExecOutput>> + Send {
        let checked = self.validate();
        let sql = self.sql();
        let builder = self.into_query_builder();
        async move {
            checked?;
            builder.exec(Self::KIND, sql).await
        }
    }
}
