//! Fluent statement builders.
//!
//! Each per-statement builder wraps one [`QueryBuilder`] and decides which of
//! its segments make up the statement:
//!
//! | statement | segments |
//! |-----------|----------|
//! | INSERT    | set |
//! | UPDATE    | set, where |
//! | SELECT    | join, where, group by, order by, limit |
//! | DELETE    | where |
//!
//! Multi-row INSERT renders its own `VALUES` list.

mod delete;
mod insert;
mod multi_insert;
mod query;
mod select;
mod traits;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use multi_insert::MultiInsertBuilder;
pub use query::QueryBuilder;
pub use select::SelectBuilder;
pub use traits::{Statement, StatementKind};
pub use update::UpdateBuilder;
