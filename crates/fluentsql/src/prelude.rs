//! Convenient imports for typical `fluentsql` usage.
//!
//! ```ignore
//! use fluentsql::prelude::*;
//! ```

pub use crate::{Db, DbConfig, DbError, DbResult, ExecOutput, QueryOutcome, Statement};
pub use serde_json::json;
