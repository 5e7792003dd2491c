//! Statement results.
//!
//! Driver rows are mapped to JSON objects. When a statement registered a join
//! the columns are grouped by their source table (`{"users": {...},
//! "orders": {...}}`) so that equally named columns do not clobber each other.

use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::ColumnType;
use mysql_async::{Row, Value as SqlValue};
use serde_json::{Map, Value};

/// A mapped result row.
pub type JsonRow = Map<String, Value>;

/// What the driver reported for one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Result rows (empty for statements without a result set).
    pub rows: Vec<JsonRow>,
    /// Rows changed by the statement.
    pub affected_rows: u64,
    /// Generated AUTO_INCREMENT id, if the statement produced one.
    pub last_insert_id: Option<u64>,
    /// Whether `rows` are grouped by table.
    pub nested: bool,
}

/// Result of executing a built statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutput {
    /// The INSERT payload, with the generated `id` attached when available.
    Entity(JsonRow),
    /// The raw driver outcome.
    Outcome(QueryOutcome),
}

impl ExecOutput {
    /// The inserted payload, if this is an INSERT result.
    pub fn entity(&self) -> Option<&JsonRow> {
        match self {
            ExecOutput::Entity(obj) => Some(obj),
            ExecOutput::Outcome(_) => None,
        }
    }

    /// The driver outcome, if this is not an INSERT-with-payload result.
    pub fn outcome(&self) -> Option<&QueryOutcome> {
        match self {
            ExecOutput::Entity(_) => None,
            ExecOutput::Outcome(outcome) => Some(outcome),
        }
    }

    /// Result rows; empty for INSERT payloads.
    pub fn into_rows(self) -> Vec<JsonRow> {
        match self {
            ExecOutput::Entity(_) => Vec::new(),
            ExecOutput::Outcome(outcome) => outcome.rows,
        }
    }
}

/// Set `id` on an inserted payload when the server generated one.
pub(crate) fn attach_insert_id(mut payload: JsonRow, last_insert_id: Option<u64>) -> JsonRow {
    if let Some(id) = last_insert_id.filter(|id| *id != 0) {
        payload.insert("id".to_string(), Value::from(id));
    }
    payload
}

/// Map `(table, column, value)` cells into one row object.
pub(crate) fn map_cells<'a, I>(cells: I, nest: bool) -> JsonRow
where
    I: IntoIterator<Item = (&'a str, &'a str, Value)>,
{
    let mut row = Map::new();
    for (table, column, value) in cells {
        if !nest {
            row.insert(column.to_string(), value);
            continue;
        }
        let entry = row
            .entry(table.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(group) = entry {
            group.insert(column.to_string(), value);
        }
    }
    row
}

/// Map one driver row.
pub(crate) fn map_row(row: &Row, nest: bool) -> JsonRow {
    let columns = row.columns_ref();
    let names: Vec<(String, String)> = columns
        .iter()
        .map(|c| (c.table_str().into_owned(), c.name_str().into_owned()))
        .collect();
    let cells = names.iter().enumerate().map(|(i, (table, column))| {
        let value = row
            .as_ref(i)
            .map_or(Value::Null, |v| decode_cell(columns[i].column_type(), v));
        (table.as_str(), column.as_str(), value)
    });
    map_cells(cells, nest)
}

/// Convert one cell using its column type.
///
/// Text-protocol results carry every cell as bytes, so numeric columns are
/// parsed back into numbers and DATE/DATETIME/TIMESTAMP cells are rendered
/// the same way for both protocols. DECIMAL stays a string to keep its
/// precision. Cells that do not parse are returned as text.
pub fn decode_cell(column_type: ColumnType, value: &SqlValue) -> Value {
    match (column_type, value) {
        (
            ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE,
            SqlValue::Date(year, month, day, ..),
        ) => NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
            .map_or(Value::Null, |date| {
                Value::String(date.format(DATE_FORMAT).to_string())
            }),
        (_, SqlValue::Bytes(bytes)) => {
            let text = String::from_utf8_lossy(bytes);
            parse_text_cell(column_type, &text)
                .unwrap_or_else(|| Value::String(text.into_owned()))
        }
        (_, other) => to_json_value(other),
    }
}

fn parse_text_cell(column_type: ColumnType, text: &str) -> Option<Value> {
    use ColumnType::*;
    match column_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => text
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| text.parse::<u64>().map(Value::from))
            .ok(),
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(|date| Value::String(date.format(DATE_FORMAT).to_string())),
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .ok()
            .map(|dt| Value::String(dt.format(DATETIME_FORMAT).to_string())),
        _ => None,
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Convert a driver value into JSON without column information.
pub fn to_json_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::NULL => Value::Null,
        SqlValue::Int(i) => Value::from(*i),
        SqlValue::UInt(u) => Value::from(*u),
        SqlValue::Float(f) => Value::from(f64::from(*f)),
        SqlValue::Double(d) => Value::from(*d),
        SqlValue::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        SqlValue::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|d| {
                    d.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or(Value::Null, |dt| {
                    Value::String(dt.format(DATETIME_FORMAT).to_string())
                })
        }
        SqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
            if *micros > 0 {
                text.push_str(&format!(".{micros:06}"));
            }
            Value::String(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_rows_key_by_column() {
        let row = map_cells(
            [
                ("users", "id", json!(1)),
                ("users", "name", json!("ann")),
            ],
            false,
        );
        assert_eq!(Value::Object(row), json!({"id": 1, "name": "ann"}));
    }

    #[test]
    fn nested_rows_group_by_table() {
        let row = map_cells(
            [
                ("users", "id", json!(1)),
                ("orders", "id", json!(7)),
                ("orders", "total", json!(20)),
                ("", "n", json!(3)),
            ],
            true,
        );
        assert_eq!(
            Value::Object(row),
            json!({
                "users": {"id": 1},
                "orders": {"id": 7, "total": 20},
                "": {"n": 3}
            })
        );
    }

    #[test]
    fn insert_id_is_attached_only_when_generated() {
        let payload = json!({"name": "ann"}).as_object().cloned().unwrap_or_default();

        let with_id = attach_insert_id(payload.clone(), Some(42));
        assert_eq!(Value::Object(with_id), json!({"name": "ann", "id": 42}));

        let zero = attach_insert_id(payload.clone(), Some(0));
        assert_eq!(Value::Object(zero), json!({"name": "ann"}));

        let none = attach_insert_id(payload, None);
        assert!(!none.contains_key("id"));
    }

    #[test]
    fn driver_values_to_json() {
        assert_eq!(to_json_value(&SqlValue::NULL), Value::Null);
        assert_eq!(to_json_value(&SqlValue::Int(-3)), json!(-3));
        assert_eq!(to_json_value(&SqlValue::Bytes(b"hi".to_vec())), json!("hi"));
        assert_eq!(
            to_json_value(&SqlValue::Date(2024, 2, 29, 13, 5, 9, 0)),
            json!("2024-02-29 13:05:09")
        );
        assert_eq!(
            to_json_value(&SqlValue::Time(true, 1, 2, 3, 4, 0)),
            json!("-26:03:04")
        );
    }

    #[test]
    fn text_cells_are_decoded_by_column_type() {
        let bytes = |s: &str| SqlValue::Bytes(s.as_bytes().to_vec());
        assert_eq!(decode_cell(ColumnType::MYSQL_TYPE_LONG, &bytes("30")), json!(30));
        assert_eq!(decode_cell(ColumnType::MYSQL_TYPE_TINY, &bytes("-1")), json!(-1));
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_LONGLONG, &bytes("18446744073709551615")),
            json!(u64::MAX)
        );
        assert_eq!(decode_cell(ColumnType::MYSQL_TYPE_DOUBLE, &bytes("2.5")), json!(2.5));
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_NEWDECIMAL, &bytes("10.50")),
            json!("10.50")
        );
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_VAR_STRING, &bytes("30")),
            json!("30")
        );
    }

    #[test]
    fn temporal_cells_match_across_protocols() {
        let text = SqlValue::Bytes(b"2024-02-29 13:05:09".to_vec());
        let binary = SqlValue::Date(2024, 2, 29, 13, 5, 9, 0);
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_DATETIME, &text),
            decode_cell(ColumnType::MYSQL_TYPE_DATETIME, &binary)
        );
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_DATE, &SqlValue::Bytes(b"2024-02-29".to_vec())),
            json!("2024-02-29")
        );
        assert_eq!(
            decode_cell(ColumnType::MYSQL_TYPE_DATE, &SqlValue::Date(2024, 2, 29, 0, 0, 0, 0)),
            json!("2024-02-29")
        );
        // Zero dates are left as sent.
        assert_eq!(
            decode_cell(
                ColumnType::MYSQL_TYPE_DATETIME,
                &SqlValue::Bytes(b"0000-00-00 00:00:00".to_vec())
            ),
            json!("0000-00-00 00:00:00")
        );
        assert_eq!(decode_cell(ColumnType::MYSQL_TYPE_LONG, &SqlValue::NULL), Value::Null);
    }

    #[test]
    fn exec_output_accessors() {
        let out = ExecOutput::Outcome(QueryOutcome {
            rows: vec![Map::new()],
            affected_rows: 0,
            last_insert_id: None,
            nested: false,
        });
        assert!(out.entity().is_none());
        assert_eq!(out.outcome().map(|o| o.rows.len()), Some(1));
        assert_eq!(out.into_rows().len(), 1);
    }
}
