//! Round trips against a real MySQL server.
//!
//! Skipped unless `DATABASE_URL` points at a database the tests may create
//! tables in.

use fluentsql::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

fn database_url(test: &str) -> Option<String> {
    match std::env::var("DATABASE_URL") {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("{prefix}_{}_{}", std::process::id(), nanos)
}

#[tokio::test]
async fn insert_select_update_delete_roundtrip() -> DbResult<()> {
    let Some(url) = database_url("insert_select_update_delete_roundtrip") else {
        return Ok(());
    };
    let db = Db::from_url(&url);
    let users = unique_table("fluentsql_users");

    db.exec_sql(&format!(
        "CREATE TABLE {users} \
         (id BIGINT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(64) NOT NULL, age INT NULL)"
    ))
    .await?;

    let inserted = db
        .insert_into(&users)
        .set(&json!({"name": "alice", "age": 30, "scratch": true}), &["scratch"])
        .exec()
        .await?;
    let entity = inserted.entity().expect("insert returns the payload");
    assert_eq!(entity["name"], "alice");
    assert!(entity["id"].as_u64().is_some_and(|id| id > 0));

    let outcome = db
        .insert_multiple_rows_into(&users)
        .set(&["name", "age"], &[json!({"name": "bob", "age": 30}), json!({"name": "carol"})])
        .exec()
        .await?;
    assert_eq!(outcome.outcome().map(|o| o.affected_rows), Some(2));

    let rows = db
        .select_from(&users)
        .fields(&["name", "age"])
        .where_("age", 30)
        .order_by(&["name"], true)
        .exec()
        .await?
        .into_rows();
    let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);

    let updated = db
        .update(&users)
        .set(&json!({"age": 31}), &[])
        .where_("name", "alice")
        .exec()
        .await?;
    assert_eq!(updated.outcome().map(|o| o.affected_rows), Some(1));

    let deleted = db
        .delete_from(&users)
        .where_in("name", ["bob", "carol"])
        .exec()
        .await?;
    assert_eq!(deleted.outcome().map(|o| o.affected_rows), Some(2));

    let remaining = db
        .exec_sql_with(&format!("SELECT COUNT(*) AS n FROM {users} WHERE age = ?"), [31])
        .await?;
    assert_eq!(remaining.rows.len(), 1);

    db.exec_sql(&format!("DROP TABLE {users}")).await?;
    db.disconnect().await
}

#[tokio::test]
async fn joined_rows_are_nested_by_table() -> DbResult<()> {
    let Some(url) = database_url("joined_rows_are_nested_by_table") else {
        return Ok(());
    };
    let db = Db::from_url(&url);
    let users = unique_table("fluentsql_ju");
    let orders = unique_table("fluentsql_jo");

    db.exec_sql(&format!(
        "CREATE TABLE {users} (id BIGINT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(64))"
    ))
    .await?;
    db.exec_sql(&format!(
        "CREATE TABLE {orders} (id BIGINT AUTO_INCREMENT PRIMARY KEY, user_id BIGINT, total INT)"
    ))
    .await?;

    let user = db
        .insert_into(&users)
        .set(&json!({"name": "dave"}), &[])
        .exec()
        .await?;
    let user_id = user.entity().and_then(|u| u["id"].as_u64()).unwrap_or_default();
    db.insert_into(&orders)
        .set(&json!({"user_id": user_id, "total": 20}), &[])
        .exec()
        .await?;

    let out = db
        .select_from(&users)
        .left_join(&orders, &format!("{users}.id"), &format!("{orders}.user_id"))
        .exec()
        .await?;
    let outcome = out.outcome().expect("select returns an outcome");
    assert!(outcome.nested);
    let row = &outcome.rows[0];
    assert_eq!(row[users.as_str()]["name"], "dave");
    assert_eq!(row[orders.as_str()]["total"], 20);
    assert_eq!(row[users.as_str()]["id"], user_id);

    db.exec_sql(&format!("DROP TABLE {orders}")).await?;
    db.exec_sql(&format!("DROP TABLE {users}")).await?;
    db.disconnect().await
}

#[tokio::test]
async fn duplicate_key_is_a_unique_violation() -> DbResult<()> {
    let Some(url) = database_url("duplicate_key_is_a_unique_violation") else {
        return Ok(());
    };
    let db = Db::from_url(&url);
    let table = unique_table("fluentsql_uniq");

    db.exec_sql(&format!("CREATE TABLE {table} (code VARCHAR(16) PRIMARY KEY)"))
        .await?;
    db.insert_into(&table).set(&json!({"code": "a"}), &[]).exec().await?;
    let err = db
        .insert_into(&table)
        .set(&json!({"code": "a"}), &[])
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    db.exec_sql(&format!("DROP TABLE {table}")).await?;
    db.disconnect().await
}
