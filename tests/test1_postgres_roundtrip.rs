#![cfg(feature = "test-utils")]

use pg_lifeline::prelude::*;
use pg_lifeline::test_utils::{setup_postgres_embedded, stop_postgres_embedded};

fn base_options(dbname: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new();
    options.dbname = Some(dbname.to_string());
    options.host = Some("localhost".to_string());
    options.user = Some("test_user".to_string());
    options.password = Some("test_password".to_string());
    options.log_level = Some("debug".to_string());
    options
}

#[test]
fn test1_insert_select_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();
    let postgres = setup_postgres_embedded(&base_options("test1_db"))?;
    let mut db = LifelineClient::connect(&postgres.options)?;

    db.query_rows("CREATE TABLE users (id serial PRIMARY KEY, name text, age int)")?;

    // RETURNING list: only the first row comes back
    let outcome = db.insert(
        "users",
        &[
            ("name", SqlValue::Text("Ann".into())),
            ("age", SqlValue::Int(30)),
        ],
        Some("id"),
    )?;
    assert_eq!(outcome, InsertOutcome::Returned(vec![SqlValue::Int(1)]));

    let fetched = db.query_rows("SELECT name FROM users WHERE id=1")?;
    assert_eq!(
        fetched,
        QueryOutcome::Rows(vec![vec![SqlValue::Text("Ann".into())]])
    );

    // no RETURNING list: affected count
    let outcome = db.insert(
        "users",
        &[
            ("name", SqlValue::Text("Bea".into())),
            ("age", SqlValue::Int(31)),
        ],
        None,
    )?;
    assert_eq!(outcome, InsertOutcome::Affected(1));

    // dollar-quoting survives embedded single quotes
    db.insert("users", &[("name", SqlValue::Text("O'Hara".into()))], None)?;
    let fetched = db.query_rows("SELECT name FROM users WHERE id=3")?;
    assert_eq!(
        fetched,
        QueryOutcome::Rows(vec![vec![SqlValue::Text("O'Hara".into())]])
    );

    stop_postgres_embedded(postgres);
    Ok(())
}

#[test]
fn test1_row_and_mapped_shapes_agree() -> Result<(), Box<dyn std::error::Error>> {
    let postgres = setup_postgres_embedded(&base_options("test1_db"))?;
    let mut db = LifelineClient::connect(&postgres.options)?;

    db.query_rows("CREATE TABLE pets (id serial PRIMARY KEY, name text, good boolean)")?;
    db.insert(
        "pets",
        &[
            ("name", SqlValue::Text("Rex".into())),
            ("good", SqlValue::Bool(true)),
        ],
        None,
    )?;
    db.insert(
        "pets",
        &[("name", SqlValue::Text("Mog".into())), ("good", SqlValue::Null)],
        None,
    )?;

    let select = "SELECT id, name, good FROM pets ORDER BY id";
    let positional = db.query_rows(select)?.rows().unwrap();
    let named = db.query_mapped(select)?.rows().unwrap();

    assert_eq!(positional.len(), named.len());
    for (tuple, row) in positional.iter().zip(&named) {
        assert_eq!(row.column_names(), &["id", "name", "good"]);
        for (idx, value) in tuple.iter().enumerate() {
            assert_eq!(row.get_by_index(idx), Some(value));
        }
    }
    assert_eq!(named[0].get("good"), Some(&SqlValue::Bool(true)));
    assert_eq!(named[1].get("good"), Some(&SqlValue::Null));

    stop_postgres_embedded(postgres);
    Ok(())
}

#[test]
fn test1_text_alone_decides_the_result_shape() -> Result<(), Box<dyn std::error::Error>> {
    let postgres = setup_postgres_embedded(&base_options("test1_db"))?;
    let mut db = LifelineClient::connect(&postgres.options)?;

    db.query_rows("CREATE TABLE t (a int)")?;

    // SELECT with zero matches is still row-shaped
    let fetched = db.query_rows("SELECT a FROM t")?;
    assert_eq!(fetched, QueryOutcome::Rows(vec![]));

    // RETURNING anywhere is row-shaped
    let fetched = db.query_rows("INSERT INTO t (a) VALUES (1) RETURNING a")?;
    assert_eq!(fetched, QueryOutcome::Rows(vec![vec![SqlValue::Int(1)]]));

    // anything else reports the server's affected count
    let outcome = db.query_rows("UPDATE t SET a = 2 WHERE a = 1")?;
    assert_eq!(outcome, QueryOutcome::Affected(1));
    let outcome = db.query_rows("DELETE FROM t WHERE a = 99")?;
    assert_eq!(outcome, QueryOutcome::Affected(0));

    // the parameterized path shapes identically
    let fetched = db.execute("SELECT a FROM t WHERE a = $1", &[SqlValue::Int(2)])?;
    assert_eq!(fetched, QueryOutcome::Rows(vec![vec![SqlValue::Int(2)]]));
    let outcome = db.execute("DELETE FROM t WHERE a = $1", &[SqlValue::Int(2)])?;
    assert_eq!(outcome, QueryOutcome::Affected(1));

    stop_postgres_embedded(postgres);
    Ok(())
}

#[test]
fn test1_update_builder_counts_and_rejects() -> Result<(), Box<dyn std::error::Error>> {
    let postgres = setup_postgres_embedded(&base_options("test1_db"))?;
    let mut db = LifelineClient::connect(&postgres.options)?;

    db.query_rows("CREATE TABLE users (id serial PRIMARY KEY, name text, age int)")?;
    db.insert(
        "users",
        &[
            ("name", SqlValue::Text("Ann".into())),
            ("age", SqlValue::Int(30)),
        ],
        None,
    )?;

    let affected = db.update(
        "users",
        &[
            ("name", SqlValue::Text("Bea".into())),
            ("age", SqlValue::Int(31)),
        ],
        "id=1",
    )?;
    assert_eq!(affected, 1);
    let fetched = db.query_rows("SELECT name, age FROM users WHERE id=1")?;
    assert_eq!(
        fetched,
        QueryOutcome::Rows(vec![vec![
            SqlValue::Text("Bea".into()),
            SqlValue::Int(31),
        ]])
    );

    // unsupported value type: rejected before any statement reaches the server
    let err = db
        .update("users", &[("age", SqlValue::Float(31.5))], "id=1")
        .unwrap_err();
    assert!(matches!(err, LifelineDbError::UnsupportedValue(_)));
    let fetched = db.query_rows("SELECT age FROM users WHERE id=1")?;
    assert_eq!(fetched, QueryOutcome::Rows(vec![vec![SqlValue::Int(31)]]));

    stop_postgres_embedded(postgres);
    Ok(())
}
