//! Integration tests for querying loaded tables.

use arrow::array::{Array, Int64Array};

use rusty_sql::{load, AnalysisSession, DatasetSource, QueryError, QuerySession, Table, Upload};

const ORDERS_CSV: &str = "\
order_id,customer,amount,placed_on
1,ada,12.50,2024-01-03
2,bob,7.25,2024-01-04
3,ada,30.00,2024-02-11
4,cy,5.75,2024-02-12
5,bob,18.00,2024-03-01
";

fn orders() -> Table {
    load(ORDERS_CSV.as_bytes(), "orders.csv").unwrap()
}

fn first_i64(table: &Table) -> i64 {
    table
        .batch()
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("Int64 column")
        .value(0)
}

// =============================================================================
// Shape of results
// =============================================================================

#[test]
fn select_star_returns_whole_table() {
    let table = orders();
    let session = QuerySession::prepare(&table).unwrap();

    let result = session.run("SELECT * FROM data").unwrap();
    assert_eq!(result.num_rows(), table.num_rows());
    assert_eq!(result.num_columns(), table.num_columns());
    assert_eq!(result.column_names(), table.column_names());
}

#[test]
fn count_star_equals_loaded_rows() {
    let table = orders();
    let session = QuerySession::prepare(&table).unwrap();

    let result = session.run("SELECT COUNT(*) FROM data").unwrap();
    assert_eq!(result.num_rows(), 1);
    assert_eq!(result.num_columns(), 1);
    assert_eq!(first_i64(&result), table.num_rows() as i64);
}

#[test]
fn aggregates_over_inferred_types() {
    let session = QuerySession::prepare(&orders()).unwrap();

    let result = session
        .run(
            "SELECT customer, COUNT(*) AS n FROM data \
             WHERE placed_on >= DATE '2024-02-01' \
             GROUP BY customer ORDER BY customer",
        )
        .unwrap();
    assert_eq!(result.column_names(), vec!["customer", "n"]);
    assert_eq!(result.num_rows(), 3);

    let result = session.run("SELECT SUM(amount) > 70 FROM data").unwrap();
    assert_eq!(result.num_rows(), 1);
}

// =============================================================================
// Failure containment
// =============================================================================

#[test]
fn invalid_sql_leaves_session_usable() {
    let session = QuerySession::prepare(&orders()).unwrap();

    let err = session.run("SELEKT * FROM data").unwrap_err();
    let QueryError::QueryFailed(msg) = &err;
    assert!(!msg.is_empty());

    let result = session.run("SELECT COUNT(*) FROM data").unwrap();
    assert_eq!(first_i64(&result), 5);
}

#[test]
fn mixed_case_columns_need_quotes() {
    let table = load(&b"Name,Score\nada,90\nbob,72\n"[..], "people.csv").unwrap();
    let session = QuerySession::prepare(&table).unwrap();

    let result = session.run(r#"SELECT "Name" FROM data WHERE "Score" > 80"#).unwrap();
    assert_eq!(result.column_names(), vec!["Name"]);
    assert_eq!(result.num_rows(), 1);

    let err = session.run("SELECT Name FROM data").unwrap_err();
    let QueryError::QueryFailed(msg) = &err;
    assert!(msg.contains("name"), "{msg}");
}

#[test]
fn unknown_relation_fails() {
    let session = QuerySession::prepare(&orders()).unwrap();
    assert!(matches!(
        session.run("SELECT * FROM orders"),
        Err(QueryError::QueryFailed(_))
    ));
}

#[test]
fn session_keeps_table_after_query_error() {
    let mut session = AnalysisSession::new();
    let source = DatasetSource::Upload(Upload::new("orders.csv", ORDERS_CSV.as_bytes().to_vec()));
    session.load(&source).unwrap();

    assert!(session.run("SELECT nope FROM data").is_err());
    assert!(session.table().is_some());
    assert_eq!(session.run("SELECT * FROM data").unwrap().num_rows(), 5);
}

// =============================================================================
// Idempotence and round trip
// =============================================================================

#[test]
fn repeated_prepare_and_run_are_identical() {
    let table = orders();
    let sql = "SELECT customer, amount * 2 AS doubled FROM data WHERE amount > 6";

    let first = QuerySession::prepare(&table).unwrap().run(sql).unwrap();
    let again = QuerySession::prepare(&table).unwrap();
    let second = again.run(sql).unwrap();
    let third = again.run(sql).unwrap();

    let bytes = first.to_csv().unwrap();
    assert_eq!(bytes, second.to_csv().unwrap());
    assert_eq!(bytes, third.to_csv().unwrap());
}

#[test]
fn exported_csv_reloads_with_same_shape() {
    let session = QuerySession::prepare(&orders()).unwrap();
    let result = session.run("SELECT * FROM data").unwrap();

    let exported = result.to_csv().unwrap();
    let reloaded = load(exported.as_slice(), "query_results.csv").unwrap();

    assert_eq!(reloaded.column_names(), result.column_names());
    assert_eq!(reloaded.num_rows(), result.num_rows());
}

#[test]
fn exported_csv_has_header_and_no_index() {
    let session = QuerySession::prepare(&orders()).unwrap();
    let result = session.run("SELECT customer, amount FROM data LIMIT 2").unwrap();
    let exported = result.to_csv().unwrap();

    let mut reader = csv::Reader::from_reader(exported.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, vec!["customer", "amount"]);

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.len() == 2));
}

#[test]
fn statements_are_not_restricted() {
    let session = QuerySession::prepare(&orders()).unwrap();

    session
        .run("CREATE TABLE big AS SELECT * FROM data WHERE amount > 10")
        .unwrap();
    let result = session.run("SELECT COUNT(*) FROM big").unwrap();
    assert_eq!(first_i64(&result), 3);
}

#[test]
fn empty_result_keeps_columns() {
    let session = QuerySession::prepare(&orders()).unwrap();
    let result = session.run("SELECT order_id, customer FROM data WHERE amount < 0").unwrap();

    assert_eq!(result.num_rows(), 0);
    assert_eq!(result.column_names(), vec!["order_id", "customer"]);
    assert_eq!(result.batch().column(0).len(), 0);
}
