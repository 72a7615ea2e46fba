use sqlite_bind::{Database, Diagnostic, Error, Params};

fn create_numbers_db(count: i64) -> anyhow::Result<Database> {
    let db = Database::open_in_memory()?;
    db.execute("CREATE TABLE numbers (x INTEGER)", &Params::new())?;
    for x in 1..=count {
        db.execute(
            "INSERT INTO numbers (x) VALUES (@x)",
            &Params::new().with_value("@x", x),
        )?;
    }
    Ok(db)
}

fn select_one<R: sqlite_bind::FromRow>(db: &Database, sql: &str) -> anyhow::Result<R> {
    db.query_one(sql, &Params::new())?
        .ok_or_else(|| anyhow::anyhow!("no row for {}", sql))
}

#[test]
fn test_empty_result_is_not_an_error() -> anyhow::Result<()> {
    let db = create_numbers_db(3)?;
    let rows: Vec<(i64,)> = db.query(
        "SELECT x FROM numbers WHERE x > @min",
        &Params::new().with_value("@min", 100),
    )?;
    assert!(rows.is_empty());
    assert!(db.diagnostics().is_empty());

    let first: Option<(i64,)> = db.query_one("SELECT x FROM numbers WHERE x < 0", &Params::new())?;
    assert_eq!(first, None);
    Ok(())
}

#[test]
fn test_rows_keep_cursor_order() -> anyhow::Result<()> {
    let db = create_numbers_db(5)?;

    let stored: Vec<(i64,)> = db.query("SELECT x FROM numbers", &Params::new())?;
    assert_eq!(stored, vec![(1,), (2,), (3,), (4,), (5,)]);

    let ordered: Vec<(i64,)> = db.query("SELECT x FROM numbers ORDER BY x DESC", &Params::new())?;
    assert_eq!(ordered, vec![(5,), (4,), (3,), (2,), (1,)]);
    Ok(())
}

#[test]
fn test_query_one_takes_first_row() -> anyhow::Result<()> {
    let db = create_numbers_db(5)?;
    let first: Option<(i64,)> = db.query_one("SELECT x FROM numbers ORDER BY x DESC", &Params::new())?;
    assert_eq!(first, Some((5,)));
    Ok(())
}

#[test]
fn test_cursor_error_ends_sequence() -> anyhow::Result<()> {
    let db = create_numbers_db(5)?;
    // abs() of the smallest integer overflows when the third row is stepped
    let rows: Vec<(i64,)> = db.query(
        "SELECT CASE WHEN x = 3 THEN abs(x - 3 - 9223372036854775807 - 1) ELSE x END \
         FROM numbers",
        &Params::new(),
    )?;
    assert_eq!(rows, vec![(1,), (2,)]);

    let diagnostics = db.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0], Diagnostic::Step { .. }));

    // The partially consumed statement was released.
    let rows: Vec<(i64,)> = db.query("SELECT x FROM numbers", &Params::new())?;
    assert_eq!(rows.len(), 5);
    Ok(())
}

#[test]
fn test_too_few_columns() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let err = db.query::<(i64, i64)>("SELECT 1", &Params::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::ColumnCount {
            expected: 2,
            actual: 1
        }
    ));
    Ok(())
}

#[test]
fn test_extra_columns_are_ignored() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64,) = select_one(&db, "SELECT 1, 2, 3")?;
    assert_eq!(row, (1,));
    Ok(())
}

#[test]
fn test_text_round_trip() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    db.execute("CREATE TABLE notes (body TEXT)", &Params::new())?;
    let bodies = ["", "it's \"quoted\"", "naïve café ☕", "line\nbreak"];
    for body in bodies {
        db.execute(
            "INSERT INTO notes (body) VALUES (@body)",
            &Params::new().with_value("@body", body),
        )?;
    }

    let rows: Vec<(String,)> = db.query("SELECT body FROM notes", &Params::new())?;
    let read: Vec<&str> = rows.iter().map(|(body,)| body.as_str()).collect();
    assert_eq!(read, bodies);
    Ok(())
}

#[test]
fn test_integer_round_trip() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, i64, i64) = db
        .query_one(
            "SELECT @max, @min, @zero",
            &Params::new()
                .with_value("@max", i64::MAX)
                .with_value("@min", i64::MIN)
                .with_value("@zero", 0),
        )?
        .unwrap_or_default();
    assert_eq!(row, (i64::MAX, i64::MIN, 0));
    Ok(())
}

#[test]
fn test_null_decoding() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (String, i64, f64, Option<String>, Option<i64>) =
        select_one(&db, "SELECT NULL, NULL, NULL, NULL, NULL")?;
    assert_eq!(row, (String::new(), 0, 0.0, None, None));

    let row: (Option<String>, Option<f64>) = select_one(&db, "SELECT 'x', 1.5")?;
    assert_eq!(row, (Some("x".to_string()), Some(1.5)));
    Ok(())
}

#[test]
fn test_numeric_coercion_from_text() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, i64, i64, f64, f64, i64) =
        select_one(&db, "SELECT 'abc', '42abc', '  -7', '1.5', 'x', '2.9'")?;
    assert_eq!(row, (0, 42, -7, 1.5, 0.0, 2));
    Ok(())
}

#[test]
fn test_integer_coercion_reads_digits_only() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, i64, i64, i32, i64, i64) = select_one(
        &db,
        "SELECT '1e3', '3.9e2', '1e999', '1e3', '99999999999999999999', '-99999999999999999999'",
    )?;
    assert_eq!(row, (1, 3, 1, 1, i64::MAX, i64::MIN));

    let row: (f64, f64) = select_one(&db, "SELECT '1e3', '3.9e2'")?;
    assert_eq!(row, (1000.0, 390.0));
    Ok(())
}

#[test]
fn test_coercion_skips_vertical_tab() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, f64, i64) =
        select_one(&db, "SELECT char(11) || '5', char(11) || '5', char(12) || char(13) || '+8'")?;
    assert_eq!(row, (5, 5.0, 8));
    Ok(())
}

#[test]
fn test_numeric_coercion_between_storage_classes() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, f64, i32) = select_one(&db, "SELECT 3.9, 7, 4294967297")?;
    assert_eq!(row, (3, 7.0, 1));
    Ok(())
}

#[test]
fn test_text_coercion_from_numbers() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (String, String, String, String, String) =
        select_one(&db, "SELECT 7, 0.5, 2.0, -0.25, 1e20")?;
    assert_eq!(
        row,
        (
            "7".to_string(),
            "0.5".to_string(),
            "2.0".to_string(),
            "-0.25".to_string(),
            "1.0e+20".to_string()
        )
    );

    let row: (String,) = select_one(&db, "SELECT 0.1 + 0.2")?;
    assert_eq!(row.0, "0.3");

    let row: (String, f64) = select_one(&db, "SELECT -0.0, -0.0")?;
    assert_eq!(row.0, "0.0");
    assert_eq!(row.1, 0.0);
    Ok(())
}

#[test]
fn test_wide_rows() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let row: (i64, i64, i64, i64, i64, i64, i64, i64, i64, i64, i64, String) =
        select_one(&db, "SELECT 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 'twelve'")?;
    assert_eq!(row.10, 11);
    assert_eq!(row.11, "twelve");
    Ok(())
}
