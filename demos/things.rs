use sqlite_bind::{Database, Params};

const INSERT_THING: &str = "INSERT INTO things (id, count, score) VALUES (@id, @c, @s);";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db = Database::open_in_memory()?;
    db.execute("CREATE TABLE t1(one, two);", &Params::new())?;
    db.execute(
        "CREATE TABLE IF NOT EXISTS things (id TEXT, count INT, score REAL);",
        &Params::new(),
    )?;

    for (id, count, score) in [("bat", 1, 0.2), ("rice", 5000, 0.1), ("hat", 6, 0.8)] {
        let params = Params::new()
            .with_value("@id", id)
            .with_value("@c", count)
            .with_value("@s", score);
        db.execute(INSERT_THING, &params)?;
    }

    let things: Vec<(String, i32, f64)> =
        db.query("SELECT id, count, score FROM things;", &Params::new())?;
    for (id, count, score) in things {
        println!("{} {} {}", id, count, score);
    }

    for diagnostic in db.take_diagnostics() {
        eprintln!("{}", diagnostic);
    }
    db.close()?;
    Ok(())
}
