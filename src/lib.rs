//! Named-parameter binding and typed row decoding over SQLite.
//!
//! # Intention
//!
//! - Open one SQLite database and run statements against it with named,
//!   typed parameters.
//! - Decode result rows positionally into tuples whose element types the
//!   caller declares.
//! - Report non-fatal problems (unknown parameters, rejected binds, cursor
//!   errors) on a per-connection diagnostic channel instead of aborting.
//!
//! # Architectural Boundaries
//!
//! - SQL parsing, planning, transactions and storage belong to SQLite.
//! - A [`Database`] and every [`Prepared`] statement derived from it stay on
//!   one thread.
//!
//! ```no_run
//! use sqlite_bind::{Database, Params};
//!
//! # fn main() -> sqlite_bind::Result<()> {
//! let db = Database::open("things.db")?;
//! db.execute("CREATE TABLE IF NOT EXISTS things(id TEXT, count INT)", &Params::new())?;
//! db.execute(
//!     "INSERT INTO things (id, count) VALUES (@id, @c)",
//!     &Params::new().with_value("@id", "bat").with_value("@c", 1),
//! )?;
//! let rows: Vec<(String, i64)> = db.query("SELECT id, count FROM things", &Params::new())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod row;
pub mod sqlite;
pub mod statement;
pub mod value;

pub use config::SqliteConfig;
pub use error::{Diagnostic, Error, Result};
pub use row::{FromColumn, FromRow};
pub use sqlite::Database;
pub use statement::Prepared;
pub use value::{Params, Value};
