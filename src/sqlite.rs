use crate::config::SqliteConfig;
use crate::error::{engine_code, Diagnostic, Diagnostics, Error, Result};
use crate::row::FromRow;
use crate::statement::Prepared;
use crate::value::Params;
use rusqlite::Connection;
use std::path::Path;

/// One open SQLite database.
///
/// Owns the connection handle exclusively and releases it when dropped.
/// Not `Sync`: a database and its statements stay on the thread that uses
/// them.
#[derive(Debug)]
pub struct Database {
    config: SqliteConfig,
    connection: Connection,
    diagnostics: Diagnostics,
}

impl Database {
    /// Open a read/write database at `path`, creating it if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(SqliteConfig::new(path.as_ref()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_config(SqliteConfig::in_memory())
    }

    pub fn open_with_config(config: SqliteConfig) -> Result<Self> {
        let connection = Connection::open_with_flags(config.path(), config.open_flags())
            .map_err(|source| {
                tracing::error!(path = %config.path().display(), "failed to open database: {}", source);
                Error::Open {
                    path: config.path().display().to_string(),
                    source,
                }
            })?;
        tracing::debug!(path = %config.path().display(), "opened database");
        let diagnostics = Diagnostics::with_capacity(config.max_diagnostics);
        Ok(Self {
            config,
            connection,
            diagnostics,
        })
    }

    pub fn path(&self) -> &Path {
        self.config.path()
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Compile `sql` and bind `params`. Unknown names and rejected binds are
    /// recorded as diagnostics and skipped.
    pub fn prepare(&self, sql: &str, params: &Params) -> Result<Prepared<'_>> {
        Prepared::new(&self.connection, &self.diagnostics, sql, params)
    }

    /// Run a statement for effect, returning the number of rows changed
    pub fn execute(&self, sql: &str, params: &Params) -> Result<usize> {
        self.prepare(sql, params)?.execute()
    }

    /// Run a statement and decode every result row into `R`
    pub fn query<R: FromRow>(&self, sql: &str, params: &Params) -> Result<Vec<R>> {
        self.prepare(sql, params)?.query()
    }

    /// Run a statement and decode only its first row
    pub fn query_one<R: FromRow>(&self, sql: &str, params: &Params) -> Result<Option<R>> {
        self.prepare(sql, params)?.query_one()
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.connection.last_insert_rowid()
    }

    /// Diagnostics recorded so far, oldest first
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.snapshot()
    }

    /// Diagnostics discarded because the channel was full
    pub fn dropped_diagnostics(&self) -> u64 {
        self.diagnostics.dropped()
    }

    /// Drain the diagnostic channel
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Release the connection now instead of at drop
    pub fn close(self) -> Result<()> {
        let path = self.config.path().display().to_string();
        self.connection.close().map_err(|(_connection, source)| {
            tracing::warn!(%path, "couldn't close database, something is still using it: {}", source);
            Error::Close {
                code: engine_code(&source),
                source,
            }
        })?;
        tracing::debug!(%path, "closed database");
        Ok(())
    }
}
