use crate::error::{engine_code, Diagnostic, Diagnostics, Error, Result};
use crate::row::FromRow;
use crate::value::Params;
use rusqlite::{ffi, Connection, Statement};

/// A compiled, bound statement that has not run yet.
///
/// Borrows its [`Database`](crate::Database), so it can never outlive the
/// connection. The underlying statement is finalized exactly once, when this
/// value is dropped, whether or not any row was read.
pub struct Prepared<'db> {
    statement: Statement<'db>,
    diagnostics: &'db Diagnostics,
}

impl<'db> Prepared<'db> {
    /// Compile `sql` and bind every entry of `params` that has a matching
    /// placeholder. Binding is best-effort: failures are recorded on the
    /// diagnostic channel and the remaining entries are still bound.
    pub(crate) fn new(
        connection: &'db Connection,
        diagnostics: &'db Diagnostics,
        sql: &str,
        params: &Params,
    ) -> Result<Self> {
        let statement = connection.prepare(sql).map_err(|source| {
            let code = engine_code(&source);
            tracing::error!(?code, "failed to compile sql: {}", source);
            Error::Compile { code, source }
        })?;

        let mut prepared = Self {
            statement,
            diagnostics,
        };
        prepared.bind_all(params);
        Ok(prepared)
    }

    fn bind_all(&mut self, params: &Params) {
        for (name, value) in params {
            let index = match self.statement.parameter_index(name) {
                Ok(Some(index)) => index,
                Ok(None) => {
                    self.diagnostics
                        .record(Diagnostic::UnknownParameter { name: name.clone() });
                    continue;
                }
                Err(e) => {
                    self.record_bind_failure(name, &e);
                    continue;
                }
            };
            if let Err(e) = self.statement.raw_bind_parameter(index, value) {
                self.record_bind_failure(name, &e);
            }
        }
    }

    fn record_bind_failure(&self, name: &str, err: &rusqlite::Error) {
        self.diagnostics.record(Diagnostic::Bind {
            name: name.to_string(),
            code: engine_code(err),
            message: err.to_string(),
        });
    }

    /// Number of columns each result row carries
    pub fn column_count(&self) -> usize {
        self.statement.column_count()
    }

    /// Run the statement once to completion and return the number of rows
    /// changed. A statement that yields rows is an execution failure.
    pub fn execute(mut self) -> Result<usize> {
        self.statement.raw_execute().map_err(|source| {
            let code = match &source {
                rusqlite::Error::ExecuteReturnedResults => Some(ffi::SQLITE_ROW),
                _ => engine_code(&source),
            };
            tracing::error!(?code, "failed to execute sql: {}", source);
            Error::Execute { code, source }
        })
    }

    /// Step through every row and decode each into `R`.
    ///
    /// A cursor error ends the sequence: it is recorded as
    /// [`Diagnostic::Step`] and the rows decoded so far are returned.
    pub fn query<R: FromRow>(self) -> Result<Vec<R>> {
        self.collect(usize::MAX)
    }

    /// Decode the first row only. Remaining rows are never stepped.
    pub fn query_one<R: FromRow>(self) -> Result<Option<R>> {
        Ok(self.collect(1)?.pop())
    }

    fn collect<R: FromRow>(mut self, limit: usize) -> Result<Vec<R>> {
        let actual = self.statement.column_count();
        if actual < R::WIDTH {
            return Err(Error::ColumnCount {
                expected: R::WIDTH,
                actual,
            });
        }

        let diagnostics = self.diagnostics;
        let mut results = Vec::new();
        let mut rows = self.statement.raw_query();
        while results.len() < limit {
            match rows.next() {
                Ok(Some(row)) => results.push(R::from_row(row)),
                Ok(None) => break,
                Err(e) => {
                    diagnostics.record(Diagnostic::Step {
                        code: engine_code(&e),
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }
        tracing::debug!(rows = results.len(), "query finished");
        Ok(results)
    }
}
