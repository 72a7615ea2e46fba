use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop an operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open database '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to compile sql (code {code:?}): {source}")]
    Compile {
        code: Option<i32>,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to execute sql (code {code:?}): {source}")]
    Execute {
        code: Option<i32>,
        #[source]
        source: rusqlite::Error,
    },

    #[error("row decodes {expected} columns but the statement yields {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("couldn't close database, something is still using it (code {code:?}): {source}")]
    Close {
        code: Option<i32>,
        #[source]
        source: rusqlite::Error,
    },
}

impl Error {
    /// Extended SQLite result code, if the engine produced one
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Open { source, .. } => engine_code(source),
            Error::Compile { code, .. } | Error::Execute { code, .. } | Error::Close { code, .. } => {
                *code
            }
            Error::ColumnCount { .. } => None,
        }
    }
}

/// Problems that were reported but did not stop the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("failed to find index for parameter {name}")]
    UnknownParameter { name: String },

    #[error("failed to bind sql parameter {name} (code {code:?}): {message}")]
    Bind {
        name: String,
        code: Option<i32>,
        message: String,
    },

    #[error("row iteration stopped early (code {code:?}): {message}")]
    Step { code: Option<i32>, message: String },
}

pub(crate) fn engine_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => Some(e.extended_code),
        _ => None,
    }
}

/// Per-connection diagnostic channel. Every entry is logged when recorded;
/// only the most recent `capacity` entries are retained.
#[derive(Debug)]
pub(crate) struct Diagnostics {
    entries: RefCell<VecDeque<Diagnostic>>,
    capacity: usize,
    dropped: Cell<u64>,
}

impl Diagnostics {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RefCell::new(VecDeque::new()),
            capacity,
            dropped: Cell::new(0),
        }
    }

    pub(crate) fn record(&self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        let mut entries = self.entries.borrow_mut();
        entries.push_back(diagnostic);
        while entries.len() > self.capacity {
            entries.pop_front();
            self.dropped.set(self.dropped.get() + 1);
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub(crate) fn take(&self) -> Vec<Diagnostic> {
        self.entries.take().into()
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.get()
    }
}
