use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MEMORY_PATH: &str = ":memory:";

/// SQLite connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file. Plain path, no URI.
    pub db_path: PathBuf,
    /// Create the file when it does not exist yet
    #[serde(default = "default_create")]
    pub create_if_missing: bool,
    /// Most recent diagnostics kept per connection; older ones are counted
    /// and discarded
    #[serde(default = "default_max_diagnostics")]
    pub max_diagnostics: usize,
}

fn default_create() -> bool {
    true
}

fn default_max_diagnostics() -> usize {
    256
}

impl SqliteConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            create_if_missing: default_create(),
            max_diagnostics: default_max_diagnostics(),
        }
    }

    /// A private, transient in-memory database
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    // Read/write, optionally create. No internal mutex: connections are
    // confined to one thread.
    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        flags
    }
}
