use std::path::PathBuf;
use thiserror::Error;

/// A query that cannot be evaluated as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    Malformed(String),
}

/// Durable storage faults. In-memory state is never touched by these.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("turtle syntax error at line {line}: {message}")]
    Parse { line: usize, message: String },
}
