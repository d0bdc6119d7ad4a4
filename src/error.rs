use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("dimension mismatch: {left}x{left} @ {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("csr shape mismatch: [{a_rows}x{a_cols}] @ [{b_rows}x{b_cols}]")]
    CsrShapeMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("{what}: expected length {expected}, got {got}")]
    VectorLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("block size must be at least 1")]
    InvalidBlockSize,
    #[error("thread count must be at least 1")]
    InvalidThreadCount,
    #[error("sparsity must lie in [0, 1], got {0}")]
    InvalidSparsity(f64),
    #[error("invalid csr matrix: {0}")]
    InvalidCsr(String),
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    #[error("missing size header")]
    MissingHeader,
    #[error("malformed header line: {line:?}")]
    Header { line: String },
    #[error("line {line}: {reason}")]
    Entry { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
