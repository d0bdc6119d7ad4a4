//! Loader for the coordinate sparse text format.
//!
//! ```text
//! % comment lines start with '%'
//! rows cols nnz
//! row col value      <- nnz lines, 1-based indices
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::csr::CsrMatrix;
use crate::error::{MatrixError, Result};

/// Opens and parses the file at `path`.
///
/// An unopenable file gives [`MatrixError::Open`]; anything wrong with the
/// contents gives a parse error. Neither is confused with a valid matrix
/// that has no entries.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_csr<P: AsRef<Path>>(path: P) -> Result<CsrMatrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        warn!(error = %source, "cannot open matrix file");
        MatrixError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    read_csr(BufReader::new(file)).inspect_err(|e| warn!(error = %e, "cannot parse matrix file"))
}

/// Parses the text format from any buffered reader.
///
/// Blank and `%` lines are skipped. Entries may come in any row order;
/// duplicates and explicit zeros are stored as given. Lines after the
/// `nnz`-th entry are ignored.
pub fn read_csr<R: BufRead>(reader: R) -> Result<CsrMatrix> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| line.map(|l| (idx + 1, l)));

    let mut next_data_line = || -> Result<Option<(usize, String)>> {
        for item in lines.by_ref() {
            let (no, line) = item?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            return Ok(Some((no, line)));
        }
        Ok(None)
    };

    let (header_line, header) = next_data_line()?.ok_or(MatrixError::MissingHeader)?;
    let (rows, cols, nnz) = parse_header(&header)?;
    debug!(rows, cols, nnz, "parsed size header");

    let mut triplets = Vec::new();
    triplets.try_reserve_exact(nnz)?;
    let mut last_line = header_line;
    while triplets.len() < nnz {
        let Some((no, line)) = next_data_line()? else {
            return Err(MatrixError::Entry {
                line: last_line + 1,
                reason: format!("expected {nnz} entries, found {}", triplets.len()),
            });
        };
        last_line = no;
        triplets.push(parse_entry(&line, no, rows, cols)?);
    }

    CsrMatrix::from_triplets(rows, cols, &triplets)
}

fn parse_header(line: &str) -> Result<(usize, usize, usize)> {
    let malformed = || MatrixError::Header {
        line: line.to_string(),
    };
    let mut fields = line.split_whitespace().map(|f| f.parse::<usize>());
    let mut field = || fields.next().and_then(|r| r.ok()).ok_or_else(malformed);
    Ok((field()?, field()?, field()?))
}

fn parse_entry(line: &str, no: usize, rows: usize, cols: usize) -> Result<(usize, usize, f64)> {
    let bad = |reason: String| MatrixError::Entry { line: no, reason };
    let mut fields = line.split_whitespace();

    let mut index = |name: &str, bound: usize| -> Result<usize> {
        let raw = fields.next().ok_or_else(|| bad(format!("missing {name}")))?;
        let one_based: usize = raw
            .parse()
            .map_err(|_| bad(format!("invalid {name} {raw:?}")))?;
        if one_based == 0 || one_based > bound {
            return Err(bad(format!("{name} {one_based} outside 1..={bound}")));
        }
        Ok(one_based - 1)
    };
    let r = index("row", rows)?;
    let c = index("column", cols)?;

    let raw = fields.next().ok_or_else(|| bad("missing value".into()))?;
    let v: f64 = raw.parse().map_err(|_| bad(format!("invalid value {raw:?}")))?;
    Ok((r, c, v))
}
