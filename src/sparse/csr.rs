//! Compressed sparse row storage.

use crate::error::{MatrixError, Result};
use crate::matrix::dense::DenseMatrix;

/// A rows×cols sparse matrix in CSR layout.
///
/// Row i's entries live at `row_ptr[i]..row_ptr[i + 1]` in `col_ind` and
/// `val`. Columns within a row need not be sorted, and duplicate columns are
/// allowed (they sum when the matrix is applied).
///
/// The three arrays are owned together and dropped together.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_ind: Vec<usize>,
    val: Vec<f64>,
}

impl CsrMatrix {
    /// Empty rows×cols matrix with room for `nnz_capacity` entries.
    ///
    /// All rows start empty. Reservation is fallible: if any array cannot be
    /// allocated, everything reserved so far is released and
    /// [`MatrixError::Alloc`] is returned. A row count with no room for
    /// `row_ptr`'s extra slot gives [`MatrixError::InvalidCsr`].
    pub fn with_capacity(rows: usize, cols: usize, nnz_capacity: usize) -> Result<Self> {
        let ptr_len = row_ptr_len(rows)?;
        let mut row_ptr = Vec::new();
        row_ptr.try_reserve_exact(ptr_len)?;
        row_ptr.resize(ptr_len, 0);

        let mut col_ind = Vec::new();
        col_ind.try_reserve_exact(nnz_capacity)?;
        let mut val = Vec::new();
        val.try_reserve_exact(nnz_capacity)?;

        Ok(Self {
            rows,
            cols,
            row_ptr,
            col_ind,
            val,
        })
    }

    /// Builds a matrix from caller-filled arrays, checking the CSR
    /// invariants.
    pub fn from_raw_parts(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_ind: Vec<usize>,
        val: Vec<f64>,
    ) -> Result<Self> {
        let ptr_len = row_ptr_len(rows)?;
        if row_ptr.len() != ptr_len {
            return Err(MatrixError::InvalidCsr(format!(
                "row_ptr has {} entries, expected {}",
                row_ptr.len(),
                ptr_len
            )));
        }
        if row_ptr[0] != 0 {
            return Err(MatrixError::InvalidCsr("row_ptr[0] must be 0".into()));
        }
        if let Some(i) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(MatrixError::InvalidCsr(format!("row_ptr decreases at row {i}")));
        }
        if col_ind.len() != val.len() {
            return Err(MatrixError::InvalidCsr(format!(
                "col_ind has {} entries but val has {}",
                col_ind.len(),
                val.len()
            )));
        }
        if row_ptr[rows] != val.len() {
            return Err(MatrixError::InvalidCsr(format!(
                "row_ptr ends at {} but there are {} entries",
                row_ptr[rows],
                val.len()
            )));
        }
        if let Some(&c) = col_ind.iter().find(|&&c| c >= cols) {
            return Err(MatrixError::InvalidCsr(format!(
                "column {c} out of range for {cols} columns"
            )));
        }

        Ok(Self {
            rows,
            cols,
            row_ptr,
            col_ind,
            val,
        })
    }

    /// Builds a matrix from 0-based `(row, col, value)` triples in any order.
    ///
    /// Two passes: count entries per row and prefix-sum into `row_ptr`, then
    /// scatter each entry to its row's fill cursor. Entries keep their input
    /// order within a row and duplicates are kept as separate entries.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        let nnz = triplets.len();
        let mut m = Self::with_capacity(rows, cols, nnz)?;

        for (k, &(r, c, _)) in triplets.iter().enumerate() {
            if r >= rows || c >= cols {
                return Err(MatrixError::InvalidCsr(format!(
                    "entry {k} at ({r}, {c}) outside {rows}x{cols}"
                )));
            }
            m.row_ptr[r + 1] += 1;
        }
        for i in 0..rows {
            m.row_ptr[i + 1] += m.row_ptr[i];
        }

        m.col_ind.resize(nnz, 0);
        m.val.resize(nnz, 0.0);
        let mut fill = m.row_ptr[..rows].to_vec();
        for &(r, c, v) in triplets {
            let dst = fill[r];
            fill[r] += 1;
            m.col_ind[dst] = c;
            m.val[dst] = v;
        }
        Ok(m)
    }

    /// n×n identity.
    pub fn identity(n: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            row_ptr: (0..=n).collect(),
            col_ind: (0..n).collect(),
            val: vec![1.0; n],
        }
    }

    /// Stores every non-zero cell of `dense`, columns ascending per row.
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let n = dense.n();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_ind = Vec::new();
        let mut val = Vec::new();

        row_ptr.push(0);
        for i in 0..n {
            for (j, &v) in dense.row(i).iter().enumerate() {
                if v != 0.0 {
                    col_ind.push(j);
                    val.push(v);
                }
            }
            row_ptr.push(val.len());
        }
        Self {
            rows: n,
            cols: n,
            row_ptr,
            col_ind,
            val,
        }
    }

    /// Expands a square matrix to dense form, summing duplicate entries.
    pub fn to_dense(&self) -> Result<DenseMatrix> {
        if self.rows != self.cols {
            return Err(MatrixError::DimensionMismatch {
                left: self.rows,
                right: self.cols,
            });
        }
        let mut dense = DenseMatrix::zeros(self.rows);
        for i in 0..self.rows {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                dense.set(i, j, dense.get(i, j) + v);
            }
        }
        Ok(dense)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.val.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_ind(&self) -> &[usize] {
        &self.col_ind
    }

    pub fn values(&self) -> &[f64] {
        &self.val
    }

    /// Column indices and values of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_ind[range.clone()], &self.val[range])
    }

    /// Appends an entry to the row currently being filled.
    pub(crate) fn push_entry(&mut self, col: usize, value: f64) {
        debug_assert!(col < self.cols);
        self.col_ind.push(col);
        self.val.push(value);
    }

    /// Closes row `i`: everything pushed since row `i - 1` was sealed
    /// belongs to it. Rows must be sealed in order.
    pub(crate) fn seal_row(&mut self, i: usize) {
        self.row_ptr[i + 1] = self.val.len();
    }

    /// Drops unused capacity once the producing pass is done.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.col_ind.shrink_to_fit();
        self.val.shrink_to_fit();
    }
}

/// `rows + 1`, or an error when that does not fit in `usize`.
fn row_ptr_len(rows: usize) -> Result<usize> {
    rows.checked_add(1)
        .ok_or_else(|| MatrixError::InvalidCsr(format!("{rows} rows overflow row_ptr")))
}
