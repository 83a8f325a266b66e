//! Sparse matrix utilities for efficient FEA solves
//!
//! A beam on springs, numbered along its length, has a narrow band: every
//! node only couples to its neighbours. The skyline Cholesky solver below
//! stores each row from its first non-zero to the diagonal.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use super::{Mat12, SingularPivot};

/// Sparse matrix builder using COO format
/// More efficient for incremental assembly
#[derive(Debug, Clone)]
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // A frame node couples to at most a handful of neighbours
        let estimated_nnz = size * 18;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter a 12x12 element matrix into the global DOFs it maps to
    pub fn add_element_matrix(&mut self, dofs: &[usize; 12], k_elem: &Mat12) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Keep only the rows/columns with a new index in `map`, renumbered
    pub fn partition(&self, map: &[Option<usize>], size: usize) -> Self {
        let entries = self
            .entries
            .iter()
            .filter_map(|&(row, col, val)| Some((map[row]?, map[col]?, val)))
            .collect();
        Self { size, entries }
    }

    /// Convert to CSR format for efficient solves
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Convert to dense matrix
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    /// Get non-zero count before duplicate entries are summed
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Skyline Cholesky factorization of a symmetric positive definite matrix
#[derive(Debug, Clone)]
pub struct SkylineCholesky {
    size: usize,
    // For each row, entries from the first non-zero column up to the diagonal
    skyline: Vec<Vec<f64>>,
    // Distance from the diagonal to the first non-zero in each row
    heights: Vec<usize>,
}

impl SkylineCholesky {
    /// Factorize a symmetric CSR matrix (only the lower triangle is read)
    ///
    /// Fails at the first pivot that is non-positive or smaller than
    /// `pivot_tolerance` times the original diagonal term of that row.
    pub fn factorize(csr: &CsrMatrix<f64>, pivot_tolerance: f64) -> Result<Self, SingularPivot> {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                heights[row] = heights[row].max(row - col);
            }
        }

        let mut skyline: Vec<Vec<f64>> = heights.iter().map(|&h| vec![0.0; h + 1]).collect();
        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                let start = row - heights[row];
                skyline[row][col - start] += val;
            }
        }

        let mut solver = Self { size, skyline, heights };
        solver.factorize_in_place(pivot_tolerance)?;
        Ok(solver)
    }

    fn factorize_in_place(&mut self, pivot_tolerance: f64) -> Result<(), SingularPivot> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            // L[i,j] for j < i
            for j in start_i..i {
                let start_j = j - self.heights[j];
                let start = start_i.max(start_j);

                let sum: f64 = (start..j).map(|k| self.get(i, k) * self.get(j, k)).sum();

                let diag_j = self.get(j, j);
                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / diag_j;
            }

            // L[i,i]
            let original = self.skyline[i][hi];
            let sum: f64 = (start_i..i).map(|j| self.get(i, j).powi(2)).sum();
            let pivot = original - sum;
            if pivot <= pivot_tolerance * original.abs() {
                return Err(SingularPivot { index: i });
            }
            self.skyline[i][hi] = pivot.sqrt();
        }

        Ok(())
    }

    /// Entry (row, col) of L, for col <= row
    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        let start = row - self.heights[row];
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Solve L * L^T * x = b
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let start = i - self.heights[i];
            let sum: f64 = (start..i).map(|j| self.get(i, j) * x[j]).sum();
            x[i] = (x[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);
            let start = i - self.heights[i];
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        x
    }

    /// Number of stored entries in the profile
    pub fn profile_size(&self) -> usize {
        self.skyline.iter().map(Vec::len).sum()
    }
}

/// Sparse matrix-vector multiplication
pub fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let mut y = DVector::zeros(csr.nrows());
    for (row, col, &val) in csr.triplet_iter() {
        y[row] += val * x[col];
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tridiagonal(n: usize) -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::new(n);
        for i in 0..n {
            builder.add(i, i, 4.0);
            if i + 1 < n {
                builder.add(i, i + 1, -1.0);
                builder.add(i + 1, i, -1.0);
            }
        }
        builder
    }

    #[test]
    fn test_sparse_builder_accumulates() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 4.0);
        builder.add(0, 0, 1.0);
        builder.add(1, 1, 0.0);

        let dense = builder.to_dense();
        assert_relative_eq!(dense[(0, 0)], 5.0);
        assert_eq!(builder.nnz(), 2);
    }

    #[test]
    fn test_skyline_matches_dense_solve() {
        let builder = tridiagonal(6);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let skyline = SkylineCholesky::factorize(&builder.to_csr(), 1e-12).unwrap();
        let x = skyline.solve(&b);

        let residual = builder.to_dense() * &x - &b;
        assert!(residual.norm() < 1e-10, "residual {}", residual.norm());
        assert_eq!(skyline.profile_size(), 11);
    }

    #[test]
    fn test_skyline_reports_singular_row() {
        // Two unit springs in series with no ground: rigid-body mode
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 1.0);
        builder.add(0, 1, -1.0);
        builder.add(1, 0, -1.0);
        builder.add(1, 1, 1.0);

        let err = SkylineCholesky::factorize(&builder.to_csr(), 1e-10).unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn test_partition_renumbers() {
        let builder = tridiagonal(3);
        let reduced = builder.partition(&[None, Some(0), Some(1)], 2);
        let dense = reduced.to_dense();
        assert_relative_eq!(dense[(0, 0)], 4.0);
        assert_relative_eq!(dense[(0, 1)], -1.0);
    }

    #[test]
    fn test_matvec() {
        let builder = tridiagonal(3);
        let y = sparse_matvec(&builder.to_csr(), &DVector::from_vec(vec![1.0, 1.0, 1.0]));
        assert_relative_eq!(y[0], 3.0);
        assert_relative_eq!(y[1], 2.0);
    }
}
