//! Runtime-sized dense `f64` matrix.
//!
//! Column-major `Vec<f64>` storage. Dimensions are set at runtime. This is
//! the storage type for both the coupling adjacency matrix (N×N) and the
//! simulated phase time series (N×T) — column-major layout makes a
//! per-timestep snapshot (one column) a contiguous slice.

use core::ops::{Index, IndexMut};

/// Dynamically-sized heap-allocated `f64` matrix, column-major.
///
/// # Examples
///
/// ```
/// use kuramoto::Mat;
///
/// let a = Mat::from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]);
/// assert_eq!(a[(0, 1)], 1.0);
/// assert_eq!(a.nrows(), 2);
/// assert!(a.is_square());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mat {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl Mat {
    /// Create an `nrows x ncols` matrix of zeros.
    ///
    /// ```
    /// use kuramoto::Mat;
    /// let m = Mat::zeros(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0.0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Transposes the data to column-major internal storage.
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use kuramoto::Mat;
    /// let m = Mat::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[f64]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        let mut data = vec![0.0; nrows * ncols];
        for i in 0..nrows {
            for j in 0..ncols {
                data[j * nrows + i] = row_major[i * ncols + j];
            }
        }
        Self { data, nrows, ncols }
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use kuramoto::Mat;
    /// let id = Mat::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.0 });
    /// assert_eq!(id[(1, 1)], 1.0);
    /// assert_eq!(id[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// View a column as a contiguous slice.
    #[inline]
    pub fn col(&self, col: usize) -> &[f64] {
        let start = col * self.nrows;
        &self.data[start..start + self.nrows]
    }

    /// View a column as a mutable contiguous slice.
    #[inline]
    pub fn col_mut(&mut self, col: usize) -> &mut [f64] {
        let start = col * self.nrows;
        &mut self.data[start..start + self.nrows]
    }

    /// Copy a row out (rows are strided in column-major storage).
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.ncols).map(|j| self[(row, j)]).collect()
    }

    /// Sum of the entries of row `row`.
    ///
    /// For an adjacency matrix this is the (weighted) degree of node `row`.
    pub fn row_sum(&self, row: usize) -> f64 {
        (0..self.ncols).map(|j| self[(row, j)]).sum()
    }

    /// Find the first pair of entries violating symmetry beyond `tol`.
    ///
    /// Returns `Some((row, col, delta))` for the offending pair with the
    /// absolute difference, or `None` if the matrix is symmetric within
    /// tolerance. Only meaningful for square matrices.
    pub fn symmetry_violation(&self, tol: f64) -> Option<(usize, usize, f64)> {
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                let delta = (self[(i, j)] - self[(j, i)]).abs();
                if delta > tol {
                    return Some((i, j, delta));
                }
            }
        }
        None
    }

    /// View the underlying column-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[col * self.nrows + row]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[col * self.nrows + row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros() {
        let m = Mat::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(m[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn from_rows() {
        let m = Mat::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(1, 2)], 6.0);
    }

    #[test]
    #[should_panic(expected = "slice length")]
    fn from_rows_wrong_length() {
        let _ = Mat::from_rows(2, 2, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn col_is_contiguous() {
        let m = Mat::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.col(0), &[1.0, 3.0]);
        assert_eq!(m.col(1), &[2.0, 4.0]);
    }

    #[test]
    fn col_mut_writes_through() {
        let mut m = Mat::zeros(2, 2);
        m.col_mut(1).copy_from_slice(&[5.0, 6.0]);
        assert_eq!(m[(0, 1)], 5.0);
        assert_eq!(m[(1, 1)], 6.0);
    }

    #[test]
    fn row_copy() {
        let m = Mat::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn row_sum_is_degree() {
        // Path graph 0-1-2: node 1 has degree 2
        let a = Mat::from_rows(3, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(a.row_sum(0), 1.0);
        assert_eq!(a.row_sum(1), 2.0);
        assert_eq!(a.row_sum(2), 1.0);
    }

    #[test]
    fn symmetry_violation_detected() {
        let mut a = Mat::from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert!(a.symmetry_violation(1e-9).is_none());
        a[(0, 1)] = 2.0;
        let (i, j, delta) = a.symmetry_violation(1e-9).unwrap();
        assert_eq!((i, j), (0, 1));
        assert!((delta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn symmetry_within_tolerance() {
        let a = Mat::from_rows(2, 2, &[0.0, 1.0, 1.0 + 1e-12, 0.0]);
        assert!(a.symmetry_violation(1e-9).is_none());
    }

    #[test]
    fn index_mut() {
        let mut m = Mat::zeros(2, 2);
        m[(0, 1)] = 5.0;
        assert_eq!(m[(0, 1)], 5.0);
    }
}
