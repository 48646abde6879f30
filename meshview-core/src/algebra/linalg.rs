/// Dimension-generic linear algebra shared by the square matrix types
use super::EPSILON;
use crate::error::ArithmeticError;

/// Minimal capability a square matrix exposes to the generic algorithms.
pub trait SquareMatrix<const N: usize>: Sized {
    fn to_rows(&self) -> [[f64; N]; N];

    fn from_rows(rows: [[f64; N]; N]) -> Self;

    /// Solves `self * x = b`.
    fn solve_rows(&self, b: [f64; N]) -> Result<[f64; N], ArithmeticError> {
        gaussian_solve(self.to_rows(), b)
    }
}

/// Gaussian elimination with partial pivoting.
///
/// For each column the row with the largest-magnitude entry at or below the
/// diagonal is swapped into place, rows beneath are eliminated, and the upper
/// triangular system is back-substituted. A pivot under 1e-12 means the
/// system is singular.
pub fn gaussian_solve<const N: usize>(
    mut a: [[f64; N]; N],
    mut b: [f64; N],
) -> Result<[f64; N], ArithmeticError> {
    for col in 0..N {
        let mut pivot_row = col;
        for row in (col + 1)..N {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < EPSILON {
            return Err(ArithmeticError::new(format!(
                "singular system: pivot in column {} is {:e}",
                col, a[pivot_row][col]
            )));
        }
        if pivot_row != col {
            a.swap(pivot_row, col);
            b.swap(pivot_row, col);
        }

        for row in (col + 1)..N {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let mut sum = b[row];
        for k in (row + 1)..N {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
