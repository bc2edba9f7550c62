//! Dense linear-algebra helpers shared by the solvers.
//!
//! Systems here are tiny (two unknowns for the structural model), so plain
//! `Vec<Vec<f64>>` row-major matrices are used throughout.

/// Relative finite-difference step.
const FD_EPS: f64 = 1e-8;

/// Pivot magnitude below which a matrix is treated as singular.
const PIVOT_EPS: f64 = 1e-30;

/// Forward-difference Jacobian `J[i][j] = ∂f_i/∂x_j`.
///
/// The step for parameter `j` is `1e-8 · max(|x_j|, 1)`. `f0` must be
/// `f(x)`, already evaluated by the caller.
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::forward_difference_jacobian;
///
/// let f = |p: &[f64]| vec![2.0 * p[0] + 3.0 * p[1]];
/// let x = [1.0, 1.0];
/// let j = forward_difference_jacobian(&f, &x, &f(&x));
/// assert!((j[0][0] - 2.0).abs() < 1e-5);
/// assert!((j[0][1] - 3.0).abs() < 1e-5);
/// ```
pub fn forward_difference_jacobian<F>(f: &F, x: &[f64], f0: &[f64]) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n_params = x.len();
    let n_residuals = f0.len();

    let mut jacobian = vec![vec![0.0; n_params]; n_residuals];

    for j in 0..n_params {
        let h = FD_EPS * x[j].abs().max(1.0);

        let mut x_plus = x.to_vec();
        x_plus[j] += h;

        let f_plus = f(&x_plus);

        for i in 0..n_residuals {
            jacobian[i][j] = (f_plus.get(i).copied().unwrap_or(f64::NAN) - f0[i]) / h;
        }
    }

    jacobian
}

/// Sum of squares of a vector.
#[inline]
pub(crate) fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Largest absolute component (infinity norm); NaN if any component is NaN.
#[inline]
pub(crate) fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, &x| {
        if x.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(x.abs())
        }
    })
}

/// Solve the square system `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when `A` is singular (pivot below 1e-30), not square, or
/// the elimination produces non-finite values.
pub(crate) fn solve_linear(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // Augmented matrix [A | b]
    let mut m: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &bi)| {
            let mut r = row.clone();
            r.push(bi);
            r
        })
        .collect();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        let pivot = m[pivot_row][col].abs();
        if pivot.is_nan() || pivot <= PIVOT_EPS {
            return None;
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            for k in col..=n {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = m[i][n];
        for j in (i + 1)..n {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Solve `A x = b` for symmetric positive definite `A` using Cholesky decomposition.
pub(crate) fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition: A = L L^T
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum.is_nan() || sum <= 0.0 {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < PIVOT_EPS {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Solve L y = b (forward substitution)
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Solve L^T x = y (backward substitution)
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}
