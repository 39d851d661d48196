//! inference::covariance — validation and linear propagation of parameter covariance.
//!
//! Purpose
//! -------
//! Check that a fitted parameter covariance is usable, extend it with
//! independent uncertainties (e.g. the initial Δ47), and push it through a
//! model Jacobian to obtain the covariance of the model output.
//!
//! Key behaviors
//! -------------
//! - [`validate_covariance`]: shape, finiteness, symmetry, and positive
//!   semi-definiteness via a symmetric eigendecomposition in `nalgebra`.
//! - [`augment_covariance`]: block-diagonal append of one variance.
//! - [`propagate_covariance`]: `J · C · Jᵀ`.
//! - [`standard_errors`]: `sqrt(max(diag, 0))`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Symmetry and definiteness are judged relative to the largest absolute
//!   entry, so covariances of any scale are treated alike.
//! - Tiny negative diagonal entries produced by rounding in `J C Jᵀ` are
//!   clamped to zero before the square root.
use crate::errors::{ClumpError, ClumpResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2};

/// Relative tolerance on the smallest eigenvalue of a PSD covariance.
pub const EIGEN_EPS: f64 = 1e-10;
/// Relative tolerance on `|C − Cᵀ|`.
pub const SYMMETRY_TOL: f64 = 1e-10;

/// validate_covariance — check that `cov` is an `n × n` symmetric PSD matrix.
///
/// Errors
/// ------
/// - `ClumpError::InvalidCovariance` with a reason naming the failed check.
pub fn validate_covariance(cov: ArrayView2<f64>, n: usize) -> ClumpResult<()> {
    if cov.dim() != (n, n) {
        return Err(ClumpError::InvalidCovariance {
            reason: format!("expected shape ({n}, {n}), found {:?}", cov.dim()),
        });
    }
    if let Some(((i, j), v)) = cov.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(ClumpError::InvalidCovariance {
            reason: format!("non-finite entry {v} at ({i}, {j})"),
        });
    }
    let scale = cov.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Ok(());
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (cov[[i, j]] - cov[[j, i]]).abs() > SYMMETRY_TOL * scale {
                return Err(ClumpError::InvalidCovariance {
                    reason: format!("not symmetric at ({i}, {j})"),
                });
            }
        }
    }

    let eigen = to_dmatrix(cov).symmetric_eigen();
    let min_eig = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    if min_eig < -EIGEN_EPS * scale {
        return Err(ClumpError::InvalidCovariance {
            reason: format!("not positive semi-definite (smallest eigenvalue {min_eig})"),
        });
    }
    Ok(())
}

/// Append an independent variance as a new last row/column.
pub fn augment_covariance(cov: ArrayView2<f64>, var: f64) -> Array2<f64> {
    let n = cov.nrows();
    let mut out = Array2::<f64>::zeros((n + 1, n + 1));
    out.slice_mut(ndarray::s![..n, ..n]).assign(&cov);
    out[[n, n]] = var;
    out
}

/// propagate_covariance — output covariance `J · C · Jᵀ`.
///
/// Errors
/// ------
/// - `ClumpError::InvalidCovariance` if `cov` is not `np × np` for an
///   `nt × np` Jacobian.
pub fn propagate_covariance(jac: ArrayView2<f64>, cov: ArrayView2<f64>) -> ClumpResult<Array2<f64>> {
    let np = jac.ncols();
    if cov.dim() != (np, np) {
        return Err(ClumpError::InvalidCovariance {
            reason: format!("expected shape ({np}, {np}) to match Jacobian, found {:?}", cov.dim()),
        });
    }
    Ok(jac.dot(&cov).dot(&jac.t()))
}

/// Standard errors `sqrt(max(C_ii, 0))`.
pub fn standard_errors(cov: ArrayView2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

// ---- Helper methods ----

fn to_dmatrix(cov: ArrayView2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = cov.dim();
    DMatrix::from_fn(nrows, ncols, |i, j| cov[[i, j]])
}
