//! Forward kernel and first-difference smoothing matrix for rate-spectrum inversion.
//!
//! The non-parametric model writes the normalized decay curve as
//! `G = A · rho`, with `A[i, j] = exp(−exp(lam_j) t_i) · dlam`. Recovering
//! `rho` from noisy `G` is ill-posed, so the external solver minimizes
//! `‖A rho − g‖² + ω² ‖R rho‖²` with `rho ≥ 0`, where `R` penalizes
//! first differences of the spectrum and pins both ends to zero.
use crate::{
    errors::{ClumpError, ClumpResult},
    inversion::grid::uniform_spacing,
};
use ndarray::{Array1, Array2, ArrayView1, s};

/// build_forward_kernel — `nt × nlam` forward operator of the rate-spectrum model.
///
/// Parameters
/// ----------
/// - `t`: `ArrayView1<f64>`
///   Times at which the decay curve is observed.
/// - `lam`: `ArrayView1<f64>`
///   Strictly ascending, uniformly spaced `ln k` nodes.
///
/// Returns
/// -------
/// `ClumpResult<Array2<f64>>`
///   `A[i, j] = exp(−exp(lam[j]) · t[i]) · dlam`, where `dlam = lam[1] − lam[0]`
///   (or `1.0` for a single node).
///
/// Errors
/// ------
/// - `ClumpError::EmptySeries` if `t` is empty.
/// - `ClumpError::NonFiniteInput` for a non-finite time.
/// - `ClumpError::InvalidGrid` if `lam` is empty, non-uniform, or not ascending.
///
/// Examples
/// --------
/// ```rust
/// # use clumped_kinetics::inversion::build_forward_kernel;
/// # use ndarray::array;
/// let a = build_forward_kernel(array![0.0, 10.0].view(), array![-3.0, -2.0, -1.0].view()).unwrap();
/// assert_eq!(a.dim(), (2, 3));
/// assert!((a[[0, 1]] - 1.0).abs() < 1e-12);
/// ```
pub fn build_forward_kernel(t: ArrayView1<f64>, lam: ArrayView1<f64>) -> ClumpResult<Array2<f64>> {
    if t.is_empty() {
        return Err(ClumpError::EmptySeries { what: "t" });
    }
    if let Some((index, &value)) = t.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ClumpError::NonFiniteInput { what: "t", index, value });
    }
    let dlam = uniform_spacing(lam)?;
    let rates = lam.mapv(f64::exp);

    Ok(Array2::from_shape_fn((t.len(), lam.len()), |(i, j)| (-rates[j] * t[i]).exp() * dlam))
}

/// build_smoothing_matrix — `(n+1) × n` first-difference regularization operator.
///
/// Row 0 is `[1, 0, …, 0]`, row `n` is `[0, …, 0, −1]`, and interior row `i`
/// holds `−1` at column `i − 1` and `+1` at column `i`. Interior rows
/// therefore sum to zero and both spectrum endpoints are pulled toward zero.
///
/// Errors
/// ------
/// - `ClumpError::InvalidGrid` if `n == 0`.
pub fn build_smoothing_matrix(n: usize) -> ClumpResult<Array2<f64>> {
    if n == 0 {
        return Err(ClumpError::InvalidGrid { reason: "smoothing matrix needs at least one node" });
    }
    let mut r = Array2::<f64>::zeros((n + 1, n));
    r[[0, 0]] = 1.0;
    for i in 1..n {
        r[[i, i - 1]] = -1.0;
        r[[i, i]] = 1.0;
    }
    r[[n, n - 1]] = -1.0;
    Ok(r)
}

/// build_regularized_system — stacked Tikhonov system for a non-negative solver.
///
/// Parameters
/// ----------
/// - `t`, `lam`: as in [`build_forward_kernel`].
/// - `g`: `ArrayView1<f64>`
///   Observed normalized decay curve, one value per `t`.
/// - `omega`: `f64`
///   Regularization weight `ω ≥ 0`.
///
/// Returns
/// -------
/// `ClumpResult<(Array2<f64>, Array1<f64>)>`
///   `A_aug = [A; ω R]` of shape `(nt + nlam + 1) × nlam` and
///   `b_aug = [g; 0]`.
///
/// Errors
/// ------
/// - `ClumpError::LengthMismatch` if `g.len() != t.len()`.
/// - `ClumpError::InvalidOption` if `omega` is negative or non-finite.
/// - Propagates kernel and smoothing-matrix validation.
pub fn build_regularized_system(
    t: ArrayView1<f64>, lam: ArrayView1<f64>, g: ArrayView1<f64>, omega: f64,
) -> ClumpResult<(Array2<f64>, Array1<f64>)> {
    if g.len() != t.len() {
        return Err(ClumpError::LengthMismatch { what: "g", expected: t.len(), found: g.len() });
    }
    if !omega.is_finite() || omega < 0.0 {
        return Err(ClumpError::InvalidOption {
            option: "omega",
            reason: format!("must be finite and >= 0; got {omega}"),
        });
    }
    let a = build_forward_kernel(t, lam)?;
    let r = build_smoothing_matrix(lam.len())?;
    let nt = t.len();
    let nlam = lam.len();

    let mut a_aug = Array2::<f64>::zeros((nt + nlam + 1, nlam));
    a_aug.slice_mut(s![..nt, ..]).assign(&a);
    a_aug.slice_mut(s![nt.., ..]).assign(&(r * omega));

    let mut b_aug = Array1::<f64>::zeros(nt + nlam + 1);
    b_aug.slice_mut(s![..nt]).assign(&g);
    Ok((a_aug, b_aug))
}
