//! inference::jacobian — central finite-difference Jacobians of forward models.
//!
//! Purpose
//! -------
//! Approximate `∂f(t; p)/∂p` for a vector-valued forward model so that a
//! parameter covariance can be propagated to the model output.
//!
//! Key behaviors
//! -------------
//! - Column `k` is `(f(t; p + h_k e_k) − f(t; p − h_k e_k)) / (2 h_k)`.
//! - Exactly `2 · len(p)` evaluations of `f`, in parameter order.
//! - Step size is either absolute (`h_k = eps`) or relative
//!   (`h_k = eps · max(|p_k|, 1)`), chosen through [`JacobianOptions`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `f` returns one value per time point; any other length is reported as a
//!   validation error rather than silently reshaped.
//! - Errors raised inside `f` are propagated unchanged.
//!
//! Conventions
//! -----------
//! - The result has shape `nt × np` (rows = time points, columns =
//!   parameters).
//!
//! Testing notes
//! -------------
//! - Unit tests compare against analytic derivatives of a polynomial and an
//!   exponential, and count evaluations.
use crate::errors::{ClumpError, ClumpResult};
use ndarray::{Array1, Array2, ArrayView1};

/// Default finite-difference step.
pub const DEFAULT_JACOBIAN_EPS: f64 = 1e-6;

/// How the finite-difference step scales with the parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// `h_k = eps` for every parameter.
    #[default]
    Absolute,
    /// `h_k = eps · max(|p_k|, 1)`; suited to parameters of very different
    /// magnitudes (activation energies next to log rate constants).
    Relative,
}

/// Finite-difference configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobianOptions {
    pub eps: f64,
    pub step: StepMode,
}

impl JacobianOptions {
    /// Errors
    /// ------
    /// - `ClumpError::InvalidStep` if `eps` is non-finite or `<= 0`.
    pub fn new(eps: f64, step: StepMode) -> ClumpResult<Self> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ClumpError::InvalidStep { eps });
        }
        Ok(JacobianOptions { eps, step })
    }

    /// Step `h` used for a parameter with value `p`.
    pub fn step_size(&self, p: f64) -> f64 {
        match self.step {
            StepMode::Absolute => self.eps,
            StepMode::Relative => self.eps * p.abs().max(1.0),
        }
    }
}

impl Default for JacobianOptions {
    fn default() -> Self {
        JacobianOptions { eps: DEFAULT_JACOBIAN_EPS, step: StepMode::Absolute }
    }
}

/// jacobian — central-difference Jacobian of `f(t; p)` with respect to `p`.
///
/// Parameters
/// ----------
/// - `f`: `Fn(ArrayView1<f64>, ArrayView1<f64>) -> ClumpResult<Array1<f64>>`
///   Forward model taking `(t, p)`.
/// - `t`: `ArrayView1<f64>`
///   Time points, length `nt`.
/// - `p`: `ArrayView1<f64>`
///   Parameter vector, length `np`.
/// - `opts`: `&JacobianOptions`
///   Step configuration.
///
/// Returns
/// -------
/// `ClumpResult<Array2<f64>>`
///   `nt × np` Jacobian.
///
/// Errors
/// ------
/// - `ClumpError::InvalidStep` if `opts.eps` is unusable.
/// - `ClumpError::LengthMismatch` if `f` returns a vector whose length differs
///   from `nt`.
/// - `ClumpError::NonFiniteOutput` if a derivative is NaN or infinite.
/// - Any error returned by `f`.
///
/// Examples
/// --------
/// ```rust
/// # use clumped_kinetics::errors::ClumpResult;
/// # use clumped_kinetics::inference::{jacobian, JacobianOptions};
/// # use ndarray::{array, Array1, ArrayView1};
/// let f = |t: ArrayView1<f64>, p: ArrayView1<f64>| -> ClumpResult<Array1<f64>> {
///     Ok(t.mapv(|ti| p[0] + p[1] * ti))
/// };
/// let t = array![0.0, 1.0, 2.0];
/// let jac = jacobian(f, t.view(), array![1.0, 3.0].view(), &JacobianOptions::default()).unwrap();
/// assert!((jac[[2, 1]] - 2.0).abs() < 1e-8);
/// ```
pub fn jacobian<F>(
    f: F, t: ArrayView1<f64>, p: ArrayView1<f64>, opts: &JacobianOptions,
) -> ClumpResult<Array2<f64>>
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> ClumpResult<Array1<f64>>,
{
    if !opts.eps.is_finite() || opts.eps <= 0.0 {
        return Err(ClumpError::InvalidStep { eps: opts.eps });
    }
    let nt = t.len();
    let np = p.len();
    let mut jac = Array2::<f64>::zeros((nt, np));
    let mut shifted = p.to_owned();

    for k in 0..np {
        let h = opts.step_size(p[k]);

        shifted[k] = p[k] + h;
        let f_plus = f(t, shifted.view())?;
        shifted[k] = p[k] - h;
        let f_minus = f(t, shifted.view())?;
        shifted[k] = p[k];

        for out in [&f_plus, &f_minus] {
            if out.len() != nt {
                return Err(ClumpError::LengthMismatch {
                    what: "model output",
                    expected: nt,
                    found: out.len(),
                });
            }
        }

        let mut column = jac.column_mut(k);
        for i in 0..nt {
            let derivative = (f_plus[i] - f_minus[i]) / (2.0 * h);
            if !derivative.is_finite() {
                return Err(ClumpError::NonFiniteOutput {
                    model: "jacobian",
                    index: i,
                    value: derivative,
                });
            }
            column[i] = derivative;
        }
    }
    Ok(jac)
}
