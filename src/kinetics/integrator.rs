//! kinetics::integrator — implicit backward-Euler stepper for 2-state systems.
//!
//! Purpose
//! -------
//! Integrate `dx/dt = A(t)·x + B(t)` for a 2-vector state using the implicit
//! backward-Euler update
//! `x[i+1] = (I − Δt_i·A_{i+1})⁻¹ (x[i] + Δt_i·B_{i+1})`.
//!
//! Key behaviors
//! -------------
//! - Exactly `nt − 1` steps for `nt` time points; a single time point returns
//!   the initial state untouched.
//! - The 2×2 inverse is formed in closed form from the determinant.
//! - Singular or non-finite step matrices are reported as
//!   [`ClumpError::SingularStepMatrix`] naming the caller's model and step.
//!
//! Invariants & assumptions
//! ------------------------
//! - `t` is strictly increasing; callers validate this upstream.
//! - The rate matrix and source for the step ending at `t[i]` are supplied by
//!   `system(i)`, so temperature-dependent systems evaluate them at the end of
//!   each step.
//!
//! Notes
//! -----
//! - Rate matrices of the paired-diffusion model can be stiff (widely
//!   separated eigenvalues). Backward Euler is unconditionally stable for
//!   such systems, so step sizes are set by the caller's time grid alone.
use crate::errors::{ClumpError, ClumpResult};
use nalgebra::{Matrix2, Vector2};
use ndarray::ArrayView1;

/// State `[Δ47', Δpp']` of the paired-diffusion model.
pub type KineticState = Vector2<f64>;

/// Relative determinant threshold below which `(I − Δt·A)` is treated as singular.
pub const SINGULAR_DET_EPS: f64 = 1e-14;

/// backward_euler — implicit integration of a linear 2-state system.
///
/// Parameters
/// ----------
/// - `model`: `&'static str`
///   Model tag used in error reports.
/// - `t`: `ArrayView1<f64>`
///   Strictly increasing time points, length `nt ≥ 1`.
/// - `x0`: [`KineticState`]
///   State at `t[0]`.
/// - `system`: `FnMut(usize) -> (Matrix2<f64>, Vector2<f64>)`
///   Returns `(A, B)` for the step ending at index `i` (`1 ≤ i < nt`).
///
/// Returns
/// -------
/// `ClumpResult<Vec<KineticState>>`
///   The trajectory, length `nt`, with `states[0] == x0`.
///
/// Errors
/// ------
/// - `ClumpError::EmptySeries` if `t` is empty.
/// - `ClumpError::SingularStepMatrix` if `|det(I − Δt·A)|` is non-finite or
///   below `SINGULAR_DET_EPS` relative to the matrix scale.
/// - `ClumpError::NonFiniteOutput` if a state component becomes non-finite.
///
/// Examples
/// --------
/// ```rust
/// # use clumped_kinetics::kinetics::integrator::{backward_euler, KineticState};
/// # use nalgebra::{Matrix2, Vector2};
/// # use ndarray::array;
/// let t = array![0.0, 1.0, 2.0];
/// let a = Matrix2::new(-1.0, 0.0, 0.0, -1.0);
/// let states = backward_euler("decay", t.view(), KineticState::new(1.0, 1.0), |_| {
///     (a, Vector2::zeros())
/// })
/// .unwrap();
/// assert_eq!(states.len(), 3);
/// assert!((states[2][0] - 0.25).abs() < 1e-12);
/// ```
pub fn backward_euler<F>(
    model: &'static str, t: ArrayView1<f64>, x0: KineticState, mut system: F,
) -> ClumpResult<Vec<KineticState>>
where
    F: FnMut(usize) -> (Matrix2<f64>, Vector2<f64>),
{
    let nt = t.len();
    if nt == 0 {
        return Err(ClumpError::EmptySeries { what: "t" });
    }
    let mut states = Vec::with_capacity(nt);
    states.push(x0);

    let mut x = x0;
    for i in 0..nt - 1 {
        let dt = t[i + 1] - t[i];
        let (a, b) = system(i + 1);
        let m = Matrix2::identity() - a * dt;
        let m_inv = invert_step_matrix(&m).ok_or(ClumpError::SingularStepMatrix {
            model,
            step: i,
            det: m.determinant(),
        })?;

        x = m_inv * (x + b * dt);
        if let Some(k) = x.iter().position(|v| !v.is_finite()) {
            return Err(ClumpError::NonFiniteOutput { model, index: i + 1, value: x[k] });
        }
        states.push(x);
    }
    Ok(states)
}

// ---- Helper methods ----

/// Closed-form inverse of a 2×2 matrix, `None` when (near-)singular.
fn invert_step_matrix(m: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    if !det.is_finite() || det.abs() <= SINGULAR_DET_EPS * m.norm_squared() {
        return None;
    }
    Some(Matrix2::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)]) / det)
}
