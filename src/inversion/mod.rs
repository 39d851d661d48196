//! inversion — regularized-inversion kernel for the rate-spectrum model.
//!
//! Purpose
//! -------
//! Build the dense matrices an external non-negative least-squares solver
//! needs to recover a distribution of log-rate constants from a measured
//! decay curve: the forward kernel `A`, the first-difference smoothing
//! matrix `R`, and their stacked Tikhonov system.
//!
//! Key behaviors
//! -------------
//! - [`build_forward_kernel`]: `A[i, j] = exp(−exp(lam_j) t_i) · dlam`.
//! - [`build_smoothing_matrix`]: `(n+1) × n` operator with pinned endpoints.
//! - [`build_regularized_system`]: `[A; ωR]` and `[g; 0]`.
//! - [`LamGrid`] / [`RateSpectrum`]: the uniform `ln k` grid and a
//!   non-negative density on it, shared with the HH20 parametric form.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lam` is strictly ascending with uniform spacing (relative tolerance
//!   [`GRID_UNIFORMITY_TOL`]).
//! - Matrices are recomputed on every call; nothing is cached.
//!
//! Downstream usage
//! ----------------
//! - The inversion itself (choosing `ω` and solving for `rho ≥ 0`) belongs
//!   to the caller's solver.

pub mod grid;
pub mod kernel;

pub use self::grid::{GRID_UNIFORMITY_TOL, LamGrid, RateSpectrum, uniform_spacing};
pub use self::kernel::{build_forward_kernel, build_regularized_system, build_smoothing_matrix};
