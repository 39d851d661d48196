//! inference — first-order uncertainty propagation for forward models.
//!
//! Purpose
//! -------
//! Turn a fitted parameter covariance into an uncertainty on a model's
//! predicted curve: differentiate the model numerically with respect to its
//! parameters, then push the covariance through the resulting Jacobian.
//!
//! Key behaviors
//! -------------
//! - [`jacobian`] builds an `nt × np` central-difference Jacobian, configured
//!   by [`JacobianOptions`] (absolute or relative [`StepMode`]).
//! - [`validate_covariance`] checks shape, symmetry, and positive
//!   semi-definiteness; [`augment_covariance`] appends independent
//!   variances.
//! - [`propagate_covariance`] and [`standard_errors`] produce the output
//!   covariance and its per-point standard deviations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Propagation is linear (delta method); it is exact for models linear in
//!   their parameters and first-order accurate otherwise.
//! - Parameter and covariance orderings must agree; callers assemble both.
//!
//! Downstream usage
//! ----------------
//! - The geologic-history predictor composes these pieces; they are equally
//!   usable for laboratory fitting forms through the `ForwardModel` trait.

pub mod covariance;
pub mod jacobian;

pub use self::covariance::{
    EIGEN_EPS, SYMMETRY_TOL, augment_covariance, propagate_covariance, standard_errors,
    validate_covariance,
};
pub use self::jacobian::{DEFAULT_JACOBIAN_EPS, JacobianOptions, StepMode, jacobian};
