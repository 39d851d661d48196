//! prediction — Δ47 evolution along geologic time–temperature histories.
//!
//! Purpose
//! -------
//! Apply a laboratory-fitted kinetic model to an arbitrary `(t, T)` path and
//! report the predicted Δ47 with a 1σ band.
//!
//! Key behaviors
//! -------------
//! - [`KineticModel`] carries a validated Arrhenius fit (`2 × nk` parameters
//!   plus covariance) for any [`ModelType`](crate::kinetics::ModelType).
//! - [`PredictOptions`] collects calibration, frame, HH20 resolution,
//!   isotope set, coordination, and Jacobian settings, either from the
//!   builder or from a JSON document.
//! - [`GeologicHistoryPredictor::predict`] evaluates `Deq(T)`, runs the
//!   history model, and propagates parameter and initial-Δ47 uncertainty.
//!
//! Invariants & assumptions
//! ------------------------
//! - All inputs are validated before any numerical work; the first failure
//!   is returned.
//! - `D[0]` equals the supplied initial Δ47 exactly.
//!
//! Downstream usage
//! ----------------
//! - The Python `geologic_history` entry point is a thin wrapper over
//!   [`GeologicHistoryPredictor::predict`] using the published registries.

pub mod model;
pub mod options;
pub mod predictor;

pub use self::model::{InitialComposition, KineticModel};
pub use self::options::{DEFAULT_CALIBRATION, DEFAULT_NLAM, DEFAULT_REF_FRAME, PredictOptions};
pub use self::predictor::{GeologicHistoryPredictor, PredictionResult};
