//! calibration — equilibrium Δ47–temperature relations.
//!
//! Purpose
//! -------
//! Provide the equilibrium clumped-isotope value `Δ47eq(T)` towards which
//! every kinetic model relaxes, for each supported calibration and
//! reference frame.
//!
//! Key behaviors
//! -------------
//! - [`Calibration`] and [`RefFrame`] are closed enums parsed from their
//!   published tags.
//! - [`CalibrationRegistry`] maps each `(Calibration, RefFrame)` pair to a
//!   [`CalibrationEquation`]; the built-in registry derives non-native frames
//!   through affine transfer functions.
//!
//! Conventions
//! -----------
//! - Temperatures are in Kelvin; Δ47 values in permil.
//! - The registry is immutable and passed by reference to the predictor.

pub mod names;
pub mod registry;

pub use self::names::{ACID_OFFSET_25_90, Calibration, RefFrame};
pub use self::registry::{CalibrationEquation, CalibrationRegistry};
