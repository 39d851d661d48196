//! kinetics — solid-state reordering models for clumped isotopes.
//!
//! Purpose
//! -------
//! Implement the four published kinetic theories of Δ47 reordering in
//! carbonates, both as laboratory fitting forms (isothermal heating
//! experiments) and as forward models along geologic time–temperature
//! histories, together with the numerical machinery they share.
//!
//! Key behaviors
//! -------------
//! - [`models`]: [`ModelType`], the [`ForwardModel`] contract, and the
//!   [`RateModel`] fitting forms (`ph12`, `hea14`, `hh20`, `se15`).
//! - [`history`]: [`HistoryModel`] forward models driven by Arrhenius
//!   parameters along a `(t, T)` path.
//! - [`se15`]: paired-diffusion rate matrices and composition context.
//! - [`integrator`]: implicit backward-Euler stepper for 2-state systems.
//! - [`arrhenius`]: temperature dependence of `ln k`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Time points are strictly increasing wherever a model integrates
//!   step-wise; temperatures are strictly positive Kelvin values.
//! - Every model validates its inputs before numerical work and reports
//!   failures through [`crate::errors::ClumpError`].
//!
//! Conventions
//! -----------
//! - Rate constants in s⁻¹ supplied as natural logarithms; activation
//!   energies in kJ/mol; Δ47 in permil.
//!
//! Testing notes
//! -------------
//! - Each history model is tested against its fitting form at constant
//!   temperature; the integrator is tested on analytic diagonal and stiff
//!   systems.

pub mod arrhenius;
pub mod history;
pub mod integrator;
pub mod models;
pub mod se15;
pub mod validation;

pub use self::arrhenius::{GAS_CONSTANT, arrhenius_lnk, arrhenius_lnk_series};
pub use self::history::{HistoryContext, HistoryKind, HistoryModel};
pub use self::integrator::{KineticState, backward_euler};
pub use self::models::{ForwardModel, ModelType, RateModel, hea14, hh20, ph12};
pub use self::se15::{HeatingComposition, PairContext, Se15Context, se15};
