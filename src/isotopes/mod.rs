//! isotopes — isotope reference parameters and stochastic isotopologue algebra.
//!
//! Purpose
//! -------
//! Turn bulk carbon/oxygen isotope compositions into the model-ready
//! quantities the kinetic models need: stochastic mass-45/46/47 ratios,
//! atomic fractional abundances, and the equilibrium concentration of
//! isotopically ordered pairs.
//!
//! Key behaviors
//! -------------
//! - [`IsotopeRegistry`] holds the closed set of published reference
//!   parameter sets, looked up by name.
//! - [`StochasticRatios`] and [`FractionalAbundances`] implement the
//!   combinatorial isotopologue bookkeeping.
//! - [`equilibrium_pair_ratio`] / [`equilibrium_pair_composition`] supply the
//!   paired-diffusion equilibrium quantities.
//! - [`conversion`] converts between measured `[Δ47, δ13C, δ18O]` and
//!   `[R45, R46, R47]`.
//!
//! Conventions
//! -----------
//! - δ values are permil VPDB; ratios are relative to the mass-44
//!   isotopologue.
//! - Registries are immutable after construction and are passed by reference.

pub mod conversion;
pub mod params;
pub mod stochastic;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::conversion::{calc_d, calc_r};
pub use self::params::{DEFAULT_ISO_PARAMS, IsotopeParams, IsotopeRegistry};
pub use self::stochastic::{
    DEFAULT_COORDINATION, FractionalAbundances, StochasticRatios, equilibrium_pair_composition,
    equilibrium_pair_ratio,
};
