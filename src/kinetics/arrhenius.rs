//! Arrhenius temperature dependence of rate constants.
//!
//! Fitted kinetic models carry, for every rate constant, an activation energy
//! `E` (kJ/mol) and `ln k` at a reference temperature `Tref`. This module maps
//! them to `ln k(T)`, linear in `1/T`.
use ndarray::{Array1, ArrayView1};

/// Gas constant in kJ mol⁻¹ K⁻¹.
pub const GAS_CONSTANT: f64 = 8.314 / 1000.0;

/// `ln k(T) = lnkref + (E/R)(1/Tref − 1/T)`.
#[inline]
pub fn arrhenius_lnk(temp: f64, e: f64, lnkref: f64, tref: f64) -> f64 {
    lnkref + (e / GAS_CONSTANT) * (1.0 / tref - 1.0 / temp)
}

/// [`arrhenius_lnk`] over a temperature series.
pub fn arrhenius_lnk_series(temps: ArrayView1<f64>, e: f64, lnkref: f64, tref: f64) -> Array1<f64> {
    temps.mapv(|temp| arrhenius_lnk(temp, e, lnkref, tref))
}
