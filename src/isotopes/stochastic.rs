//! isotopes::stochastic — stochastic isotopologue ratios and pair concentrations.
//!
//! Purpose
//! -------
//! Convert bulk carbon/oxygen isotope compositions into the stochastic
//! (randomly distributed) isotopologue ratios of mass 45–47 CO₂, and derive
//! the equilibrium concentration of isotopically ordered "pairs" used by the
//! paired-diffusion (SE15) kinetic model.
//!
//! Key behaviors
//! -------------
//! - [`FractionalAbundances::from_deltas`] maps `(δ13C, δ18O)` to atomic
//!   fractional abundances of ¹²C/¹³C and ¹⁶O/¹⁷O/¹⁸O, with ¹⁷O tied to
//!   ¹⁸O through the mass-dependent law `R17 = R17_std (R18/R18_std)^λ17`.
//! - [`StochasticRatios::from_deltas`] combines those abundances over every
//!   symmetric atom arrangement to get isotopologue abundances for masses
//!   44–47 and re-expresses masses 45–47 relative to mass 44.
//! - [`equilibrium_pair_ratio`] evaluates the two closed-form pair
//!   concentrations of Stolper & Eiler (2015, Eqs. 13a/b) and returns their
//!   mean.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every fractional abundance lies in `[0, 1]`; carbon and oxygen
//!   abundances each sum to one.
//! - Returned ratios are strictly positive for physically meaningful
//!   compositions (δ > −1000‰).
//!
//! Conventions
//! -----------
//! - δ values are in permil relative to VPDB.
//! - Ratios are dimensionless and normalised to the mass-44 isotopologue.
//!
//! Testing notes
//! -------------
//! - Unit tests check positivity, abundance closure to 1e-10 for every
//!   registered parameter set, and the closeness of the two pair-concentration
//!   expressions.
use crate::{
    errors::{ClumpError, ClumpResult},
    isotopes::params::IsotopeParams,
};

/// Conventional mineral coordination number for carbonate pairs.
pub const DEFAULT_COORDINATION: u32 = 6;

/// Atomic fractional abundances of carbon and oxygen isotopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalAbundances {
    pub f12: f64,
    pub f13: f64,
    pub f16: f64,
    pub f17: f64,
    pub f18: f64,
}

impl FractionalAbundances {
    /// Fractional abundances for a bulk composition.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::NonFiniteInput` if either δ is NaN/±∞.
    /// - `ClumpError::AbundanceOutOfRange` if any abundance leaves `[0, 1]`.
    pub fn from_deltas(d13c: f64, d18o: f64, params: &IsotopeParams) -> ClumpResult<Self> {
        if !d13c.is_finite() {
            return Err(ClumpError::NonFiniteInput { what: "d13C", index: 0, value: d13c });
        }
        if !d18o.is_finite() {
            return Err(ClumpError::NonFiniteInput { what: "d18O", index: 0, value: d18o });
        }
        let r13 = (d13c / 1000.0 + 1.0) * params.r13_std;
        let r18 = (d18o / 1000.0 + 1.0) * params.r18_std;
        let r17 = params.r17_std * (r18 / params.r18_std).powf(params.lam17);

        let f12 = 1.0 / (1.0 + r13);
        let f13 = r13 * f12;
        let f16 = 1.0 / (1.0 + r17 + r18);
        let f17 = r17 * f16;
        let f18 = r18 * f16;

        let abundances = FractionalAbundances { f12, f13, f16, f17, f18 };
        abundances.validate()?;
        Ok(abundances)
    }

    /// `f12 + f13`.
    pub fn carbon_sum(&self) -> f64 {
        self.f12 + self.f13
    }

    /// `f16 + f17 + f18`.
    pub fn oxygen_sum(&self) -> f64 {
        self.f16 + self.f17 + self.f18
    }

    fn validate(&self) -> ClumpResult<()> {
        let entries = [
            ("12C", self.f12),
            ("13C", self.f13),
            ("16O", self.f16),
            ("17O", self.f17),
            ("18O", self.f18),
        ];
        for (isotope, value) in entries {
            if !(0.0..=1.0).contains(&value) {
                return Err(ClumpError::AbundanceOutOfRange { isotope, value });
            }
        }
        Ok(())
    }
}

/// Stochastic isotopologue ratios `(R45, R46, R47)` relative to mass 44.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticRatios {
    pub r45: f64,
    pub r46: f64,
    pub r47: f64,
}

impl StochasticRatios {
    /// Stochastic ratios for a bulk composition.
    ///
    /// Isotopologue abundances:
    /// - `[44] = [12][16][16]`
    /// - `[45] = [13][16][16] + 2[12][17][16]`
    /// - `[46] = 2[12][16][18] + 2[13][17][16] + [12][17][17]`
    /// - `[47] = 2[13][16][18] + 2[12][17][18] + [13][17][17]`
    ///
    /// Errors
    /// ------
    /// - Propagates [`FractionalAbundances::from_deltas`] failures.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use clumped_kinetics::isotopes::{IsotopeRegistry, StochasticRatios};
    /// let registry = IsotopeRegistry::published();
    /// let params = registry.get("Brand").unwrap();
    /// let r = StochasticRatios::from_deltas(2.0, -5.0, params).unwrap();
    /// assert!(r.r45 > 0.0 && r.r46 > 0.0 && r.r47 > 0.0);
    /// ```
    pub fn from_deltas(d13c: f64, d18o: f64, params: &IsotopeParams) -> ClumpResult<Self> {
        let fa = FractionalAbundances::from_deltas(d13c, d18o, params)?;
        Ok(Self::from_abundances(&fa))
    }

    /// Stochastic ratios assembled from atomic fractional abundances.
    pub fn from_abundances(fa: &FractionalAbundances) -> Self {
        let FractionalAbundances { f12, f13, f16, f17, f18 } = *fa;
        let f44 = f12 * f16 * f16;
        let f45 = f13 * f16 * f16 + 2.0 * f12 * f17 * f16;
        let f46 = 2.0 * f12 * f16 * f18 + 2.0 * f13 * f17 * f16 + f12 * f17 * f17;
        let f47 = 2.0 * f13 * f16 * f18 + 2.0 * f12 * f17 * f18 + f13 * f17 * f17;
        StochasticRatios { r45: f45 / f44, r46: f46 / f44, r47: f47 / f44 }
    }
}

/// Equilibrium pair concentration ratio `Rpeq = [p]eq / [44]`.
///
/// Parameters
/// ----------
/// - `r45`, `r46`, `r47`: stochastic isotopologue ratios.
/// - `z`: mineral coordination number (6 for calcite).
///
/// Notes
/// -----
/// - Uses the mean of `pa = f46 (1 − (1 − f45)^z)` and
///   `pb = f45 (1 − (1 − f46)^z)`. The two differ by roughly 1–2% relative,
///   so the mean is an approximation rather than an error.
/// - Every `u32` coordination number is valid; as `z` grows the ratio
///   saturates at `(R45 + R46) / 2`.
pub fn equilibrium_pair_ratio(r45: f64, r46: f64, r47: f64, z: u32) -> f64 {
    let f44 = 1.0 / (1.0 + r45 + r46 + r47);
    let f45 = r45 * f44;
    let f46 = r46 * f44;
    let zf = f64::from(z);

    let pa = f46 * (1.0 - (1.0 - f45).powf(zf));
    let pb = f45 * (1.0 - (1.0 - f46).powf(zf));
    let p = 0.5 * (pa + pb);
    p / f44
}

/// Equilibrium pair composition in prime notation, `Δpp_eq = Rpeq / R47`.
pub fn equilibrium_pair_composition(ratios: &StochasticRatios, z: u32) -> f64 {
    equilibrium_pair_ratio(ratios.r45, ratios.r46, ratios.r47, z) / ratios.r47
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotopes::params::IsotopeRegistry;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Positivity and closure of stochastic ratios/abundances for all
    //   registered parameter sets.
    // - Rejection of unphysical compositions.
    // - Equilibrium pair-ratio behaviour.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Every registered set yields positive ratios and closed abundances.
    //
    // Given
    // -----
    // - A grid of bulk compositions spanning typical carbonate values.
    //
    // Expect
    // ------
    // - R45, R46, R47 > 0.
    // - Carbon and oxygen abundances each sum to 1 within 1e-10.
    fn ratios_positive_and_abundances_closed_for_all_sets() {
        // Arrange
        let registry = IsotopeRegistry::published();
        let compositions = [(0.0, 0.0), (2.5, -8.0), (-30.0, 25.0), (10.0, -40.0)];

        for name in registry.names() {
            let params = registry.get(name).unwrap();
            for &(d13c, d18o) in &compositions {
                // Act
                let fa = FractionalAbundances::from_deltas(d13c, d18o, params).unwrap();
                let r = StochasticRatios::from_abundances(&fa);

                // Assert
                assert!(r.r45 > 0.0 && r.r46 > 0.0 && r.r47 > 0.0, "{name}");
                assert!((fa.carbon_sum() - 1.0).abs() < 1e-10);
                assert!((fa.oxygen_sum() - 1.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // At VPDB composition, R45 ≈ R13 + 2 R17 to first order.
    //
    // Given
    // -----
    // - Brand parameters and δ13C = δ18O = 0.
    //
    // Expect
    // ------
    // - R45 = R13 + 2 R17 exactly (the mass-45 species has no second-order terms).
    fn r45_matches_first_order_definition_at_vpdb() {
        let params = IsotopeParams::new(0.01118, 0.0020052, 0.00038475, 0.528);

        let r = StochasticRatios::from_deltas(0.0, 0.0, &params).unwrap();

        assert_relative_eq!(r.r45, 0.01118 + 2.0 * 0.00038475, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // δ values at or below −1000‰ produce negative abundances and are rejected.
    //
    // Given
    // -----
    // - δ13C = −1500‰.
    //
    // Expect
    // ------
    // - `ClumpError::AbundanceOutOfRange`.
    fn unphysical_delta_is_rejected() {
        let params = IsotopeParams::new(0.01118, 0.0020052, 0.00038475, 0.528);

        let err = StochasticRatios::from_deltas(-1500.0, 0.0, &params).unwrap_err();

        assert!(matches!(err, ClumpError::AbundanceOutOfRange { .. }));
    }

    #[test]
    // Purpose
    // -------
    // The pair ratio is positive and grows with the coordination number.
    //
    // Given
    // -----
    // - Stochastic ratios at VPDB and z = 6 vs z = 4.
    //
    // Expect
    // ------
    // - Rpeq(z = 6) > Rpeq(z = 4) > 0.
    // - Δpp_eq is finite and positive.
    fn equilibrium_pair_ratio_positive_and_increasing_in_z() {
        let params = IsotopeParams::new(0.01118, 0.0020052, 0.00038475, 0.528);
        let r = StochasticRatios::from_deltas(0.0, 0.0, &params).unwrap();

        let rp6 = equilibrium_pair_ratio(r.r45, r.r46, r.r47, 6);
        let rp4 = equilibrium_pair_ratio(r.r45, r.r46, r.r47, 4);
        let dpp = equilibrium_pair_composition(&r, DEFAULT_COORDINATION);

        assert!(rp4 > 0.0);
        assert!(rp6 > rp4);
        assert!(dpp.is_finite() && dpp > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Coordination numbers beyond the `i32` range stay on the saturating
    // branch instead of wrapping to a negative exponent.
    //
    // Given
    // -----
    // - Stochastic ratios at VPDB.
    // - z = 6, z = 2³¹, and z = u32::MAX.
    //
    // Expect
    // ------
    // - z = 6 matches the closed form with an integer power.
    // - Both large z values are finite, positive, and equal `(R45 + R46) / 2`.
    fn equilibrium_pair_ratio_saturates_for_large_coordination() {
        let params = IsotopeParams::new(0.01118, 0.0020052, 0.00038475, 0.528);
        let r = StochasticRatios::from_deltas(0.0, 0.0, &params).unwrap();
        let f44 = 1.0 / (1.0 + r.r45 + r.r46 + r.r47);
        let (f45, f46) = (r.r45 * f44, r.r46 * f44);
        let closed_form_z6 =
            0.5 * (f46 * (1.0 - (1.0 - f45).powi(6)) + f45 * (1.0 - (1.0 - f46).powi(6))) / f44;

        assert_relative_eq!(
            equilibrium_pair_ratio(r.r45, r.r46, r.r47, 6),
            closed_form_z6,
            max_relative = 1e-12
        );
        for z in [1_u32 << 31, u32::MAX] {
            let rp = equilibrium_pair_ratio(r.r45, r.r46, r.r47, z);
            assert!(rp.is_finite() && rp > 0.0, "z = {z}: {rp}");
            assert_relative_eq!(rp, 0.5 * (r.r45 + r.r46), max_relative = 1e-12);
        }
    }
}
