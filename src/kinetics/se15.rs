//! kinetics::se15 — paired-diffusion (Stolper & Eiler 2015) reordering model.
//!
//! Purpose
//! -------
//! Evaluate the two-state paired-diffusion model, in which clumped ¹³C–¹⁸O
//! bonds either exchange directly or split into adjacent "pairs" of singleton
//! substitutions that then diffuse apart. The state `[Δ47', Δpp']` (prime
//! notation: ratios relative to stochastic) evolves as
//! `dx/dt = A·x + B` and is integrated with the implicit backward-Euler
//! stepper.
//!
//! Key behaviors
//! -------------
//! - [`PairContext`] holds the bulk-composition quantities the model needs:
//!   stochastic ratios and the equilibrium pair composition
//!   `Δpp_eq = Rpeq / R47`, either derived for a coordination number or
//!   supplied directly.
//! - [`HeatingComposition`] resolves a heating experiment's mean `δ13C`,
//!   `δ18O` and isotope-parameter name into a [`PairContext`].
//! - [`PairContext::rate_system`] assembles `(A, B)` from `k1f`, `kds`, and
//!   the equilibrium Δ47.
//! - [`se15`] is the laboratory fitting form with constant `(A, B)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A = [[−a, b], [a, −(b + c)]]`, `B = [0, d]` with `a = k1f`,
//!   `b = k1f · Δ47'_eq / Δpp_eq`, `c = kdp`, `d = kdp · Δpp_eq`; its fixed
//!   point is `(Δ47'_eq, Δpp_eq)`.
//! - `kdp = kds · (R45 − Rpeq)(R46 − Rpeq) / Rpeq` converts the pair
//!   diffusion rate into a pair-destruction rate.
//! - The first reported Δ47 is the supplied `D0`, bit-for-bit.
//!
//! Conventions
//! -----------
//! - Δ47 in permil; `Δ47' = Δ47 / 1000 + 1`.
//! - Rates are supplied as natural logarithms.
use crate::{
    errors::{ClumpError, ClumpResult},
    isotopes::{
        IsotopeParams, IsotopeRegistry, StochasticRatios, equilibrium_pair_ratio,
    },
    kinetics::{
        integrator::{KineticState, backward_euler},
        validation::validate_increasing_times,
    },
};
use nalgebra::{Matrix2, Vector2};
use ndarray::{Array1, ArrayView1};

/// Δ47 (permil) to prime notation.
#[inline]
pub fn to_prime(d47: f64) -> f64 {
    d47 / 1000.0 + 1.0
}

/// Prime notation back to Δ47 (permil).
#[inline]
pub fn from_prime(dp47: f64) -> f64 {
    1000.0 * (dp47 - 1.0)
}

/// Mean bulk composition of a heating experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingComposition {
    pub d13c: f64,
    pub d18o: f64,
    pub iso_params: String,
}

impl HeatingComposition {
    pub fn new(d13c: f64, d18o: f64, iso_params: impl Into<String>) -> Self {
        HeatingComposition { d13c, d18o, iso_params: iso_params.into() }
    }

    /// Mean composition over the experiment's aliquots.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::EmptySeries` if `d13c` is empty.
    /// - `ClumpError::LengthMismatch` if `d18o.len() != d13c.len()`.
    pub fn from_samples(
        d13c: ArrayView1<f64>, d18o: ArrayView1<f64>, iso_params: impl Into<String>,
    ) -> ClumpResult<Self> {
        let (Some(m13), Some(m18)) = (d13c.mean(), d18o.mean()) else {
            return Err(ClumpError::EmptySeries { what: "d13C" });
        };
        if d18o.len() != d13c.len() {
            return Err(ClumpError::LengthMismatch {
                what: "d18O",
                expected: d13c.len(),
                found: d18o.len(),
            });
        }
        Ok(HeatingComposition::new(m13, m18, iso_params))
    }

    /// Resolve against the isotope registry.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::UnknownIsotopeParams` for an unregistered name.
    /// - Propagates [`PairContext::new`] failures.
    pub fn pair_context(&self, registry: &IsotopeRegistry, z: u32) -> ClumpResult<PairContext> {
        let params = registry.get(&self.iso_params)?;
        PairContext::new(self.d13c, self.d18o, params, z)
    }
}

/// Bulk-composition quantities of the paired-diffusion model.
///
/// Only `Δpp_eq` is stored; the equilibrium pair ratio is always
/// `Rpeq = Δpp_eq · R47`, so the two cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContext {
    ratios: StochasticRatios,
    dppeq: f64,
}

impl PairContext {
    /// Pair context for a bulk composition.
    ///
    /// Errors
    /// ------
    /// - Propagates [`StochasticRatios::from_deltas`] failures.
    /// - `ClumpError::InvalidOption` if `z == 0`.
    pub fn new(d13c: f64, d18o: f64, params: &IsotopeParams, z: u32) -> ClumpResult<Self> {
        if z == 0 {
            return Err(ClumpError::InvalidOption {
                option: "coordination",
                reason: "must be a positive integer".to_string(),
            });
        }
        let ratios = StochasticRatios::from_deltas(d13c, d18o, params)?;
        Ok(Self::from_ratios(ratios, z))
    }

    /// Random-distribution `Δpp_eq` for coordination number `z`.
    pub fn from_ratios(ratios: StochasticRatios, z: u32) -> Self {
        let rpeq = equilibrium_pair_ratio(ratios.r45, ratios.r46, ratios.r47, z);
        PairContext { ratios, dppeq: rpeq / ratios.r47 }
    }

    /// Pair context with an externally supplied equilibrium pair composition.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::NonFiniteInput` if `dppeq` is not finite.
    /// - `ClumpError::InvalidOption` if `dppeq <= 0`.
    pub fn with_dppeq(ratios: StochasticRatios, dppeq: f64) -> ClumpResult<Self> {
        if !dppeq.is_finite() {
            return Err(ClumpError::NonFiniteInput { what: "Dppeq", index: 0, value: dppeq });
        }
        if dppeq <= 0.0 {
            return Err(ClumpError::InvalidOption {
                option: "dppeq",
                reason: format!("must be positive, got {dppeq}"),
            });
        }
        Ok(PairContext { ratios, dppeq })
    }

    pub fn ratios(&self) -> StochasticRatios {
        self.ratios
    }

    /// Equilibrium pair composition `Δpp_eq = Rpeq / R47`.
    pub fn dppeq(&self) -> f64 {
        self.dppeq
    }

    /// Equilibrium pair ratio `[p]eq / [44]`.
    pub fn rpeq(&self) -> f64 {
        self.dppeq * self.ratios.r47
    }

    /// Pair-destruction rate `kdp = kds (R45 − Rpeq)(R46 − Rpeq) / Rpeq`.
    pub fn paired_exchange_rate(&self, kds: f64) -> f64 {
        let StochasticRatios { r45, r46, .. } = self.ratios;
        let rpeq = self.rpeq();
        kds * (r45 - rpeq) * (r46 - rpeq) / rpeq
    }

    /// Rate matrix and source `(A, B)` for given rate constants and equilibrium Δ47.
    pub fn rate_system(&self, k1f: f64, kds: f64, deq: f64) -> (Matrix2<f64>, Vector2<f64>) {
        let kdp = self.paired_exchange_rate(kds);
        let a = k1f;
        let b = k1f * to_prime(deq) / self.dppeq;
        let c = kdp;
        let d = kdp * self.dppeq;
        (Matrix2::new(-a, b, a, -(b + c)), Vector2::new(0.0, d))
    }
}

/// Fixed context of a laboratory SE15 fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Se15Context {
    /// Initial Δ47 (permil).
    pub d0: f64,
    /// Equilibrium Δ47 at the experiment temperature (permil).
    pub deq: f64,
    pub pair: PairContext,
}

impl Se15Context {
    /// Errors
    /// ------
    /// - `ClumpError::NonFiniteInput` if `d0` or `deq` is not finite.
    pub fn new(d0: f64, deq: f64, pair: PairContext) -> ClumpResult<Self> {
        for (index, value) in [d0, deq].into_iter().enumerate() {
            if !value.is_finite() {
                return Err(ClumpError::NonFiniteInput { what: "[D0, Deq]", index, value });
            }
        }
        Ok(Se15Context { d0, deq, pair })
    }

    /// Laboratory context with a measured or fitted `Δpp_eq` in place of the
    /// random-distribution value.
    ///
    /// Errors
    /// ------
    /// - Propagates [`PairContext::with_dppeq`] and [`Se15Context::new`] failures.
    pub fn with_dppeq(d0: f64, deq: f64, dppeq: f64, ratios: StochasticRatios) -> ClumpResult<Self> {
        Self::new(d0, deq, PairContext::with_dppeq(ratios, dppeq)?)
    }

    pub fn dppeq(&self) -> f64 {
        self.pair.dppeq()
    }
}

/// se15 — paired-diffusion Δ47 evolution at constant temperature.
///
/// Parameters
/// ----------
/// - `t`: `ArrayView1<f64>`
///   Strictly increasing times (seconds).
/// - `lnk1f`: `f64`
///   ln of the direct-exchange forward rate constant.
/// - `lnkds`: `f64`
///   ln of the pair-diffusion rate constant.
/// - `lnp0peq`: `f64`
///   ln of the initial pair concentration relative to equilibrium.
/// - `ctx`: `&Se15Context`
///   Initial/equilibrium Δ47 and bulk-composition quantities.
///
/// Returns
/// -------
/// `ClumpResult<Array1<f64>>`
///   Δ47 (permil) at each `t`, with `D[0] == ctx.d0` exactly.
///
/// Errors
/// ------
/// - `ClumpError::EmptySeries`, `ClumpError::NonFiniteInput`, or
///   `ClumpError::NonIncreasingTime` for a malformed `t`.
/// - `ClumpError::SingularStepMatrix` / `ClumpError::NonFiniteOutput` from the
///   integrator.
pub fn se15(
    t: ArrayView1<f64>, lnk1f: f64, lnkds: f64, lnp0peq: f64, ctx: &Se15Context,
) -> ClumpResult<Array1<f64>> {
    validate_increasing_times(t)?;
    let (a, b) = ctx.pair.rate_system(lnk1f.exp(), lnkds.exp(), ctx.deq);
    let x0 = KineticState::new(to_prime(ctx.d0), lnp0peq.exp() * ctx.dppeq());

    let states = backward_euler("SE15", t, x0, |_| (a, b))?;
    Ok(prime_trajectory_to_d47(&states, ctx.d0))
}

/// Δ47 column of a state trajectory, reporting the first value as `d0`.
pub(crate) fn prime_trajectory_to_d47(states: &[KineticState], d0: f64) -> Array1<f64> {
    let mut d = Array1::from_iter(states.iter().map(|x| from_prime(x[0])));
    if let Some(first) = d.first_mut() {
        *first = d0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotopes::DEFAULT_COORDINATION;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Fixed point of the rate system at equilibrium.
    // - Exact reporting of D0 and relaxation towards Deq.
    // - Resolution of heating-experiment compositions.
    // -------------------------------------------------------------------------

    fn context(d0: f64, deq: f64) -> Se15Context {
        let registry = IsotopeRegistry::published();
        let pair = HeatingComposition::new(2.0, -5.0, "Brand")
            .pair_context(&registry, DEFAULT_COORDINATION)
            .unwrap();
        Se15Context::new(d0, deq, pair).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The equilibrium state is a fixed point of `A·x + B`.
    //
    // Given
    // -----
    // - Arbitrary rate constants and Deq = 0.45‰.
    //
    // Expect
    // ------
    // - A·[Δ47'_eq, Δpp_eq] + B ≈ 0.
    fn equilibrium_is_fixed_point() {
        let ctx = context(0.6, 0.45);
        let (a, b) = ctx.pair.rate_system(1e-4, 3e-3, ctx.deq);

        let x_eq = KineticState::new(to_prime(ctx.deq), ctx.dppeq());
        let residual = a * x_eq + b;

        assert!(residual.norm() < 1e-15, "residual = {residual}");
        assert!(ctx.pair.paired_exchange_rate(1.0) > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A single time point returns exactly `[D0]`.
    fn single_time_point_returns_exact_d0() {
        let ctx = context(0.6123456789, 0.45);

        let d = se15(array![0.0].view(), -8.0, -6.0, 0.0, &ctx).unwrap();

        assert_eq!(d, array![0.6123456789]);
    }

    #[test]
    // Purpose
    // -------
    // Starting at equilibrium pair concentration, Δ47 relaxes monotonically
    // from D0 towards Deq.
    //
    // Given
    // -----
    // - D0 = 0.65, Deq = 0.40, lnp0peq = 0, fast rates over a long window.
    //
    // Expect
    // ------
    // - Non-increasing curve ending within 1e-4‰ of Deq.
    fn relaxes_towards_equilibrium() {
        let ctx = context(0.65, 0.40);
        let t = Array1::linspace(0.0, 2.0e5, 200);

        let d = se15(t.view(), -7.0, -6.0, 0.0, &ctx).unwrap();

        assert!(d.windows(2).into_iter().all(|w| w[1] <= w[0] + 1e-12));
        assert_relative_eq!(d[d.len() - 1], 0.40, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Composition helpers average samples and reject unknown parameter sets.
    fn heating_composition_resolution() {
        let comp =
            HeatingComposition::from_samples(array![1.0, 3.0].view(), array![-4.0, -6.0].view(), "Brand")
                .unwrap();
        assert_relative_eq!(comp.d13c, 2.0);
        assert_relative_eq!(comp.d18o, -5.0);

        let registry = IsotopeRegistry::published();
        let err = HeatingComposition::new(0.0, 0.0, "Nope").pair_context(&registry, 6).unwrap_err();
        assert!(matches!(err, ClumpError::UnknownIsotopeParams { .. }));

        let err = HeatingComposition::from_samples(array![1.0].view(), array![1.0, 2.0].view(), "Brand")
            .unwrap_err();
        assert!(matches!(err, ClumpError::LengthMismatch { .. }));
    }

    #[test]
    // Purpose
    // -------
    // A supplied `Δpp_eq` drives both the pair ratio and the pair-destruction
    // rate.
    //
    // Given
    // -----
    // - The default context's `Δpp_eq`, and the same composition with
    //   `Δpp_eq` scaled by 1.02.
    //
    // Expect
    // ------
    // - At the default value, `with_dppeq` reproduces the derived context.
    // - After scaling, `Rpeq = Δpp_eq · R47` and `kdp` follows the new `Rpeq`.
    // - Non-finite and non-positive values are rejected.
    fn supplied_pair_composition_updates_exchange_rate() {
        let base = context(0.6, 0.45);
        let ratios = base.pair.ratios();
        let kds = 2.5e-3;

        let same = Se15Context::with_dppeq(0.6, 0.45, base.dppeq(), ratios).unwrap();
        assert_relative_eq!(same.pair.rpeq(), base.pair.rpeq(), max_relative = 1e-14);
        assert_relative_eq!(
            same.pair.paired_exchange_rate(kds),
            base.pair.paired_exchange_rate(kds),
            max_relative = 1e-12
        );

        let dppeq = 1.02 * base.dppeq();
        let shifted = Se15Context::with_dppeq(0.6, 0.45, dppeq, ratios).unwrap();
        let rpeq = dppeq * ratios.r47;
        let expected = kds * (ratios.r45 - rpeq) * (ratios.r46 - rpeq) / rpeq;

        assert_relative_eq!(shifted.pair.rpeq(), rpeq, max_relative = 1e-14);
        assert_relative_eq!(shifted.pair.paired_exchange_rate(kds), expected, max_relative = 1e-12);
        assert!(
            (shifted.pair.paired_exchange_rate(kds) - base.pair.paired_exchange_rate(kds)).abs()
                > 1e-6 * base.pair.paired_exchange_rate(kds)
        );

        let (a, b) = shifted.pair.rate_system(1e-4, kds, 0.45);
        let residual = a * KineticState::new(to_prime(0.45), dppeq) + b;
        assert!(residual.norm() < 1e-15, "residual = {residual}");

        assert!(matches!(
            Se15Context::with_dppeq(0.6, 0.45, f64::NAN, ratios),
            Err(ClumpError::NonFiniteInput { .. })
        ));
        assert!(matches!(
            PairContext::with_dppeq(ratios, 0.0),
            Err(ClumpError::InvalidOption { .. })
        ));
    }
}
