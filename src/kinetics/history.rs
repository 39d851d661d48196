//! kinetics::history — forward models along geologic time–temperature paths.
//!
//! Purpose
//! -------
//! Evolve Δ47 through an arbitrary `(t, T)` history given Arrhenius
//! parameters for each model's rate quantities and an initial Δ47. These are
//! the models the geologic-history predictor differentiates to propagate
//! parameter uncertainty.
//!
//! Key behaviors
//! -------------
//! - [`HistoryContext`] binds the equilibrium curve `Deq(t)`, the temperature
//!   path `T(t)`, and the reference temperature `tref`.
//! - [`HistoryModel`] couples a [`HistoryKind`] (resolved once from a
//!   [`ModelType`]) with its context and implements [`ForwardModel`], so its
//!   only free arguments are `t` and the combined parameter vector.
//! - One free function per model (`ph12_history`, `hea14_history`,
//!   `hh20_history`, `se15_history`) implements the step-wise update.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rate constants for the step `[t[i], t[i+1]]` are evaluated at `T[i+1]`
//!   and relaxation is towards `Deq[i+1]`.
//! - At constant temperature every history function reduces exactly (up to
//!   rounding) to the corresponding laboratory fitting form.
//! - `D[0]` is the supplied `D0`, bit-for-bit.
//!
//! Conventions
//! -----------
//! - Parameter vectors list `(E, lnkref)` pairs in model order followed by
//!   `D0`; see [`HistoryModel::param_names`](ForwardModel::param_names).
//! - Activation energies in kJ/mol, times in seconds, Δ47 in permil.
use crate::{
    errors::{ClumpError, ClumpResult},
    kinetics::{
        arrhenius::arrhenius_lnk,
        integrator::{KineticState, backward_euler},
        models::{ForwardModel, ModelType},
        se15::{PairContext, prime_trajectory_to_d47, to_prime},
        validation::{validate_increasing_times, validate_params, validate_temperatures},
    },
};
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Continuous, Normal};

/// Half-width, in standard deviations, of the HH20 quadrature in `ln k`.
pub const HH20_NODE_HALF_WIDTH: f64 = 5.0;

/// Fixed inputs shared by every history model.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryContext {
    deq: Array1<f64>,
    temps: Array1<f64>,
    tref: f64,
}

impl HistoryContext {
    /// Errors
    /// ------
    /// - `ClumpError::LengthMismatch` if `deq.len() != temps.len()`.
    /// - `ClumpError::NonFiniteInput` / `ClumpError::NonPositiveTemperature`
    ///   for unusable temperatures or `deq` values.
    /// - `ClumpError::InvalidOption` for a non-finite or non-positive `tref`.
    pub fn new(deq: Array1<f64>, temps: Array1<f64>, tref: f64) -> ClumpResult<Self> {
        validate_temperatures(temps.view(), deq.len())?;
        if let Some((index, &value)) = deq.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ClumpError::NonFiniteInput { what: "Deq", index, value });
        }
        if !tref.is_finite() || tref <= 0.0 {
            return Err(ClumpError::InvalidOption {
                option: "tref",
                reason: format!("must be a finite temperature > 0 K; got {tref}"),
            });
        }
        Ok(HistoryContext { deq, temps, tref })
    }

    pub fn len(&self) -> usize {
        self.temps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temps.is_empty()
    }

    pub fn deq(&self) -> ArrayView1<'_, f64> {
        self.deq.view()
    }

    pub fn temps(&self) -> ArrayView1<'_, f64> {
        self.temps.view()
    }

    pub fn tref(&self) -> f64 {
        self.tref
    }

    /// `ln k(T[i])` for an Arrhenius pair.
    fn lnk(&self, i: usize, e: f64, lnkref: f64) -> f64 {
        arrhenius_lnk(self.temps[i], e, lnkref, self.tref)
    }
}

/// Model-specific part of a geologic-history forward model.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryKind {
    PH12,
    Hea14,
    HH20 { nlam: usize },
    SE15 { pair: PairContext },
}

impl HistoryKind {
    pub fn model_type(&self) -> ModelType {
        match self {
            HistoryKind::PH12 => ModelType::PH12,
            HistoryKind::Hea14 => ModelType::Hea14,
            HistoryKind::HH20 { .. } => ModelType::HH20,
            HistoryKind::SE15 { .. } => ModelType::SE15,
        }
    }
}

/// History model bound to its context.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryModel {
    pub kind: HistoryKind,
    pub context: HistoryContext,
}

impl HistoryModel {
    pub fn new(kind: HistoryKind, context: HistoryContext) -> Self {
        HistoryModel { kind, context }
    }
}

impl ForwardModel for HistoryModel {
    fn param_names(&self) -> &'static [&'static str] {
        match self.kind {
            HistoryKind::PH12 => &["E", "lnkref", "D0"],
            HistoryKind::Hea14 => &["Ec", "lnkcref", "Ed", "lnkdref", "E2", "lnk2ref", "D0"],
            HistoryKind::HH20 { .. } => &["Emu", "lnkmuref", "Esig", "lnksigref", "D0"],
            HistoryKind::SE15 { .. } => &["E1", "lnk1ref", "Eds", "lnkdsref", "Epp", "lnkppref", "D0"],
        }
    }

    fn evaluate(&self, t: ArrayView1<f64>, params: ArrayView1<f64>) -> ClumpResult<Array1<f64>> {
        let tag = self.kind.model_type().as_str();
        validate_params(tag, params, self.n_params())?;
        let p = params.to_vec();
        let ctx = &self.context;
        let d = match &self.kind {
            HistoryKind::PH12 => ph12_history(t, ctx, p[0], p[1], p[2])?,
            HistoryKind::Hea14 => hea14_history(t, ctx, [p[0], p[1], p[2], p[3], p[4], p[5]], p[6])?,
            HistoryKind::HH20 { nlam } => {
                hh20_history(t, ctx, [p[0], p[1], p[2], p[3]], p[4], *nlam)?
            }
            HistoryKind::SE15 { pair } => {
                se15_history(t, ctx, pair, [p[0], p[1], p[2], p[3], p[4], p[5]], p[6])?
            }
        };
        check_output(tag, &d)?;
        Ok(d)
    }
}

/// ph12_history — pseudo-first-order relaxation along a T path.
///
/// `D[i+1] = Deq[i+1] + (D[i] − Deq[i+1]) · exp(−k(T[i+1]) Δt)`.
///
/// Errors
/// ------
/// - Time/context validation failures (see [`validate_history_times`]).
pub fn ph12_history(
    t: ArrayView1<f64>, ctx: &HistoryContext, e: f64, lnkref: f64, d0: f64,
) -> ClumpResult<Array1<f64>> {
    validate_history_times(t, ctx)?;
    let deq = &ctx.deq;
    let mut d = Array1::<f64>::zeros(t.len());
    d[0] = d0;
    for i in 0..t.len() - 1 {
        let k = ctx.lnk(i + 1, e, lnkref).exp();
        let dt = t[i + 1] - t[i];
        d[i + 1] = deq[i + 1] + (d[i] - deq[i + 1]) * (-k * dt).exp();
    }
    Ok(d)
}

/// hea14_history — transient-defect model along a T path.
///
/// Parameters
/// ----------
/// - `arr`: `[Ec, lnkcref, Ed, lnkdref, E2, lnk2ref]`
///   Arrhenius pairs for the first-order, defect, and annealing rates.
/// - `d0`: initial Δ47.
///
/// Notes
/// -----
/// - Tracks the surviving defect fraction `ξ`, with `ξ[0] = 1` and
///   `ξ[i+1] = ξ[i] exp(−k2 Δt)`. Each step removes the hazard
///   `H = kc Δt + (kd/k2)(ξ[i] − ξ[i+1])` from the disequilibrium, which at
///   constant temperature sums to the Hea14 closed form.
pub fn hea14_history(
    t: ArrayView1<f64>, ctx: &HistoryContext, arr: [f64; 6], d0: f64,
) -> ClumpResult<Array1<f64>> {
    validate_history_times(t, ctx)?;
    let [ec, lnkcref, ed, lnkdref, e2, lnk2ref] = arr;
    let deq = &ctx.deq;
    let mut d = Array1::<f64>::zeros(t.len());
    d[0] = d0;
    let mut xi = 1.0;
    for i in 0..t.len() - 1 {
        let kc = ctx.lnk(i + 1, ec, lnkcref).exp();
        let kd = ctx.lnk(i + 1, ed, lnkdref).exp();
        let k2 = ctx.lnk(i + 1, e2, lnk2ref).exp();
        let dt = t[i + 1] - t[i];

        let xi_next = xi * (-k2 * dt).exp();
        let hazard = kc * dt + (kd / k2) * (xi - xi_next);
        d[i + 1] = deq[i + 1] + (d[i] - deq[i + 1]) * (-hazard).exp();
        xi = xi_next;
    }
    Ok(d)
}

/// hh20_history — lognormal rate distribution along a T path.
///
/// Parameters
/// ----------
/// - `arr`: `[Emu, lnkmuref, Esig, lnksigref]`
///   Arrhenius forms for the mean `mu(T)` and std `sig(T)` of `ln k`.
/// - `d0`: initial Δ47.
/// - `nlam`: number of quadrature nodes (`>= 2`).
///
/// Returns
/// -------
/// `ClumpResult<Array1<f64>>`
///   `D = Σ_j w_j D_j`, where each sub-population relaxes like PH12 with
///   `ln k_j(T) = mu(T) + sig(T) ζ_j`, `ζ_j` uniform on `[−5, 5]` and `w_j`
///   normalized standard-normal weights.
///
/// Errors
/// ------
/// - `ClumpError::InvalidGrid` if `nlam < 2`.
/// - `ClumpError::InvalidSigma` if `sig(T) <= 0` anywhere along the path.
/// - Time/context validation failures.
pub fn hh20_history(
    t: ArrayView1<f64>, ctx: &HistoryContext, arr: [f64; 4], d0: f64, nlam: usize,
) -> ClumpResult<Array1<f64>> {
    validate_history_times(t, ctx)?;
    if nlam < 2 {
        return Err(ClumpError::InvalidGrid { reason: "nlam must be at least 2" });
    }
    let [emu, lnkmuref, esig, lnksigref] = arr;
    let nt = t.len();

    let mu: Vec<f64> = (0..nt).map(|i| ctx.lnk(i, emu, lnkmuref)).collect();
    let sig: Vec<f64> = (0..nt).map(|i| ctx.lnk(i, esig, lnksigref)).collect();
    if let Some(&value) = sig.iter().skip(1).find(|s| !s.is_finite() || **s <= 0.0) {
        return Err(ClumpError::InvalidSigma { value });
    }

    let zeta = Array1::linspace(-HH20_NODE_HALF_WIDTH, HH20_NODE_HALF_WIDTH, nlam);
    let std_normal = Normal::standard();
    let mut weights = zeta.mapv(|z| std_normal.pdf(z));
    let total = weights.sum();
    weights /= total;

    let deq = &ctx.deq;
    let mut d = Array1::<f64>::zeros(nt);
    for (&z, &w) in zeta.iter().zip(weights.iter()) {
        let mut dj = d0;
        for i in 0..nt - 1 {
            let k = (mu[i + 1] + sig[i + 1] * z).exp();
            let dt = t[i + 1] - t[i];
            dj = deq[i + 1] + (dj - deq[i + 1]) * (-k * dt).exp();
            d[i + 1] += w * dj;
        }
    }
    d[0] = d0;
    Ok(d)
}

/// se15_history — paired-diffusion model along a T path.
///
/// Parameters
/// ----------
/// - `pair`: bulk-composition quantities of the sample.
/// - `arr`: `[E1, lnk1ref, Eds, lnkdsref, Epp, lnkppref]`
///   Arrhenius pairs for the direct-exchange rate `k1f`, the pair-diffusion
///   rate `kds`, and the initial pair concentration `p0/peq`.
/// - `d0`: initial Δ47.
///
/// Notes
/// -----
/// - The initial pair state is `exp(lnpp(T[0])) · Δpp_eq`.
/// - Each step uses the rate system at `T[i+1]` and `Deq[i+1]`.
pub fn se15_history(
    t: ArrayView1<f64>, ctx: &HistoryContext, pair: &PairContext, arr: [f64; 6], d0: f64,
) -> ClumpResult<Array1<f64>> {
    validate_history_times(t, ctx)?;
    let [e1, lnk1ref, eds, lnkdsref, epp, lnkppref] = arr;

    let x0 = KineticState::new(to_prime(d0), ctx.lnk(0, epp, lnkppref).exp() * pair.dppeq());
    let states = backward_euler("SE15", t, x0, |i| {
        let k1f = ctx.lnk(i, e1, lnk1ref).exp();
        let kds = ctx.lnk(i, eds, lnkdsref).exp();
        pair.rate_system(k1f, kds, ctx.deq[i])
    })?;
    Ok(prime_trajectory_to_d47(&states, d0))
}

// ---- Helper methods ----

/// Validate `t` for step-wise evolution against a bound context.
///
/// Errors
/// ------
/// - `ClumpError::EmptySeries`, `ClumpError::NonFiniteInput`, or
///   `ClumpError::NonIncreasingTime` for a malformed `t`.
/// - `ClumpError::LengthMismatch` if `t.len() != ctx.len()`.
pub fn validate_history_times(t: ArrayView1<f64>, ctx: &HistoryContext) -> ClumpResult<()> {
    validate_increasing_times(t)?;
    if t.len() != ctx.len() {
        return Err(ClumpError::LengthMismatch { what: "t", expected: ctx.len(), found: t.len() });
    }
    Ok(())
}

fn check_output(model: &'static str, d: &Array1<f64>) -> ClumpResult<()> {
    match d.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(ClumpError::NonFiniteOutput { model, index, value }),
        None => Ok(()),
    }
}
