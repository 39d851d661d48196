//! kinetics::models — laboratory fitting forms of the four reordering models.
//!
//! Purpose
//! -------
//! Provide the parametric forward models fitted to isothermal heating
//! experiments, behind a single [`ForwardModel`] contract
//! `evaluate(t, params) → curve`, with the model chosen once through the
//! [`RateModel`] tagged variant.
//!
//! Key behaviors
//! -------------
//! - [`ph12`]: pseudo-first-order exchange with an intercept
//!   (Passey & Henkes, 2012).
//! - [`hea14`]: transient-defect plus first-order exchange
//!   (Henkes et al., 2014).
//! - [`hh20`]: lognormal distribution of rate constants
//!   (Hemingway & Henkes, 2021), discretized on a [`LamGrid`].
//! - [`se15`]: paired-diffusion model (Stolper & Eiler, 2015); see
//!   [`crate::kinetics::se15`].
//!
//! Invariants & assumptions
//! ------------------------
//! - PH12, Hea14 and HH20 return the normalized progress variable
//!   `G = (Δ − Δeq)/(Δ0 − Δeq)`; SE15 returns Δ47 (permil).
//! - `ph12(0) == intercept` and `hea14(0) == 1` hold exactly.
//! - Rate constants are supplied as natural logarithms.
//!
//! Conventions
//! -----------
//! - Parameter order for each [`RateModel`] variant is given by
//!   [`ForwardModel::param_names`].
use crate::{
    errors::{ClumpError, ClumpResult},
    inversion::{LamGrid, RateSpectrum},
    kinetics::{
        se15::{Se15Context, se15},
        validation::{validate_params, validate_times},
    },
};
use ndarray::{Array1, ArrayView1};
use std::{fmt, str::FromStr};
use tracing::warn;

/// Number of standard deviations the HH20 grid should extend past the mean.
pub const HH20_COVERAGE_SIGMAS: f64 = 4.0;

/// Tag of a supported kinetic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    PH12,
    Hea14,
    HH20,
    SE15,
}

impl ModelType {
    pub const ALL: [ModelType; 4] =
        [ModelType::PH12, ModelType::Hea14, ModelType::HH20, ModelType::SE15];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::PH12 => "PH12",
            ModelType::Hea14 => "Hea14",
            ModelType::HH20 => "HH20",
            ModelType::SE15 => "SE15",
        }
    }

    /// Number of Arrhenius-parameterized rate quantities `nk`.
    pub fn n_rate_constants(&self) -> usize {
        match self {
            ModelType::PH12 => 1,
            ModelType::Hea14 => 3,
            ModelType::HH20 => 2,
            ModelType::SE15 => 3,
        }
    }
}

impl FromStr for ModelType {
    type Err = ClumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PH12" => Ok(ModelType::PH12),
            "Hea14" => Ok(ModelType::Hea14),
            "HH20" => Ok(ModelType::HH20),
            "SE15" => Ok(ModelType::SE15),
            other => Err(ClumpError::InvalidModelType { name: other.to_string() }),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common contract of every forward model: a curve from times and a flat
/// parameter vector.
pub trait ForwardModel {
    /// Length of the parameter vector accepted by [`ForwardModel::evaluate`].
    fn n_params(&self) -> usize {
        self.param_names().len()
    }

    /// Parameter names, in the order `evaluate` expects them.
    fn param_names(&self) -> &'static [&'static str];

    /// Evaluate the model at every time point.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::ParameterCountMismatch` if `params.len() != self.n_params()`.
    /// - Model-specific validation and numerical failures.
    fn evaluate(&self, t: ArrayView1<f64>, params: ArrayView1<f64>) -> ClumpResult<Array1<f64>>;
}

/// Laboratory fitting form, resolved once from a [`ModelType`] plus any fixed
/// context the model needs.
#[derive(Debug, Clone, PartialEq)]
pub enum RateModel {
    PH12,
    Hea14,
    HH20 { grid: LamGrid },
    SE15 { context: Se15Context },
}

impl RateModel {
    pub fn model_type(&self) -> ModelType {
        match self {
            RateModel::PH12 => ModelType::PH12,
            RateModel::Hea14 => ModelType::Hea14,
            RateModel::HH20 { .. } => ModelType::HH20,
            RateModel::SE15 { .. } => ModelType::SE15,
        }
    }
}

impl ForwardModel for RateModel {
    fn param_names(&self) -> &'static [&'static str] {
        match self {
            RateModel::PH12 => &["lnk", "intercept"],
            RateModel::Hea14 => &["lnkc", "lnkd", "lnk2"],
            RateModel::HH20 { .. } => &["mu_lam", "sig_lam"],
            RateModel::SE15 { .. } => &["lnk1f", "lnkds", "lnp0peq"],
        }
    }

    fn evaluate(&self, t: ArrayView1<f64>, params: ArrayView1<f64>) -> ClumpResult<Array1<f64>> {
        let tag = self.model_type().as_str();
        validate_params(tag, params, self.n_params())?;
        match self {
            RateModel::PH12 => {
                validate_times(t)?;
                Ok(ph12(t, params[0], params[1]))
            }
            RateModel::Hea14 => {
                validate_times(t)?;
                Ok(hea14(t, params[0], params[1], params[2]))
            }
            RateModel::HH20 { grid } => hh20(t, params[0], params[1], grid),
            RateModel::SE15 { context } => se15(t, params[0], params[1], params[2], context),
        }
    }
}

/// ph12 — `G(t) = intercept · exp(−exp(lnk) · t)`.
///
/// Examples
/// --------
/// ```rust
/// # use clumped_kinetics::kinetics::models::ph12;
/// # use ndarray::array;
/// let g = ph12(array![0.0, 100.0].view(), -5.0, 0.9);
/// assert_eq!(g[0], 0.9);
/// assert!(g[1] < 0.9);
/// ```
pub fn ph12(t: ArrayView1<f64>, lnk: f64, intercept: f64) -> Array1<f64> {
    let k = lnk.exp();
    t.mapv(|ti| intercept * (-k * ti).exp())
}

/// hea14 — transient-defect model.
///
/// `ln G = −kc t + (kd/k2)(exp(−k2 t) − 1)`, where `kc` is the first-order
/// exchange rate, `kd` the initial defect-driven rate, and `k2` the
/// defect-annealing rate.
pub fn hea14(t: ArrayView1<f64>, lnkc: f64, lnkd: f64, lnk2: f64) -> Array1<f64> {
    let (kc, kd, k2) = (lnkc.exp(), lnkd.exp(), lnk2.exp());
    t.mapv(|ti| (-kc * ti + (kd / k2) * ((-k2 * ti).exp() - 1.0)).exp())
}

/// hh20 — lognormal rate-distribution model.
///
/// Parameters
/// ----------
/// - `t`: `ArrayView1<f64>`
///   Times at which to evaluate `G`.
/// - `mu_lam`, `sig_lam`: `f64`
///   Mean and standard deviation of the Gaussian distribution of `ln k`.
/// - `grid`: `&LamGrid`
///   Discretization of `ln k`.
///
/// Returns
/// -------
/// `ClumpResult<Array1<f64>>`
///   `G(t_i) = Σ_j rho_j · exp(−exp(lam_j) t_i) · dlam`.
///
/// Errors
/// ------
/// - `ClumpError::InvalidSigma` if `sig_lam` is non-finite or `<= 0`.
/// - `ClumpError::EmptySeries` / `ClumpError::NonFiniteInput` for a malformed `t`.
///
/// Notes
/// -----
/// - A grid that does not reach `mu_lam ± 4 sig_lam` truncates the
///   distribution. This is reported through `tracing::warn!` and the
///   truncated curve is still returned.
pub fn hh20(
    t: ArrayView1<f64>, mu_lam: f64, sig_lam: f64, grid: &LamGrid,
) -> ClumpResult<Array1<f64>> {
    if !sig_lam.is_finite() || sig_lam <= 0.0 {
        return Err(ClumpError::InvalidSigma { value: sig_lam });
    }
    let lo = mu_lam - HH20_COVERAGE_SIGMAS * sig_lam;
    let hi = mu_lam + HH20_COVERAGE_SIGMAS * sig_lam;
    if grid.lam_min() > lo || grid.lam_max() < hi {
        warn!(
            mu_lam,
            sig_lam,
            lam_min = grid.lam_min(),
            lam_max = grid.lam_max(),
            "HH20 lambda grid does not span mu ± 4 sigma; rate distribution is truncated"
        );
    }
    RateSpectrum::lognormal(mu_lam, sig_lam, grid)?.decay_curve(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        isotopes::{IsotopeRegistry, DEFAULT_COORDINATION},
        kinetics::se15::HeatingComposition,
    };
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact initial values of PH12 and Hea14.
    // - Limiting behavior of Hea14 and HH20 against PH12.
    // - The truncation warning emitted for an HH20 grid narrower than ±4σ.
    // - Dispatch, tag parsing, and parameter-count validation of `RateModel`.
    //
    // They intentionally DO NOT cover:
    // - Curve fitting; the optimizer is supplied by the caller.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // PH12 at t = 0 is exactly the intercept; Hea14 at t = 0 is exactly 1.
    fn initial_values_are_exact() {
        let t = array![0.0, 10.0];

        let g_ph12 = ph12(t.view(), -3.0, 0.8731);
        let g_hea14 = hea14(t.view(), -7.0, -3.0, -4.0);

        assert_eq!(g_ph12[0], 0.8731);
        assert_eq!(g_hea14[0], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Hea14 reduces to first-order decay once defects have annealed.
    //
    // Given
    // -----
    // - Fast annealing (k2 ≫ 1/t), so `ln G ≈ −kc t − kd/k2` at late times.
    //
    // Expect
    // ------
    // - The late-time log slope equals −kc.
    fn hea14_late_time_slope_is_kc() {
        let (lnkc, lnkd, lnk2) = (-6.0, -2.0, 1.0);
        let t = array![100.0, 200.0];

        let g = hea14(t.view(), lnkc, lnkd, lnk2);
        let slope = (g[1].ln() - g[0].ln()) / 100.0;

        assert_relative_eq!(slope, -lnkc.exp(), max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // A narrow HH20 distribution approaches PH12 with unit intercept.
    //
    // Given
    // -----
    // - mu = −5, sig = 0.01, grid covering ±6σ.
    //
    // Expect
    // ------
    // - G within 1e-4 of exp(−exp(−5) t).
    fn narrow_hh20_matches_first_order() {
        let grid = LamGrid::new(-5.06, -4.94, 241).unwrap();
        let t = array![0.0, 50.0, 150.0, 400.0];

        let g = hh20(t.view(), -5.0, 0.01, &grid).unwrap();
        let reference = ph12(t.view(), -5.0, 1.0);

        for (a, b) in g.iter().zip(reference.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // HH20 rejects non-positive sigma and still evaluates on a truncated grid.
    fn hh20_sigma_validation_and_truncation() {
        let grid = LamGrid::new(-10.0, -8.0, 50).unwrap();
        let t = array![0.0, 1.0];

        assert!(matches!(
            hh20(t.view(), -9.0, 0.0, &grid),
            Err(ClumpError::InvalidSigma { .. })
        ));

        let truncated = hh20(t.view(), -9.0, 2.0, &grid).unwrap();
        assert!(truncated[0] < 1.0);
    }

    /// Shared buffer that a test subscriber formats events into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Run `f` with a thread-local subscriber and return what it logged.
    fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs.contents())
    }

    #[test]
    // Purpose
    // -------
    // A grid that cuts off the lognormal tails is reported as a warning with
    // the offending bounds, while a covering grid stays silent.
    //
    // Given
    // -----
    // - mu = −9, sigma = 2 on [−10, −8] (needs [−17, −1]).
    // - mu = −10, sigma = 1 on [−20, 0] (needs [−14, −6]).
    //
    // Expect
    // ------
    // - One WARN event naming the truncation and `lam_min = -10` for the
    //   narrow grid; no output for the wide grid.
    fn hh20_warns_when_grid_truncates_distribution() {
        let t = array![0.0, 1.0];
        let narrow = LamGrid::new(-10.0, -8.0, 50).unwrap();
        let wide = LamGrid::new(-20.0, 0.0, 200).unwrap();

        let (truncated, logs) = capture_logs(|| hh20(t.view(), -9.0, 2.0, &narrow));
        assert!(truncated.is_ok());
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("rate distribution is truncated"), "logs: {logs}");
        assert!(logs.contains("lam_min=-10"), "logs: {logs}");
        assert_eq!(logs.matches("truncated").count(), 1);

        let (covered, logs) = capture_logs(|| hh20(t.view(), -10.0, 1.0, &wide));
        assert_relative_eq!(covered.unwrap()[0], 1.0, epsilon = 1e-6);
        assert!(logs.is_empty(), "logs: {logs}");
    }

    #[test]
    // Purpose
    // -------
    // `RateModel` dispatches by variant and enforces parameter counts.
    //
    // Given
    // -----
    // - Every variant with a correctly sized and an undersized parameter vector.
    //
    // Expect
    // ------
    // - Correct curve lengths and `ParameterCountMismatch` for short vectors.
    fn rate_model_dispatch_and_param_counts() {
        let registry = IsotopeRegistry::published();
        let pair = HeatingComposition::new(0.0, 0.0, "Brand")
            .pair_context(&registry, DEFAULT_COORDINATION)
            .unwrap();
        let models = [
            (RateModel::PH12, array![-5.0, 1.0]),
            (RateModel::Hea14, array![-7.0, -3.0, -4.0]),
            (RateModel::HH20 { grid: LamGrid::new(-20.0, 0.0, 100).unwrap() }, array![-10.0, 1.0]),
            (
                RateModel::SE15 { context: Se15Context::new(0.6, 0.4, pair).unwrap() },
                array![-8.0, -6.0, 0.0],
            ),
        ];
        let t = array![0.0, 10.0, 20.0];

        for (model, params) in models.iter() {
            let curve = model.evaluate(t.view(), params.view()).unwrap();
            assert_eq!(curve.len(), 3);
            assert_eq!(model.n_params(), params.len());

            let short = model.evaluate(t.view(), array![0.0].view()).unwrap_err();
            assert!(matches!(short, ClumpError::ParameterCountMismatch { .. }));
        }
    }

    #[test]
    // Purpose
    // -------
    // Model tags parse and print; unknown tags are validation errors.
    fn model_type_tags() {
        for m in ModelType::ALL {
            assert_eq!(m.to_string().parse::<ModelType>().unwrap(), m);
        }
        assert!(matches!("HH21".parse::<ModelType>(), Err(ClumpError::InvalidModelType { .. })));
    }
}
