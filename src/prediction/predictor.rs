//! Geologic-history predictor.
//!
//! Ties together the equilibrium calibration, the history forward models,
//! and linear uncertainty propagation: given a fitted [`KineticModel`] and a
//! sample's initial composition, it predicts Δ47 along a `(t, T)` path with a
//! 1σ band that accounts for the Arrhenius-parameter covariance and the
//! uncertainty of the initial Δ47.
use crate::{
    calibration::CalibrationRegistry,
    errors::{ClumpError, ClumpResult},
    inference::{augment_covariance, jacobian, propagate_covariance, standard_errors},
    isotopes::IsotopeRegistry,
    kinetics::{
        ForwardModel, HistoryContext, HistoryKind, HistoryModel, ModelType, PairContext,
        validation::{validate_increasing_times, validate_temperatures},
    },
    prediction::{
        model::{InitialComposition, KineticModel},
        options::PredictOptions,
    },
};
use ndarray::{Array1, ArrayView1};
use tracing::debug;

/// Predicted Δ47 path with its 1σ uncertainty and the equilibrium curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub d: Array1<f64>,
    pub d_std: Array1<f64>,
    pub deq: Array1<f64>,
}

/// Forward predictor borrowing the read-only registries it resolves names against.
#[derive(Debug, Clone, Copy)]
pub struct GeologicHistoryPredictor<'a> {
    isotopes: &'a IsotopeRegistry,
    calibrations: &'a CalibrationRegistry,
}

impl<'a> GeologicHistoryPredictor<'a> {
    pub fn new(isotopes: &'a IsotopeRegistry, calibrations: &'a CalibrationRegistry) -> Self {
        GeologicHistoryPredictor { isotopes, calibrations }
    }

    /// predict — Δ47 evolution and uncertainty along a time–temperature path.
    ///
    /// Parameters
    /// ----------
    /// - `t`: `ArrayView1<f64>`
    ///   Strictly increasing times (seconds).
    /// - `temps`: `ArrayView1<f64>`
    ///   Temperatures (Kelvin), one per time point.
    /// - `model`: `&KineticModel`
    ///   Fitted Arrhenius parameters and covariance.
    /// - `d0`: `&InitialComposition`
    ///   Initial Δ47 plus bulk δ13C/δ18O (the latter used by SE15).
    /// - `d0_std`: `&InitialComposition`
    ///   1σ uncertainties; only `d47` enters the propagation.
    /// - `opts`: `&PredictOptions`
    ///   Calibration, reference frame, HH20 node count, isotope set,
    ///   coordination number, and Jacobian step.
    ///
    /// Returns
    /// -------
    /// `ClumpResult<PredictionResult>`
    ///   `d`, `d_std`, and `deq`, all of length `nt`. `d[0] == d0.d47`.
    ///
    /// Errors
    /// ------
    /// - Validation errors for mismatched lengths, non-increasing `t`,
    ///   non-positive `T`, unknown calibration/frame tags, unusable options,
    ///   or a negative/non-finite `d0_std.d47`.
    /// - `ClumpError::MissingCalibration` / `ClumpError::UnknownIsotopeParams`
    ///   for registry misses.
    /// - Numerical errors from the forward model or Jacobian.
    ///
    /// Notes
    /// -----
    /// - The parameter vector is the model's Arrhenius parameters followed by
    ///   `D0`; its covariance is the fitted covariance with `d0_std.d47²`
    ///   appended and no cross terms.
    /// - `D_std = sqrt(diag(J C Jᵀ))` with `J` the central-difference
    ///   Jacobian of the history model.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use clumped_kinetics::prelude::*;
    /// # use ndarray::{array, Array1};
    /// let isotopes = IsotopeRegistry::published();
    /// let calibrations = CalibrationRegistry::published();
    /// let predictor = GeologicHistoryPredictor::new(&isotopes, &calibrations);
    ///
    /// let model = KineticModel::new(
    ///     ModelType::PH12,
    ///     373.15,
    ///     array![[200.0], [-10.0]],
    ///     array![[4.0, 0.0], [0.0, 0.01]],
    /// )
    /// .unwrap();
    /// let t = Array1::linspace(0.0, 1.0e6, 20);
    /// let temps = Array1::from_elem(20, 400.0);
    /// let d0 = InitialComposition::new(0.6, 0.0, 0.0);
    /// let d0_std = InitialComposition::new(0.01, 0.0, 0.0);
    ///
    /// let out = predictor
    ///     .predict(t.view(), temps.view(), &model, &d0, &d0_std, &PredictOptions::default())
    ///     .unwrap();
    /// assert_eq!(out.d.len(), 20);
    /// assert_eq!(out.d[0], 0.6);
    /// ```
    pub fn predict(
        &self, t: ArrayView1<f64>, temps: ArrayView1<f64>, model: &KineticModel,
        d0: &InitialComposition, d0_std: &InitialComposition, opts: &PredictOptions,
    ) -> ClumpResult<PredictionResult> {
        // ---- Validation ----
        validate_temperatures(temps, t.len())?;
        validate_increasing_times(t)?;
        let (calibration, ref_frame) = opts.validate()?;
        if !d0.d47.is_finite() {
            return Err(ClumpError::NonFiniteInput { what: "D0", index: 0, value: d0.d47 });
        }
        if !d0_std.d47.is_finite() || d0_std.d47 < 0.0 {
            return Err(ClumpError::InvalidCovariance {
                reason: format!("D0 std must be finite and >= 0; got {}", d0_std.d47),
            });
        }
        let equation = self.calibrations.get(calibration, ref_frame)?;
        let kind = self.resolve_kind(model.model_type, d0, opts)?;

        // ---- Forward model ----
        let deq = equation.eval(temps)?;
        let context = HistoryContext::new(deq.clone(), temps.to_owned(), model.tref)?;
        let history = HistoryModel::new(kind, context);

        let mut p = model.arrhenius_params().to_vec();
        p.push(d0.d47);
        let p = Array1::from(p);
        let cov = augment_covariance(model.arrhenius_cov().view(), d0_std.d47 * d0_std.d47);
        debug!(
            model = %model.model_type,
            calibration = %calibration,
            ref_frame = %ref_frame,
            nt = t.len(),
            np = p.len(),
            "Predicting geologic history"
        );

        let d = history.evaluate(t, p.view())?;

        // ---- Uncertainty ----
        let jac = jacobian(|t, p| history.evaluate(t, p), t, p.view(), &opts.jacobian)?;
        let dcov = propagate_covariance(jac.view(), cov.view())?;
        let d_std = standard_errors(dcov.view());
        debug!(model = %model.model_type, "Geologic history prediction complete");

        Ok(PredictionResult { d, d_std, deq })
    }

    /// Resolve the history model for a model type.
    ///
    /// SE15 binds the pair context of the sample's own bulk composition.
    fn resolve_kind(
        &self, model_type: ModelType, d0: &InitialComposition, opts: &PredictOptions,
    ) -> ClumpResult<HistoryKind> {
        Ok(match model_type {
            ModelType::PH12 => HistoryKind::PH12,
            ModelType::Hea14 => HistoryKind::Hea14,
            ModelType::HH20 => HistoryKind::HH20 { nlam: opts.nlam },
            ModelType::SE15 => {
                let params = self.isotopes.get(&opts.iso_params)?;
                let pair = PairContext::new(d0.d13c, d0.d18o, params, opts.coordination)?;
                HistoryKind::SE15 { pair }
            }
        })
    }
}
