//! Fitted kinetic-model descriptor and sample composition carriers.
use crate::{
    errors::{ClumpError, ClumpResult},
    inference::validate_covariance,
    kinetics::ModelType,
};
use ndarray::{Array1, Array2, s};

/// Arrhenius fit of a kinetic model, as produced by an external fitting driver.
///
/// `eparams` has shape `2 × nk`: row 0 holds activation energies (kJ/mol),
/// row 1 holds `ln k` at `tref`, one column per rate quantity in model order.
/// `eparams_cov` is the `2nk × 2nk` covariance in the flattened column order
/// `[E_0, lnkref_0, E_1, lnkref_1, …]`.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticModel {
    pub model_type: ModelType,
    pub tref: f64,
    eparams: Array2<f64>,
    eparams_cov: Array2<f64>,
}

impl KineticModel {
    /// Validated descriptor.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::ParameterCountMismatch` if `eparams` is not `2 × nk`
    ///   with `nk` the model's rate-quantity count (PH12 accepts extra
    ///   columns and uses only the first).
    /// - `ClumpError::NonFiniteInput` for a non-finite parameter.
    /// - `ClumpError::InvalidOption` for a non-finite or non-positive `tref`.
    /// - `ClumpError::InvalidCovariance` if `eparams_cov` is not a symmetric
    ///   PSD matrix of matching size.
    pub fn new(
        model_type: ModelType, tref: f64, eparams: Array2<f64>, eparams_cov: Array2<f64>,
    ) -> ClumpResult<Self> {
        let nk = model_type.n_rate_constants();
        let shape_ok = eparams.nrows() == 2
            && match model_type {
                ModelType::PH12 => eparams.ncols() >= nk,
                _ => eparams.ncols() == nk,
            };
        if !shape_ok {
            return Err(ClumpError::ParameterCountMismatch {
                model: model_type.as_str(),
                expected: 2 * nk,
                found: eparams.len(),
            });
        }
        if let Some((index, &value)) = eparams.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ClumpError::NonFiniteInput { what: "eparams", index, value });
        }
        if !tref.is_finite() || tref <= 0.0 {
            return Err(ClumpError::InvalidOption {
                option: "tref",
                reason: format!("must be a finite temperature > 0 K; got {tref}"),
            });
        }
        validate_covariance(eparams_cov.view(), eparams.len())?;
        Ok(KineticModel { model_type, tref, eparams, eparams_cov })
    }

    pub fn eparams(&self) -> &Array2<f64> {
        &self.eparams
    }

    pub fn eparams_cov(&self) -> &Array2<f64> {
        &self.eparams_cov
    }

    /// Arrhenius parameters in history-model order.
    ///
    /// PH12 uses the first column only; other models flatten every column as
    /// `[E_0, lnkref_0, E_1, lnkref_1, …]`.
    pub fn arrhenius_params(&self) -> Array1<f64> {
        let ncols = match self.model_type {
            ModelType::PH12 => 1,
            _ => self.eparams.ncols(),
        };
        self.eparams.slice(s![.., ..ncols]).t().iter().copied().collect()
    }

    /// Covariance of [`KineticModel::arrhenius_params`].
    pub fn arrhenius_cov(&self) -> Array2<f64> {
        let n = match self.model_type {
            ModelType::PH12 => 2,
            _ => self.eparams_cov.nrows(),
        };
        self.eparams_cov.slice(s![..n, ..n]).to_owned()
    }
}

/// Bulk isotopic composition of a sample (or its 1σ uncertainties).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialComposition {
    /// Δ47, permil.
    pub d47: f64,
    /// δ13C, permil VPDB.
    pub d13c: f64,
    /// δ18O, permil VPDB.
    pub d18o: f64,
}

impl InitialComposition {
    pub fn new(d47: f64, d13c: f64, d18o: f64) -> Self {
        InitialComposition { d47, d13c, d18o }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Parameters flatten column-wise and PH12 keeps only its first column.
    //
    // Given
    // -----
    // - A 2×2 HH20 fit and a 2×2 PH12 fit with an unused second column.
    //
    // Expect
    // ------
    // - HH20: [E0, lnk0, E1, lnk1] and the full covariance.
    // - PH12: [E0, lnk0] and the leading 2×2 block.
    fn arrhenius_params_follow_column_order() {
        let eparams = array![[150.0, 20.0], [-9.0, -0.5]];
        let cov = Array2::from_diag(&array![4.0, 0.01, 1.0, 0.001]);

        let hh20 = KineticModel::new(ModelType::HH20, 373.15, eparams.clone(), cov.clone()).unwrap();
        let ph12 = KineticModel::new(ModelType::PH12, 373.15, eparams, cov).unwrap();

        assert_eq!(hh20.arrhenius_params(), array![150.0, -9.0, 20.0, -0.5]);
        assert_eq!(hh20.arrhenius_cov().dim(), (4, 4));
        assert_eq!(ph12.arrhenius_params(), array![150.0, -9.0]);
        assert_eq!(ph12.arrhenius_cov(), array![[4.0, 0.0], [0.0, 0.01]]);
    }

    #[test]
    // Purpose
    // -------
    // Misshapen fits and covariances are rejected.
    fn descriptor_validation() {
        let hea14_short = KineticModel::new(
            ModelType::Hea14,
            373.15,
            array![[150.0, 20.0], [-9.0, -0.5]],
            Array2::zeros((4, 4)),
        );
        let bad_cov = KineticModel::new(
            ModelType::PH12,
            373.15,
            array![[150.0], [-9.0]],
            array![[1.0, 2.0], [2.0, 1.0]],
        );

        assert!(matches!(hea14_short, Err(ClumpError::ParameterCountMismatch { .. })));
        assert!(matches!(bad_cov, Err(ClumpError::InvalidCovariance { .. })));
    }
}
