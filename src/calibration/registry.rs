//! Calibration equations and their read-only registry.
//!
//! Every equation has the form
//! `Δ47eq(T) = scale · Σ_k c_k · T^(−k) + offset`, which covers both the
//! common `a·10⁶/T² + b` relations and the higher-order theoretical
//! polynomial. The built-in registry stores each calibration in its native
//! frame and derives the remaining frames through the affine transfer
//! functions of [`RefFrame::to_cdes25`].
use crate::{
    calibration::names::{Calibration, RefFrame},
    errors::{ClumpError, ClumpResult},
};
use ndarray::{Array1, ArrayView1};
use std::collections::BTreeMap;

/// Equilibrium Δ47 as a polynomial in `1/T` followed by an affine map.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationEquation {
    /// Coefficients `c_k` of `T^(−k)`, starting at `k = 0`.
    pub coeffs: Vec<f64>,
    pub scale: f64,
    pub offset: f64,
}

impl CalibrationEquation {
    pub fn new(coeffs: Vec<f64>) -> Self {
        CalibrationEquation { coeffs, scale: 1.0, offset: 0.0 }
    }

    /// Re-express an equation native to `from` in the frame `to`.
    pub fn transferred(&self, from: RefFrame, to: RefFrame) -> Self {
        let (s_from, i_from) = from.to_cdes25();
        let (s_to, i_to) = to.to_cdes25();
        CalibrationEquation {
            coeffs: self.coeffs.clone(),
            scale: self.scale * s_from / s_to,
            offset: (self.offset * s_from + i_from - i_to) / s_to,
        }
    }

    /// Δ47eq at a single temperature (Kelvin).
    pub fn eval_scalar(&self, temp: f64) -> f64 {
        let x = 1.0 / temp;
        // Horner in 1/T.
        let poly = self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c);
        self.scale * poly + self.offset
    }

    /// Δ47eq over a temperature series.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::NonFiniteInput` / `ClumpError::NonPositiveTemperature`
    ///   for unusable temperatures.
    pub fn eval(&self, temps: ArrayView1<f64>) -> ClumpResult<Array1<f64>> {
        for (index, &temp) in temps.iter().enumerate() {
            if !temp.is_finite() {
                return Err(ClumpError::NonFiniteInput { what: "T", index, value: temp });
            }
            if temp <= 0.0 {
                return Err(ClumpError::NonPositiveTemperature { index, value: temp });
            }
        }
        Ok(temps.mapv(|temp| self.eval_scalar(temp)))
    }
}

/// Read-only registry mapping `(Calibration, RefFrame)` to an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRegistry {
    equations: BTreeMap<(Calibration, RefFrame), CalibrationEquation>,
}

impl CalibrationRegistry {
    /// Registry with all twelve published combinations.
    ///
    /// Native equations:
    /// - Bea17 (CDES90): `0.0422·10⁶/T² + 0.215`.
    /// - PH12 (Ghosh25): `0.0592·10⁶/T² − 0.02`.
    /// - SE15 (CDES25): `−3.33040·10⁹/T⁴ + 2.32415·10⁷/T³ − 2.91282·10³/T²
    ///   − 5.54042/T + 0.23252`.
    pub fn published() -> Self {
        let natives = [
            (Calibration::Bea17, RefFrame::CDES90, vec![0.215, 0.0, 0.0422e6]),
            (Calibration::PH12, RefFrame::Ghosh25, vec![-0.02, 0.0, 0.0592e6]),
            (
                Calibration::SE15,
                RefFrame::CDES25,
                vec![0.23252, -5.54042, -2.91282e3, 2.32415e7, -3.33040e9],
            ),
        ];

        let mut equations = BTreeMap::new();
        for (cal, native_frame, coeffs) in natives {
            let native = CalibrationEquation::new(coeffs);
            for frame in RefFrame::ALL {
                equations.insert((cal, frame), native.transferred(native_frame, frame));
            }
        }
        CalibrationRegistry { equations }
    }

    /// Registry from caller-supplied equations.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((Calibration, RefFrame), CalibrationEquation)>,
    {
        CalibrationRegistry { equations: entries.into_iter().collect() }
    }

    /// Equation for a calibration in a reference frame.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::MissingCalibration` if the combination is not registered.
    pub fn get(&self, cal: Calibration, frame: RefFrame) -> ClumpResult<&CalibrationEquation> {
        self.equations.get(&(cal, frame)).ok_or_else(|| ClumpError::MissingCalibration {
            calibration: cal.to_string(),
            ref_frame: frame.to_string(),
        })
    }

    /// Look up by tag strings.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::InvalidCalibration` / `ClumpError::InvalidRefFrame` for
    ///   unknown tags.
    /// - `ClumpError::MissingCalibration` if the combination is not registered.
    pub fn get_by_name(&self, cal: &str, frame: &str) -> ClumpResult<&CalibrationEquation> {
        self.get(cal.parse()?, frame.parse()?)
    }
}

impl Default for CalibrationRegistry {
    fn default() -> Self {
        CalibrationRegistry::published()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Native-frame evaluation of the published equations.
    // - Frame transfer consistency (25 vs 90 °C acid offset).
    // - Lookup failures and temperature validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Bea17 in its native frame reproduces the closed-form relation.
    //
    // Given
    // -----
    // - T = 373 K.
    //
    // Expect
    // ------
    // - Δ47 = 0.0422e6 / 373² + 0.215.
    fn bea17_native_frame_matches_closed_form() {
        let registry = CalibrationRegistry::published();
        let eq = registry.get(Calibration::Bea17, RefFrame::CDES90).unwrap();

        let value = eq.eval_scalar(373.0);

        assert_relative_eq!(value, 0.0422e6 / (373.0 * 373.0) + 0.215, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // CDES25 and CDES90 versions differ by exactly the acid offset.
    //
    // Given
    // -----
    // - Every calibration at several temperatures.
    //
    // Expect
    // ------
    // - Δ(CDES25) − Δ(CDES90) = 0.092.
    fn cdes_frames_differ_by_acid_offset() {
        let registry = CalibrationRegistry::published();
        let temps = array![298.15, 373.0, 573.0];

        for cal in Calibration::ALL {
            let d25 = registry.get(cal, RefFrame::CDES25).unwrap().eval(temps.view()).unwrap();
            let d90 = registry.get(cal, RefFrame::CDES90).unwrap().eval(temps.view()).unwrap();
            for i in 0..temps.len() {
                assert_relative_eq!(d25[i] - d90[i], 0.092, epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Equilibrium Δ47 decreases with temperature for every combination.
    fn equilibrium_decreases_with_temperature() {
        let registry = CalibrationRegistry::published();
        let temps = array![273.15, 373.15, 473.15, 673.15];

        for cal in Calibration::ALL {
            for frame in RefFrame::ALL {
                let d = registry.get(cal, frame).unwrap().eval(temps.view()).unwrap();
                assert!(d.windows(2).into_iter().all(|w| w[1] < w[0]), "{cal} {frame}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Lookup and evaluation failures use the documented variants.
    fn lookup_and_temperature_errors() {
        let partial = CalibrationRegistry::from_entries([(
            (Calibration::PH12, RefFrame::Ghosh25),
            CalibrationEquation::new(vec![-0.02, 0.0, 0.0592e6]),
        )]);

        let missing = partial.get(Calibration::Bea17, RefFrame::CDES90).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::KeyNotFound);

        let bogus = partial.get_by_name("bogus", "CDES90").unwrap_err();
        assert_eq!(bogus.kind(), ErrorKind::Validation);

        let eq = partial.get(Calibration::PH12, RefFrame::Ghosh25).unwrap();
        let err = eq.eval(array![300.0, -1.0].view()).unwrap_err();
        assert!(matches!(err, ClumpError::NonPositiveTemperature { index: 1, .. }));
    }
}
