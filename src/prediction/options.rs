//! Prediction options — configuration for geologic-history predictions.
//!
//! Purpose
//! -------
//! Collect the knobs of a geologic-history prediction in one validated
//! carrier: which equilibrium calibration and reference frame define
//! `Deq(T)`, how finely the HH20 rate distribution is discretized, which
//! isotope parameter set and coordination number describe the mineral, and
//! how the uncertainty Jacobian is differenced.
//!
//! Key behaviors
//! -------------
//! - [`PredictOptions::default`] matches the published defaults
//!   (`Bea17`, `CDES90`, `nlam = 400`, `Brand`, `z = 6`).
//! - Builder-style `with_*` setters keep call sites explicit.
//! - [`PredictOptions::from_value`] reads a JSON configuration document;
//!   unknown keys are ignored, wrong JSON types are `TypeMismatch` errors.
//! - [`PredictOptions::validate`] resolves the calibration and frame tags and
//!   checks numeric ranges; the predictor calls it before any numerical work.
//!
//! Conventions
//! -----------
//! - Calibration and frame are stored as the user supplied them and parsed
//!   on validation, so an invalid tag is reported with its original text.
use crate::{
    calibration::{Calibration, RefFrame},
    errors::{ClumpError, ClumpResult},
    inference::{JacobianOptions, StepMode},
    isotopes::{DEFAULT_COORDINATION, DEFAULT_ISO_PARAMS},
};
use serde_json::Value;

/// Default number of HH20 quadrature nodes.
pub const DEFAULT_NLAM: usize = 400;
pub const DEFAULT_CALIBRATION: &str = "Bea17";
pub const DEFAULT_REF_FRAME: &str = "CDES90";

/// Options for [`GeologicHistoryPredictor::predict`](crate::prediction::GeologicHistoryPredictor::predict).
#[derive(Debug, Clone, PartialEq)]
pub struct PredictOptions {
    pub calibration: String,
    pub ref_frame: String,
    pub nlam: usize,
    pub iso_params: String,
    pub coordination: u32,
    pub jacobian: JacobianOptions,
}

impl Default for PredictOptions {
    fn default() -> Self {
        PredictOptions {
            calibration: DEFAULT_CALIBRATION.to_string(),
            ref_frame: DEFAULT_REF_FRAME.to_string(),
            nlam: DEFAULT_NLAM,
            iso_params: DEFAULT_ISO_PARAMS.to_string(),
            coordination: DEFAULT_COORDINATION,
            jacobian: JacobianOptions::default(),
        }
    }
}

impl PredictOptions {
    pub fn with_calibration(mut self, calibration: impl Into<String>) -> Self {
        self.calibration = calibration.into();
        self
    }

    pub fn with_ref_frame(mut self, ref_frame: impl Into<String>) -> Self {
        self.ref_frame = ref_frame.into();
        self
    }

    pub fn with_nlam(mut self, nlam: usize) -> Self {
        self.nlam = nlam;
        self
    }

    pub fn with_iso_params(mut self, iso_params: impl Into<String>) -> Self {
        self.iso_params = iso_params.into();
        self
    }

    pub fn with_coordination(mut self, z: u32) -> Self {
        self.coordination = z;
        self
    }

    pub fn with_jacobian(mut self, jacobian: JacobianOptions) -> Self {
        self.jacobian = jacobian;
        self
    }

    /// Options from a JSON document, starting from the defaults.
    ///
    /// Recognized keys: `calibration`, `ref_frame`, `iso_params` (strings);
    /// `nlam`, `coordination` (non-negative integers); `jacobian_eps`
    /// (number); `jacobian_step` (`"absolute"` or `"relative"`).
    ///
    /// Errors
    /// ------
    /// - `ClumpError::TypeMismatch` if the document is not an object or a
    ///   recognized key has the wrong JSON type.
    /// - `ClumpError::InvalidOption` for out-of-range integers or an unknown
    ///   `jacobian_step`.
    /// - `ClumpError::InvalidStep` for an unusable `jacobian_eps`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use clumped_kinetics::prediction::PredictOptions;
    /// # use serde_json::json;
    /// let opts = PredictOptions::from_value(&json!({"calibration": "PH12", "nlam": 200})).unwrap();
    /// assert_eq!(opts.calibration, "PH12");
    /// assert_eq!(opts.nlam, 200);
    /// assert!(PredictOptions::from_value(&json!({"calibration": 3})).is_err());
    /// ```
    pub fn from_value(value: &Value) -> ClumpResult<Self> {
        let Value::Object(map) = value else {
            return Err(type_mismatch("options", "object", value));
        };
        let mut opts = PredictOptions::default();

        if let Some(v) = map.get("calibration") {
            opts.calibration = expect_str("calibration", v)?.to_string();
        }
        if let Some(v) = map.get("ref_frame") {
            opts.ref_frame = expect_str("ref_frame", v)?.to_string();
        }
        if let Some(v) = map.get("iso_params") {
            opts.iso_params = expect_str("iso_params", v)?.to_string();
        }
        if let Some(v) = map.get("nlam") {
            let n = expect_u64("nlam", v)?;
            opts.nlam = usize::try_from(n).map_err(|_| ClumpError::InvalidOption {
                option: "nlam",
                reason: format!("{n} does not fit in usize"),
            })?;
        }
        if let Some(v) = map.get("coordination") {
            let z = expect_u64("coordination", v)?;
            opts.coordination = u32::try_from(z).map_err(|_| ClumpError::InvalidOption {
                option: "coordination",
                reason: format!("{z} does not fit in u32"),
            })?;
        }

        let mut eps = opts.jacobian.eps;
        let mut step = opts.jacobian.step;
        if let Some(v) = map.get("jacobian_eps") {
            eps = v.as_f64().ok_or_else(|| type_mismatch("jacobian_eps", "number", v))?;
        }
        if let Some(v) = map.get("jacobian_step") {
            step = match expect_str("jacobian_step", v)? {
                "absolute" => StepMode::Absolute,
                "relative" => StepMode::Relative,
                other => {
                    return Err(ClumpError::InvalidOption {
                        option: "jacobian_step",
                        reason: format!("'{other}' is not 'absolute' or 'relative'"),
                    });
                }
            };
        }
        opts.jacobian = JacobianOptions::new(eps, step)?;
        Ok(opts)
    }

    /// Resolve tags and check numeric ranges.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::InvalidCalibration` / `ClumpError::InvalidRefFrame` for
    ///   unknown tags.
    /// - `ClumpError::InvalidOption` if `nlam < 2` or `coordination == 0`.
    /// - `ClumpError::InvalidStep` for an unusable Jacobian step.
    pub fn validate(&self) -> ClumpResult<(Calibration, RefFrame)> {
        let calibration: Calibration = self.calibration.parse()?;
        let ref_frame: RefFrame = self.ref_frame.parse()?;
        if self.nlam < 2 {
            return Err(ClumpError::InvalidOption {
                option: "nlam",
                reason: format!("must be at least 2; got {}", self.nlam),
            });
        }
        if self.coordination == 0 {
            return Err(ClumpError::InvalidOption {
                option: "coordination",
                reason: "must be a positive integer".to_string(),
            });
        }
        JacobianOptions::new(self.jacobian.eps, self.jacobian.step)?;
        Ok((calibration, ref_frame))
    }
}

// ---- Helper methods ----

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(argument: &'static str, expected: &'static str, found: &Value) -> ClumpError {
    ClumpError::TypeMismatch { argument, expected, found: json_type_name(found).to_string() }
}

fn expect_str<'v>(argument: &'static str, value: &'v Value) -> ClumpResult<&'v str> {
    value.as_str().ok_or_else(|| type_mismatch(argument, "string", value))
}

fn expect_u64(argument: &'static str, value: &Value) -> ClumpResult<u64> {
    value.as_u64().ok_or_else(|| type_mismatch(argument, "non-negative integer", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Defaults and builder setters.
    // - JSON parsing, including type and value failures.
    // - Tag resolution in `validate`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults validate and setters override individual fields.
    fn defaults_and_setters() {
        let opts = PredictOptions::default().with_calibration("SE15").with_nlam(50);

        let (cal, frame) = opts.validate().unwrap();

        assert_eq!(cal, Calibration::SE15);
        assert_eq!(frame, RefFrame::CDES90);
        assert_eq!(opts.nlam, 50);
        assert_eq!(opts.iso_params, "Brand");
        assert_eq!(opts.coordination, 6);
    }

    #[test]
    // Purpose
    // -------
    // A full JSON document populates every field.
    fn from_value_reads_all_keys() {
        let doc = json!({
            "calibration": "PH12",
            "ref_frame": "Ghosh25",
            "iso_params": "Gonfiantini",
            "nlam": 120,
            "coordination": 4,
            "jacobian_eps": 1e-5,
            "jacobian_step": "relative",
            "comment": "ignored"
        });

        let opts = PredictOptions::from_value(&doc).unwrap();

        assert_eq!(opts.calibration, "PH12");
        assert_eq!(opts.ref_frame, "Ghosh25");
        assert_eq!(opts.iso_params, "Gonfiantini");
        assert_eq!(opts.nlam, 120);
        assert_eq!(opts.coordination, 4);
        assert_eq!(opts.jacobian, JacobianOptions::new(1e-5, StepMode::Relative).unwrap());
    }

    #[test]
    // Purpose
    // -------
    // Non-string calibration values are type errors; bad tags are validation errors.
    //
    // Given
    // -----
    // - `{"calibration": 47}`, `[1, 2]`, and `{"calibration": "bogus"}`.
    //
    // Expect
    // ------
    // - Type, Type, and (on validate) Validation kinds respectively.
    fn type_and_value_errors_are_distinguished() {
        let numeric = PredictOptions::from_value(&json!({"calibration": 47})).unwrap_err();
        let not_object = PredictOptions::from_value(&json!([1, 2])).unwrap_err();
        let bogus = PredictOptions::from_value(&json!({"calibration": "bogus"}))
            .unwrap()
            .validate()
            .unwrap_err();

        assert_eq!(numeric.kind(), ErrorKind::Type);
        assert!(matches!(
            numeric,
            ClumpError::TypeMismatch { argument: "calibration", expected: "string", .. }
        ));
        assert_eq!(not_object.kind(), ErrorKind::Type);
        assert!(matches!(bogus, ClumpError::InvalidCalibration { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Out-of-range numeric options are rejected.
    fn numeric_ranges_are_checked() {
        assert!(PredictOptions::default().with_nlam(1).validate().is_err());
        assert!(PredictOptions::default().with_coordination(0).validate().is_err());
        assert!(PredictOptions::from_value(&json!({"nlam": -3})).is_err());
        assert!(PredictOptions::from_value(&json!({"jacobian_step": "forward"})).is_err());
        assert!(PredictOptions::from_value(&json!({"jacobian_eps": 0.0})).is_err());
    }
}
