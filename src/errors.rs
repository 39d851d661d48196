//! errors — unified error type for the clumped-isotope kinetics engine.
//!
//! Purpose
//! -------
//! Define [`ClumpError`], the single error type returned by every fallible
//! routine in the crate, together with the [`ClumpResult`] alias and the
//! coarse [`ErrorKind`] taxonomy callers can match on without enumerating
//! every variant.
//!
//! Key behaviors
//! -------------
//! - Group variants by failure class: input validation, argument type,
//!   registry lookup, and numerical breakdown.
//! - Provide human-readable `Display` messages that embed the offending value
//!   or index.
//! - Convert into `PyErr` at the PyO3 boundary when the `python-bindings`
//!   feature is enabled, choosing the Python exception class from
//!   [`ClumpError::kind`].
//!
//! Conventions
//! -----------
//! - Indices are 0-based.
//! - Validation is eager: entry points return the first violation they find
//!   and never attempt recovery.
//! - Numerical errors name the model and step that failed so the caller can
//!   diagnose the offending rate constants.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyArithmeticError, PyKeyError, PyTypeError, PyValueError},
};

/// Crate-wide result alias.
pub type ClumpResult<T> = Result<T, ClumpError>;

/// Coarse failure class of a [`ClumpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: lengths, ranges, or unrecognised option values.
    Validation,
    /// An argument had the wrong type (e.g. a non-string calibration name).
    Type,
    /// A name was not present in a read-only registry.
    KeyNotFound,
    /// A numerical routine broke down (singular step matrix, non-finite output).
    Numerical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClumpError {
    // ---- Input validation ----
    /// Two arrays that must be parallel have different lengths.
    LengthMismatch { what: &'static str, expected: usize, found: usize },

    /// An input series is empty.
    EmptySeries { what: &'static str },

    /// An input value is NaN or infinite.
    NonFiniteInput { what: &'static str, index: usize, value: f64 },

    /// Time points must be strictly increasing.
    NonIncreasingTime { index: usize, previous: f64, value: f64 },

    /// Temperatures are in Kelvin and must be strictly positive.
    NonPositiveTemperature { index: usize, value: f64 },

    /// A fractional abundance fell outside `[0, 1]`.
    AbundanceOutOfRange { isotope: &'static str, value: f64 },

    /// Calibration name is not one of the supported equations.
    InvalidCalibration { name: String },

    /// Reference-frame name is not one of the supported frames.
    InvalidRefFrame { name: String },

    /// Kinetic-model tag is not one of the supported models.
    InvalidModelType { name: String },

    /// A parameter vector or matrix has the wrong size for its model.
    ParameterCountMismatch { model: &'static str, expected: usize, found: usize },

    /// Covariance matrix is malformed (shape, symmetry, or definiteness).
    InvalidCovariance { reason: String },

    /// Discretisation grid is unusable.
    InvalidGrid { reason: &'static str },

    /// Standard deviation of a rate distribution must be finite and > 0.
    InvalidSigma { value: f64 },

    /// Finite-difference step must be finite and > 0.
    InvalidStep { eps: f64 },

    /// Rate spectrum density must be finite and non-negative.
    InvalidSpectrum { index: usize, value: f64 },

    /// A configuration option has an unusable value.
    InvalidOption { option: &'static str, reason: String },

    // ---- Argument types ----
    /// An argument that must be a string (or other specific type) was not.
    TypeMismatch { argument: &'static str, expected: &'static str, found: String },

    // ---- Registry lookups ----
    /// Isotope-parameter set is not registered.
    UnknownIsotopeParams { name: String },

    /// The calibration registry holds no equation for this combination.
    MissingCalibration { calibration: String, ref_frame: String },

    // ---- Numerical ----
    /// `(I - Δt·A)` was singular during implicit integration.
    SingularStepMatrix { model: &'static str, step: usize, det: f64 },

    /// A model evaluation produced NaN or an infinity.
    NonFiniteOutput { model: &'static str, index: usize, value: f64 },
}

impl ClumpError {
    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClumpError::TypeMismatch { .. } => ErrorKind::Type,
            ClumpError::UnknownIsotopeParams { .. } | ClumpError::MissingCalibration { .. } => {
                ErrorKind::KeyNotFound
            }
            ClumpError::SingularStepMatrix { .. } | ClumpError::NonFiniteOutput { .. } => {
                ErrorKind::Numerical
            }
            _ => ErrorKind::Validation,
        }
    }
}

impl std::error::Error for ClumpError {}

impl std::fmt::Display for ClumpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            ClumpError::LengthMismatch { what, expected, found } => {
                write!(f, "Length mismatch for {what}: expected {expected}, found {found}")
            }
            ClumpError::EmptySeries { what } => write!(f, "Input series {what} is empty"),
            ClumpError::NonFiniteInput { what, index, value } => {
                write!(f, "Non-finite value in {what} at index {index}: {value}")
            }
            ClumpError::NonIncreasingTime { index, previous, value } => write!(
                f,
                "Time points must be strictly increasing: t[{index}] = {value} follows {previous}"
            ),
            ClumpError::NonPositiveTemperature { index, value } => {
                write!(f, "Temperature at index {index} must be > 0 K; got {value}")
            }
            ClumpError::AbundanceOutOfRange { isotope, value } => {
                write!(f, "Fractional abundance of {isotope} must lie in [0, 1]; got {value}")
            }
            ClumpError::InvalidCalibration { name } => write!(
                f,
                "Unexpected calibration '{name}'. Must be 'PH12', 'SE15', or 'Bea17'"
            ),
            ClumpError::InvalidRefFrame { name } => write!(
                f,
                "Unexpected ref_frame '{name}'. Must be 'Ghosh25', 'Ghosh90', 'CDES25', or 'CDES90'"
            ),
            ClumpError::InvalidModelType { name } => write!(
                f,
                "Unexpected model type '{name}'. Must be 'PH12', 'Hea14', 'HH20', or 'SE15'"
            ),
            ClumpError::ParameterCountMismatch { model, expected, found } => {
                write!(f, "{model} expects {expected} parameters, found {found}")
            }
            ClumpError::InvalidCovariance { reason } => write!(f, "Invalid covariance: {reason}"),
            ClumpError::InvalidGrid { reason } => write!(f, "Invalid lambda grid: {reason}"),
            ClumpError::InvalidSigma { value } => {
                write!(f, "Rate distribution std must be finite and > 0; got {value}")
            }
            ClumpError::InvalidStep { eps } => {
                write!(f, "Finite-difference step must be finite and > 0; got {eps}")
            }
            ClumpError::InvalidSpectrum { index, value } => write!(
                f,
                "Rate spectrum density at index {index} must be finite and >= 0; got {value}"
            ),
            ClumpError::InvalidOption { option, reason } => {
                write!(f, "Invalid option '{option}': {reason}")
            }

            // ---- Argument types ----
            ClumpError::TypeMismatch { argument, expected, found } => {
                write!(f, "Unexpected {argument} of type {found}. Must be {expected}")
            }

            // ---- Registry lookups ----
            ClumpError::UnknownIsotopeParams { name } => {
                write!(f, "Isotope parameter set '{name}' is not registered")
            }
            ClumpError::MissingCalibration { calibration, ref_frame } => write!(
                f,
                "No calibration equation registered for '{calibration}' in frame '{ref_frame}'"
            ),

            // ---- Numerical ----
            ClumpError::SingularStepMatrix { model, step, det } => write!(
                f,
                "{model}: implicit step matrix is singular at step {step} (det = {det})"
            ),
            ClumpError::NonFiniteOutput { model, index, value } => {
                write!(f, "{model}: non-finite model output at index {index}: {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ClumpError> for PyErr {
    fn from(err: ClumpError) -> PyErr {
        let msg = err.to_string();
        match err.kind() {
            ErrorKind::Validation => PyValueError::new_err(msg),
            ErrorKind::Type => PyTypeError::new_err(msg),
            ErrorKind::KeyNotFound => PyKeyError::new_err(msg),
            ErrorKind::Numerical => PyArithmeticError::new_err(msg),
        }
    }
}
