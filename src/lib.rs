//! clumped_kinetics — clumped-isotope (Δ47) reordering kinetics with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the kinetics engine to Python via the `_clumped_kinetics` extension module.
//! The engine covers stochastic isotopologue ratios, the four published
//! reordering models (PH12, Hea14, HH20, SE15), regularized-inversion kernels
//! for rate spectra, and geologic-history prediction with first-order
//! uncertainty propagation.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`isotopes`, `calibration`, `kinetics`,
//!   `inversion`, `inference`, `prediction`) as the public crate surface, with
//!   a [`prelude`] for the common entry points.
//! - With `python-bindings`, define the `#[pymodule]` initializer for
//!   `_clumped_kinetics` and register the `isotopes`, `inversion`, and
//!   `prediction` submodules so that dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the binding layer only
//!   converts arguments, forwards calls, and maps errors.
//! - Registries are the read-only published sets; Python callers select
//!   entries by name.
//!
//! Conventions
//! -----------
//! - Temperatures are Kelvin, times are seconds, activation energies are
//!   kJ/mol, and isotope values are permil.
//! - Errors from core Rust code surface as [`errors::ClumpError`] and are
//!   converted to `ValueError`, `TypeError`, `KeyError`, or `ArithmeticError`
//!   at the PyO3 boundary.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the end-to-end prediction tests under `tests/`.

pub mod calibration;
pub mod errors;
pub mod inference;
pub mod inversion;
pub mod isotopes;
pub mod kinetics;
pub mod prediction;
pub mod utils;

/// Common entry points for Rust callers.
pub mod prelude {
    pub use crate::{
        calibration::{Calibration, CalibrationRegistry, RefFrame},
        errors::{ClumpError, ClumpResult, ErrorKind},
        inference::{JacobianOptions, StepMode},
        inversion::{LamGrid, RateSpectrum, build_forward_kernel, build_smoothing_matrix},
        isotopes::{IsotopeRegistry, StochasticRatios},
        kinetics::{ForwardModel, HeatingComposition, ModelType, RateModel},
        prediction::{
            GeologicHistoryPredictor, InitialComposition, KineticModel, PredictOptions,
            PredictionResult,
        },
    };
}

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::CalibrationRegistry,
    isotopes::{DEFAULT_ISO_PARAMS, IsotopeRegistry},
    prediction::{GeologicHistoryPredictor, InitialComposition, KineticModel, PredictOptions},
    utils::{extract_f64_matrix, extract_name, extract_owned_array},
};

/// stochastic_ratios — stochastic `(R45, R46, R47)` for a bulk composition.
///
/// Parameters
/// ----------
/// - `d13c`, `d18o`: `f64`
///   Bulk composition, permil VPDB.
/// - `iso_params`: `str`
///   Name of a registered isotope parameter set (default `"Brand"`).
///
/// Errors
/// ------
/// - `TypeError` if `iso_params` is not a string.
/// - `KeyError` for an unregistered set; `ValueError` for unphysical δ values.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (d13c, d18o, iso_params = None))]
fn stochastic_ratios(
    d13c: f64, d18o: f64, iso_params: Option<&Bound<'_, PyAny>>,
) -> PyResult<(f64, f64, f64)> {
    let name = match iso_params {
        Some(raw) => extract_name("iso_params", raw)?,
        None => DEFAULT_ISO_PARAMS.to_string(),
    };
    let r = IsotopeRegistry::published().stochastic_ratios(d13c, d18o, &name)?;
    Ok((r.r45, r.r46, r.r47))
}

/// forward_kernel — `A[i, j] = exp(−exp(lam_j) t_i) · dlam` for a uniform `lam` grid.
#[cfg(feature = "python-bindings")]
#[pyfunction]
fn forward_kernel<'py>(
    py: Python<'py>, t: &Bound<'py, PyAny>, lam: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let t = extract_owned_array(py, "t", t)?;
    let lam = extract_owned_array(py, "lam", lam)?;
    let kernel = inversion::build_forward_kernel(t.view(), lam.view())?;
    Ok(kernel.into_pyarray(py))
}

/// smoothing_matrix — `(n+1) × n` first-difference matrix with boundary rows.
#[cfg(feature = "python-bindings")]
#[pyfunction]
fn smoothing_matrix(py: Python<'_>, n: usize) -> PyResult<Bound<'_, PyArray2<f64>>> {
    Ok(inversion::build_smoothing_matrix(n)?.into_pyarray(py))
}

/// geologic_history — predicted Δ47, its 1σ band, and `Deq` along a `(t, T)` path.
///
/// Parameters
/// ----------
/// - `t`, `temps`: 1-D float arrays of equal length (seconds, Kelvin).
/// - `model_type`: `str`
///   One of `"PH12"`, `"Hea14"`, `"HH20"`, `"SE15"`.
/// - `eparams`: `2 × nk` float array; `eparams_cov`: `2nk × 2nk` float array.
/// - `tref`: Arrhenius reference temperature in Kelvin.
/// - `d0`, `d0_std`: `(D47, d13C, d18O)` tuples.
/// - `calibration`, `ref_frame`, `iso_params`: names (must be strings).
/// - `nlam`, `coordination`: HH20 node count and SE15 coordination number.
///
/// Returns
/// -------
/// `(D, D_std, Deq)` as 1-D float arrays.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    t, temps, model_type, eparams, eparams_cov, tref, d0, d0_std,
    calibration = None, ref_frame = None, nlam = None, iso_params = None, coordination = None
))]
#[allow(clippy::too_many_arguments)]
fn geologic_history<'py>(
    py: Python<'py>, t: &Bound<'py, PyAny>, temps: &Bound<'py, PyAny>,
    model_type: &Bound<'py, PyAny>, eparams: &Bound<'py, PyAny>, eparams_cov: &Bound<'py, PyAny>,
    tref: f64, d0: (f64, f64, f64), d0_std: (f64, f64, f64),
    calibration: Option<&Bound<'py, PyAny>>, ref_frame: Option<&Bound<'py, PyAny>>,
    nlam: Option<usize>, iso_params: Option<&Bound<'py, PyAny>>, coordination: Option<u32>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let t = extract_owned_array(py, "t", t)?;
    let temps = extract_owned_array(py, "temps", temps)?;
    let model_type: kinetics::ModelType = extract_name("model_type", model_type)?.parse()?;
    let model = KineticModel::new(
        model_type,
        tref,
        extract_f64_matrix(eparams)?,
        extract_f64_matrix(eparams_cov)?,
    )?;

    let mut opts = PredictOptions::default();
    if let Some(raw) = calibration {
        opts = opts.with_calibration(extract_name("calibration", raw)?);
    }
    if let Some(raw) = ref_frame {
        opts = opts.with_ref_frame(extract_name("ref_frame", raw)?);
    }
    if let Some(raw) = iso_params {
        opts = opts.with_iso_params(extract_name("iso_params", raw)?);
    }
    if let Some(n) = nlam {
        opts = opts.with_nlam(n);
    }
    if let Some(z) = coordination {
        opts = opts.with_coordination(z);
    }

    let isotopes = IsotopeRegistry::published();
    let calibrations = CalibrationRegistry::published();
    let predictor = GeologicHistoryPredictor::new(&isotopes, &calibrations);
    let out = predictor.predict(
        t.view(),
        temps.view(),
        &model,
        &InitialComposition::new(d0.0, d0.1, d0.2),
        &InitialComposition::new(d0_std.0, d0_std.1, d0_std.2),
        &opts,
    )?;
    Ok((out.d.into_pyarray(py), out.d_std.into_pyarray(py), out.deq.into_pyarray(py)))
}

/// Python module initializer for `_clumped_kinetics`.
///
/// Key behaviors
/// -------------
/// - Create the `isotopes`, `inversion`, and `prediction` submodules and
///   attach them to the parent module.
/// - Register each submodule in `sys.modules` under
///   `clumped_kinetics.<name>` so dotted imports resolve.
///
/// Errors
/// ------
/// - `PyErr` if creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _clumped_kinetics<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let isotopes_mod = PyModule::new(py, "isotopes")?;
    isotopes_mod.add_function(wrap_pyfunction!(stochastic_ratios, &isotopes_mod)?)?;

    let inversion_mod = PyModule::new(py, "inversion")?;
    inversion_mod.add_function(wrap_pyfunction!(forward_kernel, &inversion_mod)?)?;
    inversion_mod.add_function(wrap_pyfunction!(smoothing_matrix, &inversion_mod)?)?;

    let prediction_mod = PyModule::new(py, "prediction")?;
    prediction_mod.add_function(wrap_pyfunction!(geologic_history, &prediction_mod)?)?;

    let modules = py.import("sys")?.getattr("modules")?;
    for sub in [isotopes_mod, inversion_mod, prediction_mod] {
        m.add_submodule(&sub)?;
        let dotted = format!("clumped_kinetics.{}", sub.name()?);
        modules.set_item(dotted, sub)?;
    }
    Ok(())
}
