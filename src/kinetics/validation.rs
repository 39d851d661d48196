//! kinetics validation helpers — shared checks for time/temperature series
//! and parameter vectors.
//!
//! Purpose
//! -------
//! Centralize the input checks every forward model and the geologic-history
//! predictor perform before any numerical work, so that all entry points
//! reject malformed input with the same structured errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Time series are non-empty, finite, and (where integration is involved)
//!   strictly increasing.
//! - Temperatures are finite and strictly positive Kelvin values.
//!
//! Conventions
//! -----------
//! - Helpers return the first violation found and never panic on invalid
//!   inputs. No I/O and no logging.
use crate::errors::{ClumpError, ClumpResult};
use ndarray::ArrayView1;

/// Validate a time vector that only needs finite, non-empty values.
///
/// Errors
/// ------
/// - `ClumpError::EmptySeries` if `t` is empty.
/// - `ClumpError::NonFiniteInput` for the first NaN/∞ entry.
pub fn validate_times(t: ArrayView1<f64>) -> ClumpResult<()> {
    if t.is_empty() {
        return Err(ClumpError::EmptySeries { what: "t" });
    }
    if let Some((index, &value)) = t.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ClumpError::NonFiniteInput { what: "t", index, value });
    }
    Ok(())
}

/// Validate a time vector for step-wise integration.
///
/// Errors
/// ------
/// - Everything [`validate_times`] reports.
/// - `ClumpError::NonIncreasingTime` at the first index where
///   `t[i] <= t[i − 1]`.
pub fn validate_increasing_times(t: ArrayView1<f64>) -> ClumpResult<()> {
    validate_times(t)?;
    for index in 1..t.len() {
        if t[index] <= t[index - 1] {
            return Err(ClumpError::NonIncreasingTime {
                index,
                previous: t[index - 1],
                value: t[index],
            });
        }
    }
    Ok(())
}

/// Validate a temperature history parallel to `nt` time points.
///
/// Errors
/// ------
/// - `ClumpError::LengthMismatch` if `temps.len() != nt`.
/// - `ClumpError::NonFiniteInput` / `ClumpError::NonPositiveTemperature` for
///   unusable entries.
pub fn validate_temperatures(temps: ArrayView1<f64>, nt: usize) -> ClumpResult<()> {
    if temps.len() != nt {
        return Err(ClumpError::LengthMismatch { what: "T", expected: nt, found: temps.len() });
    }
    for (index, &value) in temps.iter().enumerate() {
        if !value.is_finite() {
            return Err(ClumpError::NonFiniteInput { what: "T", index, value });
        }
        if value <= 0.0 {
            return Err(ClumpError::NonPositiveTemperature { index, value });
        }
    }
    Ok(())
}

/// Validate a model parameter vector's length and finiteness.
///
/// Errors
/// ------
/// - `ClumpError::ParameterCountMismatch` if `params.len() != expected`.
/// - `ClumpError::NonFiniteInput` for a NaN/∞ parameter.
pub fn validate_params(
    model: &'static str, params: ArrayView1<f64>, expected: usize,
) -> ClumpResult<()> {
    if params.len() != expected {
        return Err(ClumpError::ParameterCountMismatch { model, expected, found: params.len() });
    }
    if let Some((index, &value)) = params.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ClumpError::NonFiniteInput { what: "params", index, value });
    }
    Ok(())
}
