//! utils — small numerical helpers and PyO3 argument extraction.
//!
//! Numerical helpers ([`derivatize`], [`rmse`]) are always available. The
//! extraction helpers are compiled only with the `python-bindings` feature
//! and turn loosely typed Python arguments into validated Rust values.
use crate::errors::{ClumpError, ClumpResult};
use ndarray::{Array1, ArrayView1};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2};
#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

/// derivatize — pointwise ratio of finite-difference gradients, `dnum / ddenom`.
///
/// Parameters
/// ----------
/// - `num`: `ArrayView1<f64>`
///   Numerator series (e.g. Δ47 along a heating path).
/// - `denom`: `ArrayView1<f64>`
///   Denominator series of the same length (e.g. time).
///
/// Returns
/// -------
/// `ClumpResult<Array1<f64>>`
///   `gradient(num) / gradient(denom)`, where `gradient` uses central
///   differences `(f[i+1] − f[i−1]) / 2` in the interior and one-sided first
///   differences at both ends.
///
/// Errors
/// ------
/// - `ClumpError::LengthMismatch` if the lengths differ.
/// - `ClumpError::InvalidGrid` for fewer than two points.
///
/// Notes
/// -----
/// - A zero denominator gradient yields an infinite or NaN entry, as in the
///   element-wise division it mirrors.
pub fn derivatize(num: ArrayView1<f64>, denom: ArrayView1<f64>) -> ClumpResult<Array1<f64>> {
    if num.len() != denom.len() {
        return Err(ClumpError::LengthMismatch {
            what: "denom",
            expected: num.len(),
            found: denom.len(),
        });
    }
    if num.len() < 2 {
        return Err(ClumpError::InvalidGrid { reason: "derivatize needs at least two points" });
    }
    Ok(gradient(num) / gradient(denom))
}

/// Root-mean-square error between observations and predictions.
///
/// Errors
/// ------
/// - `ClumpError::LengthMismatch` if the lengths differ.
/// - `ClumpError::EmptySeries` if `y` is empty.
pub fn rmse(y: ArrayView1<f64>, yhat: ArrayView1<f64>) -> ClumpResult<f64> {
    if y.len() != yhat.len() {
        return Err(ClumpError::LengthMismatch { what: "yhat", expected: y.len(), found: yhat.len() });
    }
    if y.is_empty() {
        return Err(ClumpError::EmptySeries { what: "y" });
    }
    let sse: f64 = y.iter().zip(yhat.iter()).map(|(a, b)| (a - b).powi(2)).sum();
    Ok((sse / y.len() as f64).sqrt())
}

fn gradient(f: ArrayView1<f64>) -> Array1<f64> {
    let n = f.len();
    Array1::from_shape_fn(n, |i| match i {
        0 => f[1] - f[0],
        i if i == n - 1 => f[n - 1] - f[n - 2],
        i => 0.5 * (f[i + 1] - f[i - 1]),
    })
}

// ---- Python extraction ----

/// Coerce a 1-D numeric argument (times, temperatures, log-rate nodes) into a
/// contiguous float64 view.
///
/// A contiguous float64 ndarray is borrowed as-is. Anything else that numpy
/// can read as a 1-D float sequence (strided slices, pandas objects exposing
/// `to_numpy`, lists, tuples) is copied once into a fresh contiguous array.
///
/// Errors
/// ------
/// - `TypeError` (via `ClumpError::TypeMismatch`) naming the Python type when
///   the object has no 1-D float64 reading.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, argument: &'static str, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    let source = raw.call_method0("to_numpy").unwrap_or_else(|_| raw.clone());
    if let Ok(view) = source.extract::<PyReadonlyArray1<f64>>() {
        if view.as_slice().is_ok() {
            return Ok(view);
        }
        return Ok(view.as_array().to_owned().into_pyarray(py).readonly());
    }
    let values: Vec<f64> = source.extract().map_err(|_| ClumpError::TypeMismatch {
        argument,
        expected: "1-D float64 array or sequence",
        found: python_type_name(raw),
    })?;
    Ok(values.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
fn python_type_name(raw: &Bound<'_, PyAny>) -> String {
    raw.get_type().name().map(|n| n.to_string()).unwrap_or_else(|_| "unknown".to_string())
}

/// Copy a 1-D float64 argument into an owned array.
#[cfg(feature = "python-bindings")]
pub fn extract_owned_array<'py>(
    py: Python<'py>, argument: &'static str, raw: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    Ok(extract_f64_array(py, argument, raw)?.as_array().to_owned())
}

/// Copy a 2-D float64 argument (numpy array or nested sequence) into an owned array.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix(raw: &Bound<'_, PyAny>) -> PyResult<ndarray::Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err("expected a 2-D numpy.ndarray or nested sequence of float64")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(pyo3::exceptions::PyValueError::new_err("matrix rows must have equal length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let nrows = if ncols == 0 { 0 } else { flat.len() / ncols };
    ndarray::Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Read a string-valued option, rejecting other Python types with `TypeError`.
#[cfg(feature = "python-bindings")]
pub fn extract_name(argument: &'static str, raw: &Bound<'_, PyAny>) -> PyResult<String> {
    raw.extract::<String>().map_err(|_| {
        ClumpError::TypeMismatch { argument, expected: "str", found: python_type_name(raw) }.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Gradients use central differences inside and one-sided ends.
    //
    // Given
    // -----
    // - num = t², denom = t on a non-uniform grid [0, 1, 3].
    //
    // Expect
    // ------
    // - gradient(num) = [1, 4.5, 8], gradient(denom) = [1, 1.5, 2].
    fn derivatize_matches_gradient_ratio() {
        let t = array![0.0, 1.0, 3.0];
        let y = t.mapv(|v| v * v);

        let d = derivatize(y.view(), t.view()).unwrap();

        assert_relative_eq!(d[0], 1.0);
        assert_relative_eq!(d[1], 3.0);
        assert_relative_eq!(d[2], 4.0);
    }

    #[test]
    fn derivatize_rejects_bad_lengths() {
        assert!(matches!(
            derivatize(array![1.0, 2.0].view(), array![1.0].view()),
            Err(ClumpError::LengthMismatch { .. })
        ));
        assert!(matches!(
            derivatize(array![1.0].view(), array![1.0].view()),
            Err(ClumpError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn rmse_of_constant_offset() {
        let y = array![1.0, 2.0, 3.0];
        let yhat = array![1.5, 2.5, 3.5];

        assert_relative_eq!(rmse(y.view(), yhat.view()).unwrap(), 0.5);
        assert!(rmse(y.view(), array![1.0].view()).is_err());
    }
}
