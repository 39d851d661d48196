//! Log-rate grids and discretized rate spectra.
//!
//! A [`LamGrid`] is the uniform `ln k` discretization shared by the HH20
//! parametric form and the non-parametric inversion. A [`RateSpectrum`] pairs
//! such a grid with a non-negative density `rho` and can be pushed through the
//! forward kernel to obtain the decay curve it implies.
use crate::{
    errors::{ClumpError, ClumpResult},
    inversion::kernel::build_forward_kernel,
};
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Continuous, Normal};

/// Relative tolerance on node spacing when checking grid uniformity.
pub const GRID_UNIFORMITY_TOL: f64 = 1e-8;

/// Uniform grid of `nlam` log-rate nodes spanning `[lam_min, lam_max]`.
///
/// Only constructible through [`LamGrid::new`], so `nlam >= 2` and
/// `lam_max > lam_min` hold for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LamGrid {
    lam_min: f64,
    lam_max: f64,
    nlam: usize,
}

impl LamGrid {
    /// Validated grid.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::InvalidGrid` if a bound is non-finite, `lam_max <= lam_min`,
    ///   or `nlam < 2`.
    pub fn new(lam_min: f64, lam_max: f64, nlam: usize) -> ClumpResult<Self> {
        if !lam_min.is_finite() || !lam_max.is_finite() {
            return Err(ClumpError::InvalidGrid { reason: "bounds must be finite" });
        }
        if lam_max <= lam_min {
            return Err(ClumpError::InvalidGrid { reason: "lam_max must exceed lam_min" });
        }
        if nlam < 2 {
            return Err(ClumpError::InvalidGrid { reason: "nlam must be at least 2" });
        }
        Ok(LamGrid { lam_min, lam_max, nlam })
    }

    pub fn lam_min(&self) -> f64 {
        self.lam_min
    }

    pub fn lam_max(&self) -> f64 {
        self.lam_max
    }

    pub fn nlam(&self) -> usize {
        self.nlam
    }

    /// Node locations, ascending.
    pub fn nodes(&self) -> Array1<f64> {
        Array1::linspace(self.lam_min, self.lam_max, self.nlam)
    }

    /// Uniform node spacing `dlam`.
    pub fn spacing(&self) -> f64 {
        (self.lam_max - self.lam_min) / (self.nlam - 1) as f64
    }
}

/// Discretized distribution of log-rate constants.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpectrum {
    lam: Array1<f64>,
    rho: Array1<f64>,
    dlam: f64,
}

impl RateSpectrum {
    /// Spectrum from parallel node/density arrays.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::LengthMismatch` if `rho.len() != lam.len()`.
    /// - `ClumpError::InvalidGrid` if `lam` is empty, not ascending, or not uniform.
    /// - `ClumpError::InvalidSpectrum` for a negative or non-finite density.
    pub fn new(lam: Array1<f64>, rho: Array1<f64>) -> ClumpResult<Self> {
        if rho.len() != lam.len() {
            return Err(ClumpError::LengthMismatch {
                what: "rho",
                expected: lam.len(),
                found: rho.len(),
            });
        }
        let dlam = uniform_spacing(lam.view())?;
        if let Some((index, &value)) =
            rho.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ClumpError::InvalidSpectrum { index, value });
        }
        Ok(RateSpectrum { lam, rho, dlam })
    }

    /// Gaussian density in `ln k` with mean `mu` and std `sig`, sampled on `grid`.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::InvalidSigma` if `sig` is non-finite or `<= 0`, or `mu`
    ///   is non-finite.
    pub fn lognormal(mu: f64, sig: f64, grid: &LamGrid) -> ClumpResult<Self> {
        if !sig.is_finite() || sig <= 0.0 {
            return Err(ClumpError::InvalidSigma { value: sig });
        }
        let normal = Normal::new(mu, sig).map_err(|_| ClumpError::InvalidSigma { value: sig })?;
        let lam = grid.nodes();
        let rho = lam.mapv(|x| normal.pdf(x));
        Ok(RateSpectrum { lam, rho, dlam: grid.spacing() })
    }

    pub fn lam(&self) -> ArrayView1<'_, f64> {
        self.lam.view()
    }

    pub fn rho(&self) -> ArrayView1<'_, f64> {
        self.rho.view()
    }

    pub fn spacing(&self) -> f64 {
        self.dlam
    }

    /// Decay curve `G(t) = Σ_j rho_j exp(−exp(lam_j) t) dlam` implied by the spectrum.
    ///
    /// Errors
    /// ------
    /// - Propagates [`build_forward_kernel`] validation of `t`.
    pub fn decay_curve(&self, t: ArrayView1<f64>) -> ClumpResult<Array1<f64>> {
        let kernel = build_forward_kernel(t, self.lam.view())?;
        Ok(kernel.dot(&self.rho))
    }

    /// Mean `ln k` of the spectrum, `None` when it carries no mass.
    pub fn mean(&self) -> Option<f64> {
        let mass = self.rho.sum();
        if mass <= 0.0 {
            return None;
        }
        Some(self.lam.dot(&self.rho) / mass)
    }

    /// Standard deviation of `ln k`, `None` when the spectrum carries no mass.
    pub fn std(&self) -> Option<f64> {
        let mean = self.mean()?;
        let mass = self.rho.sum();
        let var = self
            .lam
            .iter()
            .zip(self.rho.iter())
            .map(|(&l, &r)| r * (l - mean).powi(2))
            .sum::<f64>()
            / mass;
        Some(var.sqrt())
    }
}

/// Spacing of a strictly ascending, uniform node array (`1.0` for a single node).
///
/// Errors
/// ------
/// - `ClumpError::InvalidGrid` if `lam` is empty, non-finite, not strictly
///   ascending, or has spacing deviating by more than `GRID_UNIFORMITY_TOL`
///   (relative) from `lam[1] − lam[0]`.
pub fn uniform_spacing(lam: ArrayView1<f64>) -> ClumpResult<f64> {
    if lam.is_empty() {
        return Err(ClumpError::InvalidGrid { reason: "lam is empty" });
    }
    if lam.iter().any(|v| !v.is_finite()) {
        return Err(ClumpError::InvalidGrid { reason: "lam contains non-finite nodes" });
    }
    if lam.len() == 1 {
        return Ok(1.0);
    }

    let dlam = lam[1] - lam[0];
    if dlam <= 0.0 {
        return Err(ClumpError::InvalidGrid { reason: "lam must be strictly ascending" });
    }
    for w in lam.windows(2) {
        let step = w[1] - w[0];
        if step <= 0.0 {
            return Err(ClumpError::InvalidGrid { reason: "lam must be strictly ascending" });
        }
        if (step - dlam).abs() > GRID_UNIFORMITY_TOL * dlam {
            return Err(ClumpError::InvalidGrid { reason: "lam must be uniformly spaced" });
        }
    }
    Ok(dlam)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Grid validation and spacing.
    // - Lognormal spectra: normalization and summary statistics.
    // - Spectrum validation failures.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Grid nodes span the bounds with the advertised spacing.
    fn grid_nodes_and_spacing() {
        let grid = LamGrid::new(-10.0, 0.0, 11).unwrap();

        let nodes = grid.nodes();

        assert_eq!(nodes.len(), 11);
        assert_relative_eq!(grid.spacing(), 1.0);
        assert_relative_eq!(nodes[0], -10.0);
        assert_relative_eq!(nodes[10], 0.0);
        assert!(LamGrid::new(0.0, 1.0, 1).is_err());
        assert!(LamGrid::new(1.0, 0.0, 10).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Degenerate node counts never reach `spacing`, whose divisor is `nlam − 1`.
    //
    // Given
    // -----
    // - `nlam` of 0 and 1, and the smallest valid grid (`nlam = 2`).
    //
    // Expect
    // ------
    // - `InvalidGrid` for 0 and 1; the valid grid exposes its bounds through
    //   getters and has a finite spacing equal to the full width.
    fn degenerate_node_counts_are_unrepresentable() {
        for nlam in [0, 1] {
            assert!(matches!(
                LamGrid::new(-20.0, 0.0, nlam),
                Err(ClumpError::InvalidGrid { .. })
            ));
        }

        let grid = LamGrid::new(-20.0, 0.0, 2).unwrap();
        let spectrum = RateSpectrum::lognormal(-10.0, 1.0, &grid).unwrap();

        assert_eq!((grid.lam_min(), grid.lam_max(), grid.nlam()), (-20.0, 0.0, 2));
        assert!(spectrum.spacing().is_finite());
        assert_relative_eq!(spectrum.spacing(), 20.0);
    }

    #[test]
    // Purpose
    // -------
    // A lognormal spectrum on a wide grid integrates to one and recovers its
    // mean and std.
    //
    // Given
    // -----
    // - mu = −12, sig = 2 on [−30, 6] with 801 nodes (±9σ).
    //
    // Expect
    // ------
    // - Σ rho·dlam ≈ 1, mean ≈ −12, std ≈ 2, and G(0) ≈ 1.
    fn lognormal_spectrum_moments() {
        let grid = LamGrid::new(-30.0, 6.0, 801).unwrap();

        let spectrum = RateSpectrum::lognormal(-12.0, 2.0, &grid).unwrap();
        let g0 = spectrum.decay_curve(array![0.0].view()).unwrap();

        assert_relative_eq!(spectrum.rho().sum() * spectrum.spacing(), 1.0, epsilon = 1e-8);
        assert_relative_eq!(spectrum.mean().unwrap(), -12.0, epsilon = 1e-8);
        assert_relative_eq!(spectrum.std().unwrap(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(g0[0], 1.0, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Malformed spectra are rejected.
    //
    // Given
    // -----
    // - A negative density, a non-uniform grid, and sig = 0.
    //
    // Expect
    // ------
    // - `InvalidSpectrum`, `InvalidGrid`, and `InvalidSigma` respectively.
    fn invalid_spectra_are_rejected() {
        let grid = LamGrid::new(-1.0, 1.0, 3).unwrap();

        let negative = RateSpectrum::new(array![0.0, 1.0, 2.0], array![0.1, -0.2, 0.3]);
        let uneven = RateSpectrum::new(array![0.0, 1.0, 2.5], array![0.1, 0.2, 0.3]);
        let flat = RateSpectrum::lognormal(0.0, 0.0, &grid);

        assert!(matches!(negative, Err(ClumpError::InvalidSpectrum { index: 1, .. })));
        assert!(matches!(uneven, Err(ClumpError::InvalidGrid { .. })));
        assert!(matches!(flat, Err(ClumpError::InvalidSigma { .. })));
    }

    #[test]
    // Purpose
    // -------
    // An all-zero spectrum has no defined moments.
    fn empty_mass_has_no_moments() {
        let spectrum = RateSpectrum::new(array![0.0, 1.0], array![0.0, 0.0]).unwrap();

        assert!(spectrum.mean().is_none());
        assert!(spectrum.std().is_none());
    }
}
