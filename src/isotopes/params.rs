//! Isotope reference parameters and their read-only registry.
//!
//! [`IsotopeParams`] holds the VPDB reference ratios and the ¹⁷O
//! mass-dependent exponent used to build stochastic isotopologue
//! distributions. [`IsotopeRegistry`] is the closed set of published choices
//! (see Daëron et al., 2016, for discussion); it is built once and passed by
//! reference into the components that need it.
use crate::{
    errors::{ClumpError, ClumpResult},
    isotopes::stochastic::StochasticRatios,
};
use std::collections::BTreeMap;

/// Reference ratios `(R13, R18, R17)` of the VPDB standard and `λ17`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotopeParams {
    /// ¹³C/¹²C of VPDB.
    pub r13_std: f64,
    /// ¹⁸O/¹⁶O of VPDB.
    pub r18_std: f64,
    /// ¹⁷O/¹⁶O of VPDB.
    pub r17_std: f64,
    /// Mass-dependent fractionation exponent for ¹⁷O.
    pub lam17: f64,
}

impl IsotopeParams {
    pub const fn new(r13_std: f64, r18_std: f64, r17_std: f64, lam17: f64) -> Self {
        IsotopeParams { r13_std, r18_std, r17_std, lam17 }
    }
}

/// Name of the default isotope parameter set.
pub const DEFAULT_ISO_PARAMS: &str = "Brand";

/// Closed, read-only registry of isotope parameter sets keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeRegistry {
    sets: BTreeMap<String, IsotopeParams>,
}

impl IsotopeRegistry {
    /// Registry holding the published parameter sets.
    ///
    /// Names: `"Brand"`, `"Gonfiantini"`, `"Craig + Assonov"`, `"Chang + Li"`,
    /// `"Craig + Li"`, `"Barkan"`, `"Passey"`.
    pub fn published() -> Self {
        let entries = [
            ("Brand", IsotopeParams::new(0.01118, 0.0020052, 0.00038475, 0.528)),
            ("Gonfiantini", IsotopeParams::new(0.0112372, 0.0020052, 0.0003799, 0.5164)),
            ("Craig + Assonov", IsotopeParams::new(0.0112372, 0.0020052, 0.00038047, 0.528)),
            ("Chang + Li", IsotopeParams::new(0.01118, 0.0020052, 0.0003808, 0.528)),
            ("Craig + Li", IsotopeParams::new(0.0112372, 0.0020052, 0.0003808, 0.528)),
            ("Barkan", IsotopeParams::new(0.01118, 0.0020052, 0.0003808, 0.5229)),
            ("Passey", IsotopeParams::new(0.01118, 0.0020052, 0.0003808, 0.528)),
        ];
        let sets = entries.into_iter().map(|(name, p)| (name.to_string(), p)).collect();
        IsotopeRegistry { sets }
    }

    /// Build a registry from caller-supplied entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, IsotopeParams)>,
        S: Into<String>,
    {
        IsotopeRegistry { sets: entries.into_iter().map(|(n, p)| (n.into(), p)).collect() }
    }

    /// Look up a parameter set by name.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::UnknownIsotopeParams` if `name` is not registered.
    pub fn get(&self, name: &str) -> ClumpResult<&IsotopeParams> {
        self.sets
            .get(name)
            .ok_or_else(|| ClumpError::UnknownIsotopeParams { name: name.to_string() })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Stochastic `(R45, R46, R47)` for a bulk composition and a named set.
    ///
    /// Errors
    /// ------
    /// - `ClumpError::UnknownIsotopeParams` for an unregistered name.
    /// - `ClumpError::AbundanceOutOfRange` for unphysical δ values.
    pub fn stochastic_ratios(
        &self, d13c: f64, d18o: f64, name: &str,
    ) -> ClumpResult<StochasticRatios> {
        let params = self.get(name)?;
        StochasticRatios::from_deltas(d13c, d18o, params)
    }
}

impl Default for IsotopeRegistry {
    fn default() -> Self {
        IsotopeRegistry::published()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    // Purpose
    // -------
    // The published registry resolves every documented name.
    //
    // Given
    // -----
    // - `IsotopeRegistry::published()`.
    //
    // Expect
    // ------
    // - Seven names, including the default "Brand".
    fn published_registry_contains_documented_sets() {
        let registry = IsotopeRegistry::published();

        assert_eq!(registry.names().count(), 7);
        assert!(registry.get(DEFAULT_ISO_PARAMS).is_ok());
        assert!(registry.get("Craig + Assonov").is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Unregistered names fail with a KeyNotFound-class error.
    //
    // Given
    // -----
    // - The name "Unknown Lab".
    //
    // Expect
    // ------
    // - `UnknownIsotopeParams` from both `get` and `stochastic_ratios`.
    fn unknown_name_is_key_not_found() {
        let registry = IsotopeRegistry::published();

        let err = registry.get("Unknown Lab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);

        let err = registry.stochastic_ratios(0.0, 0.0, "Unknown Lab").unwrap_err();
        assert!(matches!(err, ClumpError::UnknownIsotopeParams { .. }));
    }
}
