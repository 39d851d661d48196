//! Conversion between measured δ/Δ values and isotopologue ratios.
//!
//! Both directions assume the bulk composition follows the stochastic
//! definitions of Santrock et al. (1985) as elaborated by Daëron et al.
//! (2016). If a sample violates that assumption the returned values are
//! spurious.
//!
//! Arrays are ordered `[Δ47, δ13C, δ18O]` for compositions and
//! `[R45, R46, R47]` for ratios, δ values in permil VPDB.
use crate::{
    errors::{ClumpError, ClumpResult},
    isotopes::params::IsotopeParams,
};

/// Isotopologue ratios `[R45, R46, R47]` for a composition `[Δ47, δ13C, δ18O]`.
///
/// Errors
/// ------
/// - `ClumpError::NonFiniteInput` if any entry of `d` is NaN/±∞.
pub fn calc_r(d: [f64; 3], params: &IsotopeParams) -> ClumpResult<[f64; 3]> {
    check_finite("composition", &d)?;
    let [d47, d13c, d18o] = d;
    let IsotopeParams { r13_std, r18_std, r17_std, lam17 } = *params;

    let r13 = (d13c / 1000.0 + 1.0) * r13_std;
    let r18 = (d18o / 1000.0 + 1.0) * r18_std;
    let k = r17_std * r18_std.powf(-lam17);
    let r17 = k * r18.powf(lam17);

    // Daëron et al. (2016), Eq. 4.
    let r45 = r13 + 2.0 * r17;
    let r46 = -3.0 * k * k * r18.powf(2.0 * lam17) + 2.0 * k * r45 * r18.powf(lam17) + 2.0 * r18;

    let r47_stoch = r13 * r17 * r17 + 2.0 * r13 * r18 + 2.0 * r17 * r18;
    let r47 = (d47 / 1000.0 + 1.0) * r47_stoch;

    Ok([r45, r46, r47])
}

/// Composition `[Δ47, δ13C, δ18O]` for measured ratios `[R45, R46, R47]`.
///
/// R18 is recovered from R45 and R46 with the second-order Taylor expansion
/// of Daëron et al. (2016), Appendix A.
///
/// Errors
/// ------
/// - `ClumpError::NonFiniteInput` if any ratio is NaN/±∞ or the quadratic
///   has no real root.
pub fn calc_d(r: [f64; 3], params: &IsotopeParams) -> ClumpResult<[f64; 3]> {
    check_finite("ratios", &r)?;
    let [r45, r46, r47] = r;
    let IsotopeParams { r13_std, r18_std, r17_std, lam17 } = *params;

    let k = r17_std * r18_std.powf(-lam17);
    let a_ = -3.0 * k * k * r18_std.powf(2.0 * lam17);
    let b_ = 2.0 * k * r45 * r18_std.powf(lam17);
    let c_ = 2.0 * r18_std;
    let d_ = -r46;

    let a = a_ * lam17 * (2.0 * lam17 - 1.0) + b_ * lam17 * (lam17 - 1.0) / 2.0;
    let b = 2.0 * a_ * lam17 + b_ * lam17 + c_;
    let c = a_ + b_ + c_ + d_;

    let disc = b * b - 4.0 * a * c;
    let x = (-b + disc.sqrt()) / (2.0 * a);
    if !x.is_finite() {
        return Err(ClumpError::NonFiniteInput { what: "R18 solution", index: 0, value: x });
    }

    let r18 = (1.0 + x) * r18_std;
    let r17 = k * r18.powf(lam17);
    let r13 = r45 - 2.0 * r17;

    let d13c = (r13 / r13_std - 1.0) * 1000.0;
    let d18o = (r18 / r18_std - 1.0) * 1000.0;

    let r47_stoch = r13 * r17 * r17 + 2.0 * r13 * r18 + 2.0 * r17 * r18;
    let d47 = (r47 / r47_stoch - 1.0) * 1000.0;

    Ok([d47, d13c, d18o])
}

fn check_finite(what: &'static str, values: &[f64; 3]) -> ClumpResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ClumpError::NonFiniteInput { what, index, value: values[index] }),
        None => Ok(()),
    }
}
