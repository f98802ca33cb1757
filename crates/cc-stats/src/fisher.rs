//! Fisher's exact test for 2×2 contingency tables.
//!
//! Used when expected cell counts are too small for the chi-square
//! approximation. The two-sided p-value sums the hypergeometric point
//! probabilities of every table with the observed margins that is no more
//! likely than the observed one.

use cc_core::{Error, Result};
use serde::Serialize;
use statrs::function::gamma::ln_gamma;

/// Result of a two-sided Fisher's exact test on `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Serialize)]
pub struct FisherResult {
    /// Sample odds ratio `(a·d)/(b·c)`; infinite when `b·c = 0`.
    pub odds_ratio: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

#[inline]
fn ln_factorial(n: u64) -> f64 {
    ln_gamma(n as f64 + 1.0)
}

/// Log of the hypergeometric point probability of the table `[[a,b],[c,d]]`
/// with all margins fixed.
fn ln_hypergeom(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let n = a + b + c + d;
    ln_factorial(a + b) + ln_factorial(c + d) + ln_factorial(a + c) + ln_factorial(b + d)
        - ln_factorial(n)
        - ln_factorial(a)
        - ln_factorial(b)
        - ln_factorial(c)
        - ln_factorial(d)
}

/// Two-sided Fisher's exact test for the table `[[a, b], [c, d]]`
/// (rows = categories, columns = group 0 / group 1).
///
/// # Errors
/// `InsufficientData` if the table is empty or a margin is zero (the
/// conditional distribution is degenerate).
pub fn fisher_exact_2x2(a: u64, b: u64, c: u64, d: u64) -> Result<FisherResult> {
    let n = a + b + c + d;
    if n == 0 {
        return Err(Error::InsufficientData("empty 2x2 table".to_string()));
    }
    let row0 = a + b;
    let row1 = c + d;
    let col0 = a + c;
    let col1 = b + d;
    if row0 == 0 || row1 == 0 || col0 == 0 || col1 == 0 {
        return Err(Error::InsufficientData(
            "a margin of the 2x2 table is zero".to_string(),
        ));
    }

    let odds_ratio = if b * c == 0 {
        if a * d == 0 {
            f64::NAN
        } else {
            f64::INFINITY
        }
    } else {
        (a as f64 * d as f64) / (b as f64 * c as f64)
    };

    // Enumerate all tables with the observed margins, indexed by the
    // top-left cell k.
    let lo = col0.saturating_sub(row1);
    let hi = row0.min(col0);
    let ln_p_obs = ln_hypergeom(a, b, c, d);

    // Relative slack so ties with the observed probability are included
    // despite floating-point noise (matches common reference behavior).
    const LN_REL_TOL: f64 = 1e-7;

    let mut p_value = 0.0;
    for k in lo..=hi {
        let ln_pk = ln_hypergeom(k, row0 - k, col0 - k, row1 - (col0 - k));
        if ln_pk <= ln_p_obs + LN_REL_TOL {
            p_value += ln_pk.exp();
        }
    }

    Ok(FisherResult { odds_ratio, p_value: p_value.min(1.0) })
}
