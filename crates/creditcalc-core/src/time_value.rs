use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::CreditCalcError;
use crate::types::{Money, Percent, Rate};
use crate::CreditCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Decimal places kept before an amount is ceiled, floored or truncated.
/// Division carries 28 significant digits; the last one can push an exact
/// integer to `x.99…97` or `x.00…03`.
const ROUNDING_GUARD_DP: u32 = 10;

/// Below this magnitude `ln(1 + x)` is summed as a series; `ln` of a value
/// this close to 1 keeps too few significant digits.
const LN_1P_SERIES_LIMIT: Decimal = dec!(0.001);

/// Domain error for an intermediate amount outside the `Decimal` range.
pub fn overflow(what: &str) -> CreditCalcError {
    CreditCalcError::Domain {
        reason: format!("{what} overflows"),
    }
}

/// Nominal monthly rate from an annual percentage: `annual / 12 / 100`.
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / MONTHS_PER_YEAR / PERCENT
}

/// `(1 + i)^n`
pub fn compound_factor(rate: Rate, nper: u32) -> CreditCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| CreditCalcError::Domain {
            reason: format!("(1 + {rate})^{nper} overflows"),
        })
}

/// Annuity factor `i(1+i)^n / ((1+i)^n - 1)`: the payment per unit of principal.
///
/// At a zero rate the limit `1 / n` is returned.
pub fn annuity_factor(rate: Rate, nper: u32) -> CreditCalcResult<Decimal> {
    if nper == 0 {
        return Err(CreditCalcError::Domain {
            reason: "annuity factor needs at least one period".into(),
        });
    }
    if rate.is_zero() {
        return Ok(Decimal::ONE / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CreditCalcError::Domain {
            reason: format!("rate {rate} is too small to compound over {nper} periods"),
        });
    }
    rate.checked_mul(factor)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| overflow("annuity factor"))
}

/// `ln(1 + x)` for `x > -1`.
pub fn ln_1p(x: Decimal) -> CreditCalcResult<Decimal> {
    if x.abs() >= LN_1P_SERIES_LIMIT {
        let arg = Decimal::ONE + x;
        return arg.checked_ln().ok_or_else(|| CreditCalcError::Domain {
            reason: format!("ln({arg}) is undefined"),
        });
    }

    // x - x^2/2 + x^3/3 - ...; terms vanish below the 28th decimal place
    let mut sum = Decimal::ZERO;
    let mut power = x;
    let mut k = 1u32;
    while !power.is_zero() {
        let term = power / Decimal::from(k);
        if k % 2 == 1 {
            sum += term;
        } else {
            sum -= term;
        }
        power *= x;
        k += 1;
    }
    Ok(sum)
}

/// Drop the division residue beyond [`ROUNDING_GUARD_DP`] places.
pub fn strip_residue(amount: Money) -> Money {
    amount.round_dp(ROUNDING_GUARD_DP)
}

/// Round an amount up to the next whole unit.
pub fn ceil_whole(amount: Money) -> Money {
    strip_residue(amount).ceil()
}

/// Round an amount down to the previous whole unit.
pub fn floor_whole(amount: Money) -> Money {
    strip_residue(amount).floor()
}

/// Drop the fractional part, rounding toward zero.
pub fn trunc_whole(amount: Money) -> Money {
    strip_residue(amount).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(7.8)), dec!(0.0065));
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_annuity_factor_basic() {
        // 1% monthly over 12 months: 0.01 * 1.01^12 / (1.01^12 - 1) ≈ 0.0888488
        let f = annuity_factor(dec!(0.01), 12).unwrap();
        assert!((f - dec!(0.0888488)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_annuity_factor_zero_rate() {
        assert_eq!(annuity_factor(Decimal::ZERO, 4).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_annuity_factor_zero_periods() {
        assert!(annuity_factor(dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_ln_1p_small_argument() {
        // ln(1 + 1e-20) = 1e-20 - 5e-41: the second term is below Decimal scale
        assert_eq!(ln_1p(dec!(0.00000000000000000001)).unwrap(), dec!(0.00000000000000000001));
        // ln(1.0005) = 0.000499875041651...
        let v = ln_1p(dec!(0.0005)).unwrap();
        assert!((v - dec!(0.000499875041651)).abs() < dec!(0.000000000000001));
        let neg = ln_1p(dec!(-0.0005)).unwrap();
        assert!((neg + dec!(0.000500125041682)).abs() < dec!(0.000000000000001));
        assert_eq!(ln_1p(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_ln_1p_large_argument() {
        // ln(2)
        let v = ln_1p(Decimal::ONE).unwrap();
        assert!((v - dec!(0.693147180559945)).abs() < dec!(0.000000000001));
        assert!(ln_1p(dec!(-1)).is_err());
    }

    #[test]
    fn test_annuity_factor_overflow() {
        let err = annuity_factor(dec!(70000000000000000000000000000), 1).unwrap_err();
        assert!(matches!(err, CreditCalcError::Domain { .. }));
    }

    #[test]
    fn test_strip_residue() {
        // 10% annual on 120000 is exactly 1000 a month
        let interest = monthly_rate(dec!(10)) * dec!(120000);
        assert_ne!(interest, dec!(1000));
        assert_eq!(strip_residue(interest), dec!(1000));
    }

    #[test]
    fn test_rounding_guard() {
        assert_eq!(ceil_whole(dec!(107499.99999999999999999999997)), dec!(107500));
        assert_eq!(ceil_whole(dec!(7000.00000000000000000000005)), dec!(7000));
        assert_eq!(ceil_whole(dec!(8791.588723)), dec!(8792));
        assert_eq!(floor_whole(dec!(800018.6944)), dec!(800018));
        assert_eq!(trunc_whole(dec!(14628.9)), dec!(14628));
        assert_eq!(trunc_whole(dec!(-3.7)), dec!(-3));
    }
}
