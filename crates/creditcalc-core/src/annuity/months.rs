use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::CreditCalcError;
use crate::time_value::{ceil_whole, ln_1p, monthly_rate, overflow, strip_residue};
use crate::types::*;
use crate::CreditCalcResult;

/// How long a fixed monthly payment takes to clear a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentTerm {
    /// Whole months, partial months counted as full
    pub months: u32,
    pub years: u32,
    pub remaining_months: u32,
    pub overpayment: Money,
}

impl fmt::Display for RepaymentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remaining_months == 0 {
            writeln!(f, "It will take {} years to repay this loan!", self.years)?;
        } else if self.years == 0 {
            writeln!(
                f,
                "It will take {} months to repay this loan!",
                self.remaining_months
            )?;
        } else {
            writeln!(
                f,
                "It will take {} years and {} months to repay this loan!",
                self.years, self.remaining_months
            )?;
        }
        write!(f, "Overpayment = {}", self.overpayment)
    }
}

/// Number of months needed to repay `principal` with a fixed `payment`.
///
/// Solves `n = log_{1+i}(A / (A - i·P))` and rounds up to a whole month.
/// The payment must exceed the first month's interest, otherwise the loan
/// never amortises and a domain error is returned.
pub fn solve_number_of_months(
    principal: Money,
    payment: Money,
    annual_percent: Percent,
) -> CreditCalcResult<ComputationOutput<RepaymentTerm>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if payment <= Decimal::ZERO {
        return Err(CreditCalcError::Domain {
            reason: format!("monthly payment must be positive (got {payment})"),
        });
    }

    let rate = monthly_rate(annual_percent);
    let interest = rate
        .checked_mul(principal)
        .ok_or_else(|| overflow("monthly interest"))?;
    let first_interest = strip_residue(interest);
    let even_split = principal
        .checked_div(payment)
        .ok_or_else(|| overflow("principal / payment"))?;
    debug!("solving months: principal={principal} payment={payment} rate={rate}");

    let raw_months = if rate.is_zero() {
        warn!("zero interest rate; repayment term is principal / payment");
        warnings.push("Zero interest rate: term is principal divided by payment".into());
        even_split
    } else {
        if payment <= first_interest.max(interest) {
            return Err(CreditCalcError::Domain {
                reason: format!(
                    "payment {payment} does not exceed the monthly interest {}",
                    first_interest.round_dp(2)
                ),
            });
        }
        // ln(A / (A - iP)) = -ln(1 - iP/A); interest < payment so the share is below 1
        let numerator = -ln_1p(-(interest / payment))?;
        let denominator = ln_1p(rate)?;
        if numerator.is_zero() || denominator.is_zero() {
            even_split
        } else {
            // Interest only lengthens the term
            numerator
                .checked_div(denominator)
                .ok_or_else(|| overflow("repayment term"))?
                .max(even_split)
        }
    };

    let rounded = ceil_whole(raw_months);
    let months = rounded.to_u32().ok_or_else(|| CreditCalcError::Domain {
        reason: format!("repayment term of {rounded} months is out of range"),
    })?;
    let total_paid = rounded
        .checked_mul(payment)
        .ok_or_else(|| overflow("total paid"))?;
    // The rounding guard can leave a residue of -0 when P/A is a whole number
    let overpayment = ceil_whole(total_paid - principal).max(Decimal::ZERO);

    let output = RepaymentTerm {
        months,
        years: months / 12,
        remaining_months: months % 12,
        overpayment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity repayment term (logarithmic amortisation identity)",
        &serde_json::json!({
            "principal": principal.to_string(),
            "payment": payment.to_string(),
            "annual_interest_pct": annual_percent.to_string(),
            "monthly_rate": rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
