use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::ValidationError;
use crate::time_value::{annuity_factor, ceil_whole, floor_whole, monthly_rate, overflow};
use crate::types::*;
use crate::CreditCalcResult;

/// Largest principal a fixed payment can amortise over a given term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPrincipal {
    /// Rounded down, so the principal is never over-stated
    pub principal: Money,
    pub periods: u32,
    pub overpayment: Money,
}

impl fmt::Display for LoanPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your loan principal = {}!", self.principal)?;
        write!(f, "Overpayment = {}", self.overpayment)
    }
}

/// Inverse annuity: `P = A / (i(1+i)^n / ((1+i)^n − 1))`, rounded down.
///
/// Rounds down where [`super::solve_annuity_payment`] rounds up, so the two
/// do not invert each other exactly.
pub fn solve_loan_principal(
    payment: Money,
    periods: u32,
    annual_percent: Percent,
) -> CreditCalcResult<ComputationOutput<LoanPrincipal>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if periods == 0 {
        return Err(ValidationError::InvalidPeriods(Decimal::ZERO).into());
    }

    let rate = monthly_rate(annual_percent);
    debug!("solving loan principal: payment={payment} periods={periods} rate={rate}");
    if rate.is_zero() {
        warn!("zero interest rate; principal is payment * periods");
        warnings.push("Zero interest rate: principal is payment times periods".into());
    }

    let factor = annuity_factor(rate, periods)?;
    let principal = floor_whole(
        payment
            .checked_div(factor)
            .ok_or_else(|| overflow("loan principal"))?,
    );
    let total_paid = payment
        .checked_mul(Decimal::from(periods))
        .ok_or_else(|| overflow("total paid"))?;
    let overpayment = ceil_whole(total_paid - principal);

    let output = LoanPrincipal {
        principal,
        periods,
        overpayment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan principal (inverse annuity)",
        &serde_json::json!({
            "payment": payment.to_string(),
            "periods": periods,
            "annual_interest_pct": annual_percent.to_string(),
            "monthly_rate": rate.to_string(),
            "annuity_factor": factor.round_dp(10).to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
