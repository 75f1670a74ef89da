use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::ValidationError;
use crate::time_value::{annuity_factor, ceil_whole, monthly_rate, overflow};
use crate::types::*;
use crate::CreditCalcResult;

/// Fixed monthly payment that amortises a loan over a given term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnuityPayment {
    /// Rounded up to the next whole unit
    pub payment: Money,
    pub periods: u32,
    pub overpayment: Money,
}

impl fmt::Display for AnnuityPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your monthly payment = {}!", self.payment)?;
        write!(f, "Overpayment = {}", self.overpayment)
    }
}

/// Annuity payment `A = P · i(1+i)^n / ((1+i)^n − 1)`, rounded up.
pub fn solve_annuity_payment(
    principal: Money,
    periods: u32,
    annual_percent: Percent,
) -> CreditCalcResult<ComputationOutput<AnnuityPayment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if periods == 0 {
        return Err(ValidationError::InvalidPeriods(Decimal::ZERO).into());
    }

    let rate = monthly_rate(annual_percent);
    debug!("solving annuity payment: principal={principal} periods={periods} rate={rate}");
    if rate.is_zero() {
        warn!("zero interest rate; payment is principal / periods");
        warnings.push("Zero interest rate: payment is principal divided by periods".into());
    }

    let factor = annuity_factor(rate, periods)?;
    let payment = ceil_whole(
        principal
            .checked_mul(factor)
            .ok_or_else(|| overflow("monthly payment"))?,
    );
    let total_paid = payment
        .checked_mul(Decimal::from(periods))
        .ok_or_else(|| overflow("total paid"))?;
    let overpayment = ceil_whole(total_paid - principal);

    let output = AnnuityPayment {
        payment,
        periods,
        overpayment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity payment (level-payment amortisation)",
        &serde_json::json!({
            "principal": principal.to_string(),
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
