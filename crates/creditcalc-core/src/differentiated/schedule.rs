use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::time::Instant;

use crate::error::ValidationError;
use crate::time_value::{ceil_whole, monthly_rate, overflow, trunc_whole};
use crate::types::*;
use crate::CreditCalcResult;

/// Lazily yields the differentiated payment for each month, 1 through `periods`.
///
/// Finite and not restartable: call [`differentiated_payments`] again for a
/// fresh pass.
#[derive(Debug, Clone)]
pub struct DifferentiatedPayments {
    principal: Money,
    periods: u32,
    rate: Rate,
    next_month: u32,
}

impl DifferentiatedPayments {
    /// Every intermediate is bounded by its month-1 or month-n value, both
    /// checked in [`differentiated_payments`].
    fn payment_for(&self, month: u32) -> Money {
        let n = Decimal::from(self.periods);
        let repaid = self.principal * Decimal::from(month - 1) / n;
        ceil_whole(self.principal / n + self.rate * (self.principal - repaid))
    }
}

impl Iterator for DifferentiatedPayments {
    type Item = MonthlyPayment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_month > self.periods {
            return None;
        }
        let month = self.next_month;
        self.next_month += 1;
        Some(MonthlyPayment {
            month,
            payment: self.payment_for(month),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.periods.saturating_sub(self.next_month - 1) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for DifferentiatedPayments {}

impl FusedIterator for DifferentiatedPayments {}

/// Start a lazy differentiated schedule.
///
/// `payment_m = ceil(P/n + i·(P − P·(m−1)/n))`
///
/// Fails when `periods` is zero or when the first payment, the largest of the
/// schedule, is outside the `Decimal` range.
pub fn differentiated_payments(
    principal: Money,
    periods: u32,
    annual_percent: Percent,
) -> CreditCalcResult<DifferentiatedPayments> {
    if periods == 0 {
        return Err(ValidationError::InvalidPeriods(Decimal::ZERO).into());
    }
    let rate = monthly_rate(annual_percent);
    let n = Decimal::from(periods);

    principal
        .checked_mul(n - Decimal::ONE)
        .ok_or_else(|| overflow("repaid principal"))?;
    (principal / n)
        .checked_add(
            rate.checked_mul(principal)
                .ok_or_else(|| overflow("monthly interest"))?,
        )
        .ok_or_else(|| overflow("first payment"))?;

    Ok(DifferentiatedPayments {
        principal,
        periods,
        rate,
        next_month: 1,
    })
}

/// A full differentiated repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferentiatedSchedule {
    pub payments: Vec<MonthlyPayment>,
    pub total_paid: Money,
    /// `total_paid − principal`, truncated toward zero
    pub overpayment: Money,
}

impl fmt::Display for DifferentiatedSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.payments {
            writeln!(f, "Month {}: payment is {}", p.month, p.payment)?;
        }
        writeln!(f)?;
        write!(f, "Overpayment = {}", self.overpayment)
    }
}

/// Compute every monthly payment of a differentiated loan and the total overpayment.
pub fn solve_differentiated_schedule(
    principal: Money,
    periods: u32,
    annual_percent: Percent,
) -> CreditCalcResult<ComputationOutput<DifferentiatedSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = differentiated_payments(principal, periods, annual_percent)?;
    debug!(
        "solving differentiated schedule: principal={principal} periods={periods} rate={}",
        schedule.rate
    );
    let rate = schedule.rate;
    if rate.is_zero() {
        warn!("zero interest rate; every payment is principal / periods");
        warnings.push("Zero interest rate: every payment is principal divided by periods".into());
    }

    let payments: Vec<MonthlyPayment> = schedule.collect();
    let total_paid = payments
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.payment))
        .ok_or_else(|| overflow("total paid"))?;
    let overpayment = trunc_whole(total_paid - principal);

    let output = DifferentiatedSchedule {
        payments,
        total_paid,
        overpayment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Differentiated repayment (equal principal, declining interest)",
        &serde_json::json!({
            "principal": principal.to_string(),
            "periods": periods,
            "annual_interest_pct": annual_percent.to_string(),
            "monthly_rate": rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CreditCalcError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_month_reference() {
        let mut it = differentiated_payments(dec!(500000), 8, dec!(7.8)).unwrap();
        assert_eq!(it.len(), 8);
        let first = it.next().unwrap();
        assert_eq!(first.month, 1);
        assert_eq!(first.payment, dec!(65750));
        assert_eq!(it.len(), 7);
    }

    #[test]
    fn test_iterator_is_finite_and_fused() {
        let mut it = differentiated_payments(dec!(1000), 2, dec!(12)).unwrap();
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn test_full_schedule() {
        let result = solve_differentiated_schedule(dec!(500000), 8, dec!(7.8)).unwrap();
        let payments: Vec<Money> = result.result.payments.iter().map(|p| p.payment).collect();
        assert_eq!(
            payments,
            vec![
                dec!(65750),
                dec!(65344),
                dec!(64938),
                dec!(64532),
                dec!(64125),
                dec!(63719),
                dec!(63313),
                dec!(62907),
            ]
        );
        assert_eq!(result.result.total_paid, dec!(514628));
        assert_eq!(result.result.overpayment, dec!(14628));
    }

    #[test]
    fn test_exact_integer_interest_not_over_rounded() {
        // Month 2 interest is exactly 7500; the 28-digit monthly rate leaves a residue
        let result = solve_differentiated_schedule(dec!(1000000), 10, dec!(10)).unwrap();
        assert_eq!(result.result.payments[0].payment, dec!(108334));
        assert_eq!(result.result.payments[1].payment, dec!(107500));
        assert_eq!(result.result.overpayment, dec!(45837));
    }

    #[test]
    fn test_zero_periods_error() {
        assert!(solve_differentiated_schedule(dec!(1000), 0, dec!(10)).is_err());
        assert!(differentiated_payments(dec!(1000), 0, dec!(10)).is_err());
    }

    #[test]
    fn test_overflow_is_domain_error() {
        // First month at 1000 % a year: 3.5e28 principal share plus 5.8e28 interest
        let err = solve_differentiated_schedule(dec!(70000000000000000000000000000), 2, dec!(1000))
            .unwrap_err();
        assert!(matches!(err, CreditCalcError::Domain { reason } if reason.contains("overflows")));

        // 7e28 repaid over three months: P * (n - 1) is out of range
        assert!(differentiated_payments(dec!(70000000000000000000000000000), 3, dec!(1)).is_err());
    }
}
