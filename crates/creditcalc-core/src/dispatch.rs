//! Validation of a raw loan request and routing to the matching solver.

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::annuity::{
    solve_annuity_payment, solve_loan_principal, solve_number_of_months, AnnuityPayment,
    LoanPrincipal, RepaymentTerm,
};
use crate::differentiated::{solve_differentiated_schedule, DifferentiatedSchedule};
use crate::error::ValidationError;
use crate::types::*;
use crate::CreditCalcResult;

/// Loan parameters as supplied by the caller. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanRequest {
    #[serde(rename = "type", alias = "loan_type")]
    pub loan_type: Option<String>,
    pub principal: Option<Money>,
    pub payment: Option<Money>,
    /// Term in months; must be a whole number
    pub periods: Option<Decimal>,
    /// Annual nominal interest in percent
    pub interest: Option<Percent>,
}

impl LoanRequest {
    /// Parse a request from JSON text, e.g. `{"type": "diff", "principal": 500000, ...}`.
    pub fn from_json(json: &str) -> CreditCalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> CreditCalcResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// The single unknown of an annuity loan, with the two known values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnuityUnknown {
    Periods { principal: Money, payment: Money },
    Payment { principal: Money, periods: u32 },
    Principal { payment: Money, periods: u32 },
}

/// A validated request: exactly one question to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanPlan {
    Annuity {
        unknown: AnnuityUnknown,
        annual_percent: Percent,
    },
    Differentiated {
        principal: Money,
        periods: u32,
        annual_percent: Percent,
    },
}

impl LoanPlan {
    pub fn mode(&self) -> LoanMode {
        match self {
            LoanPlan::Annuity { .. } => LoanMode::Annuity,
            LoanPlan::Differentiated { .. } => LoanMode::Differentiated,
        }
    }
}

/// Answer to a loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoanOutcome {
    RepaymentTerm(RepaymentTerm),
    AnnuityPayment(AnnuityPayment),
    LoanPrincipal(LoanPrincipal),
    DifferentiatedSchedule(DifferentiatedSchedule),
}

impl fmt::Display for LoanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanOutcome::RepaymentTerm(r) => write!(f, "{r}"),
            LoanOutcome::AnnuityPayment(r) => write!(f, "{r}"),
            LoanOutcome::LoanPrincipal(r) => write!(f, "{r}"),
            LoanOutcome::DifferentiatedSchedule(r) => write!(f, "{r}"),
        }
    }
}

/// Check a request, failing at the first violated rule:
///
/// 1. known loan type and a rate
/// 2. nothing negative
/// 3. at most one of principal, payment, periods absent
/// 4. no payment for differentiated loans
/// 5. annuity: exactly one absent
/// 6. differentiated: principal and periods present
pub fn validate(request: &LoanRequest) -> Result<LoanPlan, ValidationError> {
    let mode: LoanMode = match request.loan_type.as_deref() {
        Some(s) => s.parse()?,
        None => return Err(ValidationError::InvalidMode(None)),
    };
    let annual_percent = request.interest.ok_or(ValidationError::MissingRate)?;

    let supplied = [
        ("principal", request.principal),
        ("payment", request.payment),
        ("periods", request.periods),
        ("interest", request.interest),
    ];
    for (field, value) in supplied {
        if let Some(value) = value {
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeParameter { field, value });
            }
        }
    }

    let absent = [request.principal, request.payment, request.periods]
        .iter()
        .filter(|v| v.is_none())
        .count();
    if absent > 1 {
        return Err(ValidationError::AmbiguousUnknowns { absent });
    }

    match mode {
        LoanMode::Differentiated => {
            if request.payment.is_some() {
                return Err(ValidationError::UnsupportedParameterForMode {
                    field: "payment",
                    mode: mode.as_str(),
                });
            }
            let principal = request
                .principal
                .ok_or(ValidationError::MissingParameter {
                    field: "principal",
                    mode: mode.as_str(),
                })?;
            let periods = request.periods.ok_or(ValidationError::MissingParameter {
                field: "periods",
                mode: mode.as_str(),
            })?;
            Ok(LoanPlan::Differentiated {
                principal,
                periods: whole_months(periods)?,
                annual_percent,
            })
        }
        LoanMode::Annuity => {
            let unknown = match (request.principal, request.payment, request.periods) {
                (Some(principal), Some(payment), None) => {
                    AnnuityUnknown::Periods { principal, payment }
                }
                (Some(principal), None, Some(periods)) => AnnuityUnknown::Payment {
                    principal,
                    periods: whole_months(periods)?,
                },
                (None, Some(payment), Some(periods)) => AnnuityUnknown::Principal {
                    payment,
                    periods: whole_months(periods)?,
                },
                _ => return Err(ValidationError::AmbiguousUnknowns { absent }),
            };
            Ok(LoanPlan::Annuity {
                unknown,
                annual_percent,
            })
        }
    }
}

/// Solve an already validated plan.
pub fn solve_plan(plan: LoanPlan) -> CreditCalcResult<ComputationOutput<LoanOutcome>> {
    debug!("dispatching {} plan: {plan:?}", plan.mode());
    match plan {
        LoanPlan::Annuity {
            unknown: AnnuityUnknown::Periods { principal, payment },
            annual_percent,
        } => Ok(solve_number_of_months(principal, payment, annual_percent)?
            .map(LoanOutcome::RepaymentTerm)),
        LoanPlan::Annuity {
            unknown: AnnuityUnknown::Payment { principal, periods },
            annual_percent,
        } => Ok(solve_annuity_payment(principal, periods, annual_percent)?
            .map(LoanOutcome::AnnuityPayment)),
        LoanPlan::Annuity {
            unknown: AnnuityUnknown::Principal { payment, periods },
            annual_percent,
        } => Ok(solve_loan_principal(payment, periods, annual_percent)?
            .map(LoanOutcome::LoanPrincipal)),
        LoanPlan::Differentiated {
            principal,
            periods,
            annual_percent,
        } => Ok(solve_differentiated_schedule(principal, periods, annual_percent)?
            .map(LoanOutcome::DifferentiatedSchedule)),
    }
}

/// Validate a request and solve it.
pub fn dispatch(request: LoanRequest) -> CreditCalcResult<ComputationOutput<LoanOutcome>> {
    let plan = validate(&request)?;
    solve_plan(plan)
}

fn whole_months(periods: Decimal) -> Result<u32, ValidationError> {
    if periods <= Decimal::ZERO || !periods.fract().is_zero() {
        return Err(ValidationError::InvalidPeriods(periods));
    }
    periods
        .to_u32()
        .ok_or(ValidationError::InvalidPeriods(periods))
}
