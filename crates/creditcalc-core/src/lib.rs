pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "annuity")]
pub mod annuity;

#[cfg(feature = "differentiated")]
pub mod differentiated;

#[cfg(all(feature = "annuity", feature = "differentiated"))]
pub mod dispatch;

#[cfg(all(feature = "annuity", feature = "differentiated"))]
pub use dispatch::{dispatch, solve_plan, validate, LoanOutcome, LoanPlan, LoanRequest};

pub use error::{CreditCalcError, ValidationError};
pub use types::*;

/// Standard result type for all creditcalc operations
pub type CreditCalcResult<T> = Result<T, CreditCalcError>;
