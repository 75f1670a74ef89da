use rust_decimal::Decimal;
use thiserror::Error;

/// A request that does not describe exactly one solvable loan question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown loan type: {0:?} (expected \"annuity\" or \"diff\")")]
    InvalidMode(Option<String>),

    #[error("interest rate is required")]
    MissingRate,

    #[error("{field} must not be negative (got {value})")]
    NegativeParameter { field: &'static str, value: Decimal },

    #[error("expected exactly one unknown among principal, payment and periods, found {absent}")]
    AmbiguousUnknowns { absent: usize },

    #[error("{field} cannot be supplied for {mode} loans")]
    UnsupportedParameterForMode {
        field: &'static str,
        mode: &'static str,
    },

    #[error("{field} is required for {mode} loans")]
    MissingParameter {
        field: &'static str,
        mode: &'static str,
    },

    #[error("periods must be a positive whole number of months (got {0})")]
    InvalidPeriods(Decimal),
}

#[derive(Debug, Error)]
pub enum CreditCalcError {
    /// Any malformed, ambiguous, negative or missing parameter combination.
    /// Displays the coarse message the CLI prints; the cause stays inspectable.
    #[error("Incorrect parameters.")]
    Validation(#[from] ValidationError),

    #[error("Loan cannot be repaid: {reason}")]
    Domain { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CreditCalcError {
    /// The validation cause, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CreditCalcError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CreditCalcError {
    fn from(e: serde_json::Error) -> Self {
        CreditCalcError::SerializationError(e.to_string())
    }
}
