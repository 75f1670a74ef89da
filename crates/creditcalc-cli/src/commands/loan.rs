use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use std::error::Error;

use creditcalc_core::{dispatch, ComputationOutput, LoanOutcome, LoanRequest};

use crate::input;

#[derive(Args, Debug, Default)]
pub struct LoanArgs {
    /// Loan type: annuity or diff
    #[arg(long = "type", value_name = "TYPE")]
    pub loan_type: Option<String>,

    /// Loan principal
    #[arg(long, allow_negative_numbers = true)]
    pub principal: Option<Decimal>,

    /// Monthly payment (annuity only)
    #[arg(long, allow_negative_numbers = true)]
    pub payment: Option<Decimal>,

    /// Number of months
    #[arg(long, allow_negative_numbers = true)]
    pub periods: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, allow_negative_numbers = true)]
    pub interest: Option<Decimal>,

    /// JSON file holding a loan request; flags override its fields
    #[arg(long)]
    pub input: Option<String>,
}

impl LoanArgs {
    fn has_parameters(&self) -> bool {
        self.loan_type.is_some()
            || self.principal.is_some()
            || self.payment.is_some()
            || self.periods.is_some()
            || self.interest.is_some()
    }

    fn overlay(self, request: &mut LoanRequest) {
        if self.loan_type.is_some() {
            request.loan_type = self.loan_type;
        }
        request.principal = self.principal.or(request.principal);
        request.payment = self.payment.or(request.payment);
        request.periods = self.periods.or(request.periods);
        request.interest = self.interest.or(request.interest);
    }
}

/// Assemble the request: `--input` file with flags on top, then flags alone,
/// then JSON piped on stdin. With none of them the request is empty and
/// fails validation.
pub fn build_request(args: LoanArgs) -> Result<LoanRequest, Box<dyn Error>> {
    assemble(args, input::stdin::read_stdin)
}

fn assemble<F>(args: LoanArgs, piped: F) -> Result<LoanRequest, Box<dyn Error>>
where
    F: FnOnce() -> Result<Option<LoanRequest>, Box<dyn Error>>,
{
    if let Some(ref path) = args.input {
        let mut request = input::file::read_request(path)?;
        args.overlay(&mut request);
        return Ok(request);
    }
    let mut request = LoanRequest::default();
    if args.has_parameters() {
        args.overlay(&mut request);
    } else if let Some(piped_request) = piped()? {
        request = piped_request;
    }
    Ok(request)
}

pub fn run_loan(args: LoanArgs) -> Result<ComputationOutput<LoanOutcome>, Box<dyn Error>> {
    let request = build_request(args)?;
    debug!("loan request: {request:?}");
    Ok(dispatch(request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::fs;

    fn no_stdin() -> Result<Option<LoanRequest>, Box<dyn Error>> {
        panic!("stdin must not be read")
    }

    #[test]
    fn test_flags_build_request() {
        let args = LoanArgs {
            loan_type: Some("annuity".into()),
            principal: Some(dec!(100000)),
            periods: Some(dec!(12)),
            interest: Some(dec!(10)),
            ..Default::default()
        };
        let request = assemble(args, no_stdin).unwrap();
        assert_eq!(request.loan_type.as_deref(), Some("annuity"));
        assert_eq!(request.principal, Some(dec!(100000)));
        assert_eq!(request.payment, None);
    }

    #[test]
    fn test_stdin_used_without_flags() {
        let piped = LoanRequest::from_value(
            json!({"type": "diff", "principal": 500000, "periods": 8, "interest": 7.8}),
        )
        .unwrap();
        let request = assemble(LoanArgs::default(), || Ok(Some(piped))).unwrap();
        assert_eq!(request.loan_type.as_deref(), Some("diff"));
        assert_eq!(request.periods, Some(dec!(8)));
    }

    #[test]
    fn test_nothing_supplied_is_empty_request() {
        let request = assemble(LoanArgs::default(), || Ok(None)).unwrap();
        assert_eq!(request, LoanRequest::default());
    }

    #[test]
    fn test_flags_override_input_file() {
        let path = std::env::temp_dir().join("creditcalc_flags_override.json");
        fs::write(
            &path,
            r#"{"type": "annuity", "principal": 100000, "periods": 12, "interest": 5}"#,
        )
        .unwrap();
        let args = LoanArgs {
            interest: Some(dec!(10)),
            input: Some(path.display().to_string()),
            ..Default::default()
        };
        let request = assemble(args, no_stdin).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(request.interest, Some(dec!(10)));
        assert_eq!(request.principal, Some(dec!(100000)));
    }

    #[test]
    fn test_malformed_input_file() {
        let path = std::env::temp_dir().join("creditcalc_malformed_request.json");
        fs::write(&path, r#"{"type": "annuity", "principal": "lots"}"#).unwrap();
        let args = LoanArgs {
            input: Some(path.display().to_string()),
            ..Default::default()
        };
        let err = assemble(args, no_stdin).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("Failed to parse"));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_missing_input_file() {
        let args = LoanArgs {
            input: Some("/nonexistent/creditcalc/request.json".into()),
            ..Default::default()
        };
        let err = assemble(args, no_stdin).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
