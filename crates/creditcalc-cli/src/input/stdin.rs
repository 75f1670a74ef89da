use creditcalc_core::{CreditCalcResult, LoanRequest};
use std::io::{self, Read};

/// Read a loan request piped on stdin.
/// Returns None for an interactive terminal or empty input.
pub fn read_stdin() -> Result<Option<LoanRequest>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(parse_piped(&buffer)?)
}

fn parse_piped(buffer: &str) -> CreditCalcResult<Option<LoanRequest>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    LoanRequest::from_json(trimmed).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creditcalc_core::CreditCalcError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_input_is_no_request() {
        assert_eq!(parse_piped("  \n").unwrap(), None);
    }

    #[test]
    fn test_piped_request() {
        let request = parse_piped(r#"{"type": "annuity", "principal": 100000, "periods": 12, "interest": 10}"#)
            .unwrap()
            .unwrap();
        assert_eq!(request.principal, Some(dec!(100000)));
        assert_eq!(request.payment, None);
    }

    #[test]
    fn test_malformed_request() {
        let err = parse_piped("{type: annuity}").unwrap_err();
        assert!(matches!(err, CreditCalcError::SerializationError(_)));
    }
}
