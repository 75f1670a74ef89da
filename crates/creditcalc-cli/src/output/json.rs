use creditcalc_core::{ComputationOutput, LoanOutcome};

/// Pretty-print the full output envelope to stdout.
pub fn print_json(output: &ComputationOutput<LoanOutcome>) -> serde_json::Result<()> {
    println!("{}", render_json(output)?);
    Ok(())
}

pub fn render_json(output: &ComputationOutput<LoanOutcome>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(output)
}
