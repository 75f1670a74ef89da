pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;
pub mod text;

use creditcalc_core::{ComputationOutput, LoanOutcome};
use std::error::Error;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn render(
    format: &OutputFormat,
    output: &ComputationOutput<LoanOutcome>,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Text => text::print_text(&output.result),
        OutputFormat::Json => json::print_json(output)?,
        OutputFormat::Table => table::print_table(&serde_json::to_value(output)?),
        OutputFormat::Csv => csv_out::print_csv(&serde_json::to_value(output)?)?,
        OutputFormat::Minimal => minimal::print_minimal(&serde_json::to_value(output)?),
    }
    Ok(())
}
