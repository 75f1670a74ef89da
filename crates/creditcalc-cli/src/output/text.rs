use creditcalc_core::LoanOutcome;

/// Print the plain summary lines.
pub fn print_text(outcome: &LoanOutcome) {
    println!("{outcome}");
}
