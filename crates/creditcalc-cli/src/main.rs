mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::warn;
use std::error::Error;
use std::process;

use commands::loan::LoanArgs;
use creditcalc_core::CreditCalcError;

/// Annuity and differentiated loan calculations
#[derive(Parser)]
#[command(
    name = "creditcalc",
    version,
    about = "Annuity and differentiated loan calculations",
    long_about = "Solves for the monthly payment, the loan principal or the repayment \
                  term of an annuity loan, or prints the month-by-month schedule of a \
                  differentiated loan. All arithmetic is decimal.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    loan: LoanArgs,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        println!("creditcalc {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = commands::loan::run_loan(cli.loan)
        .and_then(|out| output::render(&cli.output, &out));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            match report_error(&*e) {
                ErrorReport::Stdout(message) => println!("{message}"),
                ErrorReport::Stderr(message) => eprintln!("{}: {}", "error".red().bold(), message),
            }
            process::exit(1);
        }
    }
}

/// Where a failed run's message goes.
#[derive(Debug, PartialEq, Eq)]
enum ErrorReport {
    Stdout(String),
    Stderr(String),
}

/// Rejected parameters and unrepayable loans are answers, printed on stdout.
/// Anything else (unreadable input, output failures) goes to stderr.
fn report_error(e: &(dyn Error + 'static)) -> ErrorReport {
    match e.downcast_ref::<CreditCalcError>() {
        Some(core_err @ (CreditCalcError::Validation(_) | CreditCalcError::Domain { .. })) => {
            if let Some(cause) = core_err.validation() {
                warn!("request rejected: {cause}");
            }
            ErrorReport::Stdout(core_err.to_string())
        }
        _ => ErrorReport::Stderr(e.to_string()),
    }
}
