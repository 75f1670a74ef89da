//! Annuity loans: level monthly payments.
//!
//! Given any two of principal, payment and term (plus the rate), solve the third.

pub mod months;
pub mod payment;
pub mod principal;

pub use months::{solve_number_of_months, RepaymentTerm};
pub use payment::{solve_annuity_payment, AnnuityPayment};
pub use principal::{solve_loan_principal, LoanPrincipal};
