//! Differentiated loans: equal principal instalments, interest on the outstanding balance.

pub mod schedule;

pub use schedule::{
    differentiated_payments, solve_differentiated_schedule, DifferentiatedPayments,
    DifferentiatedSchedule,
};
