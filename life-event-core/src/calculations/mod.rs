//! Derived figures computed live from the raw form values.
//!
//! Everything here is total: malformed input degrades to a zero result
//! instead of an error, because these run on every keystroke.

pub mod common;
pub mod income;

pub use common::RoundingPolicy;
pub use income::{
    DAYS_PER_YEAR, calculate_total_income, calculate_total_income_on, calculate_total_income_with,
};
