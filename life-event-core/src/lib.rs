pub mod calculations;
pub mod dates;
pub mod models;
pub mod numbers;
pub mod validation;

pub use calculations::{RoundingPolicy, calculate_total_income, calculate_total_income_on};
pub use models::*;
pub use validation::{FieldErrors, validate, validate_field};
