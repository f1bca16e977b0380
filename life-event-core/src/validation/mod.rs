//! Declarative validation of the life event form.
//!
//! Each field owns an ordered list of [`Rule`]s. Rules run in order and the
//! first failing rule supplies the field's message. The end-date/start-date
//! ordering rule runs only when both dates are individually valid, and its
//! message is attached to [`Field::EmploymentEndDate`](crate::Field).

mod errors;
pub mod messages;
mod rules;
mod schema;

pub use errors::FieldErrors;
pub use rules::{Rule, VALIDATION_LIMITS, ValidationLimits, rules_for};
pub use schema::{validate, validate_field};
