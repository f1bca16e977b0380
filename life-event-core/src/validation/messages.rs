//! User-facing validation messages, one constant per rule.

pub const EMPLOYER_NAME_REQUIRED: &str = "Employer name is required";
pub const EMPLOYER_NAME_TOO_SHORT: &str = "Employer name must be at least 2 characters";
pub const EMPLOYER_NAME_TOO_LONG: &str = "Employer name must be less than 100 characters";

pub const INCOME_REQUIRED: &str = "Annual gross income is required";
pub const INCOME_INVALID: &str = "Please enter a valid income amount";
pub const INCOME_NOT_POSITIVE: &str = "Annual gross income must be greater than zero";
pub const INCOME_TOO_LARGE: &str = "Annual gross income must be at most $1,000,000,000,000";

pub const START_DATE_REQUIRED: &str = "Employment start date is required";
pub const START_DATE_INVALID: &str = "Please enter a valid start date";

pub const END_DATE_INVALID: &str = "Please enter a valid end date";
pub const END_DATE_BEFORE_START: &str = "Employment end date must be after start date";

pub const NOTES_TOO_LONG: &str = "Notes must be less than 500 characters";
