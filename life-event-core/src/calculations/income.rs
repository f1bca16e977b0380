//! Prorated total income over an employment span.
//!
//! # Algorithm
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Resolve a missing end date to today |
//! | 2    | Inclusive day count: `(end - start) + 1` |
//! | 3    | Years worked: days / 365.25 |
//! | 4    | Total: annual income × years worked |
//! | 5    | Round to a whole dollar with the [`RoundingPolicy`] |
//!
//! Any malformed input (missing income or start date, unparseable dates,
//! an end date before the start date, arithmetic overflow) yields `0`.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use life_event_core::calculate_total_income_on;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let total = calculate_total_income_on("100,000", "2023-01-01", "2023-12-31", today);
//!
//! // 365 days / 365.25 = 0.99932 years
//! assert_eq!(total, 99932);
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::common::{RoundingPolicy, parse_lenient_amount};
use crate::dates::{inclusive_days, parse_iso_date, today};

/// Average calendar year length over a four-year leap cycle.
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Total income over the span, using the local calendar date for an open end.
///
/// See [`calculate_total_income_on`].
pub fn calculate_total_income(
    annual_gross_income: &str,
    employment_start_date: &str,
    employment_end_date: &str,
) -> i64 {
    calculate_total_income_on(
        annual_gross_income,
        employment_start_date,
        employment_end_date,
        today(),
    )
}

/// Total income over the span, resolving an empty end date to `today`.
///
/// Rounds with [`RoundingPolicy::HalfAwayFromZero`].
pub fn calculate_total_income_on(
    annual_gross_income: &str,
    employment_start_date: &str,
    employment_end_date: &str,
    today: NaiveDate,
) -> i64 {
    calculate_total_income_with(
        annual_gross_income,
        employment_start_date,
        employment_end_date,
        today,
        RoundingPolicy::default(),
    )
}

/// Total income over the span with an explicit rounding policy.
pub fn calculate_total_income_with(
    annual_gross_income: &str,
    employment_start_date: &str,
    employment_end_date: &str,
    today: NaiveDate,
    rounding: RoundingPolicy,
) -> i64 {
    if annual_gross_income.is_empty() || employment_start_date.is_empty() {
        return 0;
    }

    let Some(start) = parse_iso_date(employment_start_date) else {
        debug!(input = %employment_start_date, "start date not parseable; total income is zero");
        return 0;
    };

    let end = if employment_end_date.is_empty() {
        today
    } else {
        match parse_iso_date(employment_end_date) {
            Some(end) => end,
            None => {
                debug!(input = %employment_end_date, "end date not parseable; total income is zero");
                return 0;
            }
        }
    };

    if end < start {
        debug!(%start, %end, "end date precedes start date; total income is zero");
        return 0;
    }

    let annual_income = parse_lenient_amount(annual_gross_income).unwrap_or_else(|| {
        debug!(input = %annual_gross_income, "income not parseable; treating as zero");
        Decimal::ZERO
    });

    let days = inclusive_days(start, end);

    prorate(annual_income, days, rounding).unwrap_or_else(|| {
        warn!(
            annual_income = %annual_income,
            days,
            "total income overflowed; reporting zero"
        );
        0
    })
}

/// `annual_income × days / 365.25`, rounded. `None` on overflow.
fn prorate(
    annual_income: Decimal,
    days: i64,
    rounding: RoundingPolicy,
) -> Option<i64> {
    let earned = annual_income
        .checked_mul(Decimal::from(days))?
        .checked_div(DAYS_PER_YEAR)?;

    rounding.round(earned).to_i64()
}
