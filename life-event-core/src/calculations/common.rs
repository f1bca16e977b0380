//! Common utility functions for income calculations.
//!
//! This module provides the rounding policy shared by every derived figure
//! and the lenient number parsing used on partially typed input.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::numbers::parse_to_raw_digits;

/// How a derived amount is rounded to a whole dollar.
///
/// The two policies only disagree on exact `.5` midpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// `0.5` rounds to `1`, `2.5` to `3`, `-2.5` to `-3`.
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: `0.5` rounds to `0`, `2.5` to `2`, `3.5` to `4`.
    HalfEven,
}

impl RoundingPolicy {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Rounds `value` to zero decimal places under this policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use life_event_core::RoundingPolicy;
    ///
    /// assert_eq!(RoundingPolicy::HalfAwayFromZero.round(dec!(2.5)), dec!(3));
    /// assert_eq!(RoundingPolicy::HalfEven.round(dec!(2.5)), dec!(2));
    /// assert_eq!(RoundingPolicy::HalfEven.round(dec!(2.51)), dec!(3));
    /// ```
    pub fn round(
        self,
        value: Decimal,
    ) -> Decimal {
        value.round_dp_with_strategy(0, self.strategy())
    }
}

/// Parses possibly formatted income text into a [`Decimal`], leniently.
///
/// Every character but digits and decimal points is dropped, then the
/// longest leading number is read, so `"1.2.3"` reads as `1.2`. Returns
/// `None` when no digits lead the cleaned text.
pub fn parse_lenient_amount(value: &str) -> Option<Decimal> {
    let raw = parse_to_raw_digits(value);
    let prefix = match raw.match_indices('.').nth(1) {
        Some((second_point, _)) => &raw[..second_point],
        None => raw.as_str(),
    };
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let normalized = match prefix.strip_suffix('.') {
        Some(integer) => integer,
        None => prefix,
    };
    let normalized = if normalized.starts_with('.') {
        format!("0{normalized}")
    } else {
        normalized.to_owned()
    };

    normalized.parse().ok()
}
