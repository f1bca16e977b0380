//! Conversions between raw numeric text and its thousands-separated display form.
//!
//! The income input stores [`parse_to_raw_digits`] of whatever was typed and
//! renders [`format_with_thousands_separators`] of the stored value, so the two
//! functions must round-trip the digit sequence.

use std::sync::LazyLock;

use regex::Regex;

/// Matches every character that is neither an ASCII digit nor a decimal point.
static NON_DIGIT_OR_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static pattern is valid"));

/// Matches a maximal run of ASCII digits.
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static pattern is valid"));

const THOUSANDS_SEPARATOR: char = ',';
const DECIMAL_POINT: char = '.';

/// Removes every thousands separator, leaving all other characters in place.
pub fn strip_thousands_separators(value: &str) -> String {
    value.replace(THOUSANDS_SEPARATOR, "")
}

/// Keeps only ASCII digits and decimal points.
///
/// This does not check that the result is a well-formed number: `"1.2.3"`
/// passes through unchanged. Currency symbols, separators and stray letters
/// are all discarded.
///
/// ```
/// use life_event_core::numbers::parse_to_raw_digits;
///
/// assert_eq!(parse_to_raw_digits("$1,234.50"), "1234.50");
/// assert_eq!(parse_to_raw_digits("1.2.3"), "1.2.3");
/// ```
pub fn parse_to_raw_digits(value: &str) -> String {
    NON_DIGIT_OR_DECIMAL.replace_all(value, "").into_owned()
}

/// Inserts a separator every three digits of the integer portion.
///
/// Empty input yields an empty string. Existing separators are stripped
/// first. Text that is not numeric once separators are removed is returned
/// as-is (separator-free) rather than rejected. The fractional portion is
/// never grouped.
///
/// ```
/// use life_event_core::numbers::format_with_thousands_separators;
///
/// assert_eq!(format_with_thousands_separators("1234567"), "1,234,567");
/// assert_eq!(format_with_thousands_separators("1234.5678"), "1,234.5678");
/// assert_eq!(format_with_thousands_separators("abc"), "abc");
/// ```
pub fn format_with_thousands_separators(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let clean = strip_thousands_separators(value);
    if !is_numeric(&clean) {
        return clean;
    }

    match clean.split_once(DECIMAL_POINT) {
        Some((integer, fraction)) => format!("{}.{fraction}", group_digit_runs(integer)),
        None => group_digit_runs(&clean),
    }
}

/// Formats a whole-dollar amount as US currency with no cents.
///
/// ```
/// use life_event_core::numbers::format_as_currency;
///
/// assert_eq!(format_as_currency(1500), "$1,500");
/// assert_eq!(format_as_currency(0), "$0");
/// assert_eq!(format_as_currency(-99932), "-$99,932");
/// ```
pub fn format_as_currency(amount: i64) -> String {
    let digits = group_thousands(&amount.unsigned_abs().to_string());
    if amount < 0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Numeric in the loose sense a text input uses: surrounding whitespace is
/// ignored and anything a float parser accepts, except NaN, counts.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(|v| !v.is_nan())
}

fn group_digit_runs(value: &str) -> String {
    DIGIT_RUN
        .replace_all(value, |caps: &regex::Captures<'_>| group_thousands(&caps[0]))
        .into_owned()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }
    out
}
