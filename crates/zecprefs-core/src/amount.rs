//! Conversion between base-unit amounts and user-facing decimal strings.
//!
//! Amounts are kept as integers everywhere; floating point only appears when
//! converting to a fiat estimate.

use crate::types::Amount;

/// Amount parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Amount is missing digits around the decimal point")]
    MissingDigits,
    #[error("Invalid character '{0}' in amount")]
    InvalidCharacter(char),
    #[error("Amount has more than one decimal point")]
    MultipleDecimalPoints,
    #[error("Amount has more than {places} decimal places")]
    TooManyDecimals { places: u32 },
    #[error("Amount is too large")]
    Overflow,
}

/// Format a base-unit amount as a decimal string with `places` fractional digits.
///
/// The fractional part is left out when it is zero, so `150_000_000` becomes
/// `"1.50000000"` but `100_000_000` becomes `"1"`.
pub fn to_display_string(amount: Amount, places: u32) -> String {
    let magnitude = u128::from(amount.unsigned_abs());
    let (whole, fraction) = match 10u128.checked_pow(places) {
        Some(divider) => (magnitude / divider, magnitude % divider),
        None => (0, magnitude),
    };
    let sign = if amount < 0 { "-" } else { "" };

    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        format!(
            "{sign}{whole}.{fraction:0>width$}",
            width = places as usize
        )
    }
}

/// Parse a user-entered decimal string into base units.
///
/// Accepts an optional leading `-`, digits, and at most one `.` followed by at
/// most `places` digits. Surrounding whitespace is ignored.
pub fn parse_user_string(text: &str, places: u32) -> Result<Amount, AmountError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AmountError::Empty);
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = digits.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(AmountError::MultipleDecimalPoints);
    }

    let divider = 10u128.checked_pow(places).ok_or(AmountError::Overflow)?;
    let mut magnitude = parse_digits(whole)?
        .checked_mul(divider)
        .ok_or(AmountError::Overflow)?;

    if let Some(fraction) = fraction {
        let value = parse_digits(fraction)?;
        if fraction.len() > places as usize {
            return Err(AmountError::TooManyDecimals { places });
        }
        // Right-pad to `places` digits: "5" with 8 places is 50000000.
        let scale = 10u128.pow(places - fraction.len() as u32);
        magnitude = value
            .checked_mul(scale)
            .and_then(|v| magnitude.checked_add(v))
            .ok_or(AmountError::Overflow)?;
    }

    let magnitude = i128::try_from(magnitude).map_err(|_| AmountError::Overflow)?;
    let signed = if negative { -magnitude } else { magnitude };
    Amount::try_from(signed).map_err(|_| AmountError::Overflow)
}

fn parse_digits(digits: &str) -> Result<u128, AmountError> {
    if digits.is_empty() {
        return Err(AmountError::MissingDigits);
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(AmountError::InvalidCharacter(bad));
    }
    digits.parse::<u128>().map_err(|_| AmountError::Overflow)
}

/// Convert base units to whole coins for fiat estimates.
pub fn to_coins(amount: Amount, places: u32) -> f64 {
    amount as f64 / 10f64.powi(places as i32)
}

/// Format a dollar value as `$1,234.56`.
pub fn format_usd(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("${sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
