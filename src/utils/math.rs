use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `decimals` places, ties to even.
///
/// Rounds the exact binary value of `value`, so `2.675` (stored as
/// 2.67499999...) rounds down to `2.67`.
/// Values that do not fit a `Decimal` (NaN, infinities, > 7.9e28) come back unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    round_decimal(value, decimals)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn round_decimal(value: f64, decimals: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven))
}

/// Format a dollar amount with thousands separators, e.g. `1,234,567.89`
pub fn format_currency(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = match round_decimal(value, decimals) {
        Some(rounded) => format!("{:.*}", decimals as usize, rounded),
        None => format!("{:.*}", decimals as usize, value),
    };

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format a 0-1 ratio as a percentage with two decimals, e.g. `0.1234` -> `12.34%`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
