use rust_decimal::{Decimal, RoundingStrategy};

use super::error::FacturaError;

/// Round a monetary value to 2 decimal places, half away from zero.
///
/// Commercial rounding: 1.005 → 1.01, -1.005 → -1.01. Arithmetic is
/// exact decimal throughout the crate, so 333.33 × 0.21 = 69.9993
/// rounds to 70.00 with no floating-point correction needed.
///
/// Every monetary value entering or leaving the fiscal calculator goes
/// through this function; no other rounding mode is used in the core.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a European-formatted euro amount from a spreadsheet cell.
///
/// Accepts plain numbers as well as display strings such as
/// `"1.234,56 €"`: the euro sign and thousands separators (`.`) are
/// stripped and the decimal comma becomes a decimal point.
pub fn parse_euro_amount(raw: &str) -> Result<Decimal, FacturaError> {
    let cleaned: String = raw
        .trim()
        .replace('.', "")
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned
        .parse::<Decimal>()
        .map_err(|_| FacturaError::InvalidSelection(format!("invalid euro amount: \"{raw}\"")))
}
