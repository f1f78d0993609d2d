//! Income input parsing and rupee formatting

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Please enter a valid income amount: '{input}'")]
pub struct InvalidIncomeInput {
    pub input: String,
}

/// Parse a user-entered annual income.
///
/// Accepts an optional `₹` prefix and `,` or `_` digit separators
/// (`₹12,00,000`, `1_500_000`), plain decimals and scientific notation.
pub fn parse_income(input: &str) -> Result<Decimal, InvalidIncomeInput> {
    let invalid = || InvalidIncomeInput {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed).trim_start();
    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return Err(invalid());
    }

    let income = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| invalid())?;

    if income.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if income.is_sign_negative() {
        return Err(invalid());
    }
    Ok(income)
}

/// Round to two decimal places, halves away from zero
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount in rupees with Indian digit grouping, e.g. `₹12,00,000.00`
pub fn format_inr(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", round_half_up(amount.abs()));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}₹{}.{}", sign, group_indian(int_part), frac_part)
}

/// Insert separators after the last three digits and then every two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_plain_numbers() {
        assert_eq!(parse_income("1500000"), Ok(dec!(1500000)));
        assert_eq!(parse_income("  1234.56 "), Ok(dec!(1234.56)));
        assert_eq!(parse_income("0"), Ok(dec!(0)));
    }

    #[test]
    fn parse_with_separators_and_symbol() {
        assert_eq!(parse_income("₹12,00,000"), Ok(dec!(1200000)));
        assert_eq!(parse_income("₹ 7,00,000.50"), Ok(dec!(700000.50)));
        assert_eq!(parse_income("1_500_000"), Ok(dec!(1500000)));
    }

    #[test]
    fn parse_scientific() {
        assert_eq!(parse_income("1.5e6"), Ok(dec!(1500000)));
    }

    #[test]
    fn reject_invalid_input() {
        for input in ["", "   ", "₹", "abc", "12abc", "-1", "-0.01", "1.2.3"] {
            assert_eq!(
                parse_income(input),
                Err(InvalidIncomeInput {
                    input: input.to_string()
                }),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(parse_income("-0"), Ok(dec!(0)));
    }

    #[test]
    fn format_indian_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹0.00");
        assert_eq!(format_inr(dec!(999)), "₹999.00");
        assert_eq!(format_inr(dec!(1000)), "₹1,000.00");
        assert_eq!(format_inr(dec!(75000)), "₹75,000.00");
        assert_eq!(format_inr(dec!(700000)), "₹7,00,000.00");
        assert_eq!(format_inr(dec!(1200000)), "₹12,00,000.00");
        assert_eq!(format_inr(dec!(123456789.5)), "₹12,34,56,789.50");
    }

    #[test]
    fn format_rounds_to_paise() {
        assert_eq!(format_inr(dec!(262500.004)), "₹2,62,500.00");
        assert_eq!(format_inr(dec!(-1500)), "-₹1,500.00");
    }

    #[test]
    fn format_rounds_half_up() {
        assert_eq!(format_inr(dec!(1.235)), "₹1.24");
        assert_eq!(format_inr(dec!(0.995)), "₹1.00");
        assert_eq!(format_inr(dec!(0.0075)), "₹0.01");
        assert_eq!(format_inr(dec!(1234567.899)), "₹12,34,567.90");
    }
}
