//! Number formatting shared by report tables and narrative text.
//!
//! Amounts are rounded half away from zero, the way financial tables are
//! usually presented, and the integer part is grouped with commas.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to `dp` decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use policy_core::format::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46));
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats `value` with exactly `dp` decimals and comma thousands separators.
///
/// NaN renders as `nan` and infinities as `inf` / `-inf`.
///
/// # Examples
///
/// ```
/// use policy_core::format::format_number;
///
/// assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_number(-0.5, 0), "-1");
/// assert_eq!(format_number(f64::NAN, 2), "nan");
/// ```
pub fn format_number(
    value: f64,
    dp: u32,
) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = match Decimal::from_f64(value) {
        Some(d) => {
            let mut rounded = round_half_up(d, dp);
            rounded.rescale(dp);
            rounded.to_string()
        }
        None => format!("{value:.prec$}", prec = dp as usize),
    };
    group_thousands(&text)
}

/// Formats a decimal with comma thousands separators, keeping its own
/// precision (trailing zeros removed).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use policy_core::format::format_decimal;
///
/// assert_eq!(format_decimal(dec!(30000)), "30,000");
/// assert_eq!(format_decimal(dec!(0.250)), "0.25");
/// ```
pub fn format_decimal(value: Decimal) -> String {
    group_thousands(&value.normalize().to_string())
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" reads oddly in a table
    let is_zero = int_part.chars().chain(frac_part.unwrap_or("").chars()).all(|c| c == '0');
    let sign = if is_zero { "" } else { sign };

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46));
    }

    #[test]
    fn round_half_up_to_whole_units() {
        assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
    }

    // =========================================================================
    // format_number tests
    // =========================================================================

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.0, 2), "1,234,567.00");
    }

    #[test]
    fn format_number_small_values_are_not_grouped() {
        assert_eq!(format_number(999.994, 2), "999.99");
    }

    #[test]
    fn format_number_pads_decimals() {
        assert_eq!(format_number(12.5, 2), "12.50");
    }

    #[test]
    fn format_number_negative_values() {
        assert_eq!(format_number(-98765.4321, 2), "-98,765.43");
    }

    #[test]
    fn format_number_without_decimals() {
        assert_eq!(format_number(-1234.4, 0), "-1,234");
    }

    #[test]
    fn format_number_drops_sign_of_rounded_zero() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn format_number_non_finite() {
        assert_eq!(format_number(f64::NAN, 2), "nan");
        assert_eq!(format_number(f64::INFINITY, 2), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY, 2), "-inf");
    }

    // =========================================================================
    // format_decimal tests
    // =========================================================================

    #[test]
    fn format_decimal_keeps_precision() {
        assert_eq!(format_decimal(dec!(1234.5)), "1,234.5");
    }

    #[test]
    fn format_decimal_integer() {
        assert_eq!(format_decimal(dec!(1000000)), "1,000,000");
    }

    #[test]
    fn format_decimal_negative() {
        assert_eq!(format_decimal(dec!(-0.10)), "-0.1");
    }
}
