//! Smallest-unit conversions.
//!
//! Every chain stores balances in an indivisible unit (wei, lamports, octas,
//! micro-denominations) related to the display unit by a fixed power of ten.
//! Conversions here are exact integer arithmetic on decimal strings; no
//! floating point is involved, and digits beyond the chain's exponent are
//! truncated, never rounded, so a converted amount can never exceed what the
//! user typed.

/// Parse a display-unit decimal string into the smallest unit.
///
/// Accepts plain decimals (`"1"`, `"1.5"`, `".5"`). Fractional digits past
/// `decimals` places are floored away. Signs, exponents, and anything
/// non-numeric are rejected.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u128, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("Amount is empty".to_string());
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("Invalid amount: {}", amount));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("Invalid amount: {}", amount));
    }

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or_else(|| "Unsupported precision".to_string())?;

    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| format!("Invalid amount: {}", amount))?
    };

    // Keep at most `decimals` fractional digits; the rest are floored away.
    let kept: String = frac_part.chars().take(decimals as usize).collect();
    let frac: u128 = if kept.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", kept, width = decimals as usize);
        padded
            .parse()
            .map_err(|_| format!("Invalid amount: {}", amount))?
    };

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| format!("Amount out of range: {}", amount))
}

/// [`parse_units`] plus the shared send precondition: the result must be
/// strictly positive.
pub fn parse_positive_amount(amount: &str, decimals: u32) -> Result<u128, String> {
    let value = parse_units(amount, decimals)?;
    if value == 0 {
        return Err("Amount must be greater than 0".to_string());
    }
    Ok(value)
}

/// Format a smallest-unit value as a display-unit decimal string.
///
/// At most `max_places` fractional digits are shown (truncated, matching the
/// parse direction) and trailing zeros are trimmed, so `1500000000000000000`
/// wei formats as `"1.5"` and `2000000` octas as `"0.02"`.
pub fn format_units(value: u128, decimals: u32, max_places: usize) -> String {
    let scale = match 10u128.checked_pow(decimals) {
        Some(s) => s,
        None => return value.to_string(),
    };
    let whole = value / scale;
    let frac = value % scale;

    let mut frac_str = format!("{:0width$}", frac, width = decimals as usize);
    frac_str.truncate(max_places);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }

    if frac_str.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_units("1.5", 18).unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(parse_units("0.02", 8).unwrap(), 2_000_000);
        assert_eq!(parse_units("2", 6).unwrap(), 2_000_000);
        assert_eq!(parse_units(".5", 9).unwrap(), 500_000_000);
        assert_eq!(parse_units("0", 18).unwrap(), 0);
    }

    #[test]
    fn parse_floors_extra_digits() {
        // 7 digits against 6 decimal places: the trailing 9 must be dropped,
        // not rounded up.
        assert_eq!(parse_units("1.0000019", 6).unwrap(), 1_000_001);
        assert_eq!(parse_units("0.123456789", 4).unwrap(), 1_234);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_units("", 18).is_err());
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units("+1", 18).is_err());
        assert!(parse_units("1e18", 18).is_err());
        assert!(parse_units("1.2.3", 18).is_err());
        assert!(parse_units(".", 18).is_err());
        assert!(parse_units("abc", 18).is_err());
    }

    #[test]
    fn positive_amount_rejects_zero() {
        assert!(parse_positive_amount("0", 18).is_err());
        assert!(parse_positive_amount("0.000", 9).is_err());
        assert_eq!(parse_positive_amount("0.001", 9).unwrap(), 1_000_000);
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_units(1_500_000_000_000_000_000, 18, 6), "1.5");
        assert_eq!(format_units(2_000_000, 8, 6), "0.02");
        assert_eq!(format_units(0, 18, 6), "0");
        assert_eq!(format_units(5_000_000, 6, 6), "5");
    }

    #[test]
    fn format_truncates_to_display_precision() {
        // 1.234567891 SOL at 4 display places: truncated, not rounded.
        assert_eq!(format_units(1_234_567_891, 9, 4), "1.2345");
    }

    #[test]
    fn round_trip_uses_the_same_exponent() {
        for (display, decimals, smallest) in [
            ("1.5", 18u32, 1_500_000_000_000_000_000u128),
            ("0.02", 8, 2_000_000),
            ("3.25", 9, 3_250_000_000),
            ("42", 6, 42_000_000),
        ] {
            assert_eq!(parse_units(display, decimals).unwrap(), smallest);
            assert_eq!(format_units(smallest, decimals, 6), display);
        }
    }
}
