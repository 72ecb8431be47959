use thiserror::Error;

/// Prices are stored as integer cents so sums stay exact.
/// For USD/EUR, 1 unit = 100 cents, so $12.50 = 1250 cents.
pub type Cents = i64;

/// Largest price a single service may carry: 1,000,000.00.
/// Keeps any realistic log's totals far away from `i64` overflow.
pub const MAX_PRICE_CENTS: Cents = 100_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePriceError {
    #[error("price is empty")]
    Empty,

    #[error("invalid price format: {0}")]
    InvalidFormat(String),

    #[error("price cannot be negative: {0}")]
    Negative(String),

    #[error("price has more than two decimals: {0}")]
    TooPrecise(String),

    #[error("price is above the {max} limit: {0}", max = format_cents(MAX_PRICE_CENTS))]
    TooLarge(String),
}

/// Format cents as a plain two-decimal amount.
/// Example: 1250 -> "12.50", 0 -> "0.00"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents with a currency symbol in front, e.g. "$35.00".
pub fn format_price(cents: Cents, symbol: &str) -> String {
    format!("{}{}", symbol, format_cents(cents))
}

/// Parse a price typed by a user into cents.
/// Accepts "25", "25.5", "25.50" and ".50".
/// Negative amounts and sub-cent precision are rejected.
pub fn parse_price(input: &str) -> Result<Cents, ParsePriceError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParsePriceError::Empty);
    }
    if input.starts_with('-') {
        return Err(ParsePriceError::Negative(input.to_string()));
    }

    let invalid = || ParsePriceError::InvalidFormat(input.to_string());
    let (units_str, decimals_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };

    if decimals_str.contains('.') {
        return Err(invalid());
    }
    if units_str.is_empty() && decimals_str.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(decimals_str) {
        return Err(invalid());
    }
    if decimals_str.len() > 2 {
        return Err(ParsePriceError::TooPrecise(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };
    let decimals: i64 = match decimals_str.len() {
        0 => 0,
        // "12.5" means fifty cents
        1 => decimals_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => decimals_str.parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimals))
        .ok_or_else(|| ParsePriceError::TooLarge(input.to_string()))?;
    if cents > MAX_PRICE_CENTS {
        return Err(ParsePriceError::TooLarge(input.to_string()));
    }
    Ok(cents)
}

/// Average of `total` over `count` items, rounded half-up to whole cents.
/// Returns 0 when there is nothing to average.
pub fn average_cents(total: Cents, count: i64) -> Cents {
    if count <= 0 {
        return 0;
    }
    let (total, count) = (i128::from(total), i128::from(count));
    let rounded = (total * 2 + count) / (count * 2);
    Cents::try_from(rounded).unwrap_or(if rounded < 0 { Cents::MIN } else { Cents::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(3500), "35.00");
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(7), "0.07");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-150), "-1.50");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(10000, "$"), "$100.00");
        assert_eq!(format_price(0, "€"), "€0.00");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("25"), Ok(2500));
        assert_eq!(parse_price("25.5"), Ok(2550));
        assert_eq!(parse_price("25.50"), Ok(2550));
        assert_eq!(parse_price(".50"), Ok(50));
        assert_eq!(parse_price("0"), Ok(0));
        assert_eq!(parse_price(" 12.34 "), Ok(1234));
        assert_eq!(parse_price("7."), Ok(700));
    }

    #[test]
    fn test_parse_price_rejects_bad_input() {
        assert_eq!(parse_price(""), Err(ParsePriceError::Empty));
        assert!(matches!(
            parse_price("-5"),
            Err(ParsePriceError::Negative(_))
        ));
        assert!(matches!(
            parse_price("1.999"),
            Err(ParsePriceError::TooPrecise(_))
        ));
        assert!(matches!(
            parse_price("abc"),
            Err(ParsePriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("1.2.3"),
            Err(ParsePriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("."),
            Err(ParsePriceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_price_enforces_limit() {
        assert_eq!(parse_price("1000000"), Ok(MAX_PRICE_CENTS));
        assert!(matches!(
            parse_price("1000000.01"),
            Err(ParsePriceError::TooLarge(_))
        ));
        assert!(matches!(
            parse_price("50000000000000000"),
            Err(ParsePriceError::TooLarge(_))
        ));
        assert!(matches!(
            parse_price("99999999999999999999"),
            Err(ParsePriceError::TooLarge(_))
        ));
    }

    #[test]
    fn test_average_cents() {
        assert_eq!(average_cents(3500, 3), 1167);
        assert_eq!(average_cents(1000, 4), 250);
        assert_eq!(average_cents(5, 2), 3);
        assert_eq!(average_cents(0, 0), 0);
        assert_eq!(average_cents(12345, 0), 0);
    }

    #[test]
    fn test_average_cents_handles_huge_totals() {
        assert_eq!(average_cents(Cents::MAX, 1), Cents::MAX);
        assert_eq!(average_cents(Cents::MAX, 2), Cents::MAX / 2 + 1);
        assert_eq!(average_cents(5_000_000_000_000_000_000, 3), 1_666_666_666_666_666_667);
    }
}
