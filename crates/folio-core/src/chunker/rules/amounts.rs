//! Decimal amount handling for invoice lines.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Comparison tolerance for monetary checks: one cent.
pub fn cent_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Parse an invoice amount such as "1,234.56", "€89.50" or "$12.00".
///
/// The documents use a single fixed locale: `.` as the decimal
/// separator, optional `,` thousands grouping, optional currency symbol.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with exactly two decimal places, the precision the
/// output contract guarantees for monetary values.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("89.50"), Some(Decimal::new(8950, 2)));
        assert_eq!(parse_amount("€89.50"), Some(Decimal::new(8950, 2)));
        assert_eq!(parse_amount("$ 12.00"), Some(Decimal::new(1200, 2)));
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::new(123456, 2)));
    }

    #[test]
    fn test_parse_amount_rejects_empty() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(8950, 2)), "89.50");
        assert_eq!(format_amount(Decimal::new(3, 1)), "0.30");
        assert_eq!(format_amount(Decimal::from(12)), "12.00");
    }
}
