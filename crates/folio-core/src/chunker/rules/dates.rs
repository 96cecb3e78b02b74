//! Date parsing for the fixed day.month.year invoice format.

use chrono::NaiveDate;

use super::patterns::DATE_DMY;

/// Parse a `d.m.yyyy` date such as "15.11.2024" or "5.3.2024".
///
/// Calendar-invalid dates (month 13, day 32) parse to `None` rather
/// than panicking; the owning header attribute just stays empty.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_dmy() {
        assert_eq!(
            parse_dmy("15.11.2024"),
            NaiveDate::from_ymd_opt(2024, 11, 15)
        );
        assert_eq!(parse_dmy("5.3.2024"), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_parse_dmy_invalid() {
        assert_eq!(parse_dmy("32.11.2024"), None);
        assert_eq!(parse_dmy("15.13.2024"), None);
        assert_eq!(parse_dmy("no date here"), None);
    }
}
