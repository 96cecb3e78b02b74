//! Fixed regex set for hotel invoice line classification.
//!
//! Two header dialects occur in the wild: a one-line form
//! (`Guest: <name>, Room: <nnn>, Stay: <date> to <date>`) and a two-line
//! form whose first line carries the ID token and whose second line
//! carries room and dates. Both anchor on stable label tokens since the
//! documents print no continuation markers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Guest header:
    //   Guest: John Smith, Room: 204, Stay: 15.11.2024 to 18.11.2024
    //   Guest: Emma Wilson (ID: G0007)
    pub static ref GUEST_HEADER: Regex = Regex::new(
        r"(?i)^Guest:\s*([^,(]+?)\s*(?:\(ID:\s*([A-Za-z]\d+)\))?(?:,\s*Room:\s*(\d+))?(?:,\s*Stay:\s*(\d{1,2}\.\d{1,2}\.\d{4})\s+to\s+(\d{1,2}\.\d{1,2}\.\d{4}))?\s*$"
    ).unwrap();

    // Second line of the two-line header dialect:
    //   Room: 412 | Check-in: 05.11.2024 | Check-out: 08.11.2024
    pub static ref HEADER_CONTINUATION: Regex = Regex::new(
        r"(?i)^Room:\s*(\d+)\s*\|\s*Check-in:\s*(\d{1,2}\.\d{1,2}\.\d{4})\s*\|\s*Check-out:\s*(\d{1,2}\.\d{1,2}\.\d{4})\s*$"
    ).unwrap();

    // Optional nightly-rate header attribute:
    //   Rate: €89.50
    pub static ref RATE_FIELD: Regex = Regex::new(
        r"(?i)^(?:Nightly\s+)?Rate:\s*[€$]\s*(\d{1,3}(?:,?\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // Tabular service row: description, optional tax percent, optional
    // quantity, optional unit price, mandatory line total.
    //   Room Accommodation 19% 1 €89.50 €89.50
    //   Breakfast 2 $15.50 $31.00
    //   City Tax €3.50
    pub static ref SERVICE_ROW: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z0-9 .,/&'\-]*?)\s+(?:(\d{1,2}(?:\.\d+)?)%\s+)?(?:(\d{1,3})\s+)?(?:[€$]\s*(\d{1,3}(?:,?\d{3})*\.\d{2})\s+)?[€$]\s*(\d{1,3}(?:,?\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // Subtotal/total line closing a record:
    //   TOTAL €565.50
    //   TOTAL: $123.45
    pub static ref TOTAL_LINE: Regex = Regex::new(
        r"(?i)^(?:SUB)?TOTAL:?\s*[€$]?\s*(\d{1,3}(?:,?\d{3})*\.\d{2})\s*$"
    ).unwrap();

    // Fixed invoice date format: 15.11.2024
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_header_one_line() {
        let caps = GUEST_HEADER
            .captures("Guest: John Smith, Room: 204, Stay: 15.11.2024 to 18.11.2024")
            .unwrap();
        assert_eq!(&caps[1], "John Smith");
        assert!(caps.get(2).is_none());
        assert_eq!(&caps[3], "204");
        assert_eq!(&caps[4], "15.11.2024");
        assert_eq!(&caps[5], "18.11.2024");
    }

    #[test]
    fn test_guest_header_with_id_token() {
        let caps = GUEST_HEADER
            .captures("Guest: Emma Wilson (ID: G0007)")
            .unwrap();
        assert_eq!(&caps[1], "Emma Wilson");
        assert_eq!(&caps[2], "G0007");
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn test_header_continuation() {
        let caps = HEADER_CONTINUATION
            .captures("Room: 412 | Check-in: 05.11.2024 | Check-out: 08.11.2024")
            .unwrap();
        assert_eq!(&caps[1], "412");
        assert_eq!(&caps[2], "05.11.2024");
        assert_eq!(&caps[3], "08.11.2024");
    }

    #[test]
    fn test_service_row_full_columns() {
        let caps = SERVICE_ROW
            .captures("Room Accommodation 19% 1 €89.50 €89.50")
            .unwrap();
        assert_eq!(&caps[1], "Room Accommodation");
        assert_eq!(&caps[2], "19");
        assert_eq!(&caps[3], "1");
        assert_eq!(&caps[4], "89.50");
        assert_eq!(&caps[5], "89.50");
    }

    #[test]
    fn test_service_row_missing_optional_columns() {
        let caps = SERVICE_ROW.captures("City Tax €3.50").unwrap();
        assert_eq!(&caps[1], "City Tax");
        assert!(caps.get(2).is_none());
        assert!(caps.get(3).is_none());
        assert!(caps.get(4).is_none());
        assert_eq!(&caps[5], "3.50");
    }

    #[test]
    fn test_table_column_header_does_not_match() {
        // Page furniture without amounts never matches the row pattern.
        assert!(!SERVICE_ROW.is_match("Service Description Tax Rate Qty Unit Price Total Price"));
        assert!(!SERVICE_ROW.is_match("Services and Charges:"));
    }

    #[test]
    fn test_total_line_variants() {
        assert_eq!(&TOTAL_LINE.captures("TOTAL €565.50").unwrap()[1], "565.50");
        assert_eq!(&TOTAL_LINE.captures("TOTAL: $123.45").unwrap()[1], "123.45");
        assert_eq!(
            &TOTAL_LINE.captures("Subtotal: $1,023.45").unwrap()[1],
            "1,023.45"
        );
        assert!(!TOTAL_LINE.is_match("TOTAL REVENUE REPORT"));
    }
}
