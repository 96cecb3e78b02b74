//! Guest record data model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Completeness of a reconstructed guest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Completeness {
    /// Header captured, no service rows and no total.
    HeaderOnly,
    /// Header plus service rows, but no terminating total line.
    HeaderAndPartialServices,
    /// A total line closed the record.
    Complete,
}

/// Named header attributes for one guest.
///
/// Everything is optional at capture time; the validator enforces the
/// required minimum (name + room number) on finalized records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderFields {
    /// Explicit guest identifier token, when the document prints one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nightly_rate: Option<Decimal>,
}

impl HeaderFields {
    /// Merge a wrapped header line into this one.
    ///
    /// Only fills gaps: an attribute already captured keeps its first
    /// value, so re-running over the same lines cannot reorder anything.
    pub fn merge(&mut self, other: HeaderFields) {
        if self.guest_id.is_none() {
            self.guest_id = other.guest_id;
        }
        if self.guest_name.is_none() {
            self.guest_name = other.guest_name;
        }
        if self.room_number.is_none() {
            self.room_number = other.room_number;
        }
        if self.check_in.is_none() {
            self.check_in = other.check_in;
        }
        if self.check_out.is_none() {
            self.check_out = other.check_out;
        }
        if self.nightly_rate.is_none() {
            self.nightly_rate = other.nightly_rate;
        }
    }

    /// Check whether any attribute was captured at all.
    pub fn is_empty(&self) -> bool {
        self.guest_id.is_none()
            && self.guest_name.is_none()
            && self.room_number.is_none()
            && self.check_in.is_none()
            && self.check_out.is_none()
            && self.nightly_rate.is_none()
    }
}

/// One line item from a guest's service table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRow {
    pub description: String,

    /// Tax percentage column, when the table prints one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<Decimal>,
}

impl ServiceRow {
    /// Deviation between quantity x unit price and the printed line
    /// total. `None` when any of the three columns is missing.
    pub fn total_deviation(&self) -> Option<Decimal> {
        let quantity = self.quantity?;
        let unit_price = self.unit_price?;
        let line_total = self.line_total?;
        Some((quantity * unit_price - line_total).abs())
    }
}

/// Anomaly flags attached to a record by the machine or the validator.
///
/// Flags lower confidence but never reject on their own; mismatched
/// numbers are reported, not corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RecordFlag {
    /// The record's source pages skip at least one page number.
    NonContiguousPages,
    /// The document ended while the record was still accumulating.
    ForcedFinalization,
    /// A service row appeared after the total line.
    RowAfterTotal,
    /// quantity x unit price disagrees with the printed line total.
    NumericMismatch { row: usize, deviation: Decimal },
    /// Declared total disagrees with the sum of row totals.
    TotalMismatch { declared: Decimal, computed: Decimal },
}

/// Why a finalized record was rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "code", content = "detail")]
pub enum RejectReason {
    /// guest_id already accepted earlier in the document.
    Duplicate,
    /// A required header attribute is missing.
    MissingHeaderFields(String),
    /// Neither a service row nor an explicit total was captured.
    NoServiceActivity,
}

/// One guest's reconstructed invoice entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    /// Unique within the document. Explicit ID token when present,
    /// otherwise derived from room number and name.
    pub guest_id: String,

    pub header: HeaderFields,

    /// Service rows in appearance order.
    pub service_rows: Vec<ServiceRow>,

    /// Amount from the terminating total line, when one was seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_total: Option<Decimal>,

    /// Ascending page numbers that contributed at least one line.
    pub source_pages: Vec<u32>,

    #[serde(rename = "completeness_state")]
    pub completeness: Completeness,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<RecordFlag>,

    /// Validator-derived score in [0, 1].
    pub confidence: f32,
}

impl GuestRecord {
    /// Sum of the row totals that were actually printed.
    pub fn computed_total(&self) -> Decimal {
        self.service_rows
            .iter()
            .filter_map(|row| row.line_total)
            .sum()
    }

    /// Whether the record crossed at least one page boundary.
    pub fn spans_pages(&self) -> bool {
        self.source_pages.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_merge_fills_gaps_only() {
        let mut header = HeaderFields {
            guest_name: Some("John Smith".to_string()),
            ..Default::default()
        };

        header.merge(HeaderFields {
            guest_name: Some("Someone Else".to_string()),
            room_number: Some("204".to_string()),
            ..Default::default()
        });

        assert_eq!(header.guest_name.as_deref(), Some("John Smith"));
        assert_eq!(header.room_number.as_deref(), Some("204"));
    }

    #[test]
    fn test_total_deviation() {
        let row = ServiceRow {
            description: "Breakfast".to_string(),
            tax_rate: None,
            quantity: Some(dec("3")),
            unit_price: Some(dec("15.00")),
            line_total: Some(dec("45.00")),
        };
        assert_eq!(row.total_deviation(), Some(Decimal::ZERO));

        let row = ServiceRow {
            line_total: Some(dec("46.00")),
            ..row
        };
        assert_eq!(row.total_deviation(), Some(dec("1.00")));
    }

    #[test]
    fn test_total_deviation_requires_all_columns() {
        let row = ServiceRow {
            description: "City Tax".to_string(),
            tax_rate: None,
            quantity: None,
            unit_price: None,
            line_total: Some(dec("3.50")),
        };
        assert_eq!(row.total_deviation(), None);
    }

    #[test]
    fn test_computed_total_skips_missing() {
        let record = GuestRecord {
            guest_id: "204/john-smith".to_string(),
            header: HeaderFields::default(),
            service_rows: vec![
                ServiceRow {
                    description: "Parking".to_string(),
                    tax_rate: None,
                    quantity: Some(dec("1")),
                    unit_price: Some(dec("12.00")),
                    line_total: Some(dec("12.00")),
                },
                ServiceRow {
                    description: "Minibar".to_string(),
                    tax_rate: None,
                    quantity: None,
                    unit_price: None,
                    line_total: None,
                },
            ],
            declared_total: None,
            source_pages: vec![1],
            completeness: Completeness::HeaderAndPartialServices,
            flags: Vec::new(),
            confidence: 1.0,
        };

        assert_eq!(record.computed_total(), dec("12.00"));
        assert!(!record.spans_pages());
    }

    #[test]
    fn test_completeness_serialization() {
        let json = serde_json::to_string(&Completeness::HeaderAndPartialServices).unwrap();
        assert_eq!(json, "\"HEADER_AND_PARTIAL_SERVICES\"");
    }

    #[test]
    fn test_reject_reason_serialization() {
        let json = serde_json::to_value(&RejectReason::Duplicate).unwrap();
        assert_eq!(json["code"], "DUPLICATE");
    }
}
