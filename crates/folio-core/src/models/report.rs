//! Document-level report types: the sole externally consumed result of
//! the reconstruction core.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{GuestRecord, RejectReason};

/// Cross-page aggregate counters for one document.
///
/// Built incrementally while records are accepted; read-only once the
/// page stream is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossPageStats {
    /// Accepted records.
    pub total_records: u32,

    /// Records whose source pages span more than one page.
    pub multi_page_records: u32,

    /// Widest page span seen on a single record.
    pub max_pages_per_record: u32,

    /// Number of records per service-row count.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub service_row_histogram: BTreeMap<usize, u32>,

    /// Sum over accepted records of the declared total, falling back to
    /// the computed row sum when no total line was seen.
    pub total_revenue: Decimal,
}

impl CrossPageStats {
    /// Fraction of accepted records that crossed a page boundary.
    pub fn cross_page_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        f64::from(self.multi_page_records) / f64::from(self.total_records)
    }
}

/// A record that failed validation, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub record: GuestRecord,
    pub reason: RejectReason,
}

/// Non-fatal observations accumulated over the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Non-blank lines per page that matched no pattern.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dropped_lines_by_page: BTreeMap<u32, u32>,

    /// Service rows encountered with no record pending anywhere before
    /// them. Dropped, never attached to a synthetic owner.
    pub orphan_service_rows: u32,

    /// Total lines with no record to close.
    pub orphan_totals: u32,

    /// Human-readable anomaly notes (non-contiguous pages, forced
    /// finalizations).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomaly_notes: Vec<String>,
}

/// Final structured output for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Accepted records in insertion order.
    pub guest_records: Vec<GuestRecord>,

    pub cross_page_stats: CrossPageStats,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_records: Vec<RejectedRecord>,

    pub diagnostics: Diagnostics,
}

impl DocumentReport {
    /// Look up an accepted record by guest id.
    pub fn by_guest_id(&self, guest_id: &str) -> Option<&GuestRecord> {
        self.guest_records
            .iter()
            .find(|record| record.guest_id == guest_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cross_page_rate() {
        let stats = CrossPageStats {
            total_records: 4,
            multi_page_records: 1,
            ..Default::default()
        };
        assert_eq!(stats.cross_page_rate(), 0.25);

        assert_eq!(CrossPageStats::default().cross_page_rate(), 0.0);
    }

    #[test]
    fn test_empty_report_serialization() {
        let report = DocumentReport::default();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["guest_records"], serde_json::json!([]));
        assert_eq!(json["cross_page_stats"]["total_records"], 0);
        // Empty collections are elided from the wire format.
        assert!(json.get("rejected_records").is_none());
        assert!(json["diagnostics"].get("anomaly_notes").is_none());
    }
}
