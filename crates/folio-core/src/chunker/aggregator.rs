//! Per-document collection of accepted records and run statistics.

use std::collections::HashMap;

use tracing::info;

use crate::models::record::{GuestRecord, RecordFlag, RejectReason};
use crate::models::report::{CrossPageStats, Diagnostics, DocumentReport, RejectedRecord};

use super::matcher::PageClassification;

/// Accumulates accepted records, rejections, statistics and diagnostics
/// for one document. One instance per document; never shared.
#[derive(Debug, Default)]
pub struct DocumentAggregator {
    records: Vec<GuestRecord>,
    by_id: HashMap<String, usize>,
    rejected: Vec<RejectedRecord>,
    stats: CrossPageStats,
    diagnostics: Diagnostics,
}

impl DocumentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record per-page classification fallout.
    pub fn observe_page(&mut self, page: &PageClassification) {
        if page.dropped_lines > 0 {
            self.diagnostics
                .dropped_lines_by_page
                .insert(page.page_number, page.dropped_lines);
        }
    }

    /// Add an accepted record, updating the cross-page statistics.
    pub fn accept(&mut self, record: GuestRecord) {
        self.stats.total_records += 1;

        let span = record.source_pages.len() as u32;
        if span > 1 {
            self.stats.multi_page_records += 1;
        }
        self.stats.max_pages_per_record = self.stats.max_pages_per_record.max(span);

        *self
            .stats
            .service_row_histogram
            .entry(record.service_rows.len())
            .or_insert(0) += 1;

        self.stats.total_revenue += record
            .declared_total
            .unwrap_or_else(|| record.computed_total());

        if record.flags.contains(&RecordFlag::NonContiguousPages) {
            self.diagnostics.anomaly_notes.push(format!(
                "guest {} has non-contiguous source pages {:?}",
                record.guest_id, record.source_pages
            ));
        }
        if record.flags.contains(&RecordFlag::ForcedFinalization) {
            self.diagnostics.anomaly_notes.push(format!(
                "guest {} finalized by end of document",
                record.guest_id
            ));
        }

        self.by_id.insert(record.guest_id.clone(), self.records.len());
        self.records.push(record);
    }

    /// Add a rejected record with the reason it was dropped.
    pub fn reject(&mut self, record: GuestRecord, reason: RejectReason) {
        self.rejected.push(RejectedRecord { record, reason });
    }

    /// Fold in the machine's orphan counters at end of document.
    pub fn record_orphans(&mut self, service_rows: u32, totals: u32) {
        self.diagnostics.orphan_service_rows = service_rows;
        self.diagnostics.orphan_totals = totals;
    }

    /// Accepted record lookup by guest id.
    pub fn get(&self, guest_id: &str) -> Option<&GuestRecord> {
        self.by_id.get(guest_id).map(|&index| &self.records[index])
    }

    /// Consume the aggregator into the final report.
    pub fn finish(self) -> DocumentReport {
        info!(
            records = self.records.len(),
            rejected = self.rejected.len(),
            multi_page = self.stats.multi_page_records,
            "document aggregation complete"
        );
        DocumentReport {
            guest_records: self.records,
            cross_page_stats: self.stats,
            rejected_records: self.rejected,
            diagnostics: self.diagnostics,
        }
    }
}
