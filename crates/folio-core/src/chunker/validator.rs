//! Completeness and consistency checks for finalized records.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::record::{Completeness, GuestRecord, RecordFlag, RejectReason};

use super::rules::cent_tolerance;

/// Outcome of validating one finalized record. Rejection is never fatal
/// to the run; the record flows to the diagnostics list instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(GuestRecord),
    Rejected {
        record: GuestRecord,
        reason: RejectReason,
    },
}

/// Validates finalized records and tracks accepted guest ids.
///
/// Stateful per document: the duplicate check depends on what was
/// already accepted, so one validator serves exactly one document.
#[derive(Debug)]
pub struct RecordValidator {
    tolerance: Decimal,
    require_room: bool,
    seen_ids: HashSet<String>,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self {
            tolerance: cent_tolerance(),
            require_room: true,
            seen_ids: HashSet::new(),
        }
    }

    /// Override the one-cent numeric tolerance.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Accept records without a room number (degraded sources).
    pub fn with_room_required(mut self, required: bool) -> Self {
        self.require_room = required;
        self
    }

    /// Run all checks against one finalized record.
    ///
    /// Structural failures reject; numeric disagreements only flag and
    /// lower confidence. Mismatched numbers are reported as printed,
    /// never corrected.
    pub fn validate(&mut self, mut record: GuestRecord) -> ValidationOutcome {
        if record.header.guest_name.is_none() {
            return self.reject(record, RejectReason::MissingHeaderFields("guest_name".into()));
        }
        if self.require_room && record.header.room_number.is_none() {
            return self.reject(
                record,
                RejectReason::MissingHeaderFields("room_number".into()),
            );
        }
        if record.service_rows.is_empty() && record.declared_total.is_none() {
            return self.reject(record, RejectReason::NoServiceActivity);
        }
        if self.seen_ids.contains(&record.guest_id) {
            return self.reject(record, RejectReason::Duplicate);
        }

        let mismatches: Vec<(usize, Decimal)> = record
            .service_rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| row.total_deviation().map(|d| (index, d)))
            .filter(|(_, deviation)| *deviation > self.tolerance)
            .collect();
        for (row, deviation) in mismatches {
            record.flags.push(RecordFlag::NumericMismatch { row, deviation });
        }

        if let Some(declared) = record.declared_total {
            let computed = record.computed_total();
            if !record.service_rows.is_empty() && (declared - computed).abs() > self.tolerance {
                record.flags.push(RecordFlag::TotalMismatch { declared, computed });
            }
        }

        record.confidence = score(&record);
        self.seen_ids.insert(record.guest_id.clone());
        debug!(
            guest = %record.guest_id,
            confidence = record.confidence,
            "record accepted"
        );
        ValidationOutcome::Accepted(record)
    }

    fn reject(&self, record: GuestRecord, reason: RejectReason) -> ValidationOutcome {
        warn!(guest = %record.guest_id, ?reason, "record rejected");
        ValidationOutcome::Rejected { record, reason }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the confidence score from completeness and accumulated flags.
fn score(record: &GuestRecord) -> f32 {
    let mut confidence = 1.0f32;

    match record.completeness {
        Completeness::Complete => {}
        Completeness::HeaderAndPartialServices => confidence -= 0.2,
        Completeness::HeaderOnly => confidence -= 0.4,
    }

    for flag in &record.flags {
        confidence -= match flag {
            RecordFlag::NumericMismatch { .. } => 0.1,
            RecordFlag::RowAfterTotal => 0.1,
            RecordFlag::TotalMismatch { .. } => 0.15,
            RecordFlag::ForcedFinalization => 0.2,
            RecordFlag::NonContiguousPages => 0.25,
        };
    }

    confidence.clamp(0.0, 1.0)
}
