//! Cross-page record reconstruction pipeline.
//!
//! Pages flow through four stages: the [`LineClassifier`] tags each
//! line with a structural role, the [`ReconstructionMachine`] rebuilds
//! logical records across page boundaries, the [`RecordValidator`]
//! checks finalized records, and the [`DocumentAggregator`] collects
//! the accepted set plus cross-page statistics.

mod aggregator;
mod machine;
mod matcher;
pub mod rules;
mod validator;

pub use aggregator::DocumentAggregator;
pub use machine::{MachineState, ReconstructionMachine};
pub use matcher::{ClassifiedLine, LineFields, LineRole, PageClassification, PatternMatcher};
pub use validator::{RecordValidator, ValidationOutcome};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{Result, SourceError};
use crate::models::record::GuestRecord;
use crate::models::report::DocumentReport;
use crate::source::{PageSource, PageVec};

/// Capability interface for line classification, so the fixed pattern
/// set can later be swapped for a different strategy without touching
/// the state machine.
pub trait LineClassifier {
    /// Classify a single line. Never fails; unmatched lines come back
    /// as noise.
    fn classify_line(&self, raw: &str) -> ClassifiedLine;

    /// Classify every non-blank line of a page in order. Noise lines
    /// are dropped here and retained only as a per-page count.
    fn classify_page(&self, page_number: u32, text: &str) -> PageClassification {
        let mut lines = Vec::new();
        let mut dropped = 0;

        for raw in text.lines() {
            if raw.trim().is_empty() {
                continue;
            }
            let classified = self.classify_line(raw);
            if classified.role == LineRole::Noise {
                dropped += 1;
                debug!(page = page_number, line = %classified.raw, "unmatched line dropped");
                continue;
            }
            lines.push(classified);
        }

        PageClassification {
            page_number,
            lines,
            dropped_lines: dropped,
        }
    }
}

/// Drives one document through classification, reconstruction,
/// validation and aggregation.
///
/// The processor itself holds only configuration; every
/// [`process`](Self::process) call builds a fresh machine, validator
/// and aggregator, so one processor can serve many documents while
/// per-document state stays unshared.
#[derive(Debug, Clone)]
pub struct DocumentProcessor<C = PatternMatcher> {
    classifier: C,
    tolerance: Decimal,
    require_room: bool,
}

impl DocumentProcessor<PatternMatcher> {
    /// Processor with the fixed regex pattern set.
    pub fn new() -> Self {
        Self::with_classifier(PatternMatcher::new())
    }
}

impl Default for DocumentProcessor<PatternMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LineClassifier> DocumentProcessor<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            classifier,
            tolerance: rules::cent_tolerance(),
            require_room: true,
        }
    }

    /// Override the numeric tolerance used by validation.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Accept records without a room number (degraded sources).
    pub fn with_room_required(mut self, required: bool) -> Self {
        self.require_room = required;
        self
    }

    /// Process one document from its page source.
    ///
    /// Pages must arrive 1-indexed and contiguous; anything else aborts
    /// the document with [`SourceError::PageSequence`], the single
    /// fatal condition of the core.
    pub fn process<S: PageSource>(&self, mut source: S) -> Result<DocumentReport> {
        let mut machine = ReconstructionMachine::new();
        let mut validator = RecordValidator::new()
            .with_tolerance(self.tolerance)
            .with_room_required(self.require_room);
        let mut aggregator = DocumentAggregator::new();

        let mut expected = 1u32;
        while let Some(page) = source.next_page() {
            if page.number != expected {
                return Err(SourceError::PageSequence {
                    expected,
                    found: page.number,
                }
                .into());
            }
            expected += 1;

            let classified = self.classifier.classify_page(page.number, &page.text);
            debug!(
                page = page.number,
                lines = classified.lines.len(),
                dropped = classified.dropped_lines,
                "page classified"
            );
            aggregator.observe_page(&classified);

            for record in machine.feed_page(&classified) {
                route(record, &mut validator, &mut aggregator);
            }
        }

        if let Some(record) = machine.finish() {
            route(record, &mut validator, &mut aggregator);
        }
        aggregator.record_orphans(machine.orphan_service_rows(), machine.orphan_totals());

        info!(pages = expected - 1, "document processed");
        Ok(aggregator.finish())
    }

    /// Convenience wrapper over an in-memory page list, numbering pages
    /// from 1.
    pub fn process_pages<I, S>(&self, texts: I) -> Result<DocumentReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process(PageVec::from_texts(texts))
    }
}

fn route(
    record: GuestRecord,
    validator: &mut RecordValidator,
    aggregator: &mut DocumentAggregator,
) {
    match validator.validate(record) {
        ValidationOutcome::Accepted(record) => aggregator.accept(record),
        ValidationOutcome::Rejected { record, reason } => aggregator.reject(record, reason),
    }
}
