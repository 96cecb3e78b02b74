//! Cross-page record reconstruction state machine.
//!
//! The machine consumes classified lines in page order across the whole
//! document. Page boundaries cause no transition: the pending record is
//! carried unchanged into the next page's line stream, which is what
//! reassembles a record whose header closes page N and whose service
//! rows open page N+1.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::record::{Completeness, GuestRecord, HeaderFields, RecordFlag, ServiceRow};

use super::matcher::{ClassifiedLine, LineFields, PageClassification};

/// Externally observable machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    /// No record pending.
    #[default]
    Idle,
    /// Header fields accumulating; wrapped header lines merge here.
    InHeader,
    /// Service rows accumulating.
    InServices,
    /// Total seen; the record closes on the next header or end of
    /// document.
    AwaitingNext,
}

/// The single mutable carry-over slot. Owned exclusively by the machine
/// and only ever exposed via the finalized [`GuestRecord`].
#[derive(Debug)]
struct PendingRecord {
    header: HeaderFields,
    rows: Vec<ServiceRow>,
    declared_total: Option<Decimal>,
    source_pages: Vec<u32>,
    flags: Vec<RecordFlag>,
    total_seen: bool,
}

impl PendingRecord {
    fn new(header: HeaderFields, page: u32) -> Self {
        Self {
            header,
            rows: Vec::new(),
            declared_total: None,
            source_pages: vec![page],
            flags: Vec::new(),
            total_seen: false,
        }
    }

    /// Stamp a contributing page, flagging any gap in the sequence.
    fn touch_page(&mut self, page: u32) {
        match self.source_pages.last() {
            Some(&last) if last == page => {}
            Some(&last) => {
                if page != last + 1 && !self.flags.contains(&RecordFlag::NonContiguousPages) {
                    self.flags.push(RecordFlag::NonContiguousPages);
                }
                self.source_pages.push(page);
            }
            None => self.source_pages.push(page),
        }
    }

    fn finalize(mut self, forced: bool) -> GuestRecord {
        let completeness = if self.total_seen {
            Completeness::Complete
        } else if self.rows.is_empty() {
            Completeness::HeaderOnly
        } else {
            Completeness::HeaderAndPartialServices
        };

        if forced {
            self.flags.push(RecordFlag::ForcedFinalization);
        }

        GuestRecord {
            guest_id: derive_guest_id(&self.header),
            header: self.header,
            service_rows: self.rows,
            declared_total: self.declared_total,
            source_pages: self.source_pages,
            completeness,
            flags: self.flags,
            // Scored by the validator; finalization itself asserts nothing.
            confidence: 1.0,
        }
    }
}

/// Derive the document-unique id: the explicit ID token when present,
/// otherwise room number plus normalized name.
fn derive_guest_id(header: &HeaderFields) -> String {
    if let Some(id) = &header.guest_id {
        return id.clone();
    }

    let room = header.room_number.as_deref().unwrap_or("?");
    let name = header
        .guest_name
        .as_deref()
        .unwrap_or("unknown")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{room}/{name}")
}

/// Reconstruction state machine. One instance per document; state
/// persists across [`feed_page`](Self::feed_page) calls.
#[derive(Debug, Default)]
pub struct ReconstructionMachine {
    state: MachineState,
    pending: Option<PendingRecord>,
    orphan_rows: u32,
    orphan_totals: u32,
    header_starts: u32,
    merged_continuations: u32,
}

impl ReconstructionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, exposed for inspection and tests.
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Service rows seen while idle with no owner to attach to.
    pub fn orphan_service_rows(&self) -> u32 {
        self.orphan_rows
    }

    /// Total lines seen with no record to close.
    pub fn orphan_totals(&self) -> u32 {
        self.orphan_totals
    }

    /// Header lines that started a new record.
    pub fn header_starts(&self) -> u32 {
        self.header_starts
    }

    /// Header lines merged into an already-pending header.
    pub fn merged_continuations(&self) -> u32 {
        self.merged_continuations
    }

    /// Feed one classified page. Returns the records finalized while
    /// consuming it; whatever is still pending afterwards carries over.
    pub fn feed_page(&mut self, page: &PageClassification) -> Vec<GuestRecord> {
        let mut finalized = Vec::new();
        for line in &page.lines {
            if let Some(record) = self.feed_line(page.page_number, line) {
                finalized.push(record);
            }
        }
        finalized
    }

    fn feed_line(&mut self, page: u32, line: &ClassifiedLine) -> Option<GuestRecord> {
        match &line.fields {
            LineFields::Header(fields) => self.on_header(page, fields.clone()),
            LineFields::Service(row) => self.on_service_row(page, row.clone()),
            LineFields::Total(amount) => self.on_total(page, *amount),
            // Noise: no transition, in any state.
            LineFields::None => None,
        }
    }

    fn on_header(&mut self, page: u32, fields: HeaderFields) -> Option<GuestRecord> {
        match self.state {
            MachineState::Idle => {
                self.start_record(page, fields);
                None
            }
            // Wrapped header: a header line adjacent to the pending
            // header (no service row or total in between) extends the
            // same record instead of starting a new one.
            MachineState::InHeader => {
                let pending = self.pending.as_mut().expect("pending record in InHeader");
                pending.header.merge(fields);
                pending.touch_page(page);
                self.merged_continuations += 1;
                debug!(page, "merged header continuation");
                None
            }
            // A new header is a sufficient terminator for the previous
            // record even without an explicit total line.
            MachineState::InServices | MachineState::AwaitingNext => {
                let finalized = self.take_pending(false);
                self.start_record(page, fields);
                finalized
            }
        }
    }

    fn start_record(&mut self, page: u32, fields: HeaderFields) {
        debug!(
            page,
            guest = fields.guest_name.as_deref().unwrap_or("?"),
            "new pending record"
        );
        self.header_starts += 1;
        self.pending = Some(PendingRecord::new(fields, page));
        self.state = MachineState::InHeader;
    }

    fn on_service_row(&mut self, page: u32, row: ServiceRow) -> Option<GuestRecord> {
        match self.state {
            MachineState::Idle => {
                // True orphan: no owner ever existed. Dropped and
                // counted rather than guessing a synthetic owner.
                self.orphan_rows += 1;
                warn!(
                    page,
                    description = %row.description,
                    "service row with no preceding header dropped"
                );
                None
            }
            MachineState::InHeader | MachineState::InServices => {
                let pending = self.pending.as_mut().expect("pending record with rows");
                pending.rows.push(row);
                pending.touch_page(page);
                self.state = MachineState::InServices;
                None
            }
            MachineState::AwaitingNext => {
                // Row after the total line: kept, but the record is
                // marked anomalous.
                let pending = self.pending.as_mut().expect("pending record awaiting next");
                pending.rows.push(row);
                pending.touch_page(page);
                if !pending.flags.contains(&RecordFlag::RowAfterTotal) {
                    pending.flags.push(RecordFlag::RowAfterTotal);
                }
                warn!(page, "service row after total line");
                None
            }
        }
    }

    fn on_total(&mut self, page: u32, amount: Decimal) -> Option<GuestRecord> {
        match self.state {
            MachineState::Idle => {
                self.orphan_totals += 1;
                warn!(page, %amount, "total line with no pending record dropped");
                None
            }
            // A total directly after the header is a zero-activity
            // record with an explicit total.
            MachineState::InHeader | MachineState::InServices => {
                let pending = self.pending.as_mut().expect("pending record at total");
                pending.declared_total = Some(amount);
                pending.total_seen = true;
                pending.touch_page(page);
                self.state = MachineState::AwaitingNext;
                None
            }
            MachineState::AwaitingNext => {
                self.orphan_totals += 1;
                warn!(page, %amount, "duplicate total line ignored");
                None
            }
        }
    }

    fn take_pending(&mut self, forced: bool) -> Option<GuestRecord> {
        let record = self.pending.take()?.finalize(forced);
        self.state = MachineState::Idle;
        Some(record)
    }

    /// End of document. Whatever is pending is finalized; records that
    /// never saw their terminator are flagged as forced.
    pub fn finish(&mut self) -> Option<GuestRecord> {
        match self.state {
            MachineState::Idle => None,
            // The terminator was already seen; closing here is normal.
            MachineState::AwaitingNext => self.take_pending(false),
            MachineState::InHeader | MachineState::InServices => {
                warn!("document ended with a record still accumulating");
                self.take_pending(true)
            }
        }
    }
}
