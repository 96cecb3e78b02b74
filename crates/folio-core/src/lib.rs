//! Cross-page guest record reconstruction for paginated hotel invoices.
//!
//! This crate provides:
//! - line classification for invoice page text (guest headers, service
//!   rows, totals, noise)
//! - a reconstruction state machine that carries an in-progress record
//!   across page boundaries without continuation markers
//! - record validation with numeric consistency checks
//! - per-document aggregation with cross-page statistics
//!
//! PDF text extraction is a collaborator concern: the core consumes
//! plain page texts through the [`PageSource`] boundary and produces a
//! serializable [`DocumentReport`].

pub mod chunker;
pub mod error;
pub mod models;
pub mod source;

pub use chunker::{
    ClassifiedLine, DocumentAggregator, DocumentProcessor, LineClassifier, LineFields, LineRole,
    MachineState, PageClassification, PatternMatcher, ReconstructionMachine, RecordValidator,
    ValidationOutcome,
};
pub use error::{FolioError, Result, SourceError};
pub use models::record::{
    Completeness, GuestRecord, HeaderFields, RecordFlag, RejectReason, ServiceRow,
};
pub use models::report::{CrossPageStats, Diagnostics, DocumentReport, RejectedRecord};
pub use source::{PageSource, PageText, PageVec};
