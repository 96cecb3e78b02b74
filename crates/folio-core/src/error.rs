//! Error types for the folio-core library.

use thiserror::Error;

/// Main error type for the folio library.
///
/// Recoverable conditions (unmatched lines, rejected records, numeric
/// mismatches) never surface here; they accumulate in the report's
/// diagnostics instead. The only fatal condition originates at the page
/// source boundary.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Page stream precondition violation.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Errors raised at the page-source boundary.
///
/// The reconstruction machine assumes a 1-indexed, contiguous page
/// sequence; anything else would corrupt carry-over state, so the
/// document is aborted.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Pages arrived out of order or with a gap.
    #[error("expected page {expected}, got page {found}")]
    PageSequence { expected: u32, found: u32 },
}

/// Result type for the folio library.
pub type Result<T> = std::result::Result<T, FolioError>;
