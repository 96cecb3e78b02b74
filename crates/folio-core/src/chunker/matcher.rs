//! Line classification for invoice page text.

use rust_decimal::Decimal;

use crate::models::record::{HeaderFields, ServiceRow};

use super::LineClassifier;
use super::rules::patterns::{
    GUEST_HEADER, HEADER_CONTINUATION, RATE_FIELD, SERVICE_ROW, TOTAL_LINE,
};
use super::rules::{parse_amount, parse_dmy};

/// Structural role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Header,
    ServiceRow,
    Total,
    Noise,
}

/// Fields extracted from a classified line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineFields {
    Header(HeaderFields),
    Service(ServiceRow),
    Total(Decimal),
    None,
}

/// One classified line of page text.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub role: LineRole,
    pub raw: String,
    pub fields: LineFields,
}

impl ClassifiedLine {
    fn new(role: LineRole, raw: &str, fields: LineFields) -> Self {
        Self {
            role,
            raw: raw.to_string(),
            fields,
        }
    }
}

/// Classification of one page's text. Noise lines are dropped here and
/// surface only through the count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageClassification {
    pub page_number: u32,
    pub lines: Vec<ClassifiedLine>,
    pub dropped_lines: u32,
}

/// Regex-backed classifier for the fixed invoice line formats.
///
/// Matching is purely line-local. Ambiguous lines resolve by priority
/// header > total > service row > noise; a line that matches nothing
/// falls back to noise rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    pub fn new() -> Self {
        Self
    }

    fn try_header(line: &str) -> Option<HeaderFields> {
        if let Some(caps) = GUEST_HEADER.captures(line) {
            return Some(HeaderFields {
                guest_id: caps.get(2).map(|m| m.as_str().to_string()),
                guest_name: Some(caps[1].trim().to_string()),
                room_number: caps.get(3).map(|m| m.as_str().to_string()),
                check_in: caps.get(4).and_then(|m| parse_dmy(m.as_str())),
                check_out: caps.get(5).and_then(|m| parse_dmy(m.as_str())),
                nightly_rate: None,
            });
        }

        if let Some(caps) = HEADER_CONTINUATION.captures(line) {
            return Some(HeaderFields {
                room_number: Some(caps[1].to_string()),
                check_in: parse_dmy(&caps[2]),
                check_out: parse_dmy(&caps[3]),
                ..Default::default()
            });
        }

        if let Some(caps) = RATE_FIELD.captures(line) {
            return Some(HeaderFields {
                nightly_rate: parse_amount(&caps[1]),
                ..Default::default()
            });
        }

        None
    }

    fn try_total(line: &str) -> Option<Decimal> {
        let caps = TOTAL_LINE.captures(line)?;
        parse_amount(&caps[1])
    }

    fn try_service_row(line: &str) -> Option<ServiceRow> {
        let caps = SERVICE_ROW.captures(line)?;
        Some(ServiceRow {
            description: caps[1].trim().to_string(),
            tax_rate: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            quantity: caps.get(3).and_then(|m| m.as_str().parse().ok()),
            unit_price: caps.get(4).and_then(|m| parse_amount(m.as_str())),
            line_total: caps.get(5).and_then(|m| parse_amount(m.as_str())),
        })
    }
}

impl LineClassifier for PatternMatcher {
    fn classify_line(&self, raw: &str) -> ClassifiedLine {
        let line = raw.trim();

        if let Some(header) = Self::try_header(line) {
            return ClassifiedLine::new(LineRole::Header, line, LineFields::Header(header));
        }

        if let Some(amount) = Self::try_total(line) {
            return ClassifiedLine::new(LineRole::Total, line, LineFields::Total(amount));
        }

        if let Some(row) = Self::try_service_row(line) {
            return ClassifiedLine::new(LineRole::ServiceRow, line, LineFields::Service(row));
        }

        ClassifiedLine::new(LineRole::Noise, line, LineFields::None)
    }
}
