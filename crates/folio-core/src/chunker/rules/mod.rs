//! Rule-based line parsing shared by the pattern matcher.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{cent_tolerance, format_amount, parse_amount};
pub use dates::parse_dmy;
