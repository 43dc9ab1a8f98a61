//! Model-independent identifier detection
//!
//! Applies an ordered table of regex rules to raw text and yields candidate
//! spans. Validation and deduplication happen in the merger.

pub mod patterns;
pub mod regex;

pub use self::patterns::{PatternKind, PatternRegistry, PatternRule};
pub use self::regex::{find_candidates, Candidate};
