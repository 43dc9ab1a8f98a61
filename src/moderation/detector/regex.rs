//! Regex candidate search

use super::patterns::{PatternKind, PatternRule};
use crate::moderation::models::digits_only;

/// Span matched by a pattern rule
///
/// Offsets are byte offsets into the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Kind of the rule that matched
    pub kind: PatternKind,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset of the match end
    pub end: usize,
    /// Matched text
    pub text: String,
    /// Digits-only or lower-cased key
    pub normalized_key: String,
}

/// Run every rule over `text`, preserving rule order
///
/// Each rule uses a global leftmost-first, non-overlapping search.
/// Matches of different rules may overlap; no deduplication happens here.
pub fn find_candidates(text: &str, rules: &[PatternRule]) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for rule in rules {
        for matched in rule.regex.find_iter(text) {
            let span = matched.as_str();
            let normalized_key = if rule.entity_type.is_numeric() {
                digits_only(span)
            } else {
                span.to_lowercase()
            };

            candidates.push(Candidate {
                kind: rule.entity_type,
                start: matched.start(),
                end: matched.end(),
                text: span.to_string(),
                normalized_key,
            });
        }
    }

    candidates
}
