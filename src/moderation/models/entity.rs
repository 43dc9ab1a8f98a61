//! Entity data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of entity kinds reported by the merger
///
/// `External` carries the verbatim label of the generic analyzer on the
/// non-primary-language path, where no mapping is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Person names
    Person,
    /// Organizations
    Organization,
    /// Cities, regions, countries
    GeopoliticalLocation,
    /// Postal address assembled from location mentions
    Address,
    /// Location the author states as a birthplace
    BirthPlace,
    /// SNILS
    NationalInsuranceNumber,
    /// INN of an individual
    NationalIdNumber,
    /// Passport series and number
    PassportNumber,
    /// Tax registration codes without a checksum
    TaxId,
    /// Phone number with its resolved region
    Phone {
        /// Region display name
        region: String,
    },
    /// Email addresses
    Email,
    /// Label produced by the generic analyzer
    External(String),
}

impl EntityKind {
    /// Get the label for the kind, without attached metadata
    pub fn label(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::GeopoliticalLocation => "GEOPOLITICAL_LOCATION",
            Self::Address => "ADDRESS",
            Self::BirthPlace => "BIRTH_PLACE",
            Self::NationalInsuranceNumber => "NATIONAL_INSURANCE_NUMBER",
            Self::NationalIdNumber => "NATIONAL_ID_NUMBER",
            Self::PassportNumber => "PASSPORT_NUMBER",
            Self::TaxId => "TAX_ID",
            Self::Phone { .. } => "PHONE",
            Self::Email => "EMAIL",
            Self::External(label) => label,
        }
    }

    /// Check if the kind is a numeric identifier (keyed by digits only)
    pub fn is_numeric_identifier(&self) -> bool {
        matches!(
            self,
            Self::NationalInsuranceNumber
                | Self::NationalIdNumber
                | Self::PassportNumber
                | Self::TaxId
                | Self::Phone { .. }
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phone { region } => write!(f, "PHONE (region: {region})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Detected entity
///
/// `normalized_key` is the dedup key, never the display value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Kind of entity
    pub kind: EntityKind,
    /// Text as it appeared (or canonical form for phones)
    pub text: String,
    /// Digits-only for numeric identifiers, lower-cased text otherwise
    pub normalized_key: String,
}

impl Entity {
    /// Create an entity, deriving the normalized key from the kind
    pub fn new(kind: EntityKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let normalized_key = normalize_key(&kind, &text);
        Self {
            kind,
            text,
            normalized_key,
        }
    }

    /// Create an entity with an explicit key
    pub fn with_key(kind: EntityKind, text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            normalized_key: key.into(),
        }
    }
}

/// Compute the dedup key for a value of the given kind
pub fn normalize_key(kind: &EntityKind, text: &str) -> String {
    if kind.is_numeric_identifier() {
        digits_only(text)
    } else {
        text.to_lowercase()
    }
}

/// Strip everything but ASCII digits
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Raw span produced by the NER pipeline
///
/// Offsets are character offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntity {
    /// Coarse model tag (PER, ORG, LOC, GPE, ...)
    pub kind: String,
    /// Span text
    pub text: String,
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

impl RawEntity {
    /// Create a raw entity
    pub fn new(kind: impl Into<String>, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            start,
            end,
        }
    }
}

/// Span returned by the generic entity analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    /// Analyzer label (EMAIL_ADDRESS, PERSON, ...)
    pub entity_type: String,
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

impl AnalyzerResult {
    /// Create an analyzer result
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
        }
    }

    /// Extract the span from the analyzed text by character offsets
    ///
    /// Returns `None` when the span is empty or lies outside the text.
    pub fn span_text(&self, text: &str) -> Option<String> {
        if self.end <= self.start {
            return None;
        }
        let span: String = text
            .chars()
            .skip(self.start)
            .take(self.end - self.start)
            .collect();
        if span.chars().count() == self.end - self.start {
            Some(span)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_key_is_digits_only() {
        let entity = Entity::new(EntityKind::NationalInsuranceNumber, "112-233-445 95");
        assert_eq!(entity.normalized_key, "11223344595");
        assert_eq!(entity.text, "112-233-445 95");
    }

    #[test]
    fn test_free_text_key_is_lowercase() {
        let entity = Entity::new(EntityKind::Person, "Иван Петров");
        assert_eq!(entity.normalized_key, "иван петров");
    }

    #[test]
    fn test_phone_display_includes_region() {
        let kind = EntityKind::Phone {
            region: "Москва".to_string(),
        };
        assert_eq!(kind.to_string(), "PHONE (region: Москва)");
        assert_eq!(kind.label(), "PHONE");
    }

    #[test]
    fn test_external_label_passthrough() {
        let kind = EntityKind::External("CREDIT_CARD".to_string());
        assert_eq!(kind.to_string(), "CREDIT_CARD");
        assert!(!kind.is_numeric_identifier());
    }

    #[test]
    fn test_span_text_uses_char_offsets() {
        let text = "Пишите: ivan@example.com";
        let result = AnalyzerResult::new("EMAIL_ADDRESS", 8, 24);
        assert_eq!(result.span_text(text).as_deref(), Some("ivan@example.com"));
    }

    #[test]
    fn test_span_text_out_of_range() {
        let result = AnalyzerResult::new("EMAIL_ADDRESS", 3, 50);
        assert_eq!(result.span_text("short"), None);
        assert_eq!(AnalyzerResult::new("X", 2, 2).span_text("short"), None);
    }
}
