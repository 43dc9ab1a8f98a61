//! Entity resolution
//!
//! Turns NER output, regex candidates and analyzer spans into one ordered,
//! deduplicated entity list. Stages run in a fixed order and each stage
//! claims its keys before the next one starts, so the earliest detector
//! wins when two of them report the same value:
//!
//! 1. NER mapping (with identifier-label exclusion)
//! 2. Birthplace and address heuristics
//! 3. Regex candidates, checksum-validated where the scheme has one
//! 4. Emails from the generic analyzer
//! 5. Phones, canonicalized with a resolved region
//! 6. Person-combination gate
//!
//! The gate and the keyword lists form one policy version,
//! [`POLICY_VERSION`]. Changing any of them is a version bump.

use crate::moderation::detector::{find_candidates, Candidate, PatternKind, PatternRegistry};
use crate::moderation::models::{AnalyzerResult, Entity, EntityKind, RawEntity};
use crate::moderation::phone::PhoneNormalizer;
use crate::moderation::registry::SpanRegistry;
use crate::moderation::validators::{ChecksumValidator, IdScheme};
use std::sync::Arc;

/// Version of the merge heuristics and gate
pub const POLICY_VERSION: u32 = 2;

/// Analyzer category used for email detection
pub const EMAIL_ENTITY_TYPE: &str = "EMAIL_ADDRESS";

/// Location spans starting with these are identifier labels, not places
const EXCLUDED_LOCATION_PREFIXES: [&str; 4] =
    ["снилс", "страховой номер", "номер страхового", "паспорт"];

const BIRTHPLACE_KEYWORDS: [&str; 6] = [
    "родился в",
    "родилась в",
    "родом из",
    "уроженец",
    "уроженка",
    "в городе",
];

const ADDRESS_KEYWORDS: [&str; 8] = [
    "адрес",
    "проживает",
    "улица",
    "ул.",
    "дом",
    "квартира",
    "кв.",
    "проспект",
];

/// Map a coarse NER tag onto the closed kind set
fn map_ner_kind(tag: &str) -> Option<EntityKind> {
    match tag {
        "PER" => Some(EntityKind::Person),
        "ORG" => Some(EntityKind::Organization),
        "LOC" | "GPE" => Some(EntityKind::GeopoliticalLocation),
        _ => None,
    }
}

/// Kinds that identify a person when seen next to a name
fn is_sensitive(kind: &EntityKind) -> bool {
    !matches!(
        kind,
        EntityKind::Person
            | EntityKind::Organization
            | EntityKind::GeopoliticalLocation
            | EntityKind::External(_)
    )
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Deterministic merge of all detector outputs
#[derive(Clone)]
pub struct EntityMerger {
    patterns: Arc<PatternRegistry>,
    validator: ChecksumValidator,
    phones: PhoneNormalizer,
}

impl EntityMerger {
    /// Create a merger
    pub fn new(
        patterns: Arc<PatternRegistry>,
        validator: ChecksumValidator,
        phones: PhoneNormalizer,
    ) -> Self {
        Self {
            patterns,
            validator,
            phones,
        }
    }

    /// Merge detections for a primary-language text
    ///
    /// `emails` is the analyzer output restricted to [`EMAIL_ENTITY_TYPE`].
    /// The result is a pure function of the inputs.
    pub fn merge(&self, text: &str, ner: &[RawEntity], emails: &[AnalyzerResult]) -> Vec<Entity> {
        let mut registry = SpanRegistry::new();
        let mut entities = Vec::new();

        let located = Self::apply_context(text, Self::map_ner(ner));
        for entity in located {
            if registry.claim(&entity.normalized_key) {
                entities.push(entity);
            }
        }

        let mut phone_candidates = Vec::new();
        for candidate in find_candidates(text, self.patterns.rules()) {
            if candidate.kind == PatternKind::Phone {
                phone_candidates.push(candidate);
                continue;
            }
            if !self.passes_checksum(&candidate) {
                continue;
            }
            let Some(kind) = candidate.kind.entity_kind() else {
                continue;
            };
            if registry.claim(&candidate.normalized_key) {
                entities.push(Entity::with_key(kind, candidate.text, candidate.normalized_key));
            }
        }

        for result in emails {
            let Some(span) = result.span_text(text) else {
                continue;
            };
            let entity = Entity::new(EntityKind::Email, span);
            if registry.claim(&entity.normalized_key) {
                entities.push(entity);
            }
        }

        for candidate in phone_candidates {
            // A span already owned by an earlier detector stays with it
            if registry.is_claimed(&candidate.normalized_key) {
                continue;
            }
            if let Some(entity) = self.phones.normalize_phone(&candidate.text) {
                if registry.claim(&entity.normalized_key) {
                    registry.claim(&candidate.normalized_key);
                    entities.push(entity);
                }
            }
        }

        Self::apply_gate(entities)
    }

    /// Convert analyzer output for a non-primary language, one entity per span
    pub fn map_analyzer_output(text: &str, results: &[AnalyzerResult]) -> Vec<Entity> {
        results
            .iter()
            .filter_map(|result| {
                let span = result.span_text(text)?;
                let key = span.to_lowercase();
                Some(Entity::with_key(
                    EntityKind::External(result.entity_type.clone()),
                    span,
                    key,
                ))
            })
            .collect()
    }

    /// Stage 1: keep PER/ORG/LOC/GPE, drop identifier labels tagged as places
    fn map_ner(raw: &[RawEntity]) -> Vec<Entity> {
        let mut seen = SpanRegistry::new();
        let mut mapped = Vec::new();

        for ent in raw {
            let Some(kind) = map_ner_kind(&ent.kind) else {
                continue;
            };
            let text = ent.text.trim();
            if text.is_empty() {
                continue;
            }
            let lowered = text.to_lowercase();
            if kind == EntityKind::GeopoliticalLocation
                && EXCLUDED_LOCATION_PREFIXES
                    .iter()
                    .any(|prefix| lowered.starts_with(prefix))
            {
                tracing::trace!("Identifier label tagged as location dropped");
                continue;
            }
            let entity = Entity::new(kind, text);
            if seen.claim(&entity.normalized_key) {
                mapped.push(entity);
            }
        }

        mapped
    }

    /// Stage 2: address folding and birthplace re-kinding
    ///
    /// Both heuristics read the locations as NER reported them. The address
    /// takes every location; without a birthplace trigger the folded
    /// locations are not reported on their own.
    fn apply_context(text: &str, entities: Vec<Entity>) -> Vec<Entity> {
        let lowered = text.to_lowercase();
        let birthplace = contains_any(&lowered, &BIRTHPLACE_KEYWORDS);
        let address = contains_any(&lowered, &ADDRESS_KEYWORDS);

        let folded = if address {
            let parts: Vec<&str> = entities
                .iter()
                .filter(|e| e.kind == EntityKind::GeopoliticalLocation)
                .map(|e| e.text.as_str())
                .collect();
            (!parts.is_empty()).then(|| Entity::new(EntityKind::Address, parts.join(", ")))
        } else {
            None
        };

        let mut located: Vec<Entity> = entities
            .into_iter()
            .filter_map(|mut entity| {
                if entity.kind == EntityKind::GeopoliticalLocation {
                    if birthplace {
                        entity.kind = EntityKind::BirthPlace;
                    } else if address {
                        return None;
                    }
                }
                Some(entity)
            })
            .collect();

        located.extend(folded);
        located
    }

    fn passes_checksum(&self, candidate: &Candidate) -> bool {
        let scheme = match candidate.kind {
            PatternKind::NationalInsuranceNumber => IdScheme::NationalInsurance,
            PatternKind::NationalIdNumber => IdScheme::NationalId,
            _ => return true,
        };
        self.validator.validate_checksum_id(&candidate.text, scheme)
    }

    /// Stage 6: suppress lone names and lone low-severity entities
    ///
    /// Organizations and plain locations never unlock a name on their own.
    fn apply_gate(entities: Vec<Entity>) -> Vec<Entity> {
        let has_person = entities.iter().any(|e| e.kind == EntityKind::Person);
        let has_other = entities.iter().any(|e| is_sensitive(&e.kind));
        let has_insurance = entities
            .iter()
            .any(|e| e.kind == EntityKind::NationalInsuranceNumber);

        if has_insurance || (has_person && has_other) {
            entities
        } else {
            if !entities.is_empty() {
                tracing::debug!(
                    suppressed = entities.len(),
                    policy_version = POLICY_VERSION,
                    "Entities suppressed by person-combination gate"
                );
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::phone::RegionTable;

    fn merger() -> EntityMerger {
        EntityMerger::new(
            Arc::new(PatternRegistry::default_patterns().unwrap()),
            ChecksumValidator::default(),
            PhoneNormalizer::new(Arc::new(RegionTable::new([("999", "Москва")]))),
        )
    }

    fn kinds(entities: &[Entity]) -> Vec<String> {
        entities.iter().map(|e| e.kind.to_string()).collect()
    }

    #[test]
    fn test_person_with_snils() {
        let text = "Меня зовут Иван, мой СНИЛС 112-233-445 95";
        let ner = vec![RawEntity::new("PER", "Иван", 11, 15)];
        let entities = merger().merge(text, &ner, &[]);
        assert_eq!(kinds(&entities), vec!["PERSON", "NATIONAL_INSURANCE_NUMBER"]);
        assert_eq!(entities[1].text, "112-233-445 95");
    }

    #[test]
    fn test_invalid_checksum_discarded() {
        let text = "Номер заказа 12345678901, Иван";
        let ner = vec![RawEntity::new("PER", "Иван", 26, 30)];
        assert!(merger().merge(text, &ner, &[]).is_empty());
    }

    #[test]
    fn test_lone_person_suppressed() {
        let ner = vec![RawEntity::new("PER", "Иван", 0, 4)];
        assert!(merger().merge("Иван пришёл", &ner, &[]).is_empty());
    }

    #[test]
    fn test_lone_organization_suppressed() {
        let ner = vec![RawEntity::new("ORG", "Газпром", 0, 7)];
        assert!(merger().merge("Газпром вырос", &ner, &[]).is_empty());
    }

    #[test]
    fn test_lone_insurance_number_reported() {
        let entities = merger().merge("СНИЛС 112-233-445 95", &[], &[]);
        assert_eq!(kinds(&entities), vec!["NATIONAL_INSURANCE_NUMBER"]);
    }

    #[test]
    fn test_unmapped_ner_tags_dropped() {
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("MISC", "Олимпиада", 5, 14),
        ];
        assert!(merger().merge("Иван Олимпиада", &ner, &[]).is_empty());
    }

    #[test]
    fn test_identifier_label_location_excluded() {
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("LOC", "Паспорт РФ", 5, 15),
        ];
        assert!(merger().merge("Иван Паспорт РФ", &ner, &[]).is_empty());
    }

    #[test]
    fn test_birthplace_reclassifies_locations() {
        let text = "Иван родился в Самаре";
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("LOC", "Самаре", 15, 21),
        ];
        let entities = merger().merge(text, &ner, &[]);
        assert_eq!(kinds(&entities), vec!["PERSON", "BIRTH_PLACE"]);
    }

    #[test]
    fn test_address_folds_locations() {
        let text = "Иван проживает: Москва, улица Тверская";
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("LOC", "Москва", 16, 22),
            RawEntity::new("LOC", "Тверская", 30, 38),
        ];
        let entities = merger().merge(text, &ner, &[]);
        assert_eq!(kinds(&entities), vec!["PERSON", "ADDRESS"]);
        assert_eq!(entities[1].text, "Москва, Тверская");
        assert_eq!(entities[1].normalized_key, "москва, тверская");
    }

    #[test]
    fn test_both_triggers_keep_address_and_birthplace() {
        let text = "Иван, живу в городе Москва, улица Тверская";
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("LOC", "Москва", 20, 26),
            RawEntity::new("LOC", "Тверская", 34, 42),
        ];
        let entities = merger().merge(text, &ner, &[]);
        assert_eq!(
            kinds(&entities),
            vec!["PERSON", "BIRTH_PLACE", "BIRTH_PLACE", "ADDRESS"]
        );
        assert_eq!(entities[1].text, "Москва");
        assert_eq!(entities[3].text, "Москва, Тверская");
    }

    #[test]
    fn test_locations_without_context_stay_locations() {
        let text = "Иван поехал Казань, ivan@example.com";
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("GPE", "Казань", 12, 18),
        ];
        let emails = vec![AnalyzerResult::new(EMAIL_ENTITY_TYPE, 20, 36)];
        let entities = merger().merge(text, &ner, &emails);
        assert_eq!(
            kinds(&entities),
            vec!["PERSON", "GEOPOLITICAL_LOCATION", "EMAIL"]
        );
    }

    #[test]
    fn test_person_with_organization_suppressed() {
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("ORG", "Газпроме", 16, 24),
        ];
        assert!(merger()
            .merge("Иван работает в Газпроме", &ner, &[])
            .is_empty());
    }

    #[test]
    fn test_person_with_plain_location_suppressed() {
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("GPE", "Казань", 12, 18),
        ];
        assert!(merger().merge("Иван поехал Казань", &ner, &[]).is_empty());
    }

    #[test]
    fn test_email_and_phone_ordering() {
        let text = "Анна: anna@example.com, 89991234567";
        let ner = vec![RawEntity::new("PER", "Анна", 0, 4)];
        let emails = vec![AnalyzerResult::new(EMAIL_ENTITY_TYPE, 6, 22)];
        let entities = merger().merge(text, &ner, &emails);
        assert_eq!(
            kinds(&entities),
            vec!["PERSON", "EMAIL", "PHONE (region: Москва)"]
        );
        assert_eq!(entities[2].text, "+79991234567");
    }

    #[test]
    fn test_unknown_phone_prefix_dropped() {
        let text = "Анна, 84951234567";
        let ner = vec![RawEntity::new("PER", "Анна", 0, 4)];
        assert!(merger().merge(text, &ner, &[]).is_empty());
    }

    #[test]
    fn test_duplicate_phone_reported_once() {
        let text = "Анна: 89991234567 или +7 999 123-45-67";
        let ner = vec![RawEntity::new("PER", "Анна", 0, 4)];
        let entities = merger().merge(text, &ner, &[]);
        assert_eq!(kinds(&entities), vec!["PERSON", "PHONE (region: Москва)"]);
    }

    #[test]
    fn test_number_passing_insurance_checksum_reported_once() {
        let entities = merger().merge("Звоните 89991234594", &[], &[]);
        assert_eq!(kinds(&entities), vec!["NATIONAL_INSURANCE_NUMBER"]);
        assert_eq!(entities[0].normalized_key, "89991234594");
    }

    #[test]
    fn test_ner_claim_takes_precedence_over_regex() {
        let text = "Иван, 4509123456, ivan@example.com";
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("ORG", "4509123456", 6, 16),
        ];
        let emails = vec![AnalyzerResult::new(EMAIL_ENTITY_TYPE, 18, 34)];
        let mut merger = merger();
        merger.patterns = Arc::new(
            PatternRegistry::from_toml(
                r#"
[[patterns]]
entity_type = "PASSPORT_NUMBER"
regex = '\d{10}'
"#,
            )
            .unwrap(),
        );
        let entities = merger.merge(text, &ner, &emails);
        assert_eq!(kinds(&entities), vec!["PERSON", "ORGANIZATION", "EMAIL"]);
    }

    #[test]
    fn test_ner_duplicates_collapse() {
        let ner = vec![
            RawEntity::new("PER", "Иван", 0, 4),
            RawEntity::new("PER", "иван", 10, 14),
            RawEntity::new("ORG", "Сбер", 20, 24),
        ];
        let entities = merger().merge("Иван ... иван ... Сбер, СНИЛС 112-233-445 95", &ner, &[]);
        assert_eq!(
            kinds(&entities),
            vec!["PERSON", "ORGANIZATION", "NATIONAL_INSURANCE_NUMBER"]
        );
    }

    #[test]
    fn test_map_analyzer_output_is_one_to_one() {
        let text = "John Smith, john@example.com";
        let results = vec![
            AnalyzerResult::new("PERSON", 0, 10),
            AnalyzerResult::new("EMAIL_ADDRESS", 12, 28),
        ];
        let entities = EntityMerger::map_analyzer_output(text, &results);
        assert_eq!(kinds(&entities), vec!["PERSON", "EMAIL_ADDRESS"]);
        assert_eq!(entities[0].text, "John Smith");
        assert_eq!(entities[1].text, "john@example.com");
    }
}
