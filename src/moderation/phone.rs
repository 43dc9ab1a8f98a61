//! Phone number canonicalization and region lookup

use crate::domain::{Result, VigilError};
use crate::moderation::models::{digits_only, Entity, EntityKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// International prefix of the primary country
pub const COUNTRY_CODE: &str = "+7";

/// Mobile prefixes of the second supported country (Kazakhstan)
pub const KZ_MOBILE_PREFIXES: [&str; 13] = [
    "700", "701", "702", "705", "706", "707", "708", "747", "771", "775", "776", "777", "778",
];

/// Region label for numbers matching [`KZ_MOBILE_PREFIXES`]
pub const KZ_MOBILE_REGION: &str = "мобильный, Казахстан";

const TRUNK_PREFIX: char = '8';
const COUNTRY_DIGIT: char = '7';

#[derive(Debug, Deserialize)]
struct RegionFile {
    #[serde(default)]
    regions: HashMap<String, String>,
}

/// Immutable map from a 3-digit prefix to a region display name
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<String, String>,
}

impl RegionTable {
    /// Create a table from prefix/name pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            regions: entries
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_string(), v.into()))
                .collect(),
        }
    }

    /// Parse a `[regions]` TOML table
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RegionFile = toml::from_str(content)?;
        for prefix in file.regions.keys() {
            let prefix = prefix.trim();
            if prefix.len() != 3 || !prefix.chars().all(|c| c.is_ascii_digit()) {
                return Err(VigilError::Configuration(format!(
                    "Invalid phone prefix in region table: '{prefix}'"
                )));
            }
        }
        Ok(Self::new(file.regions))
    }

    /// Load a region table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            VigilError::Configuration(format!(
                "Failed to read region table {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Built-in table
    pub fn default_regions() -> Result<Self> {
        Self::from_toml(include_str!("../../data/phone_regions.toml"))
    }

    /// Load the configured table, falling back to the built-in one
    ///
    /// An unloadable configured table yields an empty table: only
    /// second-country mobiles are recognized then.
    pub fn load(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::from_file(path),
            None => Self::default_regions(),
        };

        match loaded {
            Ok(table) => {
                tracing::info!(prefixes = table.len(), "Region table loaded");
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "Region table unavailable, phone regions disabled");
                Self::default()
            }
        }
    }

    /// Region for a 3-digit prefix
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.regions.get(prefix).map(String::as_str)
    }

    /// Number of prefixes
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Canonicalizes phone matches and attaches their region
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    regions: Arc<RegionTable>,
}

impl PhoneNormalizer {
    /// Create a normalizer over a region table
    pub fn new(regions: Arc<RegionTable>) -> Self {
        Self { regions }
    }

    /// Canonicalize `raw_match` to `+7XXXXXXXXXX` and resolve its region
    ///
    /// Returns `None` for anything that is not a trunk or country prefix
    /// followed by exactly ten digits, and for unknown 3-digit prefixes.
    pub fn normalize_phone(&self, raw_match: &str) -> Option<Entity> {
        let trimmed = raw_match.trim();
        let digits = digits_only(trimmed);
        if digits.len() != 11 {
            return None;
        }

        let has_plus = trimmed.starts_with('+');
        let national = match digits.chars().next() {
            Some(COUNTRY_DIGIT) => &digits[1..],
            Some(TRUNK_PREFIX) if !has_plus => &digits[1..],
            _ => return None,
        };

        let prefix = &national[..3];
        let region = self.resolve_region(prefix)?;
        let canonical = format!("{COUNTRY_CODE}{national}");
        let key = digits_only(&canonical);

        Some(Entity::with_key(EntityKind::Phone { region }, canonical, key))
    }

    fn resolve_region(&self, prefix: &str) -> Option<String> {
        if KZ_MOBILE_PREFIXES.contains(&prefix) {
            return Some(KZ_MOBILE_REGION.to_string());
        }
        match self.regions.lookup(prefix) {
            Some(region) => Some(region.to_string()),
            None => {
                tracing::trace!(prefix, "Unknown phone prefix, candidate dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PhoneNormalizer {
        PhoneNormalizer::new(Arc::new(RegionTable::new([
            ("999", "Москва"),
            ("812", "Санкт-Петербург"),
        ])))
    }

    #[test]
    fn test_trunk_prefix_is_replaced() {
        let entity = normalizer().normalize_phone("89991234567").unwrap();
        assert_eq!(entity.text, "+79991234567");
        assert_eq!(entity.normalized_key, "79991234567");
        assert_eq!(
            entity.kind,
            EntityKind::Phone {
                region: "Москва".to_string()
            }
        );
    }

    #[test]
    fn test_international_prefix_kept() {
        let entity = normalizer().normalize_phone("+7 (812) 555-12-34").unwrap();
        assert_eq!(entity.text, "+78125551234");
        assert_eq!(entity.kind.to_string(), "PHONE (region: Санкт-Петербург)");
    }

    #[test]
    fn test_trunk_and_international_share_key() {
        let a = normalizer().normalize_phone("8 999 123 45 67").unwrap();
        let b = normalizer().normalize_phone("+79991234567").unwrap();
        assert_eq!(a.normalized_key, b.normalized_key);
    }

    #[test]
    fn test_second_country_mobile() {
        let entity = normalizer().normalize_phone("+77011234567").unwrap();
        assert_eq!(
            entity.kind,
            EntityKind::Phone {
                region: KZ_MOBILE_REGION.to_string()
            }
        );
    }

    #[test]
    fn test_unknown_prefix_discarded() {
        assert!(normalizer().normalize_phone("84951234567").is_none());
    }

    #[test]
    fn test_malformed_numbers_discarded() {
        let n = normalizer();
        assert!(n.normalize_phone("8999123456").is_none());
        assert!(n.normalize_phone("899912345678").is_none());
        assert!(n.normalize_phone("19991234567").is_none());
        assert!(n.normalize_phone("+89991234567").is_none());
    }

    #[test]
    fn test_default_regions_load() {
        let table = RegionTable::default_regions().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.lookup("495"), Some("Москва"));
    }

    #[test]
    fn test_region_table_rejects_bad_prefix() {
        let toml = "[regions]\n\"49\" = \"Москва\"\n";
        assert!(RegionTable::from_toml(toml).is_err());
    }

    #[test]
    fn test_region_load_failure_degrades() {
        let table = RegionTable::load(Some(Path::new("/nonexistent/regions.toml")));
        assert!(table.is_empty());
    }
}
