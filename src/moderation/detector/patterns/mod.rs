//! Pattern table for identifier detection
//!
//! Rules are loaded once from TOML and stay immutable for the process
//! lifetime. Order in the file is emission order.

use crate::domain::{Result, VigilError};
use crate::moderation::models::EntityKind;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Entity kinds a pattern rule may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// SNILS
    NationalInsuranceNumber,
    /// INN
    NationalIdNumber,
    /// Passport series and number
    PassportNumber,
    /// Tax registration code
    TaxId,
    /// Phone number, normalized later
    Phone,
    /// Email address
    Email,
}

impl PatternKind {
    /// Parse a table label, accepting the legacy `RUS_*` names
    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_uppercase().as_str() {
            "NATIONAL_INSURANCE_NUMBER" | "RUS_SNILS" | "SNILS" => Ok(Self::NationalInsuranceNumber),
            "NATIONAL_ID_NUMBER" | "RUS_INN" | "INN" => Ok(Self::NationalIdNumber),
            "PASSPORT_NUMBER" | "RUS_PASSPORT" | "PASSPORT" => Ok(Self::PassportNumber),
            "TAX_ID" | "RUS_KPP" | "KPP" => Ok(Self::TaxId),
            "PHONE" | "RUS_PHONE" | "PHONE_NUMBER" => Ok(Self::Phone),
            "EMAIL" | "EMAIL_ADDRESS" => Ok(Self::Email),
            _ => Err(VigilError::Configuration(format!(
                "Unknown pattern entity type: {label}"
            ))),
        }
    }

    /// Free-text kinds are keyed by lower-cased text instead of digits
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Email)
    }

    /// Entity kind for a match of this rule
    ///
    /// Phones get their region from the normalizer, so they have none here.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::NationalInsuranceNumber => Some(EntityKind::NationalInsuranceNumber),
            Self::NationalIdNumber => Some(EntityKind::NationalIdNumber),
            Self::PassportNumber => Some(EntityKind::PassportNumber),
            Self::TaxId => Some(EntityKind::TaxId),
            Self::Email => Some(EntityKind::Email),
            Self::Phone => None,
        }
    }
}

/// Rule definition from TOML
#[derive(Debug, Clone, Deserialize)]
struct RuleDefinition {
    /// Human-readable rule name
    #[serde(default)]
    name: Option<String>,
    /// Entity type label
    entity_type: String,
    /// Regex source
    regex: String,
}

/// Pattern table container
#[derive(Debug, Deserialize)]
struct PatternTable {
    #[serde(default)]
    patterns: Vec<RuleDefinition>,
}

/// Compiled pattern rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Kind produced by the rule
    pub entity_type: PatternKind,
    /// Compiled regex
    pub regex: Regex,
    /// Rule name, for logs
    pub name: String,
}

impl PatternRule {
    /// Compile a rule
    pub fn new(entity_type: PatternKind, regex: &str) -> Result<Self> {
        Ok(Self {
            entity_type,
            regex: Regex::new(regex)?,
            name: format!("{entity_type:?}"),
        })
    }
}

/// Ordered, immutable set of pattern rules
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    rules: Vec<PatternRule>,
}

impl PatternRegistry {
    /// Create a registry from already compiled rules
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Registry without rules (NER + email only detection)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            VigilError::Configuration(format!(
                "Failed to read pattern table {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: PatternTable = toml::from_str(content)?;

        let mut rules = Vec::with_capacity(table.patterns.len());
        for (idx, def) in table.patterns.into_iter().enumerate() {
            let name = def.name.unwrap_or_else(|| format!("rule_{idx}"));
            let entity_type = PatternKind::parse(&def.entity_type)?;
            let regex = Regex::new(&def.regex).map_err(|e| {
                VigilError::Configuration(format!("Invalid regex in pattern '{name}': {e}"))
            })?;
            rules.push(PatternRule {
                entity_type,
                regex,
                name,
            });
        }

        Ok(Self { rules })
    }

    /// Create a registry with the built-in rules
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Load the configured table, falling back to the built-in one
    ///
    /// A table that is configured but cannot be loaded leaves the engine
    /// without regex rules instead of failing startup.
    pub fn load(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::from_file(path),
            None => Self::default_patterns(),
        };

        match loaded {
            Ok(registry) => {
                tracing::info!(rules = registry.len(), "Pattern table loaded");
                registry
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Pattern table unavailable, regex detection disabled"
                );
                Self::empty()
            }
        }
    }

    /// All rules in table order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
