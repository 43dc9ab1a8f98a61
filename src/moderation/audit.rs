//! Audit log of moderation verdicts
//!
//! Each verdict becomes one JSON line. Entity values are stored only as
//! SHA-256 hashes, never in plaintext.

use crate::domain::{Result, VigilError};
use crate::moderation::models::{Entity, ModerationVerdict};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    request_id: &'a str,
    language: &'a str,
    flagged: bool,
    reason: &'static str,
    toxicity_score: f32,
    entities: Vec<AuditEntity>,
}

/// Audit entity entry (with hashed value)
#[derive(Debug, Serialize)]
struct AuditEntity {
    kind: String,
    /// SHA-256 hash of the normalized key
    value_hash: String,
}

/// Append-only verdict audit log
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VigilError::Configuration(format!(
                    "Failed to create audit log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        Ok(Self { log_path })
    }

    /// Record a verdict
    pub fn log_verdict(
        &self,
        request_id: &str,
        language: &str,
        verdict: &ModerationVerdict,
    ) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            request_id,
            language,
            flagged: verdict.flagged(),
            reason: verdict.reason().as_str(),
            toxicity_score: verdict.toxicity_score(),
            entities: verdict.entities().iter().map(Self::audit_entity).collect(),
        };

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    fn audit_entity(entity: &Entity) -> AuditEntity {
        AuditEntity {
            kind: entity.kind.label().to_string(),
            value_hash: hash_value(&entity.normalized_key),
        }
    }
}

/// Hash a value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
