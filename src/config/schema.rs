//! Configuration schema types
//!
//! This module defines the configuration structure for Vigil.

use crate::config::SecretString;
use crate::moderation::DEFAULT_TOXICITY_THRESHOLD;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main Vigil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct VigilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP endpoint settings
    pub server: ServerConfig,

    /// Detection and policy settings
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Model service connection
    #[serde(default)]
    pub models: ModelsConfig,

    /// Verdict audit log
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VigilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.moderation.validate()?;
        self.models.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// HTTP endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bearer credential expected from callers
    /// Stored securely in memory and automatically zeroized on drop
    pub api_key: SecretString,

    /// Seconds to wait for in-flight requests on shutdown
    #[serde(default = "default_shutdown_timeout_seconds")]
    pub shutdown_timeout_seconds: u64,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        self.bind_address.parse::<SocketAddr>().map_err(|e| {
            format!(
                "Invalid server.bind_address '{}': {e}",
                self.bind_address
            )
        })?;

        if self.api_key.expose_secret().is_empty() {
            return Err("server.api_key cannot be empty".to_string());
        }

        Ok(())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_address
            .parse()
            .map_err(|e| format!("Invalid server.bind_address '{}': {e}", self.bind_address))
    }
}

/// Detection and policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Locale served by the full merge path; others use the analyzer alone
    #[serde(default = "default_primary_language")]
    pub primary_language: String,

    /// Toxicity score at or above which a message is flagged
    #[serde(default = "default_toxicity_threshold")]
    pub toxicity_threshold: f32,

    /// Pattern table (TOML); built-in table when unset
    #[serde(default)]
    pub patterns_path: Option<PathBuf>,

    /// Phone region table (TOML); built-in table when unset
    #[serde(default)]
    pub regions_path: Option<PathBuf>,
}

impl ModerationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.primary_language.trim().is_empty() {
            return Err("moderation.primary_language cannot be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.toxicity_threshold) {
            return Err(format!(
                "moderation.toxicity_threshold must be within [0, 1], got {}",
                self.toxicity_threshold
            ));
        }

        Ok(())
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            primary_language: default_primary_language(),
            toxicity_threshold: default_toxicity_threshold(),
            patterns_path: None,
            regions_path: None,
        }
    }
}

/// Model service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Base URL of the model service
    #[serde(default = "default_models_base_url")]
    pub base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ModelsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("models.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("models.base_url must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid models.base_url '{}': {e}", self.base_url))?;

        if self.timeout_seconds == 0 {
            return Err("models.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: default_models_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Verdict audit log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Write one JSON line per verdict
    #[serde(default)]
    pub enabled: bool,

    /// Audit file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_shutdown_timeout_seconds() -> u64 {
    30
}

fn default_primary_language() -> String {
    "ru".to_string()
}

fn default_toxicity_threshold() -> f32 {
    DEFAULT_TOXICITY_THRESHOLD
}

fn default_models_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./logs/audit.jsonl")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
