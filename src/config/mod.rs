//! Configuration management for Vigil.
//!
//! Vigil reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VIGIL_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vigil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vigil.toml")?;
//!
//! println!("Listening on {}", config.server.bind_address);
//! println!("Toxicity threshold: {}", config.moderation.toxicity_threshold);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Listen address and bearer credential
//! - [`ModerationConfig`] - Primary language, threshold, table paths
//! - [`ModelsConfig`] - Model service URL and timeout
//! - [`AuditConfig`] - Verdict audit log
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0:8000"
//! api_key = "${VIGIL_API_KEY}"
//!
//! [moderation]
//! primary_language = "ru"
//! toxicity_threshold = 0.10
//!
//! [models]
//! base_url = "http://localhost:8001"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AuditConfig, LoggingConfig, ModelsConfig, ModerationConfig, ServerConfig,
    VigilConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
