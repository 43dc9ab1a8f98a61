// Vigil - Personal Data and Toxicity Moderation Service
// Copyright (c) 2025 Vigil Contributors
// Licensed under the MIT License

//! # Vigil - Personal Data and Toxicity Moderation
//!
//! Vigil decides whether a free-text message may pass. It detects personal
//! data with a statistical NER model, a regex table and checksum validators,
//! scores toxicity with an external classifier, and folds both signals into
//! one verdict with a fixed, localized message.
//!
//! ## Architecture
//!
//! - [`moderation`] - Entity resolution, validation, policy and orchestration
//! - [`adapters`] - HTTP-backed model collaborators
//! - [`server`] - Moderation extension endpoint (axum)
//! - [`cli`] - Command-line interface
//! - [`config`] - Configuration management
//! - [`domain`] - Error types and the `Result` alias
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vigil::adapters::model_service::ModelServiceClient;
//! use vigil::moderation::{ModerationContext, ModerationEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = vigil::config::load_config("vigil.toml")?;
//!
//!     let client = Arc::new(ModelServiceClient::new(&config.models)?);
//!     let context = ModerationContext::from_config(
//!         &config.moderation,
//!         client.clone(),
//!         client.clone(),
//!         client,
//!     );
//!     let engine = ModerationEngine::new(context, &config.moderation);
//!
//!     let verdict = engine.moderate("Меня зовут Иван, мой СНИЛС 112-233-445 95", "ru").await?;
//!     println!("flagged: {}, reason: {}", verdict.flagged(), verdict.reason().as_str());
//!     Ok(())
//! }
//! ```
//!
//! ## Detection Order
//!
//! For the primary language, detectors run in a fixed order and the first
//! detector to report a normalized value owns it: NER, context heuristics,
//! regex candidates (checksum-validated where the scheme has one), emails,
//! phones. A person-combination gate then suppresses lone names. See
//! [`moderation::merger`].
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`]. A failing model call is never
//! turned into a "clean" verdict; it propagates as
//! [`domain::VigilError::Model`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod moderation;
pub mod server;
