//! Serve command implementation

use super::build_engine;
use crate::config::load_config;
use crate::server::{self, AppState};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.bind_address
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        if let Some(ref bind) = self.bind {
            config.server.bind_address = bind.clone();
            if let Err(e) = config.server.socket_addr() {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        }

        tracing::info!(
            bind_address = %config.server.bind_address,
            models = %config.models.base_url,
            primary_language = %config.moderation.primary_language,
            toxicity_threshold = config.moderation.toxicity_threshold,
            audit_enabled = config.audit.enabled,
            "Starting moderation server"
        );

        let engine = build_engine(&config)?;
        let state = AppState::new(Arc::new(engine), config.server.api_key.clone());

        server::serve(&config.server, state, shutdown_signal).await?;
        Ok(0)
    }
}
