//! CLI command implementations

pub mod check;
pub mod init;
pub mod serve;
pub mod validate;

use crate::adapters::model_service::ModelServiceClient;
use crate::config::VigilConfig;
use crate::moderation::{AuditLogger, ModerationContext, ModerationEngine};
use std::sync::Arc;

/// Build the engine described by `config`, backed by the model service
pub(crate) fn build_engine(config: &VigilConfig) -> anyhow::Result<ModerationEngine> {
    let client = Arc::new(ModelServiceClient::new(&config.models)?);
    let context =
        ModerationContext::from_config(&config.moderation, client.clone(), client.clone(), client);

    let mut engine = ModerationEngine::new(context, &config.moderation);
    if config.audit.enabled {
        engine = engine.with_audit_logger(AuditLogger::new(config.audit.log_path.clone())?);
    }

    Ok(engine)
}
