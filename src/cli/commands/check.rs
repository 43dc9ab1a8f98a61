//! Check command implementation
//!
//! Moderates one message through the configured model service and prints
//! the verdict. Entity values are printed only with `--show-entities`.

use super::build_engine;
use crate::config::load_config;
use crate::moderation::ModerationVerdict;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Message to moderate
    pub text: String,

    /// Language of the message (defaults to moderation.primary_language)
    #[arg(long)]
    pub lang: Option<String>,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,

    /// Print detected entity values
    #[arg(long)]
    pub show_entities: bool,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let engine = build_engine(&config)?;
        let lang = self
            .lang
            .as_deref()
            .unwrap_or(&config.moderation.primary_language);

        let verdict = engine.moderate(&self.text, lang).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        } else {
            self.print_verdict(&verdict);
        }

        Ok(if verdict.flagged() { 1 } else { 0 })
    }

    fn print_verdict(&self, verdict: &ModerationVerdict) {
        if verdict.flagged() {
            println!("🚩 Flagged ({})", verdict.reason().as_str());
            println!("   {}", verdict.message());
        } else {
            println!("✅ Passed");
        }
        println!("   Toxicity score: {:.3}", verdict.toxicity_score());
        println!("   Entities: {}", verdict.entities().len());

        for entity in verdict.entities() {
            if self.show_entities {
                println!("   - {}: {}", entity.kind, entity.text);
            } else {
                println!("   - {}", entity.kind);
            }
        }
    }
}
