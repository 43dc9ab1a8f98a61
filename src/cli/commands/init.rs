//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vigil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set VIGIL_API_KEY in your environment or .env file");
                println!("  2. Point [models].base_url at the model service");
                println!("  3. Validate configuration: vigil validate-config");
                println!("  4. Start the server: vigil serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the sample configuration
    pub fn generate_config() -> String {
        r#"# Vigil Configuration File
# Personal data and toxicity moderation service

[application]
log_level = "info"

[server]
bind_address = "0.0.0.0:8000"
api_key = "${VIGIL_API_KEY}"
shutdown_timeout_seconds = 30

[moderation]
# Locale served by NER + regex + checksum detection; other locales use the
# generic analyzer only
primary_language = "ru"
toxicity_threshold = 0.10
# patterns_path = "patterns/pii_patterns.toml"
# regions_path = "data/phone_regions.toml"

[models]
base_url = "http://localhost:8001"
timeout_seconds = 30

[audit]
enabled = false
log_path = "./logs/audit.jsonl"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
