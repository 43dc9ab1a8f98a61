//! Validate config command implementation
//!
//! Loads the configuration and both detection tables and prints a summary.

use crate::config::load_config;
use crate::moderation::detector::PatternRegistry;
use crate::moderation::phone::RegionTable;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mut exit_code = 0;

        let patterns = match config.moderation.patterns_path {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        match patterns {
            Ok(registry) => println!("✅ Pattern table: {} rules", registry.len()),
            Err(e) => {
                println!("⚠️  Pattern table unusable, regex detection will be disabled");
                println!("   Error: {e}");
                exit_code = 2;
            }
        }

        let regions = match config.moderation.regions_path {
            Some(ref path) => RegionTable::from_file(path),
            None => RegionTable::default_regions(),
        };
        match regions {
            Ok(table) => println!("✅ Region table: {} prefixes", table.len()),
            Err(e) => {
                println!("⚠️  Region table unusable, only second-country mobiles will resolve");
                println!("   Error: {e}");
                exit_code = 2;
            }
        }

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Bind Address: {}", config.server.bind_address);
        println!("  Model Service: {}", config.models.base_url);
        println!("  Model Timeout: {}s", config.models.timeout_seconds);
        println!("  Primary Language: {}", config.moderation.primary_language);
        println!(
            "  Toxicity Threshold: {}",
            config.moderation.toxicity_threshold
        );
        println!(
            "  Audit Log: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!(
                    "{} ({})",
                    config.logging.local_path, config.logging.local_rotation
                )
            } else {
                "disabled".to_string()
            }
        );

        Ok(exit_code)
    }
}
