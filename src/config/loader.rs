//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VigilConfig;
use crate::config::secret_string;
use crate::domain::errors::VigilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`VigilConfig`]
/// 4. Applies environment variable overrides (`VIGIL_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`VigilError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use vigil::config::load_config;
///
/// let config = load_config("vigil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VigilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VigilError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&contents)
}

/// Parse configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<VigilConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VigilConfig = toml::from_str(&contents)
        .map_err(|e| VigilError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| VigilError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VigilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        VigilError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}

/// Applies environment variable overrides using the `VIGIL_*` prefix
///
/// Variables follow the pattern `VIGIL_<SECTION>_<KEY>`, for example
/// `VIGIL_SERVER_API_KEY` or `VIGIL_MODERATION_TOXICITY_THRESHOLD`.
fn apply_env_overrides(config: &mut VigilConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("VIGIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Some(val) = var("VIGIL_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Some(val) = var("VIGIL_SERVER_API_KEY") {
        config.server.api_key = secret_string(val);
    }
    if let Some(val) = var("VIGIL_SERVER_SHUTDOWN_TIMEOUT_SECONDS") {
        config.server.shutdown_timeout_seconds =
            parse_override("VIGIL_SERVER_SHUTDOWN_TIMEOUT_SECONDS", &val)?;
    }

    // Moderation overrides
    if let Some(val) = var("VIGIL_MODERATION_PRIMARY_LANGUAGE") {
        config.moderation.primary_language = val;
    }
    if let Some(val) = var("VIGIL_MODERATION_TOXICITY_THRESHOLD") {
        config.moderation.toxicity_threshold =
            parse_override("VIGIL_MODERATION_TOXICITY_THRESHOLD", &val)?;
    }
    if let Some(val) = var("VIGIL_MODERATION_PATTERNS_PATH") {
        config.moderation.patterns_path = Some(PathBuf::from(val));
    }
    if let Some(val) = var("VIGIL_MODERATION_REGIONS_PATH") {
        config.moderation.regions_path = Some(PathBuf::from(val));
    }

    // Model service overrides
    if let Some(val) = var("VIGIL_MODELS_BASE_URL") {
        config.models.base_url = val;
    }
    if let Some(val) = var("VIGIL_MODELS_TIMEOUT_SECONDS") {
        config.models.timeout_seconds = parse_override("VIGIL_MODELS_TIMEOUT_SECONDS", &val)?;
    }

    // Audit overrides
    if let Some(val) = var("VIGIL_AUDIT_ENABLED") {
        config.audit.enabled = parse_override("VIGIL_AUDIT_ENABLED", &val)?;
    }
    if let Some(val) = var("VIGIL_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }

    // Logging overrides
    if let Some(val) = var("VIGIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("VIGIL_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("VIGIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = var("VIGIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
