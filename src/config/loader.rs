//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::InvexConfig;
use crate::domain::errors::InvexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into InvexConfig
/// 4. Applies environment variable overrides (INVEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use invex::config::loader::load_config;
///
/// let config = load_config("invex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<InvexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InvexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        InvexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<InvexConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: InvexConfig = toml::from_str(&contents)
        .map_err(|e| InvexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        InvexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error listing every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Comments may mention ${VAR} without requiring it
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(InvexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using INVEX_* prefix
///
/// Environment variables follow the pattern: INVEX_<SECTION>_<KEY>
/// For example: INVEX_OUTPUT_ROOT_DIR, INVEX_DATABASE_RUN_TIMEOUT_SECONDS
fn apply_env_overrides(config: &mut InvexConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("INVEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Output overrides
    if let Ok(val) = std::env::var("INVEX_OUTPUT_ROOT_DIR") {
        config.output.root_dir = val;
    }

    // Database overrides
    if let Ok(val) = std::env::var("INVEX_DATABASE_MAX_CONNECTIONS") {
        config.database.max_connections = parse_override("INVEX_DATABASE_MAX_CONNECTIONS", &val)?;
    }
    if let Ok(val) = std::env::var("INVEX_DATABASE_STATEMENT_TIMEOUT_SECONDS") {
        config.database.statement_timeout_seconds =
            parse_override("INVEX_DATABASE_STATEMENT_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("INVEX_DATABASE_RUN_TIMEOUT_SECONDS") {
        config.database.run_timeout_seconds =
            Some(parse_override("INVEX_DATABASE_RUN_TIMEOUT_SECONDS", &val)?);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("INVEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("INVEX_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("INVEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        InvexError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}
