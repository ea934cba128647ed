//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CardexConfig;
use crate::domain::errors::CardexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CardexConfig
/// 4. Applies environment variable overrides (CARDEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use cardex::config::loader::load_config;
///
/// let config = load_config("cardex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CardexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CardexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CardexError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses, overrides and validates configuration text
///
/// # Errors
///
/// Returns an error if substitution, parsing or validation fails.
pub fn load_config_from_str(contents: &str) -> Result<CardexConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CardexConfig = toml::from_str(&contents)
        .map_err(|e| CardexError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CardexError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CardexError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
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
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(CardexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| CardexError::Configuration(format!("Invalid value for {name}: {e}")))
}

/// Applies environment variable overrides using CARDEX_* prefix
///
/// Environment variables follow the pattern: CARDEX_<SECTION>_<KEY>,
/// for example CARDEX_EXPORT_FORMAT or CARDEX_DOCUMENT_PATH.
fn apply_env_overrides(config: &mut CardexConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("CARDEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Document overrides
    if let Ok(val) = std::env::var("CARDEX_DOCUMENT_PATH") {
        config.document.path = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("CARDEX_EXPORT_FORMAT") {
        config.export.format = parse_override("CARDEX_EXPORT_FORMAT", &val)?;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_SCALE") {
        config.export.scale = parse_override("CARDEX_EXPORT_SCALE", &val)?;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_MODE") {
        config.export.mode = parse_override("CARDEX_EXPORT_MODE", &val)?;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_TARGET") {
        config.export.target = parse_override("CARDEX_EXPORT_TARGET", &val)?;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_FOLDER_NAME") {
        config.export.folder_name = val;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("CARDEX_EXPORT_CONCURRENCY_LIMIT") {
        config.export.concurrency_limit = parse_override("CARDEX_EXPORT_CONCURRENCY_LIMIT", &val)?;
    }

    // Fetch overrides
    if let Ok(val) = std::env::var("CARDEX_FETCH_TIMEOUT_SECONDS") {
        config.fetch.timeout_seconds = parse_override("CARDEX_FETCH_TIMEOUT_SECONDS", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CARDEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CARDEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CARDEX_TEST_SUBST_VAR", "deck");
        let input = "folder_name = \"${CARDEX_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "folder_name = \"deck\"");
        std::env::remove_var("CARDEX_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CARDEX_TEST_MISSING_VAR");
        let input = "path = \"${CARDEX_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CARDEX_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# path = \"${CARDEX_TEST_COMMENTED_VAR}\"";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(CardexError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[document]
path = "deck.json"

[export]
format = "jpeg"
scale = 3
folder_name = "launch"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.document.path, "deck.json");
        assert_eq!(config.export.format, ImageFormat::Jpeg);
        assert_eq!(config.export.scale, 3);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let result = load_config_from_str("[export]\nscale = 40\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("export.scale"));
    }

    #[test]
    fn test_parse_override_reports_variable() {
        let err = parse_override::<u32>("CARDEX_EXPORT_SCALE", "big").unwrap_err();
        assert!(err.to_string().contains("CARDEX_EXPORT_SCALE"));
    }
}
