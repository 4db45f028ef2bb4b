//! Configuration loader
//!
//! Loads [`RdiClientConfig`] from environment variables and files.
//!
//! ## Loading Strategy
//! 1. Probes multiple paths for a config file (JSON or TOML)
//! 2. Uses built-in defaults when no file exists
//! 3. Applies environment variables on top; a set variable always wins
//!
//! ## Environment Variables
//! - `RDI_REQUEST_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `RDI_TOKEN_EXPIRY_MARGIN_SECS`: Seconds before `exp` a token is renewed
//! - `RDI_WAIT_BEFORE_POLLING_MS`: Delay before the first action poll
//! - `RDI_POLLING_INTERVAL_MS`: Delay between action polls
//! - `RDI_MAX_POLLING_WAIT_MS`: Total action polling bound
//! - `RDI_ACCEPT_INVALID_CERTS`: Whether self-signed certificates are accepted
//!   (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./rdi.json` or `./rdi.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rdi_domain::{RdiClientConfig, RdiError, Result};

const ENV_REQUEST_TIMEOUT_MS: &str = "RDI_REQUEST_TIMEOUT_MS";
const ENV_TOKEN_EXPIRY_MARGIN_SECS: &str = "RDI_TOKEN_EXPIRY_MARGIN_SECS";
const ENV_WAIT_BEFORE_POLLING_MS: &str = "RDI_WAIT_BEFORE_POLLING_MS";
const ENV_POLLING_INTERVAL_MS: &str = "RDI_POLLING_INTERVAL_MS";
const ENV_MAX_POLLING_WAIT_MS: &str = "RDI_MAX_POLLING_WAIT_MS";
const ENV_ACCEPT_INVALID_CERTS: &str = "RDI_ACCEPT_INVALID_CERTS";

const CONFIG_FILE_NAMES: [&str; 4] = ["rdi.json", "rdi.toml", "config.json", "config.toml"];

/// Load configuration from the first config file found, then environment
///
/// # Errors
/// Returns a configuration error if the probed file cannot be parsed or an
/// environment variable holds an invalid value.
pub fn load() -> Result<RdiClientConfig> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            RdiClientConfig::default()
        }
    };

    apply_env(base)
}

/// Load configuration from environment variables over the defaults
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns a configuration error if a variable has an invalid value.
pub fn load_from_env() -> Result<RdiClientConfig> {
    apply_env(RdiClientConfig::default())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Fields absent from the file take their defaults.
///
/// # Errors
/// Returns a configuration error if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<RdiClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RdiError::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RdiError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading RDI client configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RdiError::config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<RdiClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RdiError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RdiError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(RdiError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn apply_env(mut config: RdiClientConfig) -> Result<RdiClientConfig> {
    if let Some(value) = env_parse::<u64>(ENV_REQUEST_TIMEOUT_MS)? {
        config.request_timeout_ms = value;
    }
    if let Some(value) = env_parse::<u64>(ENV_TOKEN_EXPIRY_MARGIN_SECS)? {
        config.token_expiry_margin_secs = value;
    }
    if let Some(value) = env_parse::<u64>(ENV_WAIT_BEFORE_POLLING_MS)? {
        config.polling.wait_before_polling_ms = value;
    }
    if let Some(value) = env_parse::<u64>(ENV_POLLING_INTERVAL_MS)? {
        config.polling.interval_ms = value;
    }
    if let Some(value) = env_parse::<u64>(ENV_MAX_POLLING_WAIT_MS)? {
        config.polling.max_wait_ms = value;
    }
    config.accept_invalid_certs = env_bool(ENV_ACCEPT_INVALID_CERTS, config.accept_invalid_certs);

    Ok(config)
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns a configuration error if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RdiError::config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use rdi_domain::ErrorCode;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 6] = [
        ENV_REQUEST_TIMEOUT_MS,
        ENV_TOKEN_EXPIRY_MARGIN_SECS,
        ENV_WAIT_BEFORE_POLLING_MS,
        ENV_POLLING_INTERVAL_MS,
        ENV_MAX_POLLING_WAIT_MS,
        ENV_ACCEPT_INVALID_CERTS,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("RDI_TEST_BOOL_YES", "yes");
        std::env::set_var("RDI_TEST_BOOL_UPPER", "TRUE");
        std::env::set_var("RDI_TEST_BOOL_OFF", "off");

        assert!(env_bool("RDI_TEST_BOOL_YES", false));
        assert!(env_bool("RDI_TEST_BOOL_UPPER", false));
        assert!(!env_bool("RDI_TEST_BOOL_OFF", true));

        std::env::remove_var("RDI_TEST_BOOL_MISSING");
        assert!(env_bool("RDI_TEST_BOOL_MISSING", true));

        std::env::remove_var("RDI_TEST_BOOL_YES");
        std::env::remove_var("RDI_TEST_BOOL_UPPER");
        std::env::remove_var("RDI_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_REQUEST_TIMEOUT_MS, "2500");
        std::env::set_var(ENV_POLLING_INTERVAL_MS, "250");
        std::env::set_var(ENV_ACCEPT_INVALID_CERTS, "false");

        let config = load_from_env().unwrap();
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.polling.interval_ms, 250);
        assert!(!config.accept_invalid_certs);
        // Untouched fields keep their defaults
        assert_eq!(config.polling, rdi_domain::PollingConfig {
            interval_ms: 250,
            ..Default::default()
        });

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_MAX_POLLING_WAIT_MS, "two minutes");

        let err = load_from_env().unwrap_err();
        assert_eq!(err.error_code, ErrorCode::RdiConfigurationError);
        assert!(err.message.contains(ENV_MAX_POLLING_WAIT_MS));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "request_timeout_ms": 1000,
            "polling": { "max_wait_ms": 5000 }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.request_timeout_ms, 1000);
        assert_eq!(config.polling.max_wait_ms, 5000);
        assert_eq!(config.polling.interval_ms, 1000);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/rdi.json"))).unwrap_err();
        assert_eq!(err.error_code, ErrorCode::RdiConfigurationError);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
token_expiry_margin_secs = 30

[polling]
interval_ms = 200
"#;

        let config = parse_config(toml_content, &PathBuf::from("rdi.toml")).unwrap();
        assert_eq!(config.token_expiry_margin_secs, 30);
        assert_eq!(config.polling.interval_ms, 200);
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "request_timeout_ms": "#, &PathBuf::from("rdi.json"));
        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("rdi.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
