//! Application configuration for edadoc.
//!
//! User config lives at `~/.edadoc/edadoc.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EdaDocError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "edadoc.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".edadoc";

// ---------------------------------------------------------------------------
// Config structs (matching edadoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Source file discovery filters.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory scanned for `*.xml` documentation files.
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    /// Directory the generated documents are written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_working_dir() -> String {
    ".".into()
}
fn default_out_dir() -> String {
    "./docs".into()
}

/// `[discovery]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Path regexes; when non-empty, a file must match at least one.
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Path regexes; a file matching any of these is skipped.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parse config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for one documentation run.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Root scanned for `*.xml` files.
    pub working_dir: PathBuf,
    /// Output root; receives `events/`, `services/`, `processes/`.
    pub out_dir: PathBuf,
    /// Explicit file selection. Empty means "every discovered file".
    pub files: Vec<PathBuf>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Replace existing documents without complaint.
    pub force: bool,
    /// Tool version recorded in the manifest.
    pub tool_version: String,
}

impl From<&AppConfig> for ParseConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            working_dir: PathBuf::from(&config.defaults.working_dir),
            out_dir: PathBuf::from(&config.defaults.out_dir),
            files: Vec::new(),
            include_patterns: config.discovery.include_patterns.clone(),
            exclude_patterns: config.discovery.exclude_patterns.clone(),
            force: false,
            tool_version: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.edadoc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| EdaDocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.edadoc/edadoc.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| EdaDocError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| EdaDocError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| EdaDocError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| EdaDocError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| EdaDocError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("out_dir"));
        assert!(toml_str.contains("./docs"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.working_dir, ".");
        assert!(parsed.discovery.include_patterns.is_empty());
    }

    #[test]
    fn config_with_discovery_patterns() {
        let toml_str = r#"
[defaults]
out_dir = "/tmp/eda-docs"

[discovery]
exclude_patterns = ["/obj/", "Tests\\.xml$"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.out_dir, "/tmp/eda-docs");
        assert_eq!(config.defaults.working_dir, ".");
        assert_eq!(config.discovery.exclude_patterns.len(), 2);
    }

    #[test]
    fn parse_config_from_app_config() {
        let app = AppConfig::default();
        let parse = ParseConfig::from(&app);
        assert_eq!(parse.working_dir, PathBuf::from("."));
        assert_eq!(parse.out_dir, PathBuf::from("./docs"));
        assert!(parse.files.is_empty());
        assert!(!parse.force);
    }

    #[test]
    fn load_config_from_reports_bad_toml() {
        let path = std::env::temp_dir().join(format!("edadoc-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[defaults\nout_dir = 3").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_file(&path);
    }
}
