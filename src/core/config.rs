//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! The config file is looked up at `--config`, then `./pagewright.toml`,
//! then `~/.pagewright/config.toml`. A missing file just means defaults.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PagewrightConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub base_path: Option<String>,
    pub assets_path: Option<String>,
    pub components_path: Option<String>,
    pub env_file: Option<String>,
    pub debug: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub origin: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "/";
pub const DEFAULT_BASE_PATH: &str = "src";
pub const DEFAULT_ASSETS_PATH: &str = "src/assets";
pub const DEFAULT_COMPONENTS_PATH: &str = "src/components";
pub const DEFAULT_ENV_FILE: &str = ".env";

const CONFIG_FILE_NAME: &str = "pagewright.toml";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub base_path: String,
    pub assets_path: String,
    pub components_path: String,
    pub env_file: String,
    pub debug: bool,
    /// None lets the HTTP fetcher apply its own default.
    pub origin: Option<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            assets_path: DEFAULT_ASSETS_PATH.to_string(),
            components_path: DEFAULT_COMPONENTS_PATH.to_string(),
            env_file: DEFAULT_ENV_FILE.to_string(),
            debug: false,
            origin: None,
        }
    }
}

impl ResolvedConfig {
    /// `<baseUrl><basePath>`, the root every site file is fetched under.
    pub fn site_root(&self) -> String {
        format!("{}{}", self.base_url, self.base_path)
    }

    /// The environment file, relative to the base URL.
    pub fn env_url(&self) -> String {
        format!("{}{}", self.base_url, self.env_file)
    }

    pub fn routes_url(&self) -> String {
        format!("{}/routes.json", self.site_root())
    }

    pub fn shell_url(&self) -> String {
        format!("{}/app.html", self.site_root())
    }

    pub fn not_found_url(&self) -> String {
        format!("{}/NotFound.html", self.site_root())
    }

    pub fn page_url(&self, component_path: &str) -> String {
        format!("{}/{}", self.site_root(), component_path)
    }

    pub fn components_root(&self) -> String {
        format!("{}/components", self.site_root())
    }

    /// Replacement for the `@assets/` marker.
    pub fn assets_prefix(&self) -> String {
        format!("{}{}/", self.base_url, self.assets_path)
    }

    /// Replacement for the `@components/` marker.
    pub fn components_prefix(&self) -> String {
        format!("{}{}/", self.base_url, self.components_path)
    }
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub origin: Option<String>,
    pub base_url: Option<String>,
    pub base_path: Option<String>,
    pub debug: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the first existing config file among the search locations.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::home_dir()
        .map(|h| h.join(".pagewright").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load config from the given file, or defaults if there is none.
///
/// An explicit path that does not exist is an I/O error; a malformed file
/// is `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<PagewrightConfig, ConfigError> {
    let Some(path) = path else {
        info!("No config file found, using defaults");
        return Ok(PagewrightConfig::default());
    };

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PagewrightConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PagewrightConfig, cli: &CliOverrides) -> ResolvedConfig {
    let site = &config.site;

    // Origin: CLI → env → config → fetcher default
    let origin = cli
        .origin
        .clone()
        .or_else(|| std::env::var("PAGEWRIGHT_ORIGIN").ok())
        .or_else(|| config.server.origin.clone());

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("PAGEWRIGHT_BASE_URL").ok())
        .or_else(|| site.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Base path: CLI → env → config → default
    let base_path = cli
        .base_path
        .clone()
        .or_else(|| std::env::var("PAGEWRIGHT_BASE_PATH").ok())
        .or_else(|| site.base_path.clone())
        .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

    // Debug: any source can switch it on
    let debug = cli.debug
        || std::env::var("PAGEWRIGHT_DEBUG").is_ok_and(|v| v == "1" || v == "true")
        || site.debug.unwrap_or(false);

    ResolvedConfig {
        base_url,
        base_path,
        assets_path: site
            .assets_path
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSETS_PATH.to_string()),
        components_path: site
            .components_path
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPONENTS_PATH.to_string()),
        env_file: site
            .env_file
            .clone()
            .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string()),
        debug,
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PagewrightConfig::default();
        assert!(config.site.base_url.is_none());
        assert!(config.server.origin.is_none());
    }

    #[test]
    fn test_resolved_defaults_and_urls() {
        let resolved = ResolvedConfig::default();
        assert_eq!(resolved.env_url(), "/.env");
        assert_eq!(resolved.routes_url(), "/src/routes.json");
        assert_eq!(resolved.shell_url(), "/src/app.html");
        assert_eq!(resolved.not_found_url(), "/src/NotFound.html");
        assert_eq!(resolved.page_url("pages/home.html"), "/src/pages/home.html");
        assert_eq!(resolved.components_root(), "/src/components");
        assert_eq!(resolved.assets_prefix(), "/src/assets/");
        assert_eq!(resolved.components_prefix(), "/src/components/");
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PagewrightConfig {
            site: SiteConfig {
                assets_path: Some("static".to_string()),
                components_path: Some("parts".to_string()),
                env_file: Some("config.env".to_string()),
                debug: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.assets_path, "static");
        assert_eq!(resolved.components_path, "parts");
        assert_eq!(resolved.env_file, "config.env");
        assert!(resolved.debug);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = PagewrightConfig {
            site: SiteConfig {
                base_path: Some("app".to_string()),
                ..Default::default()
            },
            server: ServerConfig {
                origin: Some("http://config.test".to_string()),
            },
        };
        let cli = CliOverrides {
            origin: Some("http://cli.test".to_string()),
            base_path: Some("site".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_path, "site");
        assert_eq!(resolved.origin.as_deref(), Some("http://cli.test"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[site]
base_url = "/docs/"
"#;
        let config: PagewrightConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.site.base_url.as_deref(), Some("/docs/"));
        assert!(config.site.base_path.is_none());
        assert!(config.server.origin.is_none());
    }

    #[test]
    fn test_load_config_without_file_gives_defaults() {
        let config = load_config(None).unwrap();
        assert!(config.site.debug.is_none());
    }

    #[test]
    fn test_load_config_explicit_missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
