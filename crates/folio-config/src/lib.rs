//! Configuration for folio.
//!
//! Parses `folio.toml` with serde and discovers it in the current directory
//! or any parent. Every section is optional; missing values take defaults.
//! Command-line overrides are applied through [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These string values support `${VAR}` and `${VAR:-default}`:
//! - `render.base_path`
//! - `diagrams.kroki_url`
//! - `link_preview.proxy_url`
//! - `link_preview.favicon_service`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_renderer::Theme;
use folio_renderer::blocks::DEFAULT_FAVICON_SERVICE;
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// Default Kroki server.
pub const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Default CORS proxy for link previews. `{url}` is the encoded target.
pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw?url={url}";

/// Overrides from the command line. Only `Some` values apply.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub theme: Option<Theme>,
    pub kroki_url: Option<String>,
    pub link_previews_enabled: Option<bool>,
    pub base_path: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub render: RenderConfig,
    pub diagrams: DiagramsConfig,
    pub link_preview: LinkPreviewConfig,
    /// Path of the loaded file, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[render]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub theme: Theme,
    /// Directory of the document, used to resolve relative `.md` links.
    pub base_path: Option<String>,
}

/// `[diagrams]` section.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramsConfig {
    pub kroki_url: String,
    pub timeout_secs: u64,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            kroki_url: DEFAULT_KROKI_URL.to_owned(),
            timeout_secs: 30,
        }
    }
}

impl DiagramsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[link_preview]` section.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkPreviewConfig {
    /// Fetch metadata for link cards without an explicit title.
    pub enabled: bool,
    pub proxy_url: String,
    pub favicon_service: String,
    pub timeout_secs: u64,
}

impl Default for LinkPreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_owned(),
            timeout_secs: 10,
        }
    }
}

impl LinkPreviewConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_placeholder(template: &str, placeholder: &str, field: &str) -> Result<(), ConfigError> {
    if !template.contains(placeholder) {
        return Err(ConfigError::Validation(format!(
            "{field} must contain the {placeholder} placeholder"
        )));
    }
    Ok(())
}

fn require_positive(secs: u64, field: &str) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

impl Config {
    /// Load configuration and apply CLI overrides.
    ///
    /// With `config_path`, that file must exist. Otherwise `folio.toml` is
    /// searched for from the current directory upwards, falling back to
    /// defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit path is missing, the file fails to parse,
    /// an environment variable is unset, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;
        Ok(config)
    }

    /// Find `folio.toml` in `start` or its nearest ancestor.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Parse a configuration file and expand environment references.
    ///
    /// # Errors
    ///
    /// Returns error if reading, parsing or expansion fails.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(theme) = settings.theme {
            self.render.theme = theme;
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams.kroki_url.clone_from(kroki_url);
        }
        if let Some(enabled) = settings.link_previews_enabled {
            self.link_preview.enabled = enabled;
        }
        if let Some(base_path) = &settings.base_path {
            self.render.base_path = Some(base_path.clone());
        }
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_optional(&mut self.render.base_path, "render.base_path")?;
        expand::expand_in_place(&mut self.diagrams.kroki_url, "diagrams.kroki_url")?;
        expand::expand_in_place(&mut self.link_preview.proxy_url, "link_preview.proxy_url")?;
        expand::expand_in_place(
            &mut self.link_preview.favicon_service,
            "link_preview.favicon_service",
        )?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url(&self.diagrams.kroki_url, "diagrams.kroki_url")?;
        require_positive(self.diagrams.timeout_secs, "diagrams.timeout_secs")?;

        // Templates are only used when previews are on.
        if self.link_preview.enabled {
            require_http_url(&self.link_preview.proxy_url, "link_preview.proxy_url")?;
            require_placeholder(&self.link_preview.proxy_url, "{url}", "link_preview.proxy_url")?;
            require_positive(self.link_preview.timeout_secs, "link_preview.timeout_secs")?;
        }
        require_http_url(&self.link_preview.favicon_service, "link_preview.favicon_service")?;
        require_placeholder(
            &self.link_preview.favicon_service,
            "{host}",
            "link_preview.favicon_service",
        )?;

        if let Some(base_path) = &self.render.base_path
            && base_path.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "render.base_path cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
