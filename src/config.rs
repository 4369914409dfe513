//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Cloudflare API settings derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "CLOUDFLARE",
    discovery(
        app_name = "tunroute",
        env_var = "TUNROUTE_CONFIG_PATH",
        config_file_name = "tunroute.toml",
        dotfile_name = ".tunroute.toml",
        project_file_name = "tunroute.toml"
    )
)]
pub struct CloudflareConfig {
    /// API token with permission to edit tunnel routes. This value is
    /// required.
    pub api_token: String,
    /// Base URL of the v4 API. Overridable for testing against a local
    /// endpoint.
    #[ortho_config(default = crate::client::DEFAULT_BASE_URL.to_owned())]
    pub base_url: String,
    /// Account used for records that do not name one.
    pub account_id: Option<String>,
    /// Upper bound for a single API request, in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to tunroute.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

impl CloudflareConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(metadata.missing());
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("tunroute")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Account id to fall back on, when one is configured and non-blank.
    #[must_use]
    pub fn default_account_id(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to provide missing values via environment variables or configuration
    /// files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::Invalid`] when the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.api_token,
            &FieldMetadata::new("Cloudflare API token", "CLOUDFLARE_API_TOKEN", "api_token"),
        )?;
        Self::require_field(
            &self.base_url,
            &FieldMetadata::new("API base URL", "CLOUDFLARE_BASE_URL", "base_url"),
        )?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "request_timeout_secs must be greater than zero (CLOUDFLARE_REQUEST_TIMEOUT_SECS)",
            )));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a field holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
