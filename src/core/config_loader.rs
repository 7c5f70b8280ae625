//! Configuration loading and validation
//!
//! Discovers the project configuration file, parses YAML or TOML by
//! extension, expands `${ENV_VAR}` references inside string values, and
//! validates the result with field-level errors and warnings.

use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::request::PlatformTarget;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file names searched in the project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".social-publisher.yml",
    ".social-publisher.yaml",
    ".social-publisher.toml",
];

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// Options for loading configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project directory searched for a config file
    pub project_path: PathBuf,

    /// Environment overrides for `${VAR}` expansion (empty: process env)
    pub env: HashMap<String, String>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ConfigValidationWarning {
    pub field: String,
    pub message: String,
}

/// Result of configuration validation
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationResult {
    pub valid: bool,
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the project directory
    ///
    /// Returns the default configuration when no config file exists, so the
    /// tool works out of the box with environment tokens alone.
    pub async fn load(options: ConfigLoadOptions) -> Result<PublisherConfig, PublishError> {
        let Some(path) = Self::find_config_file(&options.project_path).await else {
            return Ok(PublisherConfig::default());
        };

        let content = fs::read_to_string(&path).await.map_err(|e| {
            PublishError::ConfigIo {
                message: format!("{}: {}", path.display(), e),
            }
        })?;

        let config = Self::parse(&content, &path)?;
        Ok(Self::expand_env_vars(config, &options.env)?)
    }

    /// Locate the first existing config file in the project directory
    pub async fn find_config_file(project_path: &Path) -> Option<PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let candidate = project_path.join(name);
            if fs::metadata(&candidate).await.is_ok() {
                return Some(candidate);
            }
        }
        None
    }

    /// Parse configuration content by file extension
    fn parse(content: &str, path: &Path) -> Result<PublisherConfig, PublishError> {
        let is_toml = path
            .extension()
            .map(|e| e == "toml")
            .unwrap_or(false);

        if is_toml {
            toml::from_str(content).map_err(|e| PublishError::ConfigInvalid {
                message: e.to_string(),
            })
        } else {
            serde_yaml::from_str(content).map_err(|e| PublishError::ConfigInvalid {
                message: e.to_string(),
            })
        }
    }

    /// Expand `${VAR}` references in every string value of the config
    fn expand_env_vars(
        config: PublisherConfig,
        env: &HashMap<String, String>,
    ) -> Result<PublisherConfig, PublishError> {
        let mut value =
            serde_json::to_value(&config).map_err(|e| PublishError::Internal {
                message: e.to_string(),
            })?;

        Self::expand_value(&mut value, env);

        serde_json::from_value(value).map_err(|e| PublishError::ConfigInvalid {
            message: e.to_string(),
        })
    }

    fn expand_value(value: &mut serde_json::Value, env: &HashMap<String, String>) {
        match value {
            serde_json::Value::String(s) => {
                *s = Self::expand_string(s, env);
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::expand_value(item, env);
                }
            }
            serde_json::Value::Object(map) => {
                for (_, item) in map.iter_mut() {
                    Self::expand_value(item, env);
                }
            }
            _ => {}
        }
    }

    /// Expand `${VAR}` references in a single string
    ///
    /// Unset variables are left verbatim so validation can point at them.
    pub fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        ENV_VAR_RE
            .replace_all(input, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                env.get(name)
                    .cloned()
                    .or_else(|| std::env::var(name).ok())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string()
    }

    /// Validate a loaded configuration
    pub fn validate(config: &PublisherConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if config.version != "1.0" {
            warnings.push(ConfigValidationWarning {
                field: "version".to_string(),
                message: format!("未知のスキーマバージョンです: {}", config.version),
            });
        }

        for platform in PlatformTarget::all() {
            if let Some(api_base) = config.platforms.api_base(platform) {
                if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                    errors.push(ConfigValidationError {
                        field: format!("platforms.{}.apiBase", platform),
                        message: "http(s)のURLを指定してください".to_string(),
                    });
                }
            }
        }

        let instagram_enabled = config.platforms.is_enabled(PlatformTarget::Instagram);
        let instagram_user_id = config
            .platforms
            .instagram
            .as_ref()
            .and_then(|c| c.user_id.as_deref());
        if instagram_enabled && instagram_user_id.is_none() {
            warnings.push(ConfigValidationWarning {
                field: "platforms.instagram.userId".to_string(),
                message: "未設定のためinstagramへの投稿は失敗します".to_string(),
            });
        }
        if let Some(user_id) = instagram_user_id {
            if user_id.contains("${") {
                errors.push(ConfigValidationError {
                    field: "platforms.instagram.userId".to_string(),
                    message: format!("環境変数が未設定です: {}", user_id),
                });
            }
        }

        if let Some(publish) = &config.publish {
            if publish.max_concurrency == Some(0) {
                errors.push(ConfigValidationError {
                    field: "publish.maxConcurrency".to_string(),
                    message: "1以上を指定してください".to_string(),
                });
            }
            if publish.timeout_secs == Some(0) {
                errors.push(ConfigValidationError {
                    field: "publish.timeoutSecs".to_string(),
                    message: "1以上を指定してください".to_string(),
                });
            }
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Render a validation result for console output
    pub fn format_validation_result(result: &ConfigValidationResult) -> String {
        let mut lines = Vec::new();

        for error in &result.errors {
            lines.push(format!("  ❌ [{}] {}", error.field, error.message));
        }
        for warning in &result.warnings {
            lines.push(format!("  ⚠️  [{}] {}", warning.field, warning.message));
        }
        if lines.is_empty() {
            lines.push("  ✅ 設定に問題はありません".to_string());
        }

        lines.join("\n")
    }
}
