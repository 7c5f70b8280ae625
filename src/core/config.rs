//! Configuration structures and types for social-publisher
//!
//! This module provides type-safe configuration management with serde support.

use crate::core::request::PlatformTarget;
use serde::{Deserialize, Serialize};

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublisherConfig {
    /// Schema version (required)
    pub version: String,

    /// Project basic information (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectConfig>,

    /// Platform-specific configurations
    #[serde(default)]
    pub platforms: PlatformConfigs,

    /// Security settings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityConfig>,

    /// Publish options (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishOptionsConfig>,
}

/// Project basic information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Project name used in console output (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Platforms used when the caller does not pass a target list
    #[serde(skip_serializing_if = "Option::is_none", rename = "defaultTargets")]
    pub default_targets: Option<Vec<PlatformTarget>>,
}

/// Platform configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlatformConfigs {
    /// X (Twitter) configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<XPlatformConfig>,

    /// Instagram configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<InstagramPlatformConfig>,

    /// TikTok configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<TiktokPlatformConfig>,

    /// YouTube configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YoutubePlatformConfig>,
}

impl PlatformConfigs {
    /// Whether a platform is enabled
    ///
    /// A platform with no config block is enabled by default so the tool
    /// works out of the box with environment tokens alone; an explicit
    /// `enabled: false` switches it off.
    pub fn is_enabled(&self, platform: PlatformTarget) -> bool {
        let flag = match platform {
            PlatformTarget::X => self.x.as_ref().and_then(|c| c.enabled),
            PlatformTarget::Instagram => self.instagram.as_ref().and_then(|c| c.enabled),
            PlatformTarget::Tiktok => self.tiktok.as_ref().and_then(|c| c.enabled),
            PlatformTarget::Youtube => self.youtube.as_ref().and_then(|c| c.enabled),
        };
        flag.unwrap_or(true)
    }

    /// API base override for a platform, if configured
    pub fn api_base(&self, platform: PlatformTarget) -> Option<&str> {
        match platform {
            PlatformTarget::X => self.x.as_ref().and_then(|c| c.api_base.as_deref()),
            PlatformTarget::Instagram => {
                self.instagram.as_ref().and_then(|c| c.api_base.as_deref())
            }
            PlatformTarget::Tiktok => self.tiktok.as_ref().and_then(|c| c.api_base.as_deref()),
            PlatformTarget::Youtube => self.youtube.as_ref().and_then(|c| c.api_base.as_deref()),
        }
    }
}

/// X (Twitter) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct XPlatformConfig {
    /// Enable this platform (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// API base URL override (default: https://api.x.com)
    #[serde(skip_serializing_if = "Option::is_none", rename = "apiBase")]
    pub api_base: Option<String>,
}

/// Instagram configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InstagramPlatformConfig {
    /// Enable this platform (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Instagram business account id (required for publishing)
    #[serde(skip_serializing_if = "Option::is_none", rename = "userId")]
    pub user_id: Option<String>,

    /// API base URL override (default: https://graph.facebook.com/v21.0)
    #[serde(skip_serializing_if = "Option::is_none", rename = "apiBase")]
    pub api_base: Option<String>,
}

/// TikTok configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TiktokPlatformConfig {
    /// Enable this platform (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Post visibility (default: public)
    #[serde(skip_serializing_if = "Option::is_none", rename = "privacyLevel")]
    pub privacy_level: Option<TiktokPrivacy>,

    /// API base URL override (default: https://open.tiktokapis.com)
    #[serde(skip_serializing_if = "Option::is_none", rename = "apiBase")]
    pub api_base: Option<String>,
}

/// TikTok post visibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TiktokPrivacy {
    Public,
    Friends,
    Private,
}

impl TiktokPrivacy {
    /// Wire value expected by the TikTok content posting API
    pub fn as_wire(&self) -> &'static str {
        match self {
            TiktokPrivacy::Public => "PUBLIC_TO_EVERYONE",
            TiktokPrivacy::Friends => "MUTUAL_FOLLOW_FRIENDS",
            TiktokPrivacy::Private => "SELF_ONLY",
        }
    }
}

/// YouTube configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct YoutubePlatformConfig {
    /// Enable this platform (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Video category id (default: "22", People & Blogs)
    #[serde(skip_serializing_if = "Option::is_none", rename = "categoryId")]
    pub category_id: Option<String>,

    /// Upload visibility (default: public)
    #[serde(skip_serializing_if = "Option::is_none", rename = "privacyStatus")]
    pub privacy_status: Option<YoutubePrivacy>,

    /// API base URL override (default: https://www.googleapis.com/upload/youtube/v3)
    #[serde(skip_serializing_if = "Option::is_none", rename = "apiBase")]
    pub api_base: Option<String>,
}

/// YouTube upload visibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum YoutubePrivacy {
    Public,
    Unlisted,
    Private,
}

impl YoutubePrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            YoutubePrivacy::Public => "public",
            YoutubePrivacy::Unlisted => "unlisted",
            YoutubePrivacy::Private => "private",
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityConfig {
    /// Caption leak scanning settings
    #[serde(skip_serializing_if = "Option::is_none", rename = "captionScanning")]
    pub caption_scanning: Option<CaptionScanningConfig>,
}

/// Caption leak scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionScanningConfig {
    /// Enable caption scanning before publishing (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Publish options configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishOptionsConfig {
    /// Maximum concurrent platform calls (default: 4)
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxConcurrency")]
    pub max_concurrency: Option<usize>,

    /// Overall publish deadline in seconds (default: 60)
    #[serde(skip_serializing_if = "Option::is_none", rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,

    /// Dispatch platforms one at a time (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequential: Option<bool>,

    /// Confirm before publish in interactive mode (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<bool>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            project: None,
            platforms: PlatformConfigs::default(),
            security: Some(SecurityConfig::default()),
            publish: Some(PublishOptionsConfig::default()),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            caption_scanning: Some(CaptionScanningConfig {
                enabled: Some(true),
            }),
        }
    }
}

impl Default for PublishOptionsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Some(4),
            timeout_secs: Some(60),
            sequential: Some(false),
            confirm: Some(true),
        }
    }
}

impl PublisherConfig {
    /// Whether caption scanning is enabled
    pub fn caption_scanning_enabled(&self) -> bool {
        self.security
            .as_ref()
            .and_then(|s| s.caption_scanning.as_ref())
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PublisherConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.security.is_some());
        assert!(config.publish.is_some());
        assert!(config.caption_scanning_enabled());
    }

    #[test]
    fn test_platform_enabled_by_default() {
        let config = PublisherConfig::default();
        for platform in PlatformTarget::all() {
            assert!(config.platforms.is_enabled(platform));
        }
    }

    #[test]
    fn test_platform_explicitly_disabled() {
        let mut config = PublisherConfig::default();
        config.platforms.tiktok = Some(TiktokPlatformConfig {
            enabled: Some(false),
            ..TiktokPlatformConfig::default()
        });

        assert!(!config.platforms.is_enabled(PlatformTarget::Tiktok));
        assert!(config.platforms.is_enabled(PlatformTarget::X));
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let yaml = r#"
version: "1.0"
platforms:
  instagram:
    userId: "17841400000000000"
"#;
        let config: PublisherConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config
                .platforms
                .instagram
                .as_ref()
                .and_then(|c| c.user_id.as_deref()),
            Some("17841400000000000")
        );
    }

    #[test]
    fn test_deserialize_toml_config() {
        let text = r#"
version = "1.0"

[platforms.youtube]
privacyStatus = "unlisted"
categoryId = "24"
"#;
        let config: PublisherConfig = toml::from_str(text).unwrap();
        let youtube = config.platforms.youtube.unwrap();
        assert_eq!(youtube.privacy_status, Some(YoutubePrivacy::Unlisted));
        assert_eq!(youtube.category_id.as_deref(), Some("24"));
    }

    #[test]
    fn test_tiktok_privacy_wire_values() {
        assert_eq!(TiktokPrivacy::Public.as_wire(), "PUBLIC_TO_EVERYONE");
        assert_eq!(TiktokPrivacy::Private.as_wire(), "SELF_ONLY");
    }

    #[test]
    fn test_api_base_override() {
        let yaml = r#"
version: "1.0"
platforms:
  x:
    apiBase: "http://localhost:8080"
"#;
        let config: PublisherConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.platforms.api_base(PlatformTarget::X),
            Some("http://localhost:8080")
        );
        assert_eq!(config.platforms.api_base(PlatformTarget::Youtube), None);
    }

    #[test]
    fn test_default_targets_deserialization() {
        let yaml = r#"
version: "1.0"
project:
  name: spring-campaign
  defaultTargets: [x, youtube]
"#;
        let config: PublisherConfig = serde_yaml::from_str(yaml).unwrap();
        let targets = config.project.unwrap().default_targets.unwrap();
        assert_eq!(targets, vec![PlatformTarget::X, PlatformTarget::Youtube]);
    }

    #[test]
    fn test_serialize_config_camel_case() {
        let config = PublisherConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("captionScanning"));
        assert!(yaml.contains("maxConcurrency"));
    }
}
