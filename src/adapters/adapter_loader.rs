//! Adapter Loader - Resolves platforms to adapter instances
//!
//! Maps each platform enum variant to its adapter, wired with the loaded
//! configuration, and reports which platforms are ready to publish
//! (enabled in config with a token present in the environment).
//!
//! # Example
//!
//! ```
//! use social_publisher::adapters::AdapterLoader;
//! use social_publisher::core::{PlatformTarget, PublisherConfig};
//!
//! let loader = AdapterLoader::new(PublisherConfig::default());
//! let adapter = loader.load_adapter(PlatformTarget::X);
//! assert_eq!(adapter.platform(), PlatformTarget::X);
//! ```

use crate::adapters::instagram_adapter::InstagramAdapter;
use crate::adapters::tiktok_adapter::TiktokAdapter;
use crate::adapters::x_adapter::XAdapter;
use crate::adapters::youtube_adapter::YoutubeAdapter;
use crate::core::config::PublisherConfig;
use crate::core::request::PlatformTarget;
use crate::core::traits::PublishAdapter;
use crate::security::token_manager::SecureTokenManager;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Readiness report for one platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPlatform {
    pub platform: PlatformTarget,
    pub enabled: bool,
    #[serde(rename = "tokenPresent")]
    pub token_present: bool,
    #[serde(rename = "tokenEnv")]
    pub token_env: String,
}

impl DetectedPlatform {
    /// Ready means enabled in config with a token in the environment
    pub fn is_ready(&self) -> bool {
        self.enabled && self.token_present
    }
}

/// Loader for platform adapters
pub struct AdapterLoader {
    config: PublisherConfig,
    tokens: SecureTokenManager,
}

impl AdapterLoader {
    /// Create a new adapter loader from the loaded configuration
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            tokens: SecureTokenManager::new(),
        }
    }

    /// Build the adapter for a platform, wired with its configuration
    pub fn load_adapter(&self, platform: PlatformTarget) -> Arc<dyn PublishAdapter> {
        let platforms = &self.config.platforms;
        match platform {
            PlatformTarget::X => {
                let mut adapter = XAdapter::new();
                if let Some(base) = platforms.api_base(platform) {
                    adapter = adapter.with_api_base(base);
                }
                Arc::new(adapter)
            }
            PlatformTarget::Instagram => {
                let mut adapter = InstagramAdapter::new();
                if let Some(base) = platforms.api_base(platform) {
                    adapter = adapter.with_api_base(base);
                }
                if let Some(user_id) = platforms
                    .instagram
                    .as_ref()
                    .and_then(|c| c.user_id.as_deref())
                {
                    adapter = adapter.with_user_id(user_id);
                }
                Arc::new(adapter)
            }
            PlatformTarget::Tiktok => {
                let mut adapter = TiktokAdapter::new();
                if let Some(base) = platforms.api_base(platform) {
                    adapter = adapter.with_api_base(base);
                }
                if let Some(privacy) =
                    platforms.tiktok.as_ref().and_then(|c| c.privacy_level)
                {
                    adapter = adapter.with_privacy(privacy);
                }
                Arc::new(adapter)
            }
            PlatformTarget::Youtube => {
                let mut adapter = YoutubeAdapter::new();
                if let Some(base) = platforms.api_base(platform) {
                    adapter = adapter.with_api_base(base);
                }
                if let Some(config) = &platforms.youtube {
                    if let Some(category_id) = &config.category_id {
                        adapter = adapter.with_category_id(category_id);
                    }
                    if let Some(privacy) = config.privacy_status {
                        adapter = adapter.with_privacy(privacy);
                    }
                }
                Arc::new(adapter)
            }
        }
    }

    /// Adapters for the enabled platforms among the given targets
    ///
    /// A target disabled in config is simply absent from the map; the
    /// orchestrator reports it as an isolated failure result.
    pub fn adapters_for(
        &self,
        targets: &[PlatformTarget],
    ) -> HashMap<PlatformTarget, Arc<dyn PublishAdapter>> {
        targets
            .iter()
            .filter(|platform| self.config.platforms.is_enabled(**platform))
            .map(|platform| (*platform, self.load_adapter(*platform)))
            .collect()
    }

    /// Readiness report over all supported platforms
    pub fn detect_platforms(&self) -> Vec<DetectedPlatform> {
        PlatformTarget::all()
            .into_iter()
            .map(|platform| DetectedPlatform {
                platform,
                enabled: self.config.platforms.is_enabled(platform),
                token_present: self.tokens.has_token(platform),
                token_env: SecureTokenManager::token_env(platform).to_string(),
            })
            .collect()
    }
}
