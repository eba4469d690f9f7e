// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicServiceConfig {
    /// Base URL of the music service, with trailing slash. Unset means no live service.
    pub url: Option<String>,
    /// Sent verbatim as the `Authorization` header.
    pub auth: String,
    pub timeout_secs: u64,
}

impl MusicServiceConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

impl Default for MusicServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            auth: "test".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub music: MusicServiceConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: MUSICSVC_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let config: AppConfig = figment(config_path).extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}

fn figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(Env::prefixed("MUSICSVC_").split("__"))
}
