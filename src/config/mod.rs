//! Settings for the `mg` CLI.
//!
//! Settings load from a TOML file at `~/.config/mindgraph/config.toml`
//! (or the platform equivalent), with environment variables taking
//! precedence over the file and built-in defaults filling the rest:
//!
//! ```toml
//! theme = "rainbow"
//! layout = "concentric"
//! background = "midnight"
//!
//! [api]
//! base_url = "https://api.example.com/v1"
//! model = "gpt-4o-mini"
//! key_env = "MG_API_KEY"
//! ```
//!
//! Precedence: env var > config file > defaults. The API key itself never
//! lives in the file; `api.key_env` names the environment variable that
//! holds it.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::Result;
use crate::view::reveal::RevealConfig;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "MG_CONFIG";

/// Provider connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub key_env: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            key_env: "MG_API_KEY".to_string(),
        }
    }
}

/// Optional overrides of the reveal animation timings.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RevealSettings {
    pub node_delay_ms: Option<u64>,
    pub edge_delay_ms: Option<u64>,
    pub settle_buffer_ms: Option<u64>,
    pub pulse_duration_ms: Option<u64>,
}

/// Resolved settings for a run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Default theme name.
    pub theme: String,
    /// Default layout name.
    pub layout: String,
    /// Default background name.
    pub background: String,
    /// Provider settings.
    pub api: ApiSettings,
    /// Reveal timing overrides.
    pub reveal: RevealSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            layout: "force".to_string(),
            background: "snow".to_string(),
            api: ApiSettings::default(),
            reveal: RevealSettings::default(),
        }
    }
}

impl Settings {
    /// Resolved config file path: `MG_CONFIG` override or the platform
    /// config directory.
    pub fn path() -> Option<PathBuf> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|d| d.join("mindgraph").join("config.toml")),
        }
    }

    /// Load settings with full precedence resolution.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading settings file");
                toml::from_str(&fs::read_to_string(&path)?)?
            }
            _ => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Apply environment overrides on top of the current values.
    fn apply_env(&mut self) {
        for (var, slot) in [
            ("MG_THEME", &mut self.theme),
            ("MG_LAYOUT", &mut self.layout),
            ("MG_BACKGROUND", &mut self.background),
            ("MG_API_BASE_URL", &mut self.api.base_url),
            ("MG_API_MODEL", &mut self.api.model),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    /// The API key, read from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api.key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Reveal timings with the configured overrides applied.
    pub fn reveal_config(&self) -> RevealConfig {
        let defaults = RevealConfig::default();
        RevealConfig {
            node_delay_ms: self.reveal.node_delay_ms.unwrap_or(defaults.node_delay_ms),
            edge_delay_ms: self.reveal.edge_delay_ms.unwrap_or(defaults.edge_delay_ms),
            settle_buffer_ms: self
                .reveal
                .settle_buffer_ms
                .unwrap_or(defaults.settle_buffer_ms),
            pulse_duration_ms: self
                .reveal
                .pulse_duration_ms
                .unwrap_or(defaults.pulse_duration_ms),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, "default");
        assert_eq!(settings.layout, "force");
        assert_eq!(settings.background, "snow");
        assert_eq!(settings.api.key_env, "MG_API_KEY");
    }

    #[test]
    fn test_reveal_overrides_apply() {
        let settings: Settings = toml::from_str(
            r#"
            [reveal]
            node_delay_ms = 50
            "#,
        )
        .unwrap();

        let config = settings.reveal_config();
        assert_eq!(config.node_delay_ms, 50);
        assert_eq!(
            config.edge_delay_ms,
            crate::view::reveal::RevealConfig::default().edge_delay_ms
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            theme = "rainbow"

            [api]
            model = "custom-model"
            "#,
        )
        .unwrap();

        assert_eq!(settings.theme, "rainbow");
        assert_eq!(settings.layout, "force");
        assert_eq!(settings.api.model, "custom-model");
        assert_eq!(settings.api.base_url, ApiSettings::default().base_url);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        // SAFETY: serialized test; no other thread reads the environment
        // while these vars are set.
        unsafe {
            std::env::set_var("MG_THEME", "neon");
            std::env::set_var("MG_LAYOUT", "grid");
        }

        let mut settings: Settings = toml::from_str(r#"theme = "rainbow""#).unwrap();
        settings.apply_env();

        assert_eq!(settings.theme, "neon");
        assert_eq!(settings.layout, "grid");

        unsafe {
            std::env::remove_var("MG_THEME");
            std::env::remove_var("MG_LAYOUT");
        }
    }

    #[test]
    #[serial]
    fn test_api_key_from_named_env() {
        let settings = Settings {
            api: ApiSettings {
                key_env: "MG_TEST_KEY_VAR".to_string(),
                ..ApiSettings::default()
            },
            ..Settings::default()
        };

        assert!(settings.api_key().is_none());
        unsafe {
            std::env::set_var("MG_TEST_KEY_VAR", "sk-test");
        }
        assert_eq!(settings.api_key().as_deref(), Some("sk-test"));
        unsafe {
            std::env::remove_var("MG_TEST_KEY_VAR");
        }
    }
}
