use crate::annotations::{AnnotationKeys, DEFAULT_PREFIX};
use crate::override_engine::OverrideEngine;
use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level kongstate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub annotations: AnnotationConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where override annotations live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Key prefix, e.g. `konghq.com` → `konghq.com/retries`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_prefix() -> String { DEFAULT_PREFIX.into() }
fn default_log_level() -> String { "info".into() }

// ── Impls ─────────────────────────────────────────────────────

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self { prefix: default_prefix() }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl EngineConfig {
    /// Load configuration from YAML file + env overrides (`KONGSTATE_LOG__LEVEL=debug`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: EngineConfig = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("KONGSTATE_").split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn annotation_keys(&self) -> AnnotationKeys {
        AnnotationKeys::with_prefix(&self.annotations.prefix)
    }

    /// Engine reading the configured annotation keys.
    pub fn engine(&self) -> OverrideEngine {
        OverrideEngine::new(self.annotation_keys())
    }
}
