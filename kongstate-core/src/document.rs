use crate::diagnostics::DiagnosticSink;
use crate::error::KongStateError;
use crate::override_engine::OverrideEngine;
use crate::service::{KongIngress, Service, ServiceConfig, SourceObject};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Offline input: a base service, an optional KongIngress and the objects
/// whose annotations apply to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideDocument {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub kong_ingress: Option<KongIngress>,

    #[serde(default)]
    pub sources: Vec<SourceObject>,
}

impl OverrideDocument {
    /// Read a document; `.json` is parsed as JSON, `.yaml`/`.yml` as YAML.
    pub fn load(path: &Path) -> Result<Self, KongStateError> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&raw),
            Some("yaml") | Some("yml") => Self::from_yaml(&raw),
            other => Err(KongStateError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, KongStateError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, KongStateError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn to_service(&self) -> Service {
        let mut service = Service::new(self.service.clone());
        service.namespace = self.namespace.clone();
        for source in &self.sources {
            service.add_source(source.clone());
        }
        service
    }

    /// Run the cascade and return the resolved configuration.
    pub fn resolve(&self, engine: &OverrideEngine, sink: &dyn DiagnosticSink) -> ServiceConfig {
        let mut service = self.to_service();
        engine.override_all(sink, &mut service, self.kong_ingress.as_ref());
        service.config
    }
}
