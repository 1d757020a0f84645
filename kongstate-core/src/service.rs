use crate::annotations::AnnotationSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proxy-facing settings of one Kong service, Admin API shaped.
///
/// Every field is tri-state: `None` means "not set", `Some(0)` is a real
/// value and overrides whatever came before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,

    /// `http`, `https`, `grpc` or `grpcs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<i64>,

    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<i64>,

    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
}

/// The `proxy` section of a KongIngress resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverrideSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout: Option<i64>,
}

impl ServiceOverrideSpec {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Minimal object metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub annotations: AnnotationSet,
}

/// KongIngress custom resource. Only the `proxy` section matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KongIngress {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ServiceOverrideSpec>,
}

/// An object whose annotations feed the override cascade, typically the
/// Kubernetes Service backing a Kong service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub annotations: AnnotationSet,
}

impl SourceObject {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            annotations: AnnotationSet::new(),
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// `namespace/name`, used to key sources on a [`Service`].
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// A Kong service together with the Kubernetes objects it was built from.
///
/// The sources are only read for their annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(flatten)]
    pub config: ServiceConfig,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub k8s_services: BTreeMap<String, SourceObject>,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Associate a source object, replacing any previous one with the same key.
    pub fn add_source(&mut self, source: SourceObject) {
        self.k8s_services.insert(source.key(), source);
    }
}
