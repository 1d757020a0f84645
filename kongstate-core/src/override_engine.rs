//! Override cascade for Kong services.
//!
//! Order is fixed: KongIngress `proxy` fields, then annotations on the source
//! object, then the protocol/path rule. Later stages win over earlier ones.

use crate::annotations::{self, AnnotationKeys, AnnotationSet};
use crate::diagnostics::DiagnosticSink;
use crate::protocol;
use crate::service::{KongIngress, Service, ServiceConfig, ServiceOverrideSpec, SourceObject};
use tracing::debug;

/// Stateless driver of the cascade. Holds only the annotation keys to read.
#[derive(Debug, Clone, Default)]
pub struct OverrideEngine {
    keys: AnnotationKeys,
}

impl OverrideEngine {
    pub fn new(keys: AnnotationKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &AnnotationKeys {
        &self.keys
    }

    /// Resolve `target` in place from `spec` and `source`.
    ///
    /// No-op when `target` is `None` or when both inputs are `None`.
    pub fn override_service(
        &self,
        sink: &dyn DiagnosticSink,
        target: Option<&mut ServiceConfig>,
        spec: Option<&ServiceOverrideSpec>,
        source: Option<&SourceObject>,
    ) {
        let Some(target) = target else {
            return;
        };
        if spec.is_none() && source.is_none() {
            return;
        }

        match spec {
            Some(spec) if !spec.is_empty() => target.override_by_spec(spec),
            Some(_) => debug!("KongIngress proxy section sets no fields"),
            None => debug!("No KongIngress proxy section, skipping"),
        }
        match source {
            Some(source) => target.override_by_annotations(sink, &self.keys, &source.annotations),
            None => debug!("No source object, skipping annotations"),
        }
        target.enforce_protocol_path();
    }

    /// Apply a KongIngress to every source object associated with `service`.
    ///
    /// A KongIngress without a `proxy` section counts as no override. With no
    /// associated sources, the override still runs once without annotations.
    pub fn override_all(
        &self,
        sink: &dyn DiagnosticSink,
        service: &mut Service,
        kong_ingress: Option<&KongIngress>,
    ) {
        let spec = kong_ingress.and_then(|ki| ki.proxy.as_ref());
        if service.k8s_services.is_empty() {
            self.override_service(sink, Some(&mut service.config), spec, None);
            return;
        }
        for (key, source) in &service.k8s_services {
            debug!(source = %key, "Applying overrides");
            self.override_service(sink, Some(&mut service.config), spec, Some(source));
        }
    }
}

/// Free-function form using the default `konghq.com` keys.
pub fn override_service(
    sink: &dyn DiagnosticSink,
    target: Option<&mut ServiceConfig>,
    spec: Option<&ServiceOverrideSpec>,
    source: Option<&SourceObject>,
) {
    OverrideEngine::default().override_service(sink, target, spec, source);
}

impl ServiceConfig {
    /// Run the full cascade with the default annotation keys.
    pub fn apply_overrides(
        &mut self,
        sink: &dyn DiagnosticSink,
        spec: Option<&ServiceOverrideSpec>,
        source: Option<&SourceObject>,
    ) {
        override_service(sink, Some(self), spec, source);
    }

    /// Copy every field `spec` sets. Explicit zeroes count as set.
    pub fn override_by_spec(&mut self, spec: &ServiceOverrideSpec) {
        if let Some(protocol) = &spec.protocol {
            self.protocol = Some(protocol.clone());
        }
        if let Some(path) = &spec.path {
            self.path = Some(path.clone());
        }
        if spec.retries.is_some() {
            self.retries = spec.retries;
        }
        if spec.connect_timeout.is_some() {
            self.connect_timeout = spec.connect_timeout;
        }
        if spec.read_timeout.is_some() {
            self.read_timeout = spec.read_timeout;
        }
        if spec.write_timeout.is_some() {
            self.write_timeout = spec.write_timeout;
        }
    }

    /// All annotation-driven overrides, in a fixed order.
    pub fn override_by_annotations(
        &mut self,
        sink: &dyn DiagnosticSink,
        keys: &AnnotationKeys,
        anns: &AnnotationSet,
    ) {
        self.override_protocol(keys, anns);
        self.override_path(keys, anns);
        self.override_connect_timeout(sink, keys, anns);
        self.override_read_timeout(sink, keys, anns);
        self.override_write_timeout(sink, keys, anns);
        self.override_retries(sink, keys, anns);
    }

    pub fn override_protocol(&mut self, keys: &AnnotationKeys, anns: &AnnotationSet) {
        if let Some(protocol) = annotations::extract_protocol(keys, anns) {
            self.protocol = Some(protocol.to_string());
        }
    }

    pub fn override_path(&mut self, keys: &AnnotationKeys, anns: &AnnotationSet) {
        if let Some(path) = annotations::extract_path(keys, anns) {
            self.path = Some(path.to_string());
        }
    }

    pub fn override_connect_timeout(
        &mut self,
        sink: &dyn DiagnosticSink,
        keys: &AnnotationKeys,
        anns: &AnnotationSet,
    ) {
        if let Some(v) = annotations::extract_connect_timeout(sink, keys, anns) {
            self.connect_timeout = Some(v);
        }
    }

    pub fn override_read_timeout(
        &mut self,
        sink: &dyn DiagnosticSink,
        keys: &AnnotationKeys,
        anns: &AnnotationSet,
    ) {
        if let Some(v) = annotations::extract_read_timeout(sink, keys, anns) {
            self.read_timeout = Some(v);
        }
    }

    pub fn override_write_timeout(
        &mut self,
        sink: &dyn DiagnosticSink,
        keys: &AnnotationKeys,
        anns: &AnnotationSet,
    ) {
        if let Some(v) = annotations::extract_write_timeout(sink, keys, anns) {
            self.write_timeout = Some(v);
        }
    }

    pub fn override_retries(
        &mut self,
        sink: &dyn DiagnosticSink,
        keys: &AnnotationKeys,
        anns: &AnnotationSet,
    ) {
        if let Some(v) = annotations::extract_retries(sink, keys, anns) {
            self.retries = Some(v);
        }
    }

    /// Clear `path` when the final protocol is grpc or grpcs.
    pub fn enforce_protocol_path(&mut self) {
        if !protocol::path_allowed(self.protocol.as_deref()) && self.path.is_some() {
            debug!(protocol = ?self.protocol, path = ?self.path, "Clearing path on gRPC service");
            self.path = None;
        }
    }
}
