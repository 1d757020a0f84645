pub mod annotations;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod override_engine;
pub mod protocol;
pub mod service;

pub use annotations::{AnnotationKeys, AnnotationSet};
pub use config::EngineConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use document::OverrideDocument;
pub use error::{AnnotationError, KongStateError};
pub use override_engine::{OverrideEngine, override_service};
pub use service::{KongIngress, ObjectMeta, Service, ServiceConfig, ServiceOverrideSpec, SourceObject};
