use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::AnnotationError;
use crate::protocol::Protocol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotations of a Kubernetes object: key → raw value.
pub type AnnotationSet = BTreeMap<String, String>;

pub const DEFAULT_PREFIX: &str = "konghq.com";

pub const PROTOCOL_SUFFIX: &str = "protocol";
pub const PATH_SUFFIX: &str = "path";
pub const CONNECT_TIMEOUT_SUFFIX: &str = "connect-timeout";
pub const READ_TIMEOUT_SUFFIX: &str = "read-timeout";
pub const WRITE_TIMEOUT_SUFFIX: &str = "write-timeout";
pub const RETRIES_SUFFIX: &str = "retries";

/// Fully qualified annotation keys consumed by the override cascade.
///
/// Built from a prefix (default `konghq.com`), e.g. `konghq.com/retries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationKeys {
    pub protocol: String,
    pub path: String,
    pub connect_timeout: String,
    pub read_timeout: String,
    pub write_timeout: String,
    pub retries: String,
}

impl AnnotationKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        let key = |suffix: &str| format!("{prefix}/{suffix}");
        Self {
            protocol: key(PROTOCOL_SUFFIX),
            path: key(PATH_SUFFIX),
            connect_timeout: key(CONNECT_TIMEOUT_SUFFIX),
            read_timeout: key(READ_TIMEOUT_SUFFIX),
            write_timeout: key(WRITE_TIMEOUT_SUFFIX),
            retries: key(RETRIES_SUFFIX),
        }
    }
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Parse a base-10 integer annotation.
///
/// Missing key → `None`, silently. Unparsable value → `None` plus a warning
/// on `sink` naming the key and raw value.
pub fn parse_int(sink: &dyn DiagnosticSink, annotations: &AnnotationSet, key: &str) -> Option<i64> {
    let raw = annotations.get(key)?;
    match try_parse_int(key, raw) {
        Ok(v) => Some(v),
        Err(err) => {
            sink.warn(Diagnostic::from(&err));
            None
        }
    }
}

fn try_parse_int(key: &str, raw: &str) -> Result<i64, AnnotationError> {
    raw.parse::<i64>().map_err(|source| AnnotationError::InvalidInteger {
        key: key.to_string(),
        value: raw.to_string(),
        source,
    })
}

/// Protocol annotation, if present and non-empty.
///
/// Names outside `http|https|grpc|grpcs` are still returned.
pub fn extract_protocol<'a>(keys: &AnnotationKeys, annotations: &'a AnnotationSet) -> Option<&'a str> {
    let raw = non_empty(annotations, &keys.protocol)?;
    let protocol = Protocol::parse(raw);
    if !protocol.is_known() {
        tracing::debug!(key = %keys.protocol, protocol = %protocol, "Unrecognised protocol annotation");
    }
    Some(raw)
}

/// Path annotation, if present, non-empty and rooted at `/`.
pub fn extract_path<'a>(keys: &AnnotationKeys, annotations: &'a AnnotationSet) -> Option<&'a str> {
    let raw = non_empty(annotations, &keys.path)?;
    match check_path(&keys.path, raw) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::debug!(error = %err, "Ignoring path annotation");
            None
        }
    }
}

fn check_path<'a>(key: &str, raw: &'a str) -> Result<&'a str, AnnotationError> {
    if raw.starts_with('/') {
        Ok(raw)
    } else {
        Err(AnnotationError::InvalidPath {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }
}

pub fn extract_connect_timeout(
    sink: &dyn DiagnosticSink,
    keys: &AnnotationKeys,
    annotations: &AnnotationSet,
) -> Option<i64> {
    parse_int(sink, annotations, &keys.connect_timeout)
}

pub fn extract_read_timeout(
    sink: &dyn DiagnosticSink,
    keys: &AnnotationKeys,
    annotations: &AnnotationSet,
) -> Option<i64> {
    parse_int(sink, annotations, &keys.read_timeout)
}

pub fn extract_write_timeout(
    sink: &dyn DiagnosticSink,
    keys: &AnnotationKeys,
    annotations: &AnnotationSet,
) -> Option<i64> {
    parse_int(sink, annotations, &keys.write_timeout)
}

pub fn extract_retries(
    sink: &dyn DiagnosticSink,
    keys: &AnnotationKeys,
    annotations: &AnnotationSet,
) -> Option<i64> {
    parse_int(sink, annotations, &keys.retries)
}

fn non_empty<'a>(annotations: &'a AnnotationSet, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
