use kongstate_core::diagnostics::{CollectingSink, NullSink};
use kongstate_core::override_engine::{OverrideEngine, override_service};
use kongstate_core::service::{ServiceConfig, ServiceOverrideSpec, SourceObject};

fn foo_service(protocol: &str, path: Option<&str>) -> ServiceConfig {
    ServiceConfig {
        host: Some("foo.com".into()),
        port: Some(80),
        name: Some("foo".into()),
        protocol: Some(protocol.into()),
        path: path.map(Into::into),
        ..Default::default()
    }
}

fn source(pairs: &[(&str, &str)]) -> SourceObject {
    let mut src = SourceObject::new("default", "foo");
    for (k, v) in pairs {
        src = src.with_annotation(*k, *v);
    }
    src
}

fn protocol_spec(protocol: &str) -> ServiceOverrideSpec {
    ServiceOverrideSpec {
        protocol: Some(protocol.into()),
        ..Default::default()
    }
}

// =============================================================================
// KongIngress proxy section
// =============================================================================

#[test]
fn test_absent_spec_leaves_service_unchanged() {
    let mut svc = foo_service("http", Some("/"));
    override_service(&NullSink, Some(&mut svc), None, Some(&source(&[])));
    assert_eq!(svc, foo_service("http", Some("/")));
}

#[test]
fn test_empty_spec_leaves_service_unchanged() {
    let mut svc = foo_service("http", Some("/"));
    svc.apply_overrides(&NullSink, Some(&ServiceOverrideSpec::default()), None);
    assert_eq!(svc, foo_service("http", Some("/")));
}

#[test]
fn test_spec_protocol_overrides_base() {
    let mut svc = foo_service("http", Some("/"));
    svc.apply_overrides(&NullSink, Some(&protocol_spec("https")), None);
    assert_eq!(svc, foo_service("https", Some("/")));
}

#[test]
fn test_spec_explicit_zero_retries_applied() {
    let mut svc = foo_service("http", Some("/"));
    let spec = ServiceOverrideSpec {
        retries: Some(0),
        ..Default::default()
    };
    svc.apply_overrides(&NullSink, Some(&spec), None);
    assert_eq!(svc.retries, Some(0));
    assert_eq!(svc.protocol.as_deref(), Some("http"));
    assert_eq!(svc.path.as_deref(), Some("/"));
}

#[test]
fn test_spec_path_and_retries() {
    let mut svc = foo_service("http", Some("/"));
    let spec = ServiceOverrideSpec {
        path: Some("/new-path".into()),
        retries: Some(1),
        ..Default::default()
    };
    svc.apply_overrides(&NullSink, Some(&spec), None);
    assert_eq!(svc.path.as_deref(), Some("/new-path"));
    assert_eq!(svc.retries, Some(1));
}

#[test]
fn test_spec_timeouts() {
    let mut svc = foo_service("http", Some("/"));
    let spec = ServiceOverrideSpec {
        connect_timeout: Some(100),
        read_timeout: Some(100),
        write_timeout: Some(100),
        ..Default::default()
    };
    svc.apply_overrides(&NullSink, Some(&spec), None);
    let mut want = foo_service("http", Some("/"));
    want.connect_timeout = Some(100);
    want.read_timeout = Some(100);
    want.write_timeout = Some(100);
    assert_eq!(svc, want);
}

#[test]
fn test_spec_grpc_keeps_unset_path() {
    let mut svc = foo_service("grpc", None);
    svc.apply_overrides(&NullSink, Some(&protocol_spec("grpc")), None);
    assert_eq!(svc, foo_service("grpc", None));
}

#[test]
fn test_spec_grpcs_clears_existing_path() {
    let mut svc = foo_service("https", Some("/"));
    svc.apply_overrides(&NullSink, Some(&protocol_spec("grpcs")), None);
    assert_eq!(svc, foo_service("grpcs", None));
}

// =============================================================================
// Annotations on top of KongIngress
// =============================================================================

#[test]
fn test_annotation_grpcs_agrees_with_spec() {
    let mut svc = foo_service("https", Some("/"));
    let src = source(&[("konghq.com/protocol", "grpcs")]);
    svc.apply_overrides(&NullSink, Some(&protocol_spec("grpcs")), Some(&src));
    assert_eq!(svc, foo_service("grpcs", None));
}

#[test]
fn test_annotation_grpc_beats_spec_grpcs() {
    let mut svc = foo_service("https", Some("/"));
    let src = source(&[("konghq.com/protocol", "grpc")]);
    svc.apply_overrides(&NullSink, Some(&protocol_spec("grpcs")), Some(&src));
    assert_eq!(svc, foo_service("grpc", None));
}

#[test]
fn test_annotation_grpcs_without_spec_fields() {
    let mut svc = foo_service("https", Some("/"));
    let src = source(&[("konghq.com/protocol", "grpcs")]);
    svc.apply_overrides(&NullSink, Some(&ServiceOverrideSpec::default()), Some(&src));
    assert_eq!(svc, foo_service("grpcs", None));
}

#[test]
fn test_annotation_https_beats_spec_grpcs_and_keeps_path() {
    let mut svc = foo_service("https", Some("/"));
    let src = source(&[("konghq.com/protocol", "https")]);
    svc.apply_overrides(&NullSink, Some(&protocol_spec("grpcs")), Some(&src));
    assert_eq!(svc, foo_service("https", Some("/")));
}

#[test]
fn test_annotation_https_matches_base() {
    let mut svc = foo_service("https", Some("/"));
    let src = source(&[("konghq.com/protocol", "https")]);
    svc.apply_overrides(&NullSink, Some(&ServiceOverrideSpec::default()), Some(&src));
    assert_eq!(svc, foo_service("https", Some("/")));
}

#[test]
fn test_connect_timeout_annotation_on_empty_service() {
    let mut svc = ServiceConfig::default();
    let src = source(&[("konghq.com/connect-timeout", "3000")]);
    svc.apply_overrides(&NullSink, None, Some(&src));
    assert_eq!(
        svc,
        ServiceConfig {
            connect_timeout: Some(3000),
            ..Default::default()
        }
    );
}

#[test]
fn test_unparsable_timeout_is_ignored_with_warning() {
    let sink = CollectingSink::new();
    let mut svc = ServiceConfig::default();
    let src = source(&[("konghq.com/connect-timeout", "not-a-number")]);
    svc.apply_overrides(&sink, None, Some(&src));

    assert_eq!(svc, ServiceConfig::default());
    let diags = sink.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].key, "konghq.com/connect-timeout");
    assert_eq!(diags[0].value, "not-a-number");
}

#[test]
fn test_bad_value_does_not_stop_other_fields() {
    let sink = CollectingSink::new();
    let mut svc = ServiceConfig::default();
    let src = source(&[
        ("konghq.com/connect-timeout", "x"),
        ("konghq.com/read-timeout", "10"),
        ("konghq.com/write-timeout", "y"),
        ("konghq.com/retries", "2"),
    ]);
    svc.apply_overrides(&sink, None, Some(&src));
    assert_eq!(svc.connect_timeout, None);
    assert_eq!(svc.read_timeout, Some(10));
    assert_eq!(svc.write_timeout, None);
    assert_eq!(svc.retries, Some(2));
    assert_eq!(sink.len(), 2);
}

#[test]
fn test_relative_path_annotation_is_ignored() {
    let sink = CollectingSink::new();
    let mut svc = ServiceConfig {
        path: Some("/foo".into()),
        ..Default::default()
    };
    svc.apply_overrides(&sink, None, Some(&source(&[("konghq.com/path", "bar")])));
    assert_eq!(svc.path.as_deref(), Some("/foo"));
    assert!(sink.is_empty());
}

#[test]
fn test_annotation_zero_beats_spec_value() {
    let mut svc = foo_service("http", Some("/"));
    let spec = ServiceOverrideSpec {
        write_timeout: Some(500),
        ..Default::default()
    };
    let src = source(&[("konghq.com/write-timeout", "0")]);
    svc.apply_overrides(&NullSink, Some(&spec), Some(&src));
    assert_eq!(svc.write_timeout, Some(0));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_nil_receiver_never_panics() {
    let engine = OverrideEngine::default();
    let spec = protocol_spec("grpc");
    let src = source(&[("konghq.com/retries", "nope")]);
    engine.override_service(&NullSink, None, None, None);
    engine.override_service(&NullSink, None, Some(&spec), None);
    engine.override_service(&NullSink, None, None, Some(&src));
    engine.override_service(&NullSink, None, Some(&spec), Some(&src));
}

#[test]
fn test_idempotent() {
    let spec = ServiceOverrideSpec {
        protocol: Some("grpcs".into()),
        retries: Some(0),
        ..Default::default()
    };
    let src = source(&[
        ("konghq.com/protocol", "https"),
        ("konghq.com/path", "/v1"),
        ("konghq.com/read-timeout", "bad"),
        ("konghq.com/connect-timeout", "42"),
    ]);

    let mut once = foo_service("http", Some("/"));
    once.apply_overrides(&NullSink, Some(&spec), Some(&src));

    let mut twice = once.clone();
    twice.apply_overrides(&NullSink, Some(&spec), Some(&src));

    assert_eq!(once, twice);
    assert_eq!(once.protocol.as_deref(), Some("https"));
    assert_eq!(once.path.as_deref(), Some("/v1"));
}

#[test]
fn test_grpc_family_never_keeps_path() {
    let protocols = [None, Some("http"), Some("https"), Some("grpc"), Some("grpcs")];
    let paths = [None, Some("/"), Some("/x")];

    for base_protocol in protocols {
        for spec_protocol in protocols {
            for ann_protocol in protocols {
                for spec_path in paths {
                    for ann_path in paths {
                        let mut svc = ServiceConfig {
                            protocol: base_protocol.map(Into::into),
                            path: Some("/base".into()),
                            ..Default::default()
                        };
                        let spec = ServiceOverrideSpec {
                            protocol: spec_protocol.map(Into::into),
                            path: spec_path.map(Into::into),
                            ..Default::default()
                        };
                        let mut src = source(&[]);
                        if let Some(p) = ann_protocol {
                            src = src.with_annotation("konghq.com/protocol", p);
                        }
                        if let Some(p) = ann_path {
                            src = src.with_annotation("konghq.com/path", p);
                        }
                        svc.apply_overrides(&NullSink, Some(&spec), Some(&src));

                        if matches!(svc.protocol.as_deref(), Some("grpc") | Some("grpcs")) {
                            assert_eq!(svc.path, None, "{svc:?}");
                        } else {
                            assert!(svc.path.is_some(), "{svc:?}");
                        }
                    }
                }
            }
        }
    }
}
