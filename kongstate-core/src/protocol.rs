use std::fmt;

/// Upstream protocol of a Kong service.
///
/// Names are matched exactly (lowercase). Anything outside the four known
/// names is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
    Grpc,
    Grpcs,
    Other(String),
}

/// Grouping that governs whether a service path is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    Http,
    Grpc,
    Unknown,
}

impl Protocol {
    pub fn parse(name: &str) -> Self {
        match name {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            "grpc" => Protocol::Grpc,
            "grpcs" => Protocol::Grpcs,
            other => Protocol::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Grpc => "grpc",
            Protocol::Grpcs => "grpcs",
            Protocol::Other(s) => s,
        }
    }

    pub fn family(&self) -> ProtocolFamily {
        match self {
            Protocol::Http | Protocol::Https => ProtocolFamily::Http,
            Protocol::Grpc | Protocol::Grpcs => ProtocolFamily::Grpc,
            Protocol::Other(_) => ProtocolFamily::Unknown,
        }
    }

    /// True for one of the four protocol names Kong accepts on this channel.
    pub fn is_known(&self) -> bool {
        !matches!(self, Protocol::Other(_))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a service with the given protocol may carry a path.
///
/// Kong rejects a path on grpc/grpcs services. Unset, empty and unrecognised
/// protocols allow one.
pub fn path_allowed(protocol: Option<&str>) -> bool {
    match protocol {
        Some(name) => Protocol::parse(name).family() != ProtocolFamily::Grpc,
        None => true,
    }
}
