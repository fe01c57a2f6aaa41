pub mod resolver;

use std::fmt;

pub use resolver::{probe_in_order, resolve, visiting_order};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateEndpoint {
    pub host: String,
    pub port: u16,
}

impl CandidateEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for CandidateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Base URL chosen for the session. Only the resolver creates one from a
/// candidate whose probe succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAddress(String);

impl BaseAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, path: &str) -> String {
        let base = self.0.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub(crate) fn from_candidate(candidate: &CandidateEndpoint) -> Self {
        Self(candidate.base_url())
    }

    /// For callers that already know the service address and skip probing.
    pub fn assume_reachable(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
