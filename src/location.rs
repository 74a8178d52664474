// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Routing model handed to the proxy configuration renderer.
//!
//! A [`Location`] describes how one `Ingress` path is served. It is created fresh
//! for each path during translation, mutated in place by
//! [`merge_location_annotations`](crate::merge::merge_location_annotations) and then
//! passed on to rendering. [`SslCert`], [`Backend`] and [`Endpoint`] are the
//! read-only collaborators that accompany it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a location must reject all traffic, and why.
///
/// A denied location answers every request with an error instead of proxying it.
/// The reason is carried through the extracted annotation map under the
/// [`DENIED_KEY_NAME`](crate::constants::DENIED_KEY_NAME) key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Denied {
    /// Traffic is routed normally
    #[default]
    Allowed,
    /// Traffic is rejected for the given reason
    Reason(String),
}

impl Denied {
    /// Build a denial from any error-like value.
    pub fn because(reason: impl fmt::Display) -> Self {
        Self::Reason(reason.to_string())
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Reason(_))
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Reason(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Reason(reason) => write!(f, "denied: {reason}"),
        }
    }
}

/// TLS certificate loaded from a secret by the certificate store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCert {
    /// Path of the PEM file written for the proxy
    pub pem_file_name: String,
    /// SHA-1 checksum of the PEM file contents
    pub pem_sha: String,
    /// Common names and subject alternative names, possibly with a leading `*` label
    pub cn: Vec<String>,
}

/// One upstream server address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub address: String,
    pub port: String,
}

/// A named group of upstream servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
    /// Reach the endpoints over HTTPS
    pub secure: bool,
}

/// URI rewriting and HTTPS redirection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewrite {
    /// Target URI replacing the matched path; empty means no rewrite
    pub target: String,
    pub add_base_url: bool,
    pub ssl_redirect: bool,
    pub force_ssl_redirect: bool,
    pub app_root: String,
}

/// Redirect returned instead of proxying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub url: String,
    pub code: u16,
    pub from_to_www: bool,
}

/// Per client address limits. Zero disables a limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub connections: u32,
    pub rps: u32,
    pub rpm: u32,
}

/// Client CIDRs allowed to reach a location. Empty allows everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub cidrs: Vec<String>,
}

/// Upstream timeouts and request size limits. Zero/empty keeps the global value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub connect_timeout_secs: u32,
    pub send_timeout_secs: u32,
    pub read_timeout_secs: u32,
    pub body_size: String,
}

/// Routing behavior of one `Ingress` path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// URL path matched by this location
    pub path: String,
    /// Name of the upstream receiving the traffic
    pub backend: String,
    /// The location serves the `Ingress` default backend
    pub is_default_backend: bool,
    /// Set only from the reserved `Denied` entry, never by the generic merge
    pub denied: Denied,
    pub rewrite: Rewrite,
    pub redirect: Redirect,
    pub rate_limit: RateLimit,
    pub whitelist: SourceRange,
    pub proxy: ProxyConfig,
    pub secure_upstream: bool,
    pub use_port_in_redirects: bool,
    pub configuration_snippet: String,
}

impl Location {
    /// Create a location for `path` routed to the `backend` upstream.
    pub fn new(path: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            backend: backend.into(),
            rewrite: Rewrite {
                ssl_redirect: crate::constants::DEFAULT_SSL_REDIRECT,
                ..Rewrite::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod location_tests;
