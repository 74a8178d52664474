// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Translation of an `Ingress` into servers and locations.
//!
//! This module wires the decision functions together the way the controller
//! runs them for every `Ingress`:
//!
//! 1. [`should_handle`] checks the ingress class and, when partitioning is
//!    enabled, ownership by this replica
//! 2. [`extract_location_annotations`](crate::annotations::extract_location_annotations)
//!    reads the overrides once per `Ingress`
//! 3. [`build_servers`] derives one [`Location`] per path, merges the overrides
//!    into it and picks the TLS certificate of each host
//!
//! The resulting [`Server`] list is handed to the proxy configuration renderer.

use crate::annotations::ExtractedAnnotations;
use crate::class::is_valid_class;
use crate::config::Configuration;
use crate::constants::{
    DEFAULT_BACKEND_UPSTREAM_NAME, DEFAULT_LOCATION_PATH, DEFAULT_SERVER_ADDRESS,
    DEFAULT_SERVER_NAME, DEFAULT_SERVER_PORT,
};
use crate::errors::IdentityError;
use crate::hostname::is_host_valid;
use crate::location::{Backend, Endpoint, Location, SslCert};
use crate::merge::merge_location_annotations;
use crate::ownership::{is_assigned_to_self, PodInfoSource};
use k8s_openapi::api::networking::v1::{Ingress, IngressBackend};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A virtual host and the locations it serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Host name, or `_` for the catch-all server
    pub hostname: String,
    /// Certificate presented for the host, if TLS is enabled
    pub ssl_cert: Option<SslCert>,
    pub locations: Vec<Location>,
}

/// Endpoint of the local server answering 503 when a backend has no endpoints.
#[must_use]
pub fn new_default_server() -> Endpoint {
    Endpoint {
        address: DEFAULT_SERVER_ADDRESS.to_string(),
        port: DEFAULT_SERVER_PORT.to_string(),
    }
}

/// Upstream named `name` without endpoints.
#[must_use]
pub fn new_upstream(name: &str) -> Backend {
    Backend {
        name: name.to_string(),
        endpoints: Vec::new(),
        secure: false,
    }
}

/// Name of the upstream for a service port: `<namespace>-<service>-<port>`.
#[must_use]
pub fn upstream_name(namespace: &str, service: &str, port: &str) -> String {
    format!("{namespace}-{service}-{port}")
}

/// Returns `true` if this controller instance must translate `ingress`.
///
/// The class check always runs. Ownership is only checked when
/// `config.enable_ownership_partitioning` is set.
///
/// # Errors
///
/// Propagates the [`IdentityError`] of the ownership check. It is fatal.
pub async fn should_handle<S>(
    ingress: &Ingress,
    config: &Configuration,
    pod_info: &S,
) -> Result<bool, IdentityError>
where
    S: PodInfoSource + ?Sized,
{
    if !is_valid_class(ingress, config) {
        return Ok(false);
    }

    if !config.enable_ownership_partitioning {
        return Ok(true);
    }

    is_assigned_to_self(ingress, pod_info).await
}

/// Pick the certificate served for `host`.
///
/// `candidate` is the certificate of the TLS secret listing `host`. It is used
/// when it covers the host; otherwise `fallback` (usually the controller default
/// certificate) is returned.
#[must_use]
pub fn certificate_for_host<'a>(
    host: &str,
    candidate: Option<&'a SslCert>,
    fallback: Option<&'a SslCert>,
) -> Option<&'a SslCert> {
    if is_host_valid(host, candidate) {
        return candidate;
    }

    if let Some(cert) = candidate {
        warn!(
            "SSL certificate {} does not contain a common name for host {}, using default certificate",
            cert.pem_file_name, host
        );
    }
    fallback
}

/// Build the servers of `ingress`.
///
/// Every `spec.rules[].http.paths[]` entry becomes one [`Location`] on the
/// server of its host, merged with its own copy of `extracted`. An `Ingress`
/// without any path but with a default backend gets a single `/` location on
/// the catch-all server.
///
/// `certs` maps `<namespace>/<secret name>` to the certificates loaded by the
/// certificate store.
pub fn build_servers(
    ingress: &Ingress,
    extracted: &ExtractedAnnotations,
    certs: &BTreeMap<String, SslCert>,
    default_cert: Option<&SslCert>,
) -> Vec<Server> {
    let namespace = ingress.namespace().unwrap_or_default();
    let mut servers: Vec<Server> = Vec::new();

    let Some(spec) = ingress.spec.as_ref() else {
        return servers;
    };

    for rule in spec.rules.iter().flatten() {
        let host = rule
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_SERVER_NAME);

        for path in rule.http.iter().flat_map(|http| &http.paths) {
            let location_path = path
                .path
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_LOCATION_PATH);
            let location = new_location(
                location_path,
                backend_upstream(&namespace, &path.backend),
                extracted,
            );
            server_for(&mut servers, host).locations.push(location);
        }
    }

    if servers.is_empty() {
        if let Some(backend) = spec.default_backend.as_ref() {
            let mut location = new_location(
                DEFAULT_LOCATION_PATH,
                backend_upstream(&namespace, backend),
                extracted,
            );
            location.is_default_backend = true;
            server_for(&mut servers, DEFAULT_SERVER_NAME).locations.push(location);
        }
    }

    for server in &mut servers {
        if server.hostname == DEFAULT_SERVER_NAME {
            continue;
        }
        let secret = spec.tls.iter().flatten().find(|tls| {
            tls.hosts
                .iter()
                .flatten()
                .any(|h| h.as_str() == server.hostname)
        });
        if let Some(secret_name) = secret.and_then(|tls| tls.secret_name.as_deref()) {
            let key = format!("{namespace}/{secret_name}");
            if !certs.contains_key(&key) {
                warn!("TLS secret {} of ingress {} is not loaded", key, ingress.name_any());
            }
            server.ssl_cert =
                certificate_for_host(&server.hostname, certs.get(&key), default_cert).cloned();
        }
    }

    debug!(
        "Ingress {}/{} translated into {} server(s)",
        namespace,
        ingress.name_any(),
        servers.len()
    );
    servers
}

fn new_location(path: &str, backend: String, extracted: &ExtractedAnnotations) -> Location {
    let mut location = Location::new(path, backend);
    let mut annotations = extracted.clone();
    merge_location_annotations(&mut location, &mut annotations);
    location
}

fn server_for<'a>(servers: &'a mut Vec<Server>, hostname: &str) -> &'a mut Server {
    let index = match servers.iter().position(|s| s.hostname == hostname) {
        Some(index) => index,
        None => {
            servers.push(Server {
                hostname: hostname.to_string(),
                ..Server::default()
            });
            servers.len() - 1
        }
    };
    &mut servers[index]
}

/// Upstream name for an ingress backend. Non-service backends and services
/// without a port fall back to the default backend upstream.
fn backend_upstream(namespace: &str, backend: &IngressBackend) -> String {
    let Some(service) = backend.service.as_ref() else {
        return DEFAULT_BACKEND_UPSTREAM_NAME.to_string();
    };

    let port = service.port.as_ref().and_then(|port| {
        port.number
            .map(|n| n.to_string())
            .or_else(|| port.name.clone())
    });

    match port {
        Some(port) => upstream_name(namespace, &service.name, &port),
        None => DEFAULT_BACKEND_UPSTREAM_NAME.to_string(),
    }
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod translate_tests;
