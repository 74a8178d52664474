// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Extraction of per-location overrides from `Ingress` annotations.
//!
//! [`extract_location_annotations`] reads the `ingress.kubernetes.io/*`
//! annotations of an `Ingress` and produces an [`ExtractedAnnotations`] map,
//! keyed by the name of the [`Location`](crate::location::Location) field each
//! value overrides. The map is consumed by
//! [`merge_location_annotations`](crate::merge::merge_location_annotations).
//!
//! # Denied locations
//!
//! An invalid `whitelist-source-range` cannot be ignored safely: serving the
//! location without the restriction would open it to everyone. Instead the
//! extractor stores a [`Denied`] reason under
//! [`DENIED_KEY_NAME`](crate::constants::DENIED_KEY_NAME) and the location
//! rejects all traffic. Invalid values of other annotations are logged and
//! the affected group is left out of the map.
//!
//! # Example
//!
//! ```rust
//! use ingress_core::annotations::{extract_location_annotations, AnnotationValue};
//! use k8s_openapi::api::networking::v1::Ingress;
//! use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
//! use std::collections::BTreeMap;
//!
//! let ing = Ingress {
//!     metadata: ObjectMeta {
//!         annotations: Some(BTreeMap::from([(
//!             "ingress.kubernetes.io/limit-rps".to_string(),
//!             "10".to_string(),
//!         )])),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let extracted = extract_location_annotations(&ing);
//! assert!(matches!(
//!     extracted.get("RateLimit"),
//!     Some(AnnotationValue::RateLimit(r)) if r.rps == 10
//! ));
//! ```

pub mod parser;

use crate::constants::{
    CONFIGURATION_SNIPPET_FIELD, DEFAULT_SSL_REDIRECT, DENIED_KEY_NAME, PERMANENT_REDIRECT_CODE,
    PROXY_FIELD, RATE_LIMIT_FIELD, REDIRECT_FIELD, REWRITE_FIELD, SECURE_UPSTREAM_FIELD,
    TEMPORAL_REDIRECT_CODE, USE_PORT_IN_REDIRECTS_FIELD, WHITELIST_FIELD,
};
use crate::errors::AnnotationError;
use crate::labels::{
    ADD_BASE_URL_ANNOTATION, APP_ROOT_ANNOTATION, CONFIGURATION_SNIPPET_ANNOTATION,
    FORCE_SSL_REDIRECT_ANNOTATION, FROM_TO_WWW_REDIRECT_ANNOTATION, LIMIT_CONNECTIONS_ANNOTATION,
    LIMIT_RPM_ANNOTATION, LIMIT_RPS_ANNOTATION, PERMANENT_REDIRECT_ANNOTATION,
    PROXY_BODY_SIZE_ANNOTATION, PROXY_CONNECT_TIMEOUT_ANNOTATION, PROXY_READ_TIMEOUT_ANNOTATION,
    PROXY_SEND_TIMEOUT_ANNOTATION, REWRITE_TARGET_ANNOTATION, SECURE_BACKENDS_ANNOTATION,
    SSL_REDIRECT_ANNOTATION, TEMPORAL_REDIRECT_ANNOTATION, USE_PORT_IN_REDIRECTS_ANNOTATION,
    WHITELIST_SOURCE_RANGE_ANNOTATION,
};
use crate::location::{Denied, ProxyConfig, RateLimit, Redirect, Rewrite, SourceRange};
use ip_network::IpNetwork;
use kube::ResourceExt;
use parser::{get_bool_annotation, get_string_annotation, get_u32_annotation, optional};
use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Extracted overrides keyed by location field name.
pub type ExtractedAnnotations = BTreeMap<String, AnnotationValue>;

/// A typed override value for one location field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// Reason to reject all traffic (only valid under the `Denied` key)
    Denied(Denied),
    Rewrite(Rewrite),
    Redirect(Redirect),
    RateLimit(RateLimit),
    Whitelist(SourceRange),
    Proxy(ProxyConfig),
    Bool(bool),
    Text(String),
}

impl AnnotationValue {
    /// Short name of the value kind, used in merge diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Denied(_) => "denied",
            Self::Rewrite(_) => "rewrite",
            Self::Redirect(_) => "redirect",
            Self::RateLimit(_) => "rate limit",
            Self::Whitelist(_) => "source range",
            Self::Proxy(_) => "proxy",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
        }
    }
}

/// Extract all location overrides declared on `resource`.
///
/// A group of related annotations only produces an entry when at least one of
/// them is set. Groups holding invalid values are skipped with a warning,
/// except the source range whitelist which denies the location instead.
pub fn extract_location_annotations<K: ResourceExt>(resource: &K) -> ExtractedAnnotations {
    let name = resource.name_any();
    let mut extracted = ExtractedAnnotations::new();

    if resource.annotations().is_empty() {
        return extracted;
    }

    insert_group(
        &mut extracted,
        &name,
        REWRITE_FIELD,
        parse_rewrite(resource),
        AnnotationValue::Rewrite,
    );
    insert_group(
        &mut extracted,
        &name,
        REDIRECT_FIELD,
        parse_redirect(resource),
        AnnotationValue::Redirect,
    );
    insert_group(
        &mut extracted,
        &name,
        RATE_LIMIT_FIELD,
        parse_rate_limit(resource),
        AnnotationValue::RateLimit,
    );
    insert_group(
        &mut extracted,
        &name,
        PROXY_FIELD,
        parse_proxy(resource),
        AnnotationValue::Proxy,
    );
    insert_group(
        &mut extracted,
        &name,
        SECURE_UPSTREAM_FIELD,
        optional(get_bool_annotation(SECURE_BACKENDS_ANNOTATION, resource)),
        AnnotationValue::Bool,
    );
    insert_group(
        &mut extracted,
        &name,
        USE_PORT_IN_REDIRECTS_FIELD,
        optional(get_bool_annotation(USE_PORT_IN_REDIRECTS_ANNOTATION, resource)),
        AnnotationValue::Bool,
    );
    insert_group(
        &mut extracted,
        &name,
        CONFIGURATION_SNIPPET_FIELD,
        optional(get_string_annotation(CONFIGURATION_SNIPPET_ANNOTATION, resource)),
        AnnotationValue::Text,
    );

    match parse_whitelist(resource) {
        Ok(Some(range)) => {
            extracted.insert(WHITELIST_FIELD.to_string(), AnnotationValue::Whitelist(range));
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Denying locations of ingress {}: {}", name, e);
            extracted.insert(
                DENIED_KEY_NAME.to_string(),
                AnnotationValue::Denied(Denied::because(e)),
            );
        }
    }

    debug!(
        "Extracted {} location override(s) from ingress {}",
        extracted.len(),
        name
    );
    extracted
}

fn insert_group<T>(
    extracted: &mut ExtractedAnnotations,
    resource_name: &str,
    field: &str,
    parsed: Result<Option<T>, AnnotationError>,
    wrap: fn(T) -> AnnotationValue,
) {
    match parsed {
        Ok(Some(value)) => {
            extracted.insert(field.to_string(), wrap(value));
        }
        Ok(None) => {}
        Err(e) => warn!("Ignoring {} override of ingress {}: {}", field, resource_name, e),
    }
}

fn any_present<K: ResourceExt>(resource: &K, keys: &[&str]) -> bool {
    let annotations = resource.annotations();
    keys.iter().any(|key| annotations.contains_key(*key))
}

fn parse_rewrite<K: ResourceExt>(resource: &K) -> Result<Option<Rewrite>, AnnotationError> {
    if !any_present(
        resource,
        &[
            REWRITE_TARGET_ANNOTATION,
            ADD_BASE_URL_ANNOTATION,
            SSL_REDIRECT_ANNOTATION,
            FORCE_SSL_REDIRECT_ANNOTATION,
            APP_ROOT_ANNOTATION,
        ],
    ) {
        return Ok(None);
    }

    Ok(Some(Rewrite {
        target: optional(get_string_annotation(REWRITE_TARGET_ANNOTATION, resource))?
            .unwrap_or_default(),
        add_base_url: optional(get_bool_annotation(ADD_BASE_URL_ANNOTATION, resource))?
            .unwrap_or(false),
        ssl_redirect: optional(get_bool_annotation(SSL_REDIRECT_ANNOTATION, resource))?
            .unwrap_or(DEFAULT_SSL_REDIRECT),
        force_ssl_redirect: optional(get_bool_annotation(FORCE_SSL_REDIRECT_ANNOTATION, resource))?
            .unwrap_or(false),
        app_root: optional(get_string_annotation(APP_ROOT_ANNOTATION, resource))?
            .unwrap_or_default(),
    }))
}

fn parse_redirect<K: ResourceExt>(resource: &K) -> Result<Option<Redirect>, AnnotationError> {
    let permanent = optional(get_string_annotation(PERMANENT_REDIRECT_ANNOTATION, resource))?
        .filter(|url| !url.is_empty());
    let temporal = optional(get_string_annotation(TEMPORAL_REDIRECT_ANNOTATION, resource))?
        .filter(|url| !url.is_empty());
    let from_to_www = optional(get_bool_annotation(FROM_TO_WWW_REDIRECT_ANNOTATION, resource))?;

    let (url, code) = match (permanent, temporal) {
        (Some(url), _) => (url, PERMANENT_REDIRECT_CODE),
        (None, Some(url)) => (url, TEMPORAL_REDIRECT_CODE),
        (None, None) => match from_to_www {
            Some(_) => (String::new(), 0),
            None => return Ok(None),
        },
    };

    Ok(Some(Redirect {
        url,
        code,
        from_to_www: from_to_www.unwrap_or(false),
    }))
}

fn parse_rate_limit<K: ResourceExt>(resource: &K) -> Result<Option<RateLimit>, AnnotationError> {
    let connections = optional(get_u32_annotation(LIMIT_CONNECTIONS_ANNOTATION, resource))?;
    let rps = optional(get_u32_annotation(LIMIT_RPS_ANNOTATION, resource))?;
    let rpm = optional(get_u32_annotation(LIMIT_RPM_ANNOTATION, resource))?;

    if connections.is_none() && rps.is_none() && rpm.is_none() {
        return Ok(None);
    }

    Ok(Some(RateLimit {
        connections: connections.unwrap_or(0),
        rps: rps.unwrap_or(0),
        rpm: rpm.unwrap_or(0),
    }))
}

fn parse_proxy<K: ResourceExt>(resource: &K) -> Result<Option<ProxyConfig>, AnnotationError> {
    let connect = optional(get_u32_annotation(PROXY_CONNECT_TIMEOUT_ANNOTATION, resource))?;
    let send = optional(get_u32_annotation(PROXY_SEND_TIMEOUT_ANNOTATION, resource))?;
    let read = optional(get_u32_annotation(PROXY_READ_TIMEOUT_ANNOTATION, resource))?;
    let body_size = optional(get_string_annotation(PROXY_BODY_SIZE_ANNOTATION, resource))?;

    if connect.is_none() && send.is_none() && read.is_none() && body_size.is_none() {
        return Ok(None);
    }

    Ok(Some(ProxyConfig {
        connect_timeout_secs: connect.unwrap_or(0),
        send_timeout_secs: send.unwrap_or(0),
        read_timeout_secs: read.unwrap_or(0),
        body_size: body_size.unwrap_or_default(),
    }))
}

fn parse_whitelist<K: ResourceExt>(resource: &K) -> Result<Option<SourceRange>, AnnotationError> {
    let Some(raw) = optional(get_string_annotation(
        WHITELIST_SOURCE_RANGE_ANNOTATION,
        resource,
    ))?
    else {
        return Ok(None);
    };

    let mut cidrs = Vec::new();
    for cidr in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let network = parse_cidr(cidr).map_err(|reason| AnnotationError::InvalidContent {
            key: WHITELIST_SOURCE_RANGE_ANNOTATION.to_string(),
            value: raw.clone(),
            reason: format!("'{cidr}' is not a valid CIDR: {reason}"),
        })?;
        cidrs.push(network.to_string());
    }

    Ok(Some(SourceRange { cidrs }))
}

/// Parses `address/prefix`, or a bare address as a single host network.
///
/// Host bits set in the address are cleared. The prefix length must be plain
/// decimal digits without a sign or leading zeros.
fn parse_cidr(cidr: &str) -> Result<IpNetwork, String> {
    let (address, prefix) = match cidr.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (cidr, None),
    };

    let address: IpAddr = address.parse().map_err(|e| format!("{e}"))?;
    let max_prefix = if address.is_ipv4() { 32 } else { 128 };

    let prefix = match prefix {
        None => max_prefix,
        Some(p) if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(format!("invalid prefix length '{p}'"));
        }
        Some(p) if p.len() > 1 && p.starts_with('0') => {
            return Err(format!("prefix length '{p}' has a leading zero"));
        }
        Some(p) => p
            .parse::<u8>()
            .map_err(|_| format!("invalid prefix length '{p}'"))?,
    };

    IpNetwork::new_truncate(address, prefix).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;
