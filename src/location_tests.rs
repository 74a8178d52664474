// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `location.rs`

use super::*;

#[test]
fn test_denied_defaults_to_allowed() {
    let denied = Denied::default();
    assert!(!denied.is_denied());
    assert_eq!(denied.reason(), None);
    assert_eq!(denied.to_string(), "allowed");
}

#[test]
fn test_denied_because() {
    let denied = Denied::because("invalid CIDR 10.0.0.0/33");
    assert!(denied.is_denied());
    assert_eq!(denied.reason(), Some("invalid CIDR 10.0.0.0/33"));
    assert_eq!(denied.to_string(), "denied: invalid CIDR 10.0.0.0/33");
}

#[test]
fn test_new_location_redirects_to_ssl() {
    let location = Location::new("/api", "web-api-80");
    assert_eq!(location.path, "/api");
    assert_eq!(location.backend, "web-api-80");
    assert!(location.rewrite.ssl_redirect);
    assert!(!location.rewrite.force_ssl_redirect);
    assert!(!location.is_default_backend);
    assert_eq!(location.denied, Denied::Allowed);
}

#[test]
fn test_location_serializes_camel_case() {
    let json = serde_json::to_value(Location::new("/", "web-front-80")).unwrap();
    assert_eq!(json["isDefaultBackend"], false);
    assert_eq!(json["rewrite"]["sslRedirect"], true);
    assert_eq!(json["secureUpstream"], false);
}
