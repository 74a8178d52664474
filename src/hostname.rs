// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TLS certificate hostname matching.
//!
//! A certificate covers a hostname when one of its common names matches it
//! label by label. Only the left-most label of a pattern may be the `*`
//! wildcard, and a wildcard stands for exactly one label:
//!
//! ```rust
//! use ingress_core::hostname::match_hostnames;
//!
//! assert!(match_hostnames("*.example.com", "foo.example.com"));
//! assert!(!match_hostnames("*.example.com", "example.com"));
//! assert!(!match_hostnames("*.example.com", "a.foo.example.com"));
//! ```

use crate::location::SslCert;

/// Returns `true` if `cert` holds a common name matching `host`.
///
/// A missing certificate never covers a host.
#[must_use]
pub fn is_host_valid(host: &str, cert: Option<&SslCert>) -> bool {
    let Some(cert) = cert else {
        return false;
    };

    cert.cn.iter().any(|cn| match_hostnames(cn, host))
}

/// Returns `true` if the certificate name `pattern` matches `host`.
///
/// One trailing dot (the DNS root label) is ignored on both sides. Empty
/// operands never match, and both names must have the same number of labels.
#[must_use]
pub fn match_hostnames(pattern: &str, host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let pattern = pattern.strip_suffix('.').unwrap_or(pattern);

    if pattern.is_empty() || host.is_empty() {
        return false;
    }

    let pattern_parts: Vec<&str> = pattern.split('.').collect();
    let host_parts: Vec<&str> = host.split('.').collect();

    if pattern_parts.len() != host_parts.len() {
        return false;
    }

    pattern_parts
        .iter()
        .zip(&host_parts)
        .enumerate()
        .all(|(i, (pattern_part, host_part))| {
            (i == 0 && *pattern_part == "*") || pattern_part == host_part
        })
}

#[cfg(test)]
#[path = "hostname_tests.rs"]
mod hostname_tests;
