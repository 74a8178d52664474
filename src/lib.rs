// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # ingress-core - Decision core of a Kubernetes ingress controller
//!
//! This library holds the logic an ingress controller runs between fetching an
//! `Ingress` and rendering the reverse proxy configuration for it.
//!
//! ## Overview
//!
//! - Ingress class selection: does this controller instance serve an `Ingress`
//! - Ownership partitioning: does this replica serve an `Ingress`
//! - TLS hostname matching: does a certificate cover a host
//! - Annotation merging: how per-location overrides apply to the routing model
//!
//! ## Modules
//!
//! - [`hostname`] - Certificate common name matching
//! - [`class`] - Ingress class selection
//! - [`ownership`] - Replica ownership and pod identity lookup
//! - [`annotations`] - Annotation reader and location override extraction
//! - [`merge`] - Merging extracted overrides into a [`location::Location`]
//! - [`translate`] - Servers and locations built from an `Ingress`
//!
//! ## Example
//!
//! ```rust
//! use ingress_core::hostname::{is_host_valid, match_hostnames};
//! use ingress_core::location::SslCert;
//!
//! let cert = SslCert {
//!     cn: vec!["*.example.com".to_string()],
//!     ..Default::default()
//! };
//!
//! assert!(match_hostnames("*.example.com", "www.example.com"));
//! assert!(is_host_valid("www.example.com", Some(&cert)));
//! assert!(!is_host_valid("example.com", Some(&cert)));
//! ```

pub mod annotations;
pub mod class;
pub mod config;
pub mod constants;
pub mod errors;
pub mod hostname;
pub mod labels;
pub mod location;
pub mod merge;
pub mod metrics;
pub mod ownership;
pub mod translate;
