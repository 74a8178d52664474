// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Annotation keys read from `Ingress` resources.
//!
//! This module defines the well-known Kubernetes ingress annotations and the
//! controller-specific `ingress.kubernetes.io/*` annotations that drive per-location
//! overrides, so every module reads the same keys.

// ============================================================================
// Kubernetes Well-Known Annotations
// ============================================================================

/// Annotation pinning an `Ingress` to a specific ingress controller class
pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// Annotation naming the load balancer (controller replica) that owns an `Ingress`
pub const LOADBALANCER_NAME_ANNOTATION: &str = "ingress.alpha.k8s.io/loadbalancer-name";

// ============================================================================
// Location Override Annotations
// ============================================================================

/// Target URI where the traffic must be redirected
pub const REWRITE_TARGET_ANNOTATION: &str = "ingress.kubernetes.io/rewrite-target";

/// Add a `base` tag to the HTML returned by the backend
pub const ADD_BASE_URL_ANNOTATION: &str = "ingress.kubernetes.io/add-base-url";

/// Redirect HTTP traffic to HTTPS when TLS is configured (default `true`)
pub const SSL_REDIRECT_ANNOTATION: &str = "ingress.kubernetes.io/ssl-redirect";

/// Redirect HTTP traffic to HTTPS even without TLS
pub const FORCE_SSL_REDIRECT_ANNOTATION: &str = "ingress.kubernetes.io/force-ssl-redirect";

/// Application root used when the request path is `/`
pub const APP_ROOT_ANNOTATION: &str = "ingress.kubernetes.io/app-root";

/// Return a 301 redirect to the given URL
pub const PERMANENT_REDIRECT_ANNOTATION: &str = "ingress.kubernetes.io/permanent-redirect";

/// Return a 302 redirect to the given URL
pub const TEMPORAL_REDIRECT_ANNOTATION: &str = "ingress.kubernetes.io/temporal-redirect";

/// Redirect between `www.<host>` and `<host>`
pub const FROM_TO_WWW_REDIRECT_ANNOTATION: &str = "ingress.kubernetes.io/from-to-www-redirect";

/// Concurrent connections allowed from a single client address
pub const LIMIT_CONNECTIONS_ANNOTATION: &str = "ingress.kubernetes.io/limit-connections";

/// Requests per second allowed from a single client address
pub const LIMIT_RPS_ANNOTATION: &str = "ingress.kubernetes.io/limit-rps";

/// Requests per minute allowed from a single client address
pub const LIMIT_RPM_ANNOTATION: &str = "ingress.kubernetes.io/limit-rpm";

/// Comma separated list of client CIDRs allowed to reach the location
pub const WHITELIST_SOURCE_RANGE_ANNOTATION: &str = "ingress.kubernetes.io/whitelist-source-range";

/// Timeout in seconds for establishing a connection with the upstream
pub const PROXY_CONNECT_TIMEOUT_ANNOTATION: &str = "ingress.kubernetes.io/proxy-connect-timeout";

/// Timeout in seconds for transmitting a request to the upstream
pub const PROXY_SEND_TIMEOUT_ANNOTATION: &str = "ingress.kubernetes.io/proxy-send-timeout";

/// Timeout in seconds for reading a response from the upstream
pub const PROXY_READ_TIMEOUT_ANNOTATION: &str = "ingress.kubernetes.io/proxy-read-timeout";

/// Maximum allowed size of the client request body (e.g. `8m`)
pub const PROXY_BODY_SIZE_ANNOTATION: &str = "ingress.kubernetes.io/proxy-body-size";

/// Use HTTPS to reach the upstream
pub const SECURE_BACKENDS_ANNOTATION: &str = "ingress.kubernetes.io/secure-backends";

/// Keep the listening port in redirects issued by the proxy
pub const USE_PORT_IN_REDIRECTS_ANNOTATION: &str = "ingress.kubernetes.io/use-port-in-redirects";

/// Raw proxy configuration appended to the location
pub const CONFIGURATION_SNIPPET_ANNOTATION: &str = "ingress.kubernetes.io/configuration-snippet";
