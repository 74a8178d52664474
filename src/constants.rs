// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the ingress controller core.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Ingress Class Constants
// ============================================================================

/// Ingress class handled by a controller started without `--ingress-class`
pub const DEFAULT_INGRESS_CLASS: &str = "nginx";

// ============================================================================
// Location Model Constants
// ============================================================================

/// Reserved key in the extracted annotation map carrying the denial reason of a location
pub const DENIED_KEY_NAME: &str = "Denied";

/// Path used for locations that do not declare one
pub const DEFAULT_LOCATION_PATH: &str = "/";

/// Name of the upstream that answers requests without a matching backend
pub const DEFAULT_BACKEND_UPSTREAM_NAME: &str = "upstream-default-backend";

/// Location field overridden by rewrite annotations
pub const REWRITE_FIELD: &str = "Rewrite";

/// Location field overridden by redirect annotations
pub const REDIRECT_FIELD: &str = "Redirect";

/// Location field overridden by rate limit annotations
pub const RATE_LIMIT_FIELD: &str = "RateLimit";

/// Location field overridden by the source range whitelist annotation
pub const WHITELIST_FIELD: &str = "Whitelist";

/// Location field overridden by proxy timeout and body size annotations
pub const PROXY_FIELD: &str = "Proxy";

/// Location field overridden by the secure backends annotation
pub const SECURE_UPSTREAM_FIELD: &str = "SecureUpstream";

/// Location field overridden by the port in redirects annotation
pub const USE_PORT_IN_REDIRECTS_FIELD: &str = "UsePortInRedirects";

/// Location field overridden by the configuration snippet annotation
pub const CONFIGURATION_SNIPPET_FIELD: &str = "ConfigurationSnippet";

/// Location field selecting the upstream
pub const BACKEND_FIELD: &str = "Backend";

// ============================================================================
// Default Server Constants
// ============================================================================

/// Server name of the catch-all virtual host
pub const DEFAULT_SERVER_NAME: &str = "_";

/// Address of the local server returning 503 for requests without endpoints
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1";

/// Port of the local server returning 503 for requests without endpoints
pub const DEFAULT_SERVER_PORT: &str = "8181";

// ============================================================================
// Annotation Defaults
// ============================================================================

/// `ssl-redirect` applies when the annotation is absent
pub const DEFAULT_SSL_REDIRECT: bool = true;

/// HTTP status used by `permanent-redirect`
pub const PERMANENT_REDIRECT_CODE: u16 = 301;

/// HTTP status used by `temporal-redirect`
pub const TEMPORAL_REDIRECT_CODE: u16 = 302;

// ============================================================================
// Pod Identity Constants
// ============================================================================

/// Environment variable exposing the pod name (downward API)
pub const POD_NAME_ENV: &str = "POD_NAME";

/// Environment variable exposing the pod namespace (downward API)
pub const POD_NAMESPACE_ENV: &str = "POD_NAMESPACE";

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "ingress_controller";
