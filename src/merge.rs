// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Merging of extracted annotation values into a [`Location`].
//!
//! The merge runs in two steps:
//! 1. The reserved `Denied` entry is removed from the map and assigned to
//!    [`Location::denied`].
//! 2. Every remaining entry is applied through the table of overridable fields.
//!
//! `denied` is not part of the table, so no generic entry can set or clear it.
//! Each field is applied on its own: an unknown name or a value of the wrong
//! kind is logged and skipped, and the other fields are still applied.
//!
//! # Example
//!
//! ```rust
//! use ingress_core::annotations::{AnnotationValue, ExtractedAnnotations};
//! use ingress_core::location::{Denied, Location, Rewrite};
//! use ingress_core::merge::merge_location_annotations;
//!
//! let mut location = Location::new("/", "default-web-80");
//! let mut extracted = ExtractedAnnotations::from([
//!     ("Denied".to_string(), AnnotationValue::Denied(Denied::because("invalid whitelist"))),
//!     (
//!         "Rewrite".to_string(),
//!         AnnotationValue::Rewrite(Rewrite { target: "/x".to_string(), ..Default::default() }),
//!     ),
//! ]);
//!
//! merge_location_annotations(&mut location, &mut extracted);
//!
//! assert_eq!(location.denied.reason(), Some("invalid whitelist"));
//! assert_eq!(location.rewrite.target, "/x");
//! assert!(!extracted.contains_key("Denied"));
//! ```

use crate::annotations::{AnnotationValue, ExtractedAnnotations};
use crate::constants::{
    BACKEND_FIELD, CONFIGURATION_SNIPPET_FIELD, DENIED_KEY_NAME, PROXY_FIELD, RATE_LIMIT_FIELD,
    REDIRECT_FIELD, REWRITE_FIELD, SECURE_UPSTREAM_FIELD, USE_PORT_IN_REDIRECTS_FIELD,
    WHITELIST_FIELD,
};
use crate::errors::MergeError;
use crate::location::Location;
use crate::metrics::{record_denied_location, record_merge_failure};
use tracing::{debug, error};

type FieldSetter = fn(&mut Location, AnnotationValue) -> Result<(), MergeError>;

/// Generates a setter assigning one `AnnotationValue` variant to one location field.
macro_rules! field_setter {
    ($setter:ident, $key:expr, $field:ident, $variant:ident, $expected:literal) => {
        fn $setter(location: &mut Location, value: AnnotationValue) -> Result<(), MergeError> {
            match value {
                AnnotationValue::$variant(v) => {
                    location.$field = v;
                    Ok(())
                }
                other => Err(type_mismatch($key, $expected, &other)),
            }
        }
    };
}

field_setter!(set_backend, BACKEND_FIELD, backend, Text, "text");
field_setter!(set_rewrite, REWRITE_FIELD, rewrite, Rewrite, "rewrite");
field_setter!(set_redirect, REDIRECT_FIELD, redirect, Redirect, "redirect");
field_setter!(set_rate_limit, RATE_LIMIT_FIELD, rate_limit, RateLimit, "rate limit");
field_setter!(set_whitelist, WHITELIST_FIELD, whitelist, Whitelist, "source range");
field_setter!(set_proxy, PROXY_FIELD, proxy, Proxy, "proxy");
field_setter!(set_secure_upstream, SECURE_UPSTREAM_FIELD, secure_upstream, Bool, "bool");
field_setter!(
    set_use_port_in_redirects,
    USE_PORT_IN_REDIRECTS_FIELD,
    use_port_in_redirects,
    Bool,
    "bool"
);
field_setter!(
    set_configuration_snippet,
    CONFIGURATION_SNIPPET_FIELD,
    configuration_snippet,
    Text,
    "text"
);

/// Location fields that annotations may override, by name.
const OVERRIDABLE_FIELDS: &[(&str, FieldSetter)] = &[
    (BACKEND_FIELD, set_backend),
    (REWRITE_FIELD, set_rewrite),
    (REDIRECT_FIELD, set_redirect),
    (RATE_LIMIT_FIELD, set_rate_limit),
    (WHITELIST_FIELD, set_whitelist),
    (PROXY_FIELD, set_proxy),
    (SECURE_UPSTREAM_FIELD, set_secure_upstream),
    (USE_PORT_IN_REDIRECTS_FIELD, set_use_port_in_redirects),
    (CONFIGURATION_SNIPPET_FIELD, set_configuration_snippet),
];

fn type_mismatch(field: &str, expected: &'static str, found: &AnnotationValue) -> MergeError {
    MergeError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Apply one named value to `location`.
///
/// # Errors
///
/// Returns [`MergeError::UnknownField`] when `field` is not overridable and
/// [`MergeError::TypeMismatch`] when `value` does not fit the field.
pub fn apply_field(
    location: &mut Location,
    field: &str,
    value: AnnotationValue,
) -> Result<(), MergeError> {
    let (_, setter) = OVERRIDABLE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .ok_or_else(|| MergeError::UnknownField {
            field: field.to_string(),
        })?;

    setter(location, value)
}

/// Merge `extracted` into `location` in place.
///
/// The `Denied` entry is always removed from `extracted`; all other entries are
/// left in the map so it can be merged into the locations of further paths.
pub fn merge_location_annotations(location: &mut Location, extracted: &mut ExtractedAnnotations) {
    if let Some(value) = extracted.remove(DENIED_KEY_NAME) {
        match value {
            AnnotationValue::Denied(denied) => {
                if denied.is_denied() {
                    record_denied_location();
                }
                location.denied = denied;
            }
            other => {
                let e = type_mismatch(DENIED_KEY_NAME, "denied", &other);
                error!(
                    "unexpected error merging extracted annotations in location {}: {}",
                    location.path, e
                );
                record_merge_failure(DENIED_KEY_NAME, e.kind());
            }
        }
    }

    for (field, value) in extracted.iter() {
        match apply_field(location, field, value.clone()) {
            Ok(()) => debug!("Applied {} override to location {}", field, location.path),
            Err(e) => {
                error!(
                    "unexpected error merging extracted annotations in location {}: {}",
                    location.path, e
                );
                record_merge_failure(field, e.kind());
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
