// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the ingress controller core.
//!
//! This module provides specialized error types for:
//! - Reading annotations from `Ingress` resources
//! - Looking up the identity of the controller pod
//! - Merging extracted annotation values into a location
//!
//! Only [`IdentityError`] is meant to reach the top-level driver. The other
//! errors are absorbed where they are detected: they are logged and the caller
//! continues with a degraded value.

use thiserror::Error;

/// Errors returned by the annotation reader.
///
/// The Class Selector treats [`AnnotationError::Missing`] as an empty value and
/// logs anything else as unexpected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// The resource has no annotations, or not the requested one
    #[error("ingress rule without annotations (missing '{key}')")]
    Missing {
        /// The annotation key that was requested
        key: String,
    },

    /// The annotation exists but its value cannot be parsed into the requested type
    #[error("annotation '{key}' contains invalid value '{value}': {reason}")]
    InvalidContent {
        /// The annotation key that was read
        key: String,
        /// The raw annotation value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl AnnotationError {
    /// Returns `true` when the annotation is simply not set.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Unrecoverable failure to determine which pod this controller runs in.
///
/// A controller without a known identity cannot make ownership decisions. This
/// error is bubbled up to the driver, which terminates the process.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// A downward API environment variable is not set
    #[error("environment variable {name} is not set; expose it through the downward API")]
    MissingEnvironment {
        /// Name of the missing variable
        name: &'static str,
    },

    /// The Kubernetes API did not return the pod
    #[error("unable to get pod {namespace}/{name}: {source}")]
    PodLookup {
        /// Namespace of the pod
        namespace: String,
        /// Name of the pod
        name: String,
        /// Underlying client error
        #[source]
        source: kube::Error,
    },

    /// The pod object returned by the API has no name
    #[error("pod {namespace}/{name} returned without metadata.name")]
    IncompletePod {
        /// Namespace of the pod
        namespace: String,
        /// Name that was requested
        name: String,
    },
}

/// Failure to apply one extracted annotation value to a location field.
///
/// Merge failures are logged and the field is skipped; the remaining fields
/// are still applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// No overridable location field carries this name
    #[error("location has no overridable field named '{field}'")]
    UnknownField {
        /// Key found in the extracted annotation map
        field: String,
    },

    /// The value kind does not fit the destination field
    #[error("cannot assign {found} value to location field '{field}' (expected {expected})")]
    TypeMismatch {
        /// Destination field name
        field: String,
        /// Value kind the field accepts
        expected: &'static str,
        /// Value kind that was provided
        found: &'static str,
    },
}

impl MergeError {
    /// Short label used in metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownField { .. } => "unknown_field",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
