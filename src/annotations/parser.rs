// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed annotation reader.
//!
//! Every getter distinguishes an annotation that is simply not set
//! ([`AnnotationError::Missing`]) from one whose value cannot be parsed
//! ([`AnnotationError::InvalidContent`]). Callers decide whether absence is an
//! error.

use crate::errors::AnnotationError;
use kube::ResourceExt;

/// Read an annotation as a string. An empty value is returned as-is.
///
/// # Errors
///
/// Returns [`AnnotationError::Missing`] when the resource has no annotation `key`.
pub fn get_string_annotation<K: ResourceExt>(
    key: &str,
    resource: &K,
) -> Result<String, AnnotationError> {
    resource
        .annotations()
        .get(key)
        .cloned()
        .ok_or_else(|| AnnotationError::Missing {
            key: key.to_string(),
        })
}

/// Read an annotation as a boolean.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts
/// `0`, `f`, `F`, `FALSE`, `false`, `False`.
///
/// # Errors
///
/// Returns [`AnnotationError::Missing`] when the annotation is not set and
/// [`AnnotationError::InvalidContent`] when the value is not a boolean.
pub fn get_bool_annotation<K: ResourceExt>(
    key: &str,
    resource: &K,
) -> Result<bool, AnnotationError> {
    let value = get_string_annotation(key, resource)?;
    match value.as_str() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(AnnotationError::InvalidContent {
            key: key.to_string(),
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Read an annotation as a signed integer.
///
/// # Errors
///
/// Returns [`AnnotationError::Missing`] when the annotation is not set and
/// [`AnnotationError::InvalidContent`] when the value is not an integer.
pub fn get_int_annotation<K: ResourceExt>(key: &str, resource: &K) -> Result<i64, AnnotationError> {
    let value = get_string_annotation(key, resource)?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| AnnotationError::InvalidContent {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })
}

/// Read an annotation as a non-negative integer fitting in `u32`.
///
/// # Errors
///
/// Same as [`get_int_annotation`], plus [`AnnotationError::InvalidContent`]
/// for negative or oversized values.
pub fn get_u32_annotation<K: ResourceExt>(key: &str, resource: &K) -> Result<u32, AnnotationError> {
    let value = get_int_annotation(key, resource)?;
    u32::try_from(value).map_err(|_| AnnotationError::InvalidContent {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a non-negative 32-bit integer".to_string(),
    })
}

/// Turn [`AnnotationError::Missing`] into `None`, keeping other errors.
///
/// # Errors
///
/// Passes through every error except [`AnnotationError::Missing`].
pub fn optional<T>(result: Result<T, AnnotationError>) -> Result<Option<T>, AnnotationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_missing() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
