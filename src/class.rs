// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ingress class selection.
//!
//! Several ingress controllers can run in one cluster. Each `Ingress` picks the
//! controller that serves it with the `kubernetes.io/ingress.class` annotation.
//!
//! # Valid Combinations
//!
//! | Controller class | `Ingress` annotation | Handled |
//! |------------------|----------------------|---------|
//! | empty | empty or absent | yes |
//! | equal to the default class | anything | yes |
//! | `X` | `X` | yes |
//! | `X` (not default) | anything else | no |
//!
//! The default-class controller accepts every `Ingress`, including those pinned
//! to another class.

use crate::annotations::parser::get_string_annotation;
use crate::config::Configuration;
use crate::labels::INGRESS_CLASS_ANNOTATION;
use crate::metrics::record_class_decision;
use kube::ResourceExt;
use tracing::{debug, warn};

/// Returns `true` if the controller described by `config` must handle `resource`.
///
/// A missing class annotation counts as the empty class. Any other failure to
/// read it is logged and the class is treated as empty.
///
/// # Example
///
/// ```rust
/// use ingress_core::class::is_valid_class;
/// use ingress_core::config::Configuration;
/// use k8s_openapi::api::networking::v1::Ingress;
///
/// let config = Configuration {
///     ingress_class: "haproxy".to_string(),
///     default_ingress_class: "nginx".to_string(),
///     ..Default::default()
/// };
///
/// // Unclassed ingress, classed controller
/// assert!(!is_valid_class(&Ingress::default(), &config));
/// ```
pub fn is_valid_class<K: ResourceExt>(resource: &K, config: &Configuration) -> bool {
    let current_class = config.ingress_class.as_str();

    let class = match get_string_annotation(INGRESS_CLASS_ANNOTATION, resource) {
        Ok(class) => class,
        Err(e) => {
            if !e.is_missing() {
                warn!("unexpected error reading ingress annotation: {}", e);
            }
            String::new()
        }
    };

    let valid = (class.is_empty() && current_class.is_empty())
        || current_class == config.default_ingress_class
        || class == current_class;

    debug!(
        "Ingress {} with class '{}' is {} for controller class '{}'",
        resource.name_any(),
        class,
        if valid { "accepted" } else { "ignored" },
        current_class
    );
    record_class_decision(valid);

    valid
}

#[cfg(test)]
#[path = "class_tests.rs"]
mod class_tests;
