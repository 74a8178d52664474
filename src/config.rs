// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller configuration.
//!
//! [`ControllerArgs`] is parsed from the command line, falling back to
//! environment variables, and converted into the [`Configuration`] read by the
//! decision functions for one reconciliation cycle.

use crate::constants::DEFAULT_INGRESS_CLASS;
use clap::Parser;

/// Global configuration of one controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Ingress class served by this instance
    pub ingress_class: String,
    /// Ingress class considered the cluster default
    pub default_ingress_class: String,
    /// Split ingresses between replicas with the load balancer name annotation
    pub enable_ownership_partitioning: bool,
    /// Namespace to read ingresses from; empty means all namespaces
    pub watch_namespace: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            ingress_class: DEFAULT_INGRESS_CLASS.to_string(),
            default_ingress_class: DEFAULT_INGRESS_CLASS.to_string(),
            enable_ownership_partitioning: false,
            watch_namespace: String::new(),
        }
    }
}

/// Command line arguments of the controller binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "ingress-core", version, about = "Ingress translation core")]
pub struct ControllerArgs {
    /// Ingress class served by this instance
    #[arg(long, env = "INGRESS_CLASS", default_value = DEFAULT_INGRESS_CLASS)]
    pub ingress_class: String,

    /// Ingress class considered the cluster default
    #[arg(long, env = "DEFAULT_INGRESS_CLASS", default_value = DEFAULT_INGRESS_CLASS)]
    pub default_ingress_class: String,

    /// Only handle ingresses whose load balancer name starts with this pod's name
    #[arg(long, env = "ENABLE_OWNERSHIP_PARTITIONING", default_value_t = false)]
    pub enable_ownership_partitioning: bool,

    /// Namespace to read ingresses from (all namespaces when empty)
    #[arg(long, env = "WATCH_NAMESPACE", default_value = "")]
    pub watch_namespace: String,
}

impl From<ControllerArgs> for Configuration {
    fn from(args: ControllerArgs) -> Self {
        Self {
            ingress_class: args.ingress_class,
            default_ingress_class: args.default_ingress_class,
            enable_ownership_partitioning: args.enable_ownership_partitioning,
            watch_namespace: args.watch_namespace,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
