// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ingress ownership between controller replicas.
//!
//! When ownership partitioning is enabled, every `Ingress` names the replica
//! that serves it in the `ingress.alpha.k8s.io/loadbalancer-name` annotation. A
//! replica owns an `Ingress` when that name starts with its own pod name.
//!
//! # Architecture
//!
//! The pod identity is read through the [`PodInfoSource`] trait:
//! - [`KubePodInfo`] reads the pod named by the downward API from the Kubernetes API
//! - [`CachedPodInfo`] wraps any source and performs the lookup only once
//!
//! A failed lookup is an [`IdentityError`]. It is never absorbed here: the
//! driver that receives it terminates the controller.

use crate::constants::{POD_NAMESPACE_ENV, POD_NAME_ENV};
use crate::errors::IdentityError;
use crate::labels::LOADBALANCER_NAME_ANNOTATION;
use crate::metrics::record_ownership_decision;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tokio::sync::OnceCell;
use tracing::debug;

/// Identity of the pod running this controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodDetails {
    pub name: String,
    pub namespace: String,
    /// IP of the node hosting the pod, when already scheduled
    pub node_ip: Option<String>,
    pub labels: BTreeMap<String, String>,
}

/// Source of the controller pod identity.
#[async_trait]
pub trait PodInfoSource: Send + Sync {
    /// Look up the identity of the running pod.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity cannot be determined. The
    /// error is fatal for the controller.
    async fn pod_details(&self) -> Result<PodDetails, IdentityError>;
}

/// Reads the controller pod from the Kubernetes API.
///
/// The pod name and namespace come from the `POD_NAME` and `POD_NAMESPACE`
/// environment variables, which the deployment fills in through the downward API.
#[derive(Clone)]
pub struct KubePodInfo {
    client: Client,
}

impl KubePodInfo {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodInfoSource for KubePodInfo {
    async fn pod_details(&self) -> Result<PodDetails, IdentityError> {
        let name = std::env::var(POD_NAME_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(IdentityError::MissingEnvironment { name: POD_NAME_ENV })?;
        let namespace = std::env::var(POD_NAMESPACE_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(IdentityError::MissingEnvironment {
                name: POD_NAMESPACE_ENV,
            })?;

        debug!("Looking up controller pod {}/{}", namespace, name);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &namespace);
        let pod = api
            .get(&name)
            .await
            .map_err(|source| IdentityError::PodLookup {
                namespace: namespace.clone(),
                name: name.clone(),
                source,
            })?;

        let Some(pod_name) = pod.metadata.name.clone() else {
            return Err(IdentityError::IncompletePod { namespace, name });
        };

        Ok(PodDetails {
            name: pod_name,
            namespace,
            node_ip: pod.status.as_ref().and_then(|s| s.host_ip.clone()),
            labels: pod.labels().clone(),
        })
    }
}

/// Performs the wrapped lookup once and reuses the result.
///
/// Failed lookups are not cached.
pub struct CachedPodInfo<S> {
    inner: S,
    details: OnceCell<PodDetails>,
}

impl<S: PodInfoSource> CachedPodInfo<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            details: OnceCell::new(),
        }
    }
}

#[async_trait]
impl<S: PodInfoSource> PodInfoSource for CachedPodInfo<S> {
    async fn pod_details(&self) -> Result<PodDetails, IdentityError> {
        self.details
            .get_or_try_init(|| self.inner.pod_details())
            .await
            .cloned()
    }
}

/// Returns `true` if this controller replica owns `resource`.
///
/// A resource without annotations is never owned, and the pod identity is not
/// looked up for it. Otherwise the resource is owned when its load balancer
/// name starts with the pod name.
///
/// # Errors
///
/// Propagates the [`IdentityError`] of the pod lookup. Callers must treat it
/// as fatal.
pub async fn is_assigned_to_self<K, S>(resource: &K, pod_info: &S) -> Result<bool, IdentityError>
where
    K: ResourceExt,
    S: PodInfoSource + ?Sized,
{
    let annotations = resource.annotations();
    if annotations.is_empty() {
        record_ownership_decision(false);
        return Ok(false);
    }

    let pod = pod_info.pod_details().await?;
    let load_balancer = annotations
        .get(LOADBALANCER_NAME_ANNOTATION)
        .map_or("", String::as_str);
    let owned = load_balancer.starts_with(pod.name.as_str());

    debug!(
        "Ingress {} load balancer '{}' {} assigned to pod {}",
        resource.name_any(),
        load_balancer,
        if owned { "is" } else { "is not" },
        pod.name
    );
    record_ownership_decision(owned);

    Ok(owned)
}

#[cfg(test)]
#[path = "ownership_tests.rs"]
mod ownership_tests;
