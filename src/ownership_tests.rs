// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `ownership.rs`

use super::*;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pod identity source returning a fixed name and counting lookups
struct FakePodInfo {
    name: Option<&'static str>,
    calls: AtomicUsize,
}

impl FakePodInfo {
    fn named(name: &'static str) -> Self {
        Self {
            name: Some(name),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            name: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PodInfoSource for FakePodInfo {
    async fn pod_details(&self) -> Result<PodDetails, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.name {
            Some(name) => Ok(PodDetails {
                name: name.to_string(),
                namespace: "ingress".to_string(),
                ..Default::default()
            }),
            None => Err(IdentityError::MissingEnvironment { name: POD_NAME_ENV }),
        }
    }
}

fn ingress_with(annotations: Option<&[(&str, &str)]>) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some("web".to_string()),
            namespace: Some("default".to_string()),
            annotations: annotations.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_no_annotations_skips_lookup() {
    let pod = FakePodInfo::failing();

    let owned = is_assigned_to_self(&ingress_with(None), &pod).await;

    assert!(matches!(owned, Ok(false)));
    assert_eq!(pod.calls(), 0);
}

#[tokio::test]
async fn test_empty_annotations_skip_lookup() {
    let pod = FakePodInfo::failing();

    let owned = is_assigned_to_self(&ingress_with(Some(&[])), &pod).await;

    assert!(matches!(owned, Ok(false)));
    assert_eq!(pod.calls(), 0);
}

#[tokio::test]
async fn test_load_balancer_prefixed_by_pod_name() {
    let pod = FakePodInfo::named("ingress-controller-0");
    let ing = ingress_with(Some(&[(
        LOADBALANCER_NAME_ANNOTATION,
        "ingress-controller-0-public",
    )]));

    assert!(is_assigned_to_self(&ing, &pod).await.unwrap());
    assert_eq!(pod.calls(), 1);
}

#[tokio::test]
async fn test_exact_load_balancer_name() {
    let pod = FakePodInfo::named("ingress-controller-0");
    let ing = ingress_with(Some(&[(LOADBALANCER_NAME_ANNOTATION, "ingress-controller-0")]));

    assert!(is_assigned_to_self(&ing, &pod).await.unwrap());
}

#[tokio::test]
async fn test_other_replica_does_not_own() {
    let pod = FakePodInfo::named("ingress-controller-1");
    let ing = ingress_with(Some(&[(LOADBALANCER_NAME_ANNOTATION, "ingress-controller-0")]));

    assert!(!is_assigned_to_self(&ing, &pod).await.unwrap());
}

#[tokio::test]
async fn test_pod_name_longer_than_load_balancer() {
    let pod = FakePodInfo::named("ingress-controller-0");
    let ing = ingress_with(Some(&[(LOADBALANCER_NAME_ANNOTATION, "ingress")]));

    assert!(!is_assigned_to_self(&ing, &pod).await.unwrap());
}

#[tokio::test]
async fn test_missing_load_balancer_annotation() {
    let pod = FakePodInfo::named("ingress-controller-0");
    let ing = ingress_with(Some(&[("kubernetes.io/ingress.class", "nginx")]));

    assert!(!is_assigned_to_self(&ing, &pod).await.unwrap());
    assert_eq!(pod.calls(), 1);
}

#[tokio::test]
async fn test_lookup_failure_is_propagated() {
    let pod = FakePodInfo::failing();
    let ing = ingress_with(Some(&[(LOADBALANCER_NAME_ANNOTATION, "ingress-controller-0")]));

    let result = is_assigned_to_self(&ing, &pod).await;

    assert!(matches!(
        result,
        Err(IdentityError::MissingEnvironment { name: "POD_NAME" })
    ));
}

#[tokio::test]
async fn test_cached_pod_info_looks_up_once() {
    let cached = CachedPodInfo::new(FakePodInfo::named("ingress-controller-0"));
    let ing = ingress_with(Some(&[(LOADBALANCER_NAME_ANNOTATION, "ingress-controller-0")]));

    for _ in 0..3 {
        assert!(is_assigned_to_self(&ing, &cached).await.unwrap());
    }
    assert_eq!(cached.inner.calls(), 1);
}

#[tokio::test]
async fn test_cached_pod_info_does_not_cache_failures() {
    let cached = CachedPodInfo::new(FakePodInfo::failing());

    assert!(cached.pod_details().await.is_err());
    assert!(cached.pod_details().await.is_err());
    assert_eq!(cached.inner.calls(), 2);
}
