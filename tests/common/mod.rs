// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::ResourceExt;
use serde_json::json;
use std::time::Duration;

/// Create `ingress`, replacing a leftover copy from an earlier run.
pub async fn apply_ingress(
    api: &Api<Ingress>,
    ingress: &Ingress,
) -> Result<Ingress, kube::Error> {
    match api.create(&PostParams::default(), ingress).await {
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            let mut current = ingress.clone();
            current.metadata.resource_version =
                api.get(&ingress.name_any()).await?.resource_version();
            api.replace(&ingress.name_any(), &PostParams::default(), &current).await
        }
        result => result,
    }
}

/// List the ingresses of `api` until one named `name` shows up.
pub async fn wait_until_listed(
    api: &Api<Ingress>,
    name: &str,
    attempts: u32,
) -> Result<Vec<Ingress>, kube::Error> {
    for _ in 0..attempts {
        let listed = api.list(&ListParams::default()).await?;
        if listed.items.iter().any(|i| i.name_any() == name) {
            return Ok(listed.items);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Ok(Vec::new())
}

/// Delete the ingress `name`, ignoring one that is already gone.
pub async fn delete_ingress(api: &Api<Ingress>, name: &str) -> Result<(), kube::Error> {
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(()),
        Err(e) => Err(e),
    }
}

/// Build an `Ingress` routing `host` to `service:port` with the given annotations
pub fn web_ingress(
    namespace: &str,
    name: &str,
    host: &str,
    service: &str,
    port: i32,
    annotations: serde_json::Value,
) -> Ingress {
    serde_json::from_value(json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "annotations": annotations
        },
        "spec": {
            "tls": [{ "hosts": [host], "secretName": format!("{name}-tls") }],
            "rules": [{
                "host": host,
                "http": { "paths": [{
                    "path": "/",
                    "pathType": "Prefix",
                    "backend": { "service": { "name": service, "port": { "number": port } } }
                }] }
            }]
        }
    }))
    .expect("valid ingress")
}
