// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use ingress_core::{
    annotations::extract_location_annotations,
    config::{Configuration, ControllerArgs},
    metrics::{gather_metrics, record_translation},
    ownership::{CachedPodInfo, KubePodInfo},
    translate::{build_servers, should_handle},
};
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::ListParams, Api, Client, ResourceExt};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("ingress-core")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

fn init_logging() {
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT environment variable for output format (json or text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main() -> Result<()> {
    init_logging();

    let config = Configuration::from(ControllerArgs::parse());
    info!(
        "Starting ingress translation (class '{}', default class '{}', partitioning {})",
        config.ingress_class, config.default_ingress_class, config.enable_ownership_partitioning
    );

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    let pod_info = CachedPodInfo::new(KubePodInfo::new(client.clone()));

    let api: Api<Ingress> = if config.watch_namespace.is_empty() {
        Api::all(client)
    } else {
        Api::namespaced(client, &config.watch_namespace)
    };
    let ingresses = api.list(&ListParams::default()).await?;
    info!("Found {} ingress(es)", ingresses.items.len());

    // The certificate store lives outside this binary; servers fall back to no certificate.
    let certs = BTreeMap::new();

    for ingress in &ingresses.items {
        let started = Instant::now();
        let name = format!(
            "{}/{}",
            ingress.namespace().unwrap_or_default(),
            ingress.name_any()
        );

        let handled = match should_handle(ingress, &config, &pod_info).await {
            Ok(handled) => handled,
            Err(e) => {
                error!("CRITICAL: unexpected error obtaining pod information: {}", e);
                record_translation("error", started.elapsed());
                return Err(e.into());
            }
        };

        if !handled {
            debug!("Skipping ingress {}", name);
            record_translation("skipped", started.elapsed());
            continue;
        }

        let extracted = extract_location_annotations(ingress);
        let servers = build_servers(ingress, &extracted, &certs, None);
        record_translation("translated", started.elapsed());

        for server in &servers {
            let denied = server
                .locations
                .iter()
                .filter(|l| l.denied.is_denied())
                .count();
            info!(
                "Ingress {} server {}: {} location(s), {} denied",
                name,
                server.hostname,
                server.locations.len(),
                denied
            );
        }
        debug!("Ingress {} model: {}", name, serde_json::to_string(&servers)?);
    }

    debug!("Metrics:\n{}", gather_metrics()?);
    Ok(())
}
