// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{ApiResource, DynamicObject};
use kube::{Api, Client, Resource};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use binding_correlator::config::Config;
use binding_correlator::constants::{defaults, OPERATOR_NAME};
use binding_correlator::kubernetes::{wait_for_binding_crd, KubeBindingLister};
use binding_correlator::mapper::BindingRequestMapper;
use binding_correlator::queue::ReconcileQueue;
use binding_correlator::types::ServiceBinding;
use binding_correlator::watchers::{refresh_on_crd_changes, resolve_watched, watch_dynamic, watch_typed};

fn scoped_api<K>(client: Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    K::DynamicType: Default,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}

fn dynamic_api(client: Client, namespace: Option<&str>, ar: &ApiResource) -> Api<DynamicObject> {
    match namespace {
        Some(ns) => Api::namespaced_with(client, ns, ar),
        None => Api::all_with(client, ar),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting {}", OPERATOR_NAME);

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={}, list_timeout={:?}, watched_resources={}",
        config.watch_namespace.as_deref().unwrap_or("(all)"),
        config.list_timeout,
        config.watched_resources.len()
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for ServiceBinding CRD to become available...");
    let lookup = Arc::new(wait_for_binding_crd(&client).await);
    let lister = Arc::new(KubeBindingLister::new(
        client.clone(),
        config.watch_namespace.clone(),
    ));
    let mapper = BindingRequestMapper::new(lister, lookup.clone(), config.list_timeout);

    let (queue, queue_handle) = ReconcileQueue::new(defaults::QUEUE_CAPACITY);
    let namespace = config.watch_namespace.as_deref();

    let binding_ar = ApiResource::erase::<ServiceBinding>(&());
    let mut watches: Vec<BoxFuture<'static, Result<()>>> = vec![
        watch_dynamic(
            dynamic_api(client.clone(), namespace, &binding_ar),
            binding_ar,
            mapper.clone(),
            queue_handle.clone(),
        )
        .boxed(),
        watch_typed(
            scoped_api::<Secret>(client.clone(), namespace),
            mapper.clone(),
            queue_handle.clone(),
        )
        .boxed(),
    ];

    for gvr in &config.watched_resources {
        let ar = resolve_watched(lookup.as_ref(), gvr)
            .with_context(|| format!("cannot watch {}/{}/{}", gvr.group, gvr.version, gvr.resource))?;
        let api = dynamic_api(client.clone(), namespace, &ar);
        watches.push(watch_dynamic(api, ar, mapper.clone(), queue_handle.clone()).boxed());
    }
    drop(queue_handle);

    info!("Starting {} watches...", watches.len());

    tokio::try_join!(
        queue.run(),
        refresh_on_crd_changes(client.clone(), lookup),
        try_join_all(watches)
    )?;

    // This should never be reached as watches run forever
    warn!("All watches stopped unexpectedly");
    Ok(())
}
