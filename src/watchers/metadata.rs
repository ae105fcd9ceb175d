// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Keeps the type metadata snapshot in step with installed CRDs.

use crate::kubernetes::DiscoveryTypeLookup;
use futures::StreamExt;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    runtime::{
        watcher::{self, Event},
        WatchStreamExt,
    },
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Refresh `lookup` whenever a CustomResourceDefinition is added, changed or removed
pub async fn refresh_on_crd_changes(
    client: Client,
    lookup: Arc<DiscoveryTypeLookup>,
) -> anyhow::Result<()> {
    let crds: Api<CustomResourceDefinition> = Api::all(client.clone());
    info!("Watching CustomResourceDefinitions for type metadata changes");

    let (client, lookup) = (&client, &lookup);
    watcher::watcher(crds, watcher::Config::default())
        .default_backoff()
        .for_each(|event| async move {
            let reason = match event {
                Ok(Event::Apply(crd)) => format!("CRD {} applied", crd.name_any()),
                Ok(Event::Delete(crd)) => format!("CRD {} deleted", crd.name_any()),
                Ok(Event::InitDone) => "CRD watch (re)started".to_string(),
                Ok(Event::Init) | Ok(Event::InitApply(_)) => return,
                Err(e) => {
                    warn!("CRD watch error: {}", e);
                    return;
                }
            };

            debug!("{}, refreshing type metadata", reason);
            match lookup.refresh(client).await {
                Ok(count) => info!("Type metadata refreshed ({} resources) after {}", count, reason),
                Err(e) => error!("Failed to refresh type metadata: {}", e),
            }
        })
        .await;

    Ok(())
}
