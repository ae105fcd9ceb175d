// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watches that feed object changes through the mapper into the queue.

use crate::error::Result;
use crate::kubernetes::{format_gvr, TypeLookup};
use crate::mapper::{BindingRequestMapper, ChangedObject};
use crate::queue::ReconcileQueueHandle;
use futures::StreamExt;
use kube::{
    api::{ApiResource, DynamicObject},
    core::{GroupVersionResource, TypeMeta},
    runtime::{watcher, WatchStreamExt},
    Api, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, instrument, warn};

/// Watch a statically typed resource and correlate every change
pub async fn watch_typed<K>(
    api: Api<K>,
    mapper: BindingRequestMapper,
    queue: ReconcileQueueHandle,
) -> anyhow::Result<()>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug + Send + Sync + 'static,
{
    let kind = K::kind(&()).to_string();
    info!("Watching {} changes", kind);

    let (mapper, queue, kind) = (&mapper, &queue, &kind);
    watcher(api, watcher::Config::default())
        .default_backoff()
        .touched_objects()
        .for_each(|res| async move {
            match res {
                Ok(obj) => match ChangedObject::from_resource(&obj) {
                    Ok(changed) => forward(mapper, queue, &changed).await,
                    Err(e) => warn!("Ignoring {} {}: {}", kind, obj.name_any(), e),
                },
                Err(e) => warn!("{} watch error: {}", kind, e),
            }
        })
        .await;

    Ok(())
}

/// Watch a resource only known at runtime and correlate every change.
///
/// Objects are kept undecoded, so one malformed object cannot stall the
/// watch for every other object of its type.
pub async fn watch_dynamic(
    api: Api<DynamicObject>,
    ar: ApiResource,
    mapper: BindingRequestMapper,
    queue: ReconcileQueueHandle,
) -> anyhow::Result<()> {
    info!("Watching {} changes", ar.kind);

    let (mapper, queue, ar) = (&mapper, &queue, &ar);
    watcher(api, watcher::Config::default())
        .default_backoff()
        .touched_objects()
        .for_each(|res| async move {
            match res {
                Ok(obj) => match ChangedObject::from_dynamic(&with_type_meta(obj, ar)) {
                    Ok(changed) => forward(mapper, queue, &changed).await,
                    Err(e) => warn!("Ignoring {} object: {}", ar.kind, e),
                },
                Err(e) => warn!("{} watch error: {}", ar.kind, e),
            }
        })
        .await;

    Ok(())
}

#[instrument(skip_all, fields(object = %format!("{}/{}", changed.namespace, changed.name)))]
async fn forward(
    mapper: &BindingRequestMapper,
    queue: &ReconcileQueueHandle,
    changed: &ChangedObject,
) {
    let requests = mapper.map(changed).await;
    debug!("{} {} mapped to {} requests", changed.gvk.kind, changed.name, requests.len());
    queue.send_all(requests).await;
}

/// Watch events do not always carry `apiVersion`/`kind`; fill them from the watched type
fn with_type_meta(mut obj: DynamicObject, ar: &ApiResource) -> DynamicObject {
    if obj.types.as_ref().map_or(true, |t| t.kind.is_empty()) {
        obj.types = Some(TypeMeta {
            api_version: ar.api_version.clone(),
            kind: ar.kind.clone(),
        });
    }
    obj
}

/// Resolve a configured Resource-form type into something a watch can be built from
pub fn resolve_watched(lookup: &dyn TypeLookup, gvr: &GroupVersionResource) -> Result<ApiResource> {
    let gvk = lookup.kind_for_resource(gvr)?;
    debug!("Resolved {} to kind {}", format_gvr(gvr), gvk.kind);
    Ok(ApiResource::from_gvk_with_plural(&gvk, &gvr.resource))
}
