// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Listing of raw ServiceBinding objects

use crate::error::Result;
use crate::types::ServiceBinding;
use async_trait::async_trait;
use kube::{
    api::{ApiResource, DynamicObject, ListParams},
    Api, Client,
};
use tracing::{debug, instrument};

/// Source of the ServiceBindings visible to the correlator.
///
/// Items are returned undecoded so a single malformed binding can be
/// skipped without failing the whole list.
#[async_trait]
pub trait BindingLister: Send + Sync {
    async fn list_bindings(&self) -> Result<Vec<DynamicObject>>;
}

/// [`BindingLister`] reading from the Kubernetes API
pub struct KubeBindingLister {
    client: Client,
    namespace: Option<String>,
}

impl KubeBindingLister {
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        Self { client, namespace }
    }

    fn api(&self) -> Api<DynamicObject> {
        let ar = ApiResource::erase::<ServiceBinding>(&());
        match &self.namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }
}

#[async_trait]
impl BindingLister for KubeBindingLister {
    #[instrument(skip(self))]
    async fn list_bindings(&self) -> Result<Vec<DynamicObject>> {
        let list = self.api().list(&ListParams::default()).await?;
        debug!(
            "Listed {} service bindings in {}",
            list.items.len(),
            self.namespace.as_deref().unwrap_or("all namespaces")
        );
        Ok(list.items)
    }
}
