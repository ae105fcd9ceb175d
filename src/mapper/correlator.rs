// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Translates a single object change into the ServiceBindings it affects.

use crate::error::{CorrelatorError, Result};
use crate::kubernetes::{BindingLister, TypeLookup};
use crate::mapper::predicates::{
    is_declared_application, is_declared_service, is_secret, is_secret_owned_by,
    is_service_binding,
};
use crate::mapper::{ChangedObject, NamespacedName, ReconcileRequest, RequestSet};
use crate::types::ServiceBinding;
use kube::api::DynamicObject;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, trace};

/// Maps changed objects to the ServiceBindings that must be reconciled.
///
/// Holds only shared, read-only collaborators; every call to [`map`](Self::map)
/// works on its own listing and request set.
#[derive(Clone)]
pub struct BindingRequestMapper {
    lister: Arc<dyn BindingLister>,
    lookup: Arc<dyn TypeLookup>,
    list_timeout: Duration,
}

impl BindingRequestMapper {
    pub fn new(
        lister: Arc<dyn BindingLister>,
        lookup: Arc<dyn TypeLookup>,
        list_timeout: Duration,
    ) -> Self {
        Self {
            lister,
            lookup,
            list_timeout,
        }
    }

    /// Requests for every binding related to `obj`.
    ///
    /// Never fails: listing problems yield no requests and are logged, and
    /// the triggering event is expected to be redelivered.
    #[instrument(skip(self, obj), fields(namespace = %obj.namespace, name = %obj.name))]
    pub async fn map(&self, obj: &ChangedObject) -> Vec<ReconcileRequest> {
        if is_service_binding(&obj.gvk) {
            let requests = vec![ReconcileRequest::from(obj.namespaced_name())];
            debug!("Current resource is a ServiceBinding, requests: {:?}", requests);
            return requests;
        }

        let items = match self.list_bindings().await {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to list service bindings: {}", e);
                return Vec::new();
            }
        };

        let mut to_reconcile = RequestSet::new();
        let obj_is_secret = is_secret(&obj.gvk);

        for item in items {
            let namespaced_name = NamespacedName::of(&item);

            let sb = match decode_binding(item) {
                Ok(sb) => sb,
                Err(e) => {
                    error!("Failed to decode ServiceBinding {}: {}", namespaced_name, e);
                    continue;
                }
            };

            self.correlate(obj, obj_is_secret, &sb, namespaced_name, &mut to_reconcile);
        }

        let requests = to_reconcile.into_requests();
        if requests.is_empty() {
            debug!("No service bindings found for resource");
        } else {
            debug!(
                "Found {} service bindings for resource: {:?}",
                requests.len(),
                requests
            );
        }
        requests
    }

    async fn list_bindings(&self) -> Result<Vec<DynamicObject>> {
        tokio::time::timeout(self.list_timeout, self.lister.list_bindings())
            .await
            .map_err(|_| CorrelatorError::ListTimeout(self.list_timeout.as_secs()))?
    }

    /// Evaluate every relationship between `obj` and one binding. An
    /// application resolution failure ends evaluation for this binding
    /// but keeps the matches recorded before it.
    fn correlate(
        &self,
        obj: &ChangedObject,
        obj_is_secret: bool,
        sb: &ServiceBinding,
        namespaced_name: NamespacedName,
        to_reconcile: &mut RequestSet,
    ) {
        if obj_is_secret && is_secret_owned_by(obj, sb) {
            debug!("Resource identified as a secret owned by {}", namespaced_name);
            to_reconcile.add(namespaced_name.clone());
        } else {
            trace!("Resource is not a secret owned by {}", namespaced_name);
        }

        if is_declared_service(self.lookup.as_ref(), sb, &obj.gvk) {
            debug!("Resource identified as a service of {}", namespaced_name);
            to_reconcile.add(namespaced_name.clone());
        } else {
            trace!("Resource is not a service declared by {}", namespaced_name);
        }

        match is_declared_application(
            self.lookup.as_ref(),
            sb.spec.application.as_ref(),
            &obj.gvk,
            &obj.name,
        ) {
            Ok(true) => {
                debug!("Resource identified as the application of {}", namespaced_name);
                to_reconcile.add(namespaced_name);
            }
            Ok(false) => {
                trace!("Resource is not the application declared by {}", namespaced_name);
            }
            Err(e) => {
                error!(
                    "Failed to identify resource as application of {}: {}",
                    namespaced_name, e
                );
            }
        }
    }
}

/// Structural decode of a listed object into a typed ServiceBinding
pub fn decode_binding(item: DynamicObject) -> Result<ServiceBinding> {
    let value = serde_json::to_value(item)?;
    Ok(serde_json::from_value(value)?)
}
