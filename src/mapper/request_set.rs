// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Binding identities and the deduplicating set of reconcile requests.

use crate::types::ServiceBinding;
use kube::runtime::reflector::ObjectRef;
use kube::{Resource, ResourceExt};
use std::collections::HashSet;
use std::fmt;

/// Namespace and name of a ServiceBinding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Identity of any object; cluster-scoped objects get an empty namespace
    pub fn of<K: Resource>(obj: &K) -> Self {
        Self::new(obj.namespace().unwrap_or_default(), obj.name_any())
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A ServiceBinding that needs to be reconciled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReconcileRequest {
    pub namespaced_name: NamespacedName,
}

impl From<NamespacedName> for ReconcileRequest {
    fn from(namespaced_name: NamespacedName) -> Self {
        Self { namespaced_name }
    }
}

impl From<ReconcileRequest> for ObjectRef<ServiceBinding> {
    fn from(request: ReconcileRequest) -> Self {
        let NamespacedName { namespace, name } = request.namespaced_name;
        ObjectRef::new(&name).within(&namespace)
    }
}

impl fmt::Display for ReconcileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.namespaced_name.fmt(f)
    }
}

/// Collects binding identities, each at most once
#[derive(Debug, Default)]
pub struct RequestSet {
    names: HashSet<NamespacedName>,
}

impl RequestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity; adding one that is already present is a no-op
    pub fn add(&mut self, name: NamespacedName) {
        self.names.insert(name);
    }

    /// One request per distinct identity, in no particular order
    pub fn into_requests(self) -> Vec<ReconcileRequest> {
        self.names.into_iter().map(ReconcileRequest::from).collect()
    }
}
