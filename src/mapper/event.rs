// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The changed object handed to the mapper.

use crate::error::{CorrelatorError, Result};
use crate::mapper::NamespacedName;
use kube::api::DynamicObject;
use kube::core::GroupVersionKind;
use kube::{Resource, ResourceExt};
use serde::Serialize;

/// A created, updated or deleted object together with its type
#[derive(Debug, Clone)]
pub struct ChangedObject {
    pub gvk: GroupVersionKind,
    /// Empty for cluster-scoped objects
    pub namespace: String,
    pub name: String,
    pub attributes: serde_json::Value,
}

impl ChangedObject {
    /// Build from a statically typed resource
    pub fn from_resource<K>(obj: &K) -> Result<Self>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let gvk = GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()));
        Ok(Self {
            gvk,
            namespace: obj.namespace().unwrap_or_default(),
            name: obj.name_any(),
            attributes: serde_json::to_value(obj)?,
        })
    }

    /// Build from a dynamic object, reading the type from its `apiVersion` and `kind`
    pub fn from_dynamic(obj: &DynamicObject) -> Result<Self> {
        let Some(types) = obj.types.as_ref() else {
            return Err(CorrelatorError::InvalidTypeMeta(format!(
                "object {} carries no apiVersion/kind",
                obj.name_any()
            )));
        };
        if types.kind.is_empty() || types.api_version.is_empty() {
            return Err(CorrelatorError::InvalidTypeMeta(format!(
                "object {} has apiVersion {:?} and kind {:?}",
                obj.name_any(),
                types.api_version,
                types.kind
            )));
        }

        let (group, version) = match types.api_version.split_once('/') {
            Some((g, v)) => (g, v),
            None => ("", types.api_version.as_str()),
        };
        if version.is_empty() || version.contains('/') {
            return Err(CorrelatorError::InvalidTypeMeta(format!(
                "malformed apiVersion {:?}",
                types.api_version
            )));
        }

        Ok(Self {
            gvk: GroupVersionKind::gvk(group, version, &types.kind),
            namespace: obj.namespace().unwrap_or_default(),
            name: obj.name_any(),
            attributes: serde_json::to_value(obj)?,
        })
    }

    pub fn namespaced_name(&self) -> NamespacedName {
        NamespacedName::new(self.namespace.clone(), self.name.clone())
    }
}
