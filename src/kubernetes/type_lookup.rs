// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolution between the Kind-form and Resource-form of a type.

use crate::error::{CorrelatorError, Result};
use kube::core::{ApiResource, GroupVersion, GroupVersionKind, GroupVersionResource, Version};
use kube::{discovery, Client};
use std::cmp::Reverse;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument, warn};

/// Anything that can name a type, directly or after resolution.
pub trait Referable {
    fn group_version_kind(&self) -> Result<GroupVersionKind>;
    fn group_version_resource(&self) -> Result<GroupVersionResource>;
}

/// Cluster type metadata service.
///
/// Only the two metadata lookups need implementing; the referable variants
/// use the form a reference already carries and fall back to a lookup when
/// it is missing.
pub trait TypeLookup: Send + Sync {
    fn resource_for_kind(&self, gvk: &GroupVersionKind) -> Result<GroupVersionResource>;

    fn kind_for_resource(&self, gvr: &GroupVersionResource) -> Result<GroupVersionKind>;

    fn resource_for_referable(&self, obj: &dyn Referable) -> Result<GroupVersionResource> {
        match obj.group_version_resource() {
            Ok(gvr) => Ok(gvr),
            Err(_) => self.resource_for_kind(&obj.group_version_kind()?),
        }
    }

    fn kind_for_referable(&self, obj: &dyn Referable) -> Result<GroupVersionKind> {
        match obj.group_version_kind() {
            Ok(gvk) => Ok(gvk),
            Err(_) => self.kind_for_resource(&obj.group_version_resource()?),
        }
    }
}

pub fn format_gvk(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        format!("{}, Kind={}", gvk.version, gvk.kind)
    } else {
        format!("{}/{}, Kind={}", gvk.group, gvk.version, gvk.kind)
    }
}

pub fn format_gvr(gvr: &GroupVersionResource) -> String {
    if gvr.group.is_empty() {
        format!("{}, Resource={}", gvr.version, gvr.resource)
    } else {
        format!("{}/{}, Resource={}", gvr.group, gvr.version, gvr.resource)
    }
}

/// [`TypeLookup`] backed by a snapshot of API discovery.
///
/// Versions are kept in discovery's stability order, so a lookup with an
/// empty version resolves to the most stable served version. The snapshot
/// must be refreshed whenever custom types are added or removed.
pub struct DiscoveryTypeLookup {
    resources: RwLock<Vec<ApiResource>>,
}

impl DiscoveryTypeLookup {
    pub fn from_resources(resources: Vec<ApiResource>) -> Self {
        Self {
            resources: RwLock::new(resources),
        }
    }

    /// Run discovery against the cluster and build a lookup from the result
    pub async fn discover(client: &Client) -> Result<Self> {
        let resources = run_discovery(client).await?;
        info!("Discovered {} API resources", resources.len());
        Ok(Self::from_resources(resources))
    }

    /// Replace the snapshot with a fresh discovery run
    #[instrument(skip(self, client))]
    pub async fn refresh(&self, client: &Client) -> Result<usize> {
        let resources = run_discovery(client).await?;
        let count = resources.len();
        *self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner) = resources;
        debug!("Type metadata refreshed with {} API resources", count);
        Ok(count)
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, Vec<ApiResource>> {
        self.resources.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Discover every served group version one at a time. A group version that
/// cannot be listed (an unavailable aggregated API, say) is left out of the
/// snapshot instead of failing the whole run.
async fn run_discovery(client: &Client) -> Result<Vec<ApiResource>> {
    let mut targets: Vec<GroupVersion> = client
        .list_core_api_versions()
        .await?
        .versions
        .iter()
        .map(|version| GroupVersion::gv("", version))
        .collect();

    for group in client.list_api_groups().await?.groups {
        let mut versions: Vec<String> = group.versions.into_iter().map(|v| v.version).collect();
        versions.sort_by_cached_key(|v| Reverse(Version::parse(v).priority()));
        targets.extend(versions.iter().map(|v| GroupVersion::gv(&group.name, v)));
    }

    let mut resources = Vec::new();
    for gv in targets {
        match discovery::pinned_group(client, &gv).await {
            Ok(group) => resources.extend(
                group
                    .versioned_resources(&gv.version)
                    .into_iter()
                    .map(|(ar, _caps)| ar),
            ),
            Err(e) => warn!("Skipping API {} during discovery: {}", gv.api_version(), e),
        }
    }
    Ok(resources)
}

impl TypeLookup for DiscoveryTypeLookup {
    fn resource_for_kind(&self, gvk: &GroupVersionKind) -> Result<GroupVersionResource> {
        let resources = self.snapshot();
        let matches: Vec<&ApiResource> = resources
            .iter()
            .filter(|ar| ar.group == gvk.group && ar.kind == gvk.kind)
            .filter(|ar| gvk.version.is_empty() || ar.version == gvk.version)
            .collect();

        let Some(first) = matches.first() else {
            return Err(CorrelatorError::ResourceNotFound(format_gvk(gvk)));
        };

        let mut plurals: Vec<&str> = matches.iter().map(|ar| ar.plural.as_str()).collect();
        plurals.sort_unstable();
        plurals.dedup();
        if plurals.len() > 1 {
            return Err(CorrelatorError::AmbiguousResource {
                kind: format_gvk(gvk),
                candidates: plurals.into_iter().map(String::from).collect(),
            });
        }

        Ok(GroupVersionResource::gvr(
            &first.group,
            &first.version,
            &first.plural,
        ))
    }

    fn kind_for_resource(&self, gvr: &GroupVersionResource) -> Result<GroupVersionKind> {
        let resources = self.snapshot();
        let matches: Vec<&ApiResource> = resources
            .iter()
            .filter(|ar| ar.group == gvr.group && ar.plural.eq_ignore_ascii_case(&gvr.resource))
            .filter(|ar| gvr.version.is_empty() || ar.version == gvr.version)
            .collect();

        let Some(first) = matches.first() else {
            return Err(CorrelatorError::KindNotFound(format_gvr(gvr)));
        };

        let mut kinds: Vec<&str> = matches.iter().map(|ar| ar.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        if kinds.len() > 1 {
            return Err(CorrelatorError::AmbiguousKind {
                resource: format_gvr(gvr),
                candidates: kinds.into_iter().map(String::from).collect(),
            });
        }

        Ok(GroupVersionKind::gvk(&first.group, &first.version, &first.kind))
    }
}
