// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Startup gate on the ServiceBinding CRD being served

use crate::constants::binding;
use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::kubernetes::{DiscoveryTypeLookup, TypeLookup};
use kube::core::GroupVersionKind;
use kube::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Poll API discovery until ServiceBindings are served, then hand back the
/// snapshot that proved it. Retries back off exponentially from
/// POLL_INTERVAL_SECS up to POLL_MAX_INTERVAL_SECS.
pub async fn wait_for_binding_crd(client: &Client) -> DiscoveryTypeLookup {
    let binding_gvk = GroupVersionKind::gvk(binding::GROUP, binding::VERSION, binding::KIND);
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match DiscoveryTypeLookup::discover(client).await {
            Ok(lookup) if lookup.resource_for_kind(&binding_gvk).is_ok() => {
                info!(
                    "ServiceBinding CRD ({}/{}) is available",
                    binding::GROUP,
                    binding::VERSION
                );
                return lookup;
            }
            Ok(_) => {
                info!(
                    "ServiceBinding CRD ({}/{}) not yet available, waiting {} seconds...",
                    binding::GROUP,
                    binding::VERSION,
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "API discovery failed: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;
        interval = next_interval(interval);
    }
}

fn next_interval(current: u64) -> u64 {
    (current * 2).min(POLL_MAX_INTERVAL_SECS)
}
