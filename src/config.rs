// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{bail, Context, Result};
use kube::core::GroupVersionResource;
use std::env;
use std::time::Duration;

/// Correlator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Restrict ServiceBinding listing to this namespace; all namespaces when unset
    pub watch_namespace: Option<String>,
    pub list_timeout: Duration,
    /// Additional resource types whose changes are correlated to bindings
    pub watched_resources: Vec<GroupVersionResource>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let watch_namespace = env::var("WATCH_NAMESPACE")
            .ok()
            .filter(|ns| !ns.trim().is_empty());

        let list_timeout = match env::var("LIST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => Duration::from_secs(defaults::LIST_TIMEOUT_SECS),
        };

        let watched_resources = match env::var("WATCHED_RESOURCES") {
            Ok(raw) => parse_resource_list(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Config {
            watch_namespace,
            list_timeout,
            watched_resources,
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("LIST_TIMEOUT_SECS is not a number: {raw:?}"))?;
    if secs == 0 {
        bail!("LIST_TIMEOUT_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a comma-separated list of `group/version/resource` entries.
/// Core group resources are written as `version/resource`.
pub fn parse_resource_list(raw: &str) -> Result<Vec<GroupVersionResource>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_resource)
        .collect()
}

pub fn parse_resource(entry: &str) -> Result<GroupVersionResource> {
    let parts: Vec<&str> = entry.split('/').collect();
    let (group, version, resource) = match parts.as_slice() {
        [version, resource] => ("", *version, *resource),
        [group, version, resource] => (*group, *version, *resource),
        _ => bail!("invalid resource {entry:?}, expected group/version/resource"),
    };
    if version.is_empty() || resource.is_empty() {
        bail!("invalid resource {entry:?}, version and resource are required");
    }
    Ok(GroupVersionResource::gvr(group, version, &resource.to_lowercase()))
}
