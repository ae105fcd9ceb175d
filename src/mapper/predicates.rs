// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Relationships between a changed object and a ServiceBinding.

use crate::constants::{binding, secret};
use crate::error::Result;
use crate::kubernetes::{format_gvk, TypeLookup};
use crate::mapper::ChangedObject;
use crate::types::{Application, ServiceBinding};
use kube::core::GroupVersionKind;
use kube::ResourceExt;
use tracing::trace;

pub fn is_service_binding(gvk: &GroupVersionKind) -> bool {
    gvk.group == binding::GROUP && gvk.version == binding::VERSION && gvk.kind == binding::KIND
}

pub fn is_secret(gvk: &GroupVersionKind) -> bool {
    gvk.group == secret::GROUP && gvk.version == secret::VERSION && gvk.kind == secret::KIND
}

/// A secret belongs to a binding when it lives in the binding's namespace
/// under the name recorded in the binding's status.
pub fn is_secret_owned_by(obj: &ChangedObject, sb: &ServiceBinding) -> bool {
    sb.namespace().unwrap_or_default() == obj.namespace && sb.secret_name() == obj.name
}

/// Whether the object's type matches any service declared by the binding.
///
/// References that cannot be resolved are skipped.
pub fn is_declared_service(
    lookup: &dyn TypeLookup,
    sb: &ServiceBinding,
    gvk: &GroupVersionKind,
) -> bool {
    sb.spec.services.iter().any(|svc| match lookup.kind_for_referable(svc) {
        Ok(svc_gvk) => svc_gvk == *gvk,
        Err(e) => {
            trace!("Skipping unresolvable service reference {:?}: {}", svc.reference, e);
            false
        }
    })
}

/// Whether the object is the application declared by the binding.
///
/// The application reference is always resolved first and a resolution
/// failure is returned to the caller. A reference with an explicit name
/// matches on name alone.
pub fn is_declared_application(
    lookup: &dyn TypeLookup,
    app: Option<&Application>,
    gvk: &GroupVersionKind,
    name: &str,
) -> Result<bool> {
    let Some(app) = app else {
        return Ok(false);
    };

    let app_gvk = lookup.kind_for_referable(app)?;

    if let Some(app_name) = app.name() {
        return Ok(app_name == name);
    }

    trace!(
        "Comparing application type {} with {}",
        format_gvk(&app_gvk),
        format_gvk(gvk)
    );
    Ok(app_gvk == *gvk)
}
