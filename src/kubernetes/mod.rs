// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes collaborators: type metadata lookup, binding listing and CRD discovery.

pub mod crd;
pub mod lister;
pub mod type_lookup;

pub use crd::wait_for_binding_crd;
pub use lister::{BindingLister, KubeBindingLister};
pub use type_lookup::{format_gvk, format_gvr, DiscoveryTypeLookup, Referable, TypeLookup};
