// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Correlation of object changes to ServiceBinding reconcile requests.

pub mod correlator;
pub mod event;
pub mod predicates;
pub mod request_set;

pub use correlator::{decode_binding, BindingRequestMapper};
pub use event::ChangedObject;
pub use request_set::{NamespacedName, ReconcileRequest, RequestSet};
