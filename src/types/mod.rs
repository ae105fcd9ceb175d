// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types read by the correlator.

pub mod binding;

pub use binding::{Application, Ref, Service, ServiceBinding, ServiceBindingSpec, ServiceBindingStatus};
