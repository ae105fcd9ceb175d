// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Queue of ServiceBindings awaiting reconciliation.

pub mod manager;

pub use manager::{ReconcileQueue, ReconcileQueueHandle};
