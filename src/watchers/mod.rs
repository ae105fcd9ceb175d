// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch streams that drive the mapper.

pub mod metadata;
pub mod resources;

pub use metadata::refresh_on_crd_changes;
pub use resources::{resolve_watched, watch_dynamic, watch_typed};
