// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Well-known ServiceBinding type
pub mod binding {
    pub const GROUP: &str = "binding.operators.coreos.com";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "ServiceBinding";
}

/// Well-known core Secret type
pub mod secret {
    pub const GROUP: &str = "";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "Secret";
}

/// The operator name reported at startup
pub const OPERATOR_NAME: &str = "binding-correlator";

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

pub mod defaults {
    /// Upper bound on a single ServiceBinding list call
    pub const LIST_TIMEOUT_SECS: u64 = 30;
    /// Capacity of the reconcile request channel
    pub const QUEUE_CAPACITY: usize = 256;
}
