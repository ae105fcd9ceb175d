// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrelatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Listing service bindings timed out after {0}s")]
    ListTimeout(u64),

    #[error("Failed to decode ServiceBinding: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    #[error("Invalid type metadata: {0}")]
    InvalidTypeMeta(String),

    #[error("No kind registered for resource {0}")]
    KindNotFound(String),

    #[error("No resource registered for kind {0}")]
    ResourceNotFound(String),

    #[error("Resource {resource} matches multiple kinds: {candidates:?}")]
    AmbiguousKind {
        resource: String,
        candidates: Vec<String>,
    },

    #[error("Kind {kind} matches multiple resources: {candidates:?}")]
    AmbiguousResource {
        kind: String,
        candidates: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, CorrelatorError>;
