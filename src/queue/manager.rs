// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Hand-off point for ServiceBindings that need reconciliation.

use crate::mapper::{NamespacedName, ReconcileRequest};
use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Receives reconcile requests from the watchers
pub struct ReconcileQueue {
    request_rx: mpsc::Receiver<ReconcileRequest>,
}

/// Handle to send requests to the ReconcileQueue
#[derive(Clone)]
pub struct ReconcileQueueHandle {
    request_tx: mpsc::Sender<ReconcileRequest>,
}

impl ReconcileQueueHandle {
    pub async fn send(&self, request: ReconcileRequest) {
        if let Err(e) = self.request_tx.send(request).await {
            error!("Failed to send request to ReconcileQueue: {}", e);
        }
    }

    pub async fn send_all(&self, requests: Vec<ReconcileRequest>) {
        for request in requests {
            self.send(request).await;
        }
    }
}

impl ReconcileQueue {
    pub fn new(capacity: usize) -> (Self, ReconcileQueueHandle) {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        (Self { request_rx }, ReconcileQueueHandle { request_tx })
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("ReconcileQueue started, waiting for requests...");

        while let Some(batch) = self.next_batch().await {
            for name in batch {
                info!("ServiceBinding {} needs reconciliation", name);
            }
        }

        info!("All request senders dropped, ReconcileQueue stopping");
        Ok(())
    }

    /// Wait for the next request, then drain whatever else is already
    /// pending. Requests for the same binding are coalesced.
    pub async fn next_batch(&mut self) -> Option<BTreeSet<NamespacedName>> {
        let first = self.request_rx.recv().await?;

        let mut batch = BTreeSet::from([first.namespaced_name]);
        let mut received = 1;
        while let Ok(request) = self.request_rx.try_recv() {
            batch.insert(request.namespaced_name);
            received += 1;
        }

        if received > batch.len() {
            debug!(
                "Coalesced {} requests into {} distinct bindings",
                received,
                batch.len()
            );
        }
        Some(batch)
    }
}
