/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Pending-request storage, one insertion-ordered queue per [`RequestKind`].

use crate::correlation::request::{Request, RequestId, RequestKind};
use crate::endpoint::Endpoint;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

type RequestQueue = Vec<Arc<Request>>;

/// Owner of every pending request. Callers only go through these operations.
///
/// Queues stay small (bounded by outstanding operations), so lookups are linear scans.
/// Removal always matches on the id value, never on a queue position.
pub(crate) struct RequestRegistry {
    observe: Mutex<RequestQueue>,
    get: Mutex<RequestQueue>,
    delete: Mutex<RequestQueue>,
    post: Mutex<RequestQueue>,
    put: Mutex<RequestQueue>,
}

impl RequestRegistry {
    /// Creates a registry with five empty queues.
    pub(crate) fn new() -> Self {
        Self {
            observe: Mutex::new(Vec::new()),
            get: Mutex::new(Vec::new()),
            delete: Mutex::new(Vec::new()),
            post: Mutex::new(Vec::new()),
            put: Mutex::new(Vec::new()),
        }
    }

    fn queue(&self, kind: RequestKind) -> &Mutex<RequestQueue> {
        match kind {
            RequestKind::Observe => &self.observe,
            RequestKind::Get => &self.get,
            RequestKind::Delete => &self.delete,
            RequestKind::Post => &self.post,
            RequestKind::Put => &self.put,
        }
    }

    /// Appends `request` to the queue of its kind.
    pub(crate) async fn insert(&self, request: Arc<Request>) {
        self.queue(request.kind()).lock().await.push(request);
    }

    pub(crate) async fn find_by_id(&self, kind: RequestKind, id: RequestId) -> Option<Arc<Request>> {
        self.queue(kind)
            .lock()
            .await
            .iter()
            .find(|request| request.id() == id)
            .cloned()
    }

    /// Removes the entry with `id`. Returns `None`, and changes nothing, when it is absent.
    pub(crate) async fn remove_by_id(
        &self,
        kind: RequestKind,
        id: RequestId,
    ) -> Option<Arc<Request>> {
        let mut queue = self.queue(kind).lock().await;
        let position = queue.iter().position(|request| request.id() == id)?;
        Some(queue.remove(position))
    }

    /// Evicts every entry of a fire-once queue older than `timeout` at `now`, handing each
    /// one to `on_evict`. Observe entries are never expired.
    pub(crate) async fn for_each_expired<F>(
        &self,
        kind: RequestKind,
        now: Instant,
        timeout: Duration,
        mut on_evict: F,
    ) -> usize
    where
        F: FnMut(&Request),
    {
        if !kind.is_fire_once() {
            return 0;
        }

        let mut queue = self.queue(kind).lock().await;
        let before = queue.len();
        queue.retain(|request| {
            if request.age(now) > timeout {
                on_evict(request);
                false
            } else {
                true
            }
        });
        before - queue.len()
    }

    /// Snapshot of the observe queue, in insertion order.
    pub(crate) async fn observe_entries(&self) -> Vec<Arc<Request>> {
        self.observe.lock().await.clone()
    }

    /// Removes the first observe entry targeting `endpoint` and `uri`.
    pub(crate) async fn remove_observe_for(
        &self,
        endpoint: &Endpoint,
        uri: &str,
    ) -> Option<Arc<Request>> {
        let mut queue = self.observe.lock().await;
        let position = queue
            .iter()
            .position(|request| request.targets(endpoint, uri))?;
        Some(queue.remove(position))
    }

    pub(crate) async fn ids(&self, kind: RequestKind) -> Vec<RequestId> {
        self.queue(kind)
            .lock()
            .await
            .iter()
            .map(|request| request.id())
            .collect()
    }

    pub(crate) async fn len(&self, kind: RequestKind) -> usize {
        self.queue(kind).lock().await.len()
    }

    /// Drops every pending request of every kind.
    pub(crate) async fn clear(&self) {
        for kind in RequestKind::ALL {
            self.queue(kind).lock().await.clear();
        }
    }
}
