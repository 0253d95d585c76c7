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

//! Matches `(request_id, response)` deliveries back to the pending request's continuation.

use crate::correlation::request::{RequestId, RequestKind};
use crate::correlation::request_registry::RequestRegistry;
use crate::message::OcfResponse;
use crate::observability::{events, fields};
use crate::transport::ResponseListener;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "response_dispatcher";

/// Dispatcher bound to one operation kind.
///
/// Fire-once kinds take their entry out of the registry before the continuation runs, so
/// the entry is gone even if the continuation panics, and a racing sweep finds nothing.
/// Observe entries stay in place for later notifications.
pub(crate) struct ResponseDispatcher {
    kind: RequestKind,
    registry: Arc<RequestRegistry>,
}

impl ResponseDispatcher {
    pub(crate) fn new(kind: RequestKind, registry: Arc<RequestRegistry>) -> Self {
        Self { kind, registry }
    }

    /// Returns `true` when `request_id` matched a pending request.
    pub(crate) async fn dispatch(&self, request_id: RequestId, response: OcfResponse) -> bool {
        let matched = if self.kind.is_fire_once() {
            self.registry.remove_by_id(self.kind, request_id).await
        } else {
            self.registry.find_by_id(self.kind, request_id).await
        };

        let Some(request) = matched else {
            debug!(
                event = events::RESPONSE_DISPATCH_UNMATCHED,
                component = COMPONENT,
                kind = self.kind.as_str(),
                request_id,
                reason = fields::REASON_NO_PENDING_REQUEST,
                "discarding response without a pending request"
            );
            return false;
        };

        let Some(handler) = request.handler() else {
            debug!(
                event = events::RESPONSE_DISPATCH_NO_HANDLER,
                component = COMPONENT,
                kind = self.kind.as_str(),
                request_id,
                uri = request.uri(),
                "pending request has no response handler"
            );
            return true;
        };

        handler(&response);

        debug!(
            event = events::RESPONSE_DISPATCH_OK,
            component = COMPONENT,
            kind = self.kind.as_str(),
            request_id,
            endpoint = %fields::format_endpoint(request.endpoint()),
            uri = request.uri(),
            status = ?response.status,
            "dispatched response"
        );
        true
    }
}

#[async_trait]
impl ResponseListener for ResponseDispatcher {
    async fn on_response(&self, request_id: RequestId, response: OcfResponse) {
        self.dispatch(request_id, response).await;
    }
}

/// One dispatcher per kind, all sharing the same registry.
pub(crate) struct DispatcherSet {
    observe: Arc<ResponseDispatcher>,
    get: Arc<ResponseDispatcher>,
    delete: Arc<ResponseDispatcher>,
    post: Arc<ResponseDispatcher>,
    put: Arc<ResponseDispatcher>,
}

impl DispatcherSet {
    pub(crate) fn new(registry: &Arc<RequestRegistry>) -> Self {
        let build = |kind| Arc::new(ResponseDispatcher::new(kind, registry.clone()));
        Self {
            observe: build(RequestKind::Observe),
            get: build(RequestKind::Get),
            delete: build(RequestKind::Delete),
            post: build(RequestKind::Post),
            put: build(RequestKind::Put),
        }
    }

    pub(crate) fn for_kind(&self, kind: RequestKind) -> Arc<dyn ResponseListener> {
        let dispatcher = match kind {
            RequestKind::Observe => &self.observe,
            RequestKind::Get => &self.get,
            RequestKind::Delete => &self.delete,
            RequestKind::Post => &self.post,
            RequestKind::Put => &self.put,
        };
        dispatcher.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatcherSet, ResponseDispatcher};
    use crate::constants::StatusCode;
    use crate::correlation::request::{RequestKind, RequestOptions};
    use crate::correlation::request_factory::RequestFactory;
    use crate::correlation::request_registry::RequestRegistry;
    use crate::endpoint::Endpoint;
    use crate::message::{OcfResponse, ResponseHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn light() -> Endpoint {
        Endpoint::new("light", "coap://10.0.0.7:5683")
    }

    fn response(status: StatusCode) -> OcfResponse {
        OcfResponse::new(light(), "/light/1", status)
    }

    fn counting_handler() -> (Arc<AtomicUsize>, ResponseHandler) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler: ResponseHandler = Arc::new(move |_: &OcfResponse| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (calls, handler)
    }

    async fn issue(
        factory: &RequestFactory,
        registry: &RequestRegistry,
        kind: RequestKind,
        handler: Option<ResponseHandler>,
    ) -> u64 {
        let request = factory
            .create(kind, &light(), "/light/1", RequestOptions::default(), handler)
            .expect("valid request");
        let id = request.id();
        registry.insert(Arc::new(request)).await;
        id
    }

    #[tokio::test]
    async fn fire_once_response_invokes_handler_once_and_removes_entry() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = ResponseDispatcher::new(RequestKind::Get, registry.clone());
        let (calls, handler) = counting_handler();
        let id = issue(&factory, &registry, RequestKind::Get, Some(handler)).await;

        assert!(dispatcher.dispatch(id, response(StatusCode::Ok)).await);
        assert!(!dispatcher.dispatch(id, response(StatusCode::Ok)).await);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(RequestKind::Get).await, 0);
    }

    #[tokio::test]
    async fn fire_once_entry_without_handler_is_still_removed() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = ResponseDispatcher::new(RequestKind::Delete, registry.clone());
        let id = issue(&factory, &registry, RequestKind::Delete, None).await;

        assert!(dispatcher.dispatch(id, response(StatusCode::Deleted)).await);
        assert_eq!(registry.len(RequestKind::Delete).await, 0);
    }

    #[tokio::test]
    async fn observe_entry_survives_every_notification() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = ResponseDispatcher::new(RequestKind::Observe, registry.clone());
        let (calls, handler) = counting_handler();
        let id = issue(&factory, &registry, RequestKind::Observe, Some(handler)).await;

        for sequence in 0..3 {
            let notification = response(StatusCode::Ok).with_observe_sequence(sequence);
            assert!(dispatcher.dispatch(id, notification).await);
            assert_eq!(registry.len(RequestKind::Observe).await, 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn dispatch_only_looks_in_its_own_queue() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let put_dispatcher = ResponseDispatcher::new(RequestKind::Put, registry.clone());
        let (calls, handler) = counting_handler();
        let id = issue(&factory, &registry, RequestKind::Post, Some(handler)).await;

        assert!(!put_dispatcher.dispatch(id, response(StatusCode::Changed)).await);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.ids(RequestKind::Post).await, vec![id]);
    }

    #[tokio::test]
    async fn handler_receives_the_delivered_response() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = ResponseDispatcher::new(RequestKind::Post, registry.clone());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: ResponseHandler = Arc::new(move |response: &OcfResponse| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(response.status);
            }
        });
        let id = issue(&factory, &registry, RequestKind::Post, Some(handler)).await;

        dispatcher.dispatch(id, response(StatusCode::Created)).await;

        let seen = seen.lock().expect("lock should not be poisoned");
        assert_eq!(*seen, vec![StatusCode::Created]);
    }

    #[tokio::test]
    async fn entry_is_removed_even_when_handler_panics() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = Arc::new(ResponseDispatcher::new(RequestKind::Put, registry.clone()));
        let handler: ResponseHandler = Arc::new(|_: &OcfResponse| panic!("handler failure"));
        let id = issue(&factory, &registry, RequestKind::Put, Some(handler)).await;

        let task_dispatcher = dispatcher.clone();
        let outcome = tokio::spawn(async move {
            task_dispatcher
                .dispatch(id, response(StatusCode::Changed))
                .await
        })
        .await;

        assert!(outcome.is_err_and(|err| err.is_panic()));
        assert_eq!(registry.len(RequestKind::Put).await, 0);
    }

    #[tokio::test]
    async fn dispatcher_set_routes_by_kind() {
        let factory = RequestFactory::new();
        let registry = Arc::new(RequestRegistry::new());
        let dispatchers = DispatcherSet::new(&registry);
        let (calls, handler) = counting_handler();
        let id = issue(&factory, &registry, RequestKind::Delete, Some(handler)).await;

        dispatchers
            .for_kind(RequestKind::Get)
            .on_response(id, response(StatusCode::Ok))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        dispatchers
            .for_kind(RequestKind::Delete)
            .on_response(id, response(StatusCode::Deleted))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(RequestKind::Delete).await, 0);
    }
}
