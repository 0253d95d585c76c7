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

use async_trait::async_trait;
use ocf_adapter::{
    DiscoveredResource, DiscoveryHandler, Endpoint, OcfDevice, OcfResource, OcfResponse,
    OcfTransport, Qos, RepValue, Representation, Request, RequestId, RequestKind,
    ResponseListener, ServerRequestHandle, StatusCode, TransportError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// What the adapter handed to [`OcfTransport::send`].
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub endpoint: Endpoint,
    pub uri: String,
    pub query: String,
    pub qos: Qos,
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    issued: Vec<IssuedRequest>,
    listeners: HashMap<RequestId, Arc<dyn ResponseListener>>,
    cancelled: Vec<RequestId>,
    platform: Option<String>,
    devices: Vec<String>,
    resources: Vec<String>,
    representation: Representation,
    representation_open: bool,
    server_responses: Vec<(ServerRequestHandle, StatusCode)>,
    discovery_results: Vec<DiscoveredResource>,
    discovering: bool,
}

/// In-memory [`OcfTransport`] that records every call and hands responses to the adapter
/// only when a test asks it to.
#[derive(Default)]
pub struct MockOcfTransport {
    state: Mutex<State>,
    reject_sends: AtomicBool,
    fail_start: AtomicBool,
}

impl MockOcfTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded history from the rest.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: &str) {
        self.state().calls.push(call.to_string());
    }

    /// Makes subsequent `send` calls fail locally.
    pub fn reject_sends(&self, reject: bool) {
        self.reject_sends.store(reject, Ordering::SeqCst);
    }

    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Resources reported to the next discovery handler.
    pub fn set_discovery_results(&self, results: Vec<DiscoveredResource>) {
        self.state().discovery_results = results;
    }

    /// Delivers `response` for `request_id` the way the stack would. Returns `false` when the
    /// id was never sent.
    pub async fn deliver(&self, request_id: RequestId, response: OcfResponse) -> bool {
        let listener = self.state().listeners.get(&request_id).cloned();
        match listener {
            Some(listener) => {
                listener.on_response(request_id, response).await;
                true
            }
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn issued(&self) -> Vec<IssuedRequest> {
        self.state().issued.clone()
    }

    /// Ids of issued requests of `kind`, in issue order.
    pub fn issued_ids(&self, kind: RequestKind) -> Vec<RequestId> {
        self.state()
            .issued
            .iter()
            .filter(|issued| issued.kind == kind)
            .map(|issued| issued.id)
            .collect()
    }

    pub fn cancelled_observations(&self) -> Vec<RequestId> {
        self.state().cancelled.clone()
    }

    pub fn platform(&self) -> Option<String> {
        self.state().platform.clone()
    }

    pub fn device_names(&self) -> Vec<String> {
        self.state().devices.clone()
    }

    pub fn resource_uris(&self) -> Vec<String> {
        self.state().resources.clone()
    }

    /// The last representation closed with `rep_end_root_object`.
    pub fn representation(&self) -> Representation {
        self.state().representation.clone()
    }

    pub fn server_responses(&self) -> Vec<(ServerRequestHandle, StatusCode)> {
        self.state().server_responses.clone()
    }
}

#[async_trait]
impl OcfTransport for MockOcfTransport {
    async fn initialize(&self) -> Result<(), TransportError> {
        self.record("initialize");
        Ok(())
    }

    async fn deinitialize(&self) -> Result<(), TransportError> {
        self.record("deinitialize");
        Ok(())
    }

    async fn start(&self) -> Result<(), TransportError> {
        self.record("start");
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(TransportError::new("stack failed to start"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        self.record("stop");
        Ok(())
    }

    async fn set_platform(&self, manufacturer_name: &str) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("set_platform".to_string());
        state.platform = Some(manufacturer_name.to_string());
        Ok(())
    }

    async fn add_device(&self, device: &OcfDevice) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("add_device".to_string());
        state.devices.push(device.name().to_string());
        Ok(())
    }

    async fn add_resource(&self, resource: &OcfResource) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("add_resource".to_string());
        state.resources.push(resource.uri().to_string());
        Ok(())
    }

    async fn delete_resource(&self, resource: &OcfResource) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("delete_resource".to_string());
        state.resources.retain(|uri| uri != resource.uri());
        Ok(())
    }

    async fn send(
        &self,
        request: &Request,
        listener: Arc<dyn ResponseListener>,
    ) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(format!("send:{}", request.kind()));
        if self.reject_sends.load(Ordering::SeqCst) {
            return Err(TransportError::new("send queue full"));
        }

        state.issued.push(IssuedRequest {
            id: request.id(),
            kind: request.kind(),
            endpoint: request.endpoint().clone(),
            uri: request.uri().to_string(),
            query: request.query().to_string(),
            qos: request.qos(),
        });
        state.listeners.insert(request.id(), listener);
        Ok(())
    }

    async fn cancel_observe(
        &self,
        request_id: RequestId,
        _endpoint: &Endpoint,
        _uri: &str,
    ) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("cancel_observe".to_string());
        state.cancelled.push(request_id);
        Ok(())
    }

    async fn post(&self) -> Result<(), TransportError> {
        self.record("post");
        Ok(())
    }

    async fn put(&self) -> Result<(), TransportError> {
        self.record("put");
        Ok(())
    }

    async fn rep_start_root_object(&self) -> Result<(), TransportError> {
        let mut state = self.state();
        if state.representation_open {
            return Err(TransportError::new("root object already open"));
        }
        state.representation_open = true;
        state.representation = Representation::new();
        Ok(())
    }

    async fn rep_set(&self, key: &str, value: &RepValue) -> Result<(), TransportError> {
        let mut state = self.state();
        if !state.representation_open {
            return Err(TransportError::new("no open root object"));
        }
        state.representation.set(key, value.clone());
        Ok(())
    }

    async fn rep_end_root_object(&self) -> Result<(), TransportError> {
        let mut state = self.state();
        if !state.representation_open {
            return Err(TransportError::new("no open root object"));
        }
        state.representation_open = false;
        Ok(())
    }

    async fn send_response(
        &self,
        handle: ServerRequestHandle,
        status: StatusCode,
    ) -> Result<(), TransportError> {
        self.state().server_responses.push((handle, status));
        Ok(())
    }

    async fn discover(
        &self,
        resource_type: Option<&str>,
        handler: DiscoveryHandler,
    ) -> Result<(), TransportError> {
        let results: Vec<DiscoveredResource> = {
            let mut state = self.state();
            state.calls.push(format!("discover:{}", resource_type.unwrap_or("*")));
            state.discovering = true;
            state
                .discovery_results
                .iter()
                .filter(|found| {
                    resource_type.map_or(true, |wanted| found.types.iter().any(|t| t == wanted))
                })
                .cloned()
                .collect()
        };

        for found in &results {
            handler(found);
        }
        Ok(())
    }

    async fn stop_discovery(&self) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("stop_discovery".to_string());
        state.discovering = false;
        Ok(())
    }

    async fn is_discovering(&self) -> bool {
        self.state().discovering
    }
}
