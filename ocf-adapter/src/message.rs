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

//! Records exchanged with the transport and the handler types that consume them.

use crate::constants::{InterfaceMask, Method, StatusCode};
use crate::endpoint::Endpoint;
use crate::representation::Representation;
use std::sync::Arc;

/// Continuation of an outgoing request, called with each matching response.
pub type ResponseHandler = Arc<dyn Fn(&OcfResponse) + Send + Sync>;

/// Server-side handler bound to a resource method.
pub type ResourceHandler = Arc<dyn Fn(&ServerRequest) + Send + Sync>;

/// Called once per resource found during discovery.
pub type DiscoveryHandler = Arc<dyn Fn(&DiscoveredResource) + Send + Sync>;

/// A response or observe notification delivered by the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct OcfResponse {
    pub endpoint: Endpoint,
    pub uri: String,
    pub status: StatusCode,
    pub payload: Representation,
    /// Sequence number of an observe notification, `None` for plain responses.
    pub observe_sequence: Option<u32>,
}

impl OcfResponse {
    pub fn new(endpoint: Endpoint, uri: &str, status: StatusCode) -> Self {
        Self {
            endpoint,
            uri: uri.to_string(),
            status,
            payload: Representation::default(),
            observe_sequence: None,
        }
    }

    pub fn with_payload(mut self, payload: Representation) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_observe_sequence(mut self, sequence: u32) -> Self {
        self.observe_sequence = Some(sequence);
        self
    }
}

/// Transport-issued handle used to answer an incoming request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ServerRequestHandle(pub u64);

/// An incoming request addressed to one of our resources.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerRequest {
    pub handle: ServerRequestHandle,
    pub method: Method,
    pub uri: String,
    pub query: String,
    pub payload: Representation,
}

/// A remote resource reported by discovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoveredResource {
    pub endpoint: Endpoint,
    pub uri: String,
    pub types: Vec<String>,
    pub interface_mask: InterfaceMask,
}
