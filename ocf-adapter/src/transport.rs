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

//! The local protocol stack the adapter drives.

use crate::constants::StatusCode;
use crate::correlation::request::{Request, RequestId};
use crate::endpoint::Endpoint;
use crate::message::{DiscoveryHandler, OcfResponse, ServerRequestHandle};
use crate::registration::device::OcfDevice;
use crate::registration::resource::OcfResource;
use crate::representation::RepValue;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The stack refused an operation locally.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportError {
    reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.reason)
    }
}

impl Error for TransportError {}

/// Callback surface the stack invokes whenever a response or notification for an issued
/// request is ready. Called on whatever task the stack delivers on.
#[async_trait]
pub trait ResponseListener: Send + Sync {
    async fn on_response(&self, request_id: RequestId, response: OcfResponse);
}

/// Wire-level collaborator: encoding, discovery and delivery all happen behind this trait.
///
/// Every method reports only whether the stack accepted the call locally. For requests,
/// `Ok(())` says nothing about whether a response will ever arrive.
#[async_trait]
pub trait OcfTransport: Send + Sync {
    async fn initialize(&self) -> Result<(), TransportError>;

    async fn deinitialize(&self) -> Result<(), TransportError>;

    async fn start(&self) -> Result<(), TransportError>;

    async fn stop(&self) -> Result<(), TransportError>;

    async fn set_platform(&self, manufacturer_name: &str) -> Result<(), TransportError>;

    async fn add_device(&self, device: &OcfDevice) -> Result<(), TransportError>;

    async fn add_resource(&self, resource: &OcfResource) -> Result<(), TransportError>;

    async fn delete_resource(&self, resource: &OcfResource) -> Result<(), TransportError>;

    /// Issues `request`, choosing the primitive from [`Request::kind`]. For POST and PUT this
    /// only prepares the request; [`Self::post`]/[`Self::put`] send it with the representation
    /// built in between. `listener` must receive every response carrying `request.id()`.
    async fn send(
        &self,
        request: &Request,
        listener: Arc<dyn ResponseListener>,
    ) -> Result<(), TransportError>;

    async fn cancel_observe(
        &self,
        request_id: RequestId,
        endpoint: &Endpoint,
        uri: &str,
    ) -> Result<(), TransportError>;

    async fn post(&self) -> Result<(), TransportError>;

    async fn put(&self) -> Result<(), TransportError>;

    async fn rep_start_root_object(&self) -> Result<(), TransportError>;

    async fn rep_set(&self, key: &str, value: &RepValue) -> Result<(), TransportError>;

    async fn rep_end_root_object(&self) -> Result<(), TransportError>;

    async fn send_response(
        &self,
        handle: ServerRequestHandle,
        status: StatusCode,
    ) -> Result<(), TransportError>;

    /// Starts discovery; `None` discovers every resource type.
    async fn discover(
        &self,
        resource_type: Option<&str>,
        handler: DiscoveryHandler,
    ) -> Result<(), TransportError>;

    async fn stop_discovery(&self) -> Result<(), TransportError>;

    async fn is_discovering(&self) -> bool;
}
