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

//! The `OcfAdapter` facade application code talks to.

use crate::config::{AdapterConfig, ConfigError, DeviceConfig, RequestTrackingConfig};
use crate::constants::StatusCode;
use crate::correlation::request::{Request, RequestId, RequestKind, RequestOptions};
use crate::correlation::request_factory::RequestFactory;
use crate::correlation::request_registry::RequestRegistry;
use crate::correlation::response_dispatcher::DispatcherSet;
use crate::correlation::stale_request_sweeper::{StaleRequestSweeper, SweeperHandle};
use crate::endpoint::Endpoint;
use crate::message::{DiscoveryHandler, ResponseHandler, ServerRequestHandle};
use crate::observability::{events, fields};
use crate::registration::device::OcfDevice;
use crate::registration::registration_table::RegistrationTable;
use crate::registration::resource::OcfResource;
use crate::representation::RepValue;
use crate::transport::{OcfTransport, TransportError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn, Level};

const COMPONENT: &str = "ocf_adapter";

/// Failures of the adapter's lifecycle, registration and representation calls.
///
/// Request issuance never produces one of these; it reports acceptance as a `bool`.
#[derive(Debug)]
pub enum AdapterError {
    Transport(TransportError),
    InvalidConfig(ConfigError),
    UnknownDevice(usize),
    DuplicateResource(String),
    UnknownResource(String),
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::Transport(err) => write!(f, "local stack refused the call: {err}"),
            AdapterError::InvalidConfig(err) => write!(f, "invalid configuration: {err}"),
            AdapterError::UnknownDevice(id) => write!(f, "no device with id {id}"),
            AdapterError::DuplicateResource(uri) => {
                write!(f, "a resource is already registered at {uri}")
            }
            AdapterError::UnknownResource(uri) => write!(f, "no resource registered at {uri}"),
        }
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AdapterError::Transport(err) => Some(err),
            AdapterError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for AdapterError {
    fn from(err: TransportError) -> Self {
        AdapterError::Transport(err)
    }
}

impl From<ConfigError> for AdapterError {
    fn from(err: ConfigError) -> Self {
        AdapterError::InvalidConfig(err)
    }
}

/// Client and server facade over an [`OcfTransport`].
///
/// GET, DELETE, OBSERVE and the first phase of POST/PUT all go through the same path: a fresh
/// request is built, registered under its kind, and handed to the transport together with the
/// dispatcher for that kind. The returned `bool` is the transport's local acceptance; a
/// rejected request is not left registered. Responses reach the caller's handler later, on
/// whatever task the transport delivers them.
///
/// The request is registered before the transport sees it, which leaves two windows open
/// while `send` is in flight:
/// - A response the transport delivers from inside a `send` that then fails still runs the
///   handler once, although the call returns `false`.
/// - A concurrent [`stop_observe`](Self::stop_observe) for the same endpoint and uri can
///   withdraw the observation and ask the transport to cancel an id it has not accepted yet.
///   If `send` then fails, the withdrawal is a no-op.
pub struct OcfAdapter {
    name: String,
    transport: Arc<dyn OcfTransport>,
    request_factory: RequestFactory,
    request_registry: Arc<RequestRegistry>,
    dispatchers: DispatcherSet,
    request_tracking: RequestTrackingConfig,
    sweeper: Option<SweeperHandle>,
    registrations: RegistrationTable,
}

impl OcfAdapter {
    /// Initializes `transport`, then registers the configured platform and initial device.
    ///
    /// The adapter is stopped afterwards; call [`Self::start`] to begin request tracking.
    pub async fn new(
        name: &str,
        transport: Arc<dyn OcfTransport>,
        config: AdapterConfig,
    ) -> Result<Self, AdapterError> {
        if let Err(err) = config.validate() {
            warn!(
                event = events::ADAPTER_INITIALIZE_FAILED,
                component = COMPONENT,
                adapter = name,
                err = %err,
                "rejecting adapter configuration"
            );
            return Err(err.into());
        }

        if let Err(err) = transport.initialize().await {
            warn!(
                event = events::ADAPTER_INITIALIZE_FAILED,
                component = COMPONENT,
                adapter = name,
                err = %err,
                "local stack failed to initialize"
            );
            return Err(err.into());
        }

        let request_registry = Arc::new(RequestRegistry::new());
        let dispatchers = DispatcherSet::new(&request_registry);
        let mut adapter = Self {
            name: name.to_string(),
            transport,
            request_factory: RequestFactory::new(),
            request_registry,
            dispatchers,
            request_tracking: config.request_tracking,
            sweeper: None,
            registrations: RegistrationTable::new(),
        };

        adapter
            .set_platform(&config.platform.manufacturer_name)
            .await?;
        adapter.add_device(config.device).await?;

        info!(
            event = events::ADAPTER_INITIALIZE_OK,
            component = COMPONENT,
            adapter = adapter.name.as_str(),
            response_timeout_ms = adapter.request_tracking.response_timeout_ms,
            sweep_interval_ms = adapter.request_tracking.sweep_interval_ms,
            "adapter initialized"
        );
        Ok(adapter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request_tracking(&self) -> RequestTrackingConfig {
        self.request_tracking
    }

    pub fn is_running(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Starts the stale-request sweeper, then the local stack. A no-op when already running.
    pub async fn start(&mut self) -> Result<(), AdapterError> {
        if self.sweeper.is_some() {
            return Ok(());
        }

        let sweeper = StaleRequestSweeper::new(
            self.request_registry.clone(),
            self.request_tracking.response_timeout(),
        )
        .spawn(self.request_tracking.sweep_interval());

        if let Err(err) = self.transport.start().await {
            warn!(
                event = events::ADAPTER_START_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                err = %err,
                "local stack failed to start"
            );
            sweeper.stop().await;
            return Err(err.into());
        }

        self.sweeper = Some(sweeper);
        info!(
            event = events::ADAPTER_START,
            component = COMPONENT,
            adapter = self.name.as_str(),
            "adapter started"
        );
        Ok(())
    }

    /// Stops the local stack, then the sweeper. A no-op when not running.
    ///
    /// The sweeper is stopped even when the stack reports an error.
    pub async fn stop(&mut self) -> Result<(), AdapterError> {
        let Some(sweeper) = self.sweeper.take() else {
            return Ok(());
        };

        let stopped = self.transport.stop().await;
        sweeper.stop().await;

        if let Err(err) = stopped {
            warn!(
                event = events::ADAPTER_STOP_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                err = %err,
                "local stack failed to stop"
            );
            return Err(err.into());
        }

        info!(
            event = events::ADAPTER_STOP,
            component = COMPONENT,
            adapter = self.name.as_str(),
            "adapter stopped"
        );
        Ok(())
    }

    /// Stops if running, drops every pending request and deinitializes the local stack.
    pub async fn deinitialize(mut self) -> Result<(), AdapterError> {
        let stopped = self.stop().await;
        self.request_registry.clear().await;
        self.transport.deinitialize().await?;

        info!(
            event = events::ADAPTER_DEINITIALIZE,
            component = COMPONENT,
            adapter = self.name.as_str(),
            "adapter deinitialized"
        );
        stopped
    }

    pub async fn set_platform(&mut self, manufacturer_name: &str) -> Result<(), AdapterError> {
        self.transport.set_platform(manufacturer_name).await?;
        self.registrations.set_platform(manufacturer_name);

        info!(
            event = events::PLATFORM_SET,
            component = COMPONENT,
            adapter = self.name.as_str(),
            manufacturer_name,
            "platform set"
        );
        Ok(())
    }

    pub fn platform(&self) -> &str {
        self.registrations.platform()
    }

    /// Registers a device and returns its id. Ids are handed out sequentially from 0.
    pub async fn add_device(&mut self, config: DeviceConfig) -> Result<usize, AdapterError> {
        config.validate()?;
        let device = self.registrations.prepare_device(config);

        if let Err(err) = self.transport.add_device(&device).await {
            warn!(
                event = events::DEVICE_ADD_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                uri = device.uri(),
                err = %err,
                "local stack refused device"
            );
            return Err(err.into());
        }

        info!(
            event = events::DEVICE_ADD_OK,
            component = COMPONENT,
            adapter = self.name.as_str(),
            device_id = device.id(),
            uri = device.uri(),
            "device added"
        );
        Ok(self.registrations.commit_device(device))
    }

    pub fn devices(&self) -> &[OcfDevice] {
        self.registrations.devices()
    }

    pub fn device(&self, index: usize) -> Option<&OcfDevice> {
        self.registrations.devices().get(index)
    }

    /// Registers `resource` with the local stack, giving each bound method a fresh handler id.
    pub async fn add_resource(&mut self, mut resource: OcfResource) -> Result<(), AdapterError> {
        if !self.registrations.has_device(resource.device_id()) {
            return Err(AdapterError::UnknownDevice(resource.device_id()));
        }
        if self.registrations.has_resource(resource.uri()) {
            return Err(AdapterError::DuplicateResource(resource.uri().to_string()));
        }

        self.registrations.assign_handler_ids(&mut resource);
        if let Err(err) = self.transport.add_resource(&resource).await {
            warn!(
                event = events::RESOURCE_ADD_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                uri = resource.uri(),
                err = %err,
                "local stack refused resource"
            );
            return Err(err.into());
        }

        info!(
            event = events::RESOURCE_ADD_OK,
            component = COMPONENT,
            adapter = self.name.as_str(),
            device_id = resource.device_id(),
            uri = resource.uri(),
            "resource added"
        );
        self.registrations.commit_resource(resource);
        Ok(())
    }

    /// Unregisters the resource at `uri`. It is only forgotten once the stack accepts.
    pub async fn delete_resource(&mut self, uri: &str) -> Result<(), AdapterError> {
        let Some(resource) = self.registrations.resource(uri) else {
            return Err(AdapterError::UnknownResource(uri.to_string()));
        };

        if let Err(err) = self.transport.delete_resource(resource).await {
            warn!(
                event = events::RESOURCE_DELETE_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                uri,
                err = %err,
                "local stack refused resource removal"
            );
            return Err(err.into());
        }

        self.registrations.remove_resource(uri);
        info!(
            event = events::RESOURCE_DELETE_OK,
            component = COMPONENT,
            adapter = self.name.as_str(),
            uri,
            "resource deleted"
        );
        Ok(())
    }

    pub fn resources(&self) -> &[OcfResource] {
        self.registrations.resources()
    }

    pub async fn rep_start_root_object(&self) -> Result<(), AdapterError> {
        let result = self.transport.rep_start_root_object().await;
        self.representation_result(result)
    }

    pub async fn rep_set(&self, key: &str, value: impl Into<RepValue>) -> Result<(), AdapterError> {
        let result = self.transport.rep_set(key, &value.into()).await;
        self.representation_result(result)
    }

    pub async fn rep_end_root_object(&self) -> Result<(), AdapterError> {
        let result = self.transport.rep_end_root_object().await;
        self.representation_result(result)
    }

    fn representation_result(&self, result: Result<(), TransportError>) -> Result<(), AdapterError> {
        result.map_err(|err| {
            warn!(
                event = events::REPRESENTATION_FAILED,
                component = COMPONENT,
                adapter = self.name.as_str(),
                err = %err,
                "representation call refused"
            );
            AdapterError::from(err)
        })
    }

    /// Answers an incoming request previously handed to a resource handler.
    pub async fn send_response(
        &self,
        handle: ServerRequestHandle,
        status: StatusCode,
    ) -> Result<(), AdapterError> {
        self.transport
            .send_response(handle, status)
            .await
            .map_err(|err| {
                warn!(
                    event = events::SERVER_RESPONSE_FAILED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    handle = handle.0,
                    status = ?status,
                    err = %err,
                    "local stack refused server response"
                );
                AdapterError::from(err)
            })
    }

    pub async fn discover(
        &self,
        resource_type: &str,
        handler: DiscoveryHandler,
    ) -> Result<(), AdapterError> {
        self.discover_inner(Some(resource_type), handler).await
    }

    pub async fn discover_all(&self, handler: DiscoveryHandler) -> Result<(), AdapterError> {
        self.discover_inner(None, handler).await
    }

    async fn discover_inner(
        &self,
        resource_type: Option<&str>,
        handler: DiscoveryHandler,
    ) -> Result<(), AdapterError> {
        self.transport
            .discover(resource_type, handler)
            .await
            .map_err(|err| {
                warn!(
                    event = events::DISCOVERY_FAILED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    resource_type = resource_type.unwrap_or(fields::NONE),
                    err = %err,
                    "discovery refused"
                );
                AdapterError::from(err)
            })
    }

    pub async fn stop_discovery(&self) -> Result<(), AdapterError> {
        self.transport
            .stop_discovery()
            .await
            .map_err(AdapterError::from)
    }

    pub async fn is_discovering(&self) -> bool {
        self.transport.is_discovering().await
    }

    pub async fn get(
        &self,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        self.issue(RequestKind::Get, endpoint, uri, handler, options)
            .await
    }

    pub async fn delete(
        &self,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        self.issue(RequestKind::Delete, endpoint, uri, handler, options)
            .await
    }

    /// Starts an observation. `handler` runs once per notification until
    /// [`Self::stop_observe`] is called for the same endpoint and uri.
    pub async fn observe(
        &self,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        self.issue(RequestKind::Observe, endpoint, uri, handler, options)
            .await
    }

    /// First phase of a POST. Build the payload with the `rep_*` calls, then call
    /// [`Self::post`].
    pub async fn init_post(
        &self,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        self.issue(RequestKind::Post, endpoint, uri, handler, options)
            .await
    }

    /// First phase of a PUT, see [`Self::init_post`].
    pub async fn init_put(
        &self,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        self.issue(RequestKind::Put, endpoint, uri, handler, options)
            .await
    }

    pub async fn post(&self) -> bool {
        let result = self.transport.post().await;
        self.send_result(RequestKind::Post, result)
    }

    pub async fn put(&self) -> bool {
        let result = self.transport.put().await;
        self.send_result(RequestKind::Put, result)
    }

    fn send_result(&self, kind: RequestKind, result: Result<(), TransportError>) -> bool {
        match result {
            Ok(()) => {
                debug!(
                    event = events::REQUEST_SEND_OK,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    kind = kind.as_str(),
                    "prepared request sent"
                );
                true
            }
            Err(err) => {
                warn!(
                    event = events::REQUEST_SEND_FAILED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    kind = kind.as_str(),
                    err = %err,
                    "local stack refused to send prepared request"
                );
                false
            }
        }
    }

    /// Cancels the observation of `uri` on `endpoint`.
    ///
    /// Returns `false` without contacting the stack when no such observation exists. Otherwise
    /// the observation is forgotten and the stack's acceptance of the cancel is returned.
    pub async fn stop_observe(&self, endpoint: &Endpoint, uri: &str) -> bool {
        let Some(request) = self.request_registry.remove_observe_for(endpoint, uri).await else {
            warn!(
                event = events::OBSERVE_STOP_MISSING,
                component = COMPONENT,
                adapter = self.name.as_str(),
                endpoint = %fields::format_endpoint(endpoint),
                uri,
                "no observation to stop"
            );
            return false;
        };

        match self
            .transport
            .cancel_observe(request.id(), endpoint, uri)
            .await
        {
            Ok(()) => {
                debug!(
                    event = events::OBSERVE_STOP_OK,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    request_id = request.id(),
                    uri,
                    "observation stopped"
                );
                true
            }
            Err(err) => {
                warn!(
                    event = events::OBSERVE_CANCEL_FAILED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    request_id = request.id(),
                    uri,
                    err = %err,
                    "local stack refused observe cancellation"
                );
                false
            }
        }
    }

    /// Ids currently pending under `kind`, in issue order.
    pub async fn pending_request_ids(&self, kind: RequestKind) -> Vec<RequestId> {
        self.request_registry.ids(kind).await
    }

    pub async fn pending_request_count(&self, kind: RequestKind) -> usize {
        self.request_registry.len(kind).await
    }

    pub async fn active_observations(&self) -> Vec<Request> {
        self.request_registry
            .observe_entries()
            .await
            .iter()
            .map(|request| request.as_ref().clone())
            .collect()
    }

    async fn issue(
        &self,
        kind: RequestKind,
        endpoint: &Endpoint,
        uri: &str,
        handler: Option<ResponseHandler>,
        options: RequestOptions,
    ) -> bool {
        let request = match self
            .request_factory
            .create(kind, endpoint, uri, options, handler)
        {
            Ok(request) => Arc::new(request),
            Err(err) => {
                warn!(
                    event = events::REQUEST_ISSUE_REJECTED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    kind = kind.as_str(),
                    uri,
                    reason = fields::REASON_MALFORMED_REQUEST,
                    err = %err,
                    "rejecting malformed request"
                );
                return false;
            }
        };

        // Registered first so a response delivered from inside `send` still finds it.
        self.request_registry.insert(request.clone()).await;

        let sent = self
            .transport
            .send(&request, self.dispatchers.for_kind(kind))
            .await;

        match sent {
            Ok(()) => {
                if tracing::enabled!(Level::DEBUG) {
                    debug!(
                        event = events::REQUEST_ISSUE_OK,
                        component = COMPONENT,
                        adapter = self.name.as_str(),
                        kind = kind.as_str(),
                        request_id = request.id(),
                        endpoint = %fields::format_endpoint(endpoint),
                        uri,
                        query = fields::format_query(request.query()),
                        qos = ?request.qos(),
                        "request issued"
                    );
                }
                true
            }
            Err(err) => {
                self.request_registry.remove_by_id(kind, request.id()).await;
                warn!(
                    event = events::REQUEST_ISSUE_FAILED,
                    component = COMPONENT,
                    adapter = self.name.as_str(),
                    kind = kind.as_str(),
                    request_id = request.id(),
                    endpoint = %fields::format_endpoint(endpoint),
                    uri,
                    reason = fields::REASON_TRANSPORT_REJECTED,
                    err = %err,
                    "local stack refused request"
                );
                false
            }
        }
    }
}
