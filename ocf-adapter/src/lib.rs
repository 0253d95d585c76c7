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

//! # ocf-adapter
//!
//! `ocf-adapter` issues GET, PUT, POST, DELETE and OBSERVE requests against an OCF/CoAP
//! protocol stack and routes each response back to the continuation that asked for it.
//!
//! The stack itself (wire encoding, discovery, delivery) sits behind [`OcfTransport`]. The
//! adapter owns correlation: every request gets a fresh id, waits in a per-kind queue, and is
//! matched when the stack reports `(request_id, response)` through a [`ResponseListener`].
//! Unanswered GET/PUT/POST/DELETE requests are evicted once older than the configured
//! response timeout; observations stay until [`OcfAdapter::stop_observe`].
//!
//! ```
//! use std::sync::Arc;
//! use integration_test_utils::{MockOcfTransport, ResponseRecorder};
//! use ocf_adapter::{
//!     AdapterConfig, Endpoint, OcfAdapter, OcfResponse, RequestKind, RequestOptions, StatusCode,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = Arc::new(MockOcfTransport::new());
//! let mut adapter = OcfAdapter::new("quick-start", transport.clone(), AdapterConfig::default())
//!     .await
//!     .unwrap();
//! adapter.start().await.unwrap();
//!
//! let light = Endpoint::new("light", "coap://[fe80::1]:5683");
//! let recorder = ResponseRecorder::new();
//! assert!(adapter
//!     .get(&light, "/light/1", Some(recorder.handler()), RequestOptions::default())
//!     .await);
//! let id = transport.issued_ids(RequestKind::Get)[0];
//! assert_eq!(adapter.pending_request_ids(RequestKind::Get).await, vec![id]);
//!
//! // The stack answers; the continuation runs once and the request is forgotten.
//! let response = OcfResponse::new(light.clone(), "/light/1", StatusCode::Ok);
//! assert!(transport.deliver(id, response).await);
//! assert_eq!(recorder.count(), 1);
//! assert_eq!(adapter.pending_request_count(RequestKind::Get).await, 0);
//!
//! adapter.deinitialize().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`OcfAdapter`] lifecycle, registration and request surface
//! - Correlation: request factory, per-kind registry, response dispatchers, stale-request sweeper
//! - Registration: platform, device and resource records forwarded to the stack
//! - Transport seam: [`OcfTransport`] and [`ResponseListener`]
//!
//! ## Observability model
//!
//! The crate logs through `tracing` structured events and never installs a global subscriber.
//! Tests and embedding applications initialize `tracing_subscriber` themselves.

mod config;
pub use config::{
    AdapterConfig, ConfigError, DeviceConfig, PlatformConfig, RequestTrackingConfig,
};

mod constants;
pub use constants::{InterfaceMask, Method, Qos, StatusCode};

mod correlation;
pub use correlation::request::{Request, RequestId, RequestKind, RequestOptions};
pub use correlation::request_factory::RequestError;

mod endpoint;
pub use endpoint::Endpoint;

mod message;
pub use message::{
    DiscoveredResource, DiscoveryHandler, OcfResponse, ResourceHandler, ResponseHandler,
    ServerRequest, ServerRequestHandle,
};

#[doc(hidden)]
pub mod observability;

mod ocf_adapter;
pub use ocf_adapter::{AdapterError, OcfAdapter};

mod registration;
pub use registration::device::OcfDevice;
pub use registration::resource::{HandlerId, OcfResource, ResourceError};

mod representation;
pub use representation::{RepValue, Representation};

mod transport;
pub use transport::{OcfTransport, ResponseListener, TransportError};
