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

//! Pending-request record and the operation kinds it is filed under.

use crate::constants::{Method, Qos};
use crate::endpoint::Endpoint;
use crate::message::ResponseHandler;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;
use tokio::time::Instant;

/// Correlation id pairing an issued request with its response(s).
pub type RequestId = u64;

/// Operation kind; each kind has its own pending-request queue.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RequestKind {
    Observe,
    Get,
    Delete,
    Post,
    Put,
}

impl RequestKind {
    pub const ALL: [RequestKind; 5] = [
        RequestKind::Observe,
        RequestKind::Get,
        RequestKind::Delete,
        RequestKind::Post,
        RequestKind::Put,
    ];

    /// Kinds whose entry is reclaimed by the first response or by timeout.
    pub const FIRE_ONCE: [RequestKind; 4] = [
        RequestKind::Get,
        RequestKind::Delete,
        RequestKind::Post,
        RequestKind::Put,
    ];

    pub const fn is_fire_once(self) -> bool {
        !matches!(self, RequestKind::Observe)
    }

    /// Method carried on the wire; observation rides on GET.
    pub const fn method(self) -> Method {
        match self {
            RequestKind::Observe | RequestKind::Get => Method::Get,
            RequestKind::Delete => Method::Delete,
            RequestKind::Post => Method::Post,
            RequestKind::Put => Method::Put,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RequestKind::Observe => "observe",
            RequestKind::Get => "get",
            RequestKind::Delete => "delete",
            RequestKind::Post => "post",
            RequestKind::Put => "put",
        }
    }
}

impl Display for RequestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional request parameters. The default is an empty query at [`Qos::High`].
///
/// ```
/// use ocf_adapter::{Qos, RequestOptions};
///
/// let options = RequestOptions::new().with_query("if=oic.if.baseline").with_qos(Qos::Low);
/// assert_eq!(options.query(), "if=oic.if.baseline");
/// assert_eq!(options.qos(), Qos::Low);
/// assert_eq!(RequestOptions::default().query(), "");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestOptions {
    pub(crate) query: String,
    pub(crate) qos: Qos,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_qos(mut self, qos: Qos) -> Self {
        self.qos = qos;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn qos(&self) -> Qos {
        self.qos
    }
}

/// An issued request. Immutable once built; only its queue membership changes.
#[derive(Clone)]
pub struct Request {
    pub(crate) id: RequestId,
    pub(crate) kind: RequestKind,
    pub(crate) endpoint: Endpoint,
    pub(crate) uri: String,
    pub(crate) query: String,
    pub(crate) qos: Qos,
    pub(crate) handler: Option<ResponseHandler>,
    pub(crate) created_at: Instant,
}

impl Request {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn qos(&self) -> Qos {
        self.qos
    }

    pub fn handler(&self) -> Option<&ResponseHandler> {
        self.handler.as_ref()
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub(crate) fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    pub(crate) fn targets(&self, endpoint: &Endpoint, uri: &str) -> bool {
        self.endpoint == *endpoint && self.uri == uri
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("uri", &self.uri)
            .field("query", &self.query)
            .field("qos", &self.qos)
            .field("has_handler", &self.handler.is_some())
            .field("created_at", &self.created_at)
            .finish()
    }
}
