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

//! Correlation-id allocation and request construction.

use crate::correlation::request::{Request, RequestId, RequestKind, RequestOptions};
use crate::endpoint::Endpoint;
use crate::message::ResponseHandler;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;

/// Malformed request parameters, rejected before an id is allocated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestError {
    EmptyUri,
    RelativeUri(String),
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::EmptyUri => write!(f, "request uri must not be empty"),
            RequestError::RelativeUri(uri) => {
                write!(f, "request uri must start with '/': {uri}")
            }
        }
    }
}

impl Error for RequestError {}

/// Process-wide id source. Adapters sharing one stack never hand it the same id.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(0);

/// Builds requests stamped with a fresh, strictly increasing id.
pub(crate) struct RequestFactory {
    next_id: &'static AtomicU64,
}

impl RequestFactory {
    /// Creates a factory drawing ids from the process-wide counter.
    pub(crate) fn new() -> Self {
        Self {
            next_id: &NEXT_REQUEST_ID,
        }
    }

    /// Creates a factory with a private counter whose first id is 0.
    #[cfg(test)]
    pub(crate) fn with_fresh_counter() -> Self {
        Self {
            next_id: Box::leak(Box::new(AtomicU64::new(0))),
        }
    }

    pub(crate) fn create(
        &self,
        kind: RequestKind,
        endpoint: &Endpoint,
        uri: &str,
        options: RequestOptions,
        handler: Option<ResponseHandler>,
    ) -> Result<Request, RequestError> {
        if uri.is_empty() {
            return Err(RequestError::EmptyUri);
        }
        if !uri.starts_with('/') {
            return Err(RequestError::RelativeUri(uri.to_string()));
        }

        let RequestOptions { query, qos } = options;
        Ok(Request {
            id: self.allocate_id(),
            kind,
            endpoint: endpoint.clone(),
            uri: uri.to_string(),
            query,
            qos,
            handler,
            created_at: Instant::now(),
        })
    }

    fn allocate_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestError, RequestFactory};
    use crate::constants::Qos;
    use crate::correlation::request::{RequestKind, RequestOptions};
    use crate::endpoint::Endpoint;
    use crate::message::OcfResponse;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn endpoint() -> Endpoint {
        Endpoint::new("light", "coap://[fe80::1]:5683")
    }

    #[test]
    fn ids_start_at_zero_and_strictly_increase() {
        let factory = RequestFactory::with_fresh_counter();

        let ids: Vec<_> = RequestKind::ALL
            .iter()
            .cycle()
            .take(20)
            .map(|kind| {
                factory
                    .create(*kind, &endpoint(), "/light/1", RequestOptions::default(), None)
                    .expect("valid request")
                    .id()
            })
            .collect();

        assert_eq!(ids.first(), Some(&0));
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[test]
    fn separate_factories_share_the_process_wide_counter() {
        let first = RequestFactory::new();
        let second = RequestFactory::new();

        let ids: Vec<_> = (0..10)
            .flat_map(|_| {
                [&first, &second].map(|factory| {
                    factory
                        .create(RequestKind::Get, &endpoint(), "/a", RequestOptions::default(), None)
                        .expect("valid request")
                        .id()
                })
            })
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[test]
    fn request_carries_options_and_handler() {
        let factory = RequestFactory::new();
        let options = RequestOptions::new()
            .with_query("if=oic.if.a")
            .with_qos(Qos::Low);

        let request = factory
            .create(
                RequestKind::Observe,
                &endpoint(),
                "/temperature",
                options,
                Some(Arc::new(|_: &OcfResponse| {})),
            )
            .expect("valid request");

        assert_eq!(request.kind(), RequestKind::Observe);
        assert_eq!(request.endpoint(), &endpoint());
        assert_eq!(request.uri(), "/temperature");
        assert_eq!(request.query(), "if=oic.if.a");
        assert_eq!(request.qos(), Qos::Low);
        assert!(request.handler().is_some());
    }

    #[test]
    fn malformed_uris_are_rejected_without_consuming_an_id() {
        let factory = RequestFactory::with_fresh_counter();

        assert_eq!(
            factory
                .create(RequestKind::Get, &endpoint(), "", RequestOptions::default(), None)
                .map(|request| request.id()),
            Err(RequestError::EmptyUri)
        );
        assert_eq!(
            factory
                .create(RequestKind::Get, &endpoint(), "light", RequestOptions::default(), None)
                .map(|request| request.id()),
            Err(RequestError::RelativeUri("light".to_string()))
        );

        let request = factory
            .create(RequestKind::Get, &endpoint(), "/light", RequestOptions::default(), None)
            .expect("valid request");
        assert_eq!(request.id(), 0);
    }
}
