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

use futures::future::join_all;
use integration_test_utils::{MockOcfTransport, ResponseRecorder};
use ocf_adapter::{
    AdapterConfig, Endpoint, OcfAdapter, OcfResponse, RequestKind, RequestOptions, StatusCode,
};
use std::collections::HashSet;
use std::sync::Arc;

const K: usize = 64;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_gets_register_distinct_ids() {
    integration_test_utils::init_logging();

    let transport = Arc::new(MockOcfTransport::new());
    let adapter = Arc::new(
        OcfAdapter::new("concurrent-test", transport.clone(), AdapterConfig::default())
            .await
            .expect("adapter creation should succeed"),
    );
    let endpoint = Endpoint::new("sensor-hub", "coap://10.1.0.3:5683");
    let recorder = ResponseRecorder::new();

    let issued = join_all((0..K).map(|index| {
        let adapter = adapter.clone();
        let endpoint = endpoint.clone();
        let handler = recorder.handler();
        tokio::spawn(async move {
            adapter
                .get(
                    &endpoint,
                    &format!("/sensor/{index}"),
                    Some(handler),
                    RequestOptions::default(),
                )
                .await
        })
    }))
    .await;
    assert!(issued.into_iter().all(|accepted| accepted.unwrap_or(false)));

    let ids = adapter.pending_request_ids(RequestKind::Get).await;
    assert_eq!(ids.len(), K);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), K);

    let uris: HashSet<_> = transport
        .issued()
        .into_iter()
        .map(|issued| issued.uri)
        .collect();
    assert_eq!(uris.len(), K);

    let delivered = join_all(transport.issued().into_iter().map(|issued| {
        let transport = transport.clone();
        let response = OcfResponse::new(issued.endpoint, &issued.uri, StatusCode::Ok);
        tokio::spawn(async move { transport.deliver(issued.id, response).await })
    }))
    .await;
    assert!(delivered.into_iter().all(|matched| matched.unwrap_or(false)));

    assert_eq!(recorder.count(), K);
    assert_eq!(adapter.pending_request_count(RequestKind::Get).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn duplicate_concurrent_deliveries_invoke_each_handler_once() {
    integration_test_utils::init_logging();

    let transport = Arc::new(MockOcfTransport::new());
    let adapter = OcfAdapter::new("race-test", transport.clone(), AdapterConfig::default())
        .await
        .expect("adapter creation should succeed");
    let endpoint = Endpoint::new("fan", "coap://10.1.0.4:5683");
    let recorder = ResponseRecorder::new();

    for uri in ["/fan/speed", "/fan/mode"] {
        assert!(
            adapter
                .get(&endpoint, uri, Some(recorder.handler()), RequestOptions::default())
                .await
        );
    }

    let deliveries = transport.issued().into_iter().flat_map(|issued| {
        let response = OcfResponse::new(issued.endpoint.clone(), &issued.uri, StatusCode::Ok);
        (0..8).map(move |_| (issued.id, response.clone()))
    });
    join_all(deliveries.map(|(id, response)| {
        let transport = transport.clone();
        tokio::spawn(async move { transport.deliver(id, response).await })
    }))
    .await;

    assert_eq!(recorder.count(), 2);
    assert_eq!(adapter.pending_request_count(RequestKind::Get).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn adapters_sharing_a_stack_never_issue_the_same_id() {
    integration_test_utils::init_logging();

    let transport = Arc::new(MockOcfTransport::new());
    let kitchen = OcfAdapter::new("kitchen", transport.clone(), AdapterConfig::default())
        .await
        .expect("adapter creation should succeed");
    let hallway = OcfAdapter::new("hallway", transport.clone(), AdapterConfig::default())
        .await
        .expect("adapter creation should succeed");
    let endpoint = Endpoint::new("lamp", "coap://10.1.0.7:5683");
    let kitchen_responses = ResponseRecorder::new();
    let hallway_responses = ResponseRecorder::new();

    assert!(
        kitchen
            .get(&endpoint, "/lamp/1", Some(kitchen_responses.handler()), RequestOptions::default())
            .await
    );
    assert!(
        hallway
            .get(&endpoint, "/lamp/2", Some(hallway_responses.handler()), RequestOptions::default())
            .await
    );

    let kitchen_ids = kitchen.pending_request_ids(RequestKind::Get).await;
    let hallway_ids = hallway.pending_request_ids(RequestKind::Get).await;
    assert_eq!(kitchen_ids.len(), 1);
    assert_eq!(hallway_ids.len(), 1);
    assert_ne!(kitchen_ids[0], hallway_ids[0]);

    for issued in transport.issued() {
        let response = OcfResponse::new(issued.endpoint.clone(), &issued.uri, StatusCode::Ok);
        assert!(transport.deliver(issued.id, response).await);
    }

    assert_eq!(kitchen_responses.count(), 1);
    assert_eq!(kitchen_responses.responses()[0].uri, "/lamp/1");
    assert_eq!(hallway_responses.count(), 1);
    assert_eq!(hallway_responses.responses()[0].uri, "/lamp/2");
    assert_eq!(kitchen.pending_request_count(RequestKind::Get).await, 0);
    assert_eq!(hallway.pending_request_count(RequestKind::Get).await, 0);
}
