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

use integration_test_utils::{MockOcfTransport, ResponseRecorder};
use ocf_adapter::{AdapterConfig, Endpoint, OcfAdapter, RequestKind, RequestOptions};
use std::sync::Arc;
use std::time::Duration;

const FAST_TRACKING: &str = r#"{
    platform: { manufacturer_name: "ant" },
    device: {
        uri: "/oic/d",
        resource_type: "oic.d.light",
        name: "Light",
        spec_version: "ocf.res.1.0.0",
    },
    request_tracking: { response_timeout_ms: 500, sweep_interval_ms: 100 },
}"#;

async fn fast_adapter(transport: Arc<MockOcfTransport>) -> OcfAdapter {
    let config = AdapterConfig::from_json5_str(FAST_TRACKING).expect("config should parse");
    OcfAdapter::new("sweeper-test", transport, config)
        .await
        .expect("adapter creation should succeed")
}

fn gateway() -> Endpoint {
    Endpoint::new("gateway", "coap://192.168.1.20:5683")
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_drives_eviction_of_every_fire_once_kind() {
    integration_test_utils::init_logging();

    let transport = Arc::new(MockOcfTransport::new());
    let mut adapter = fast_adapter(transport).await;
    adapter.start().await.expect("adapter should start");
    let recorder = ResponseRecorder::new();
    let options = RequestOptions::default;

    assert!(adapter.get(&gateway(), "/a", Some(recorder.handler()), options()).await);
    assert!(adapter.delete(&gateway(), "/b", Some(recorder.handler()), options()).await);
    assert!(adapter.init_post(&gateway(), "/c", Some(recorder.handler()), options()).await);
    assert!(adapter.init_put(&gateway(), "/d", Some(recorder.handler()), options()).await);
    assert!(adapter.observe(&gateway(), "/e", Some(recorder.handler()), options()).await);

    tokio::time::sleep(Duration::from_millis(450)).await;
    for kind in RequestKind::FIRE_ONCE {
        assert_eq!(adapter.pending_request_count(kind).await, 1, "{kind} kept early");
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    for kind in RequestKind::FIRE_ONCE {
        assert_eq!(adapter.pending_request_count(kind).await, 0, "{kind} evicted");
    }
    assert_eq!(adapter.pending_request_count(RequestKind::Observe).await, 1);
    assert_eq!(recorder.count(), 0);

    adapter.stop().await.expect("adapter should stop");
}

#[tokio::test(start_paused = true)]
async fn stopped_adapter_does_not_sweep() {
    integration_test_utils::init_logging();

    let transport = Arc::new(MockOcfTransport::new());
    let mut adapter = fast_adapter(transport).await;
    adapter.start().await.expect("adapter should start");
    adapter.stop().await.expect("adapter should stop");

    assert!(
        adapter
            .get(&gateway(), "/a", None, RequestOptions::default())
            .await
    );
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(adapter.pending_request_count(RequestKind::Get).await, 1);

    adapter.start().await.expect("adapter should restart");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(adapter.pending_request_count(RequestKind::Get).await, 0);
    adapter.stop().await.expect("adapter should stop");
}
