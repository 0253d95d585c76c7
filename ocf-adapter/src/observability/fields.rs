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

//! Canonical structured field keys and value-format helpers.

use crate::endpoint::Endpoint;
use std::time::Duration;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const ADAPTER: &str = "adapter";

pub const REQUEST_ID: &str = "request_id";
pub const KIND: &str = "kind";
pub const ENDPOINT: &str = "endpoint";
pub const URI: &str = "uri";
pub const QOS: &str = "qos";
pub const AGE_MS: &str = "age_ms";

pub const EVICTED: &str = "evicted";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_RESPONSE_TIMEOUT: &str = "response_timeout";
pub const REASON_NO_PENDING_REQUEST: &str = "no_pending_request";
pub const REASON_TRANSPORT_REJECTED: &str = "transport_rejected";
pub const REASON_MALFORMED_REQUEST: &str = "malformed_request";

pub fn format_endpoint(endpoint: &Endpoint) -> String {
    endpoint.to_string()
}

pub fn format_query(query: &str) -> &str {
    if query.is_empty() {
        NONE
    } else {
        query
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn format_duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
