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

//! Canonical structured event names used across `ocf-adapter`.

// Request issuance events.
pub const REQUEST_ISSUE_OK: &str = "request_issue_ok";
pub const REQUEST_ISSUE_FAILED: &str = "request_issue_failed";
pub const REQUEST_ISSUE_REJECTED: &str = "request_issue_rejected";
pub const REQUEST_SEND_OK: &str = "request_send_ok";
pub const REQUEST_SEND_FAILED: &str = "request_send_failed";

// Response dispatch events.
pub const RESPONSE_DISPATCH_OK: &str = "response_dispatch_ok";
pub const RESPONSE_DISPATCH_UNMATCHED: &str = "response_dispatch_unmatched";
pub const RESPONSE_DISPATCH_NO_HANDLER: &str = "response_dispatch_no_handler";

// Observation events.
pub const OBSERVE_STOP_OK: &str = "observe_stop_ok";
pub const OBSERVE_STOP_MISSING: &str = "observe_stop_missing";
pub const OBSERVE_CANCEL_FAILED: &str = "observe_cancel_failed";

// Stale-request sweeper events.
pub const SWEEPER_START: &str = "sweeper_start";
pub const SWEEPER_STOP: &str = "sweeper_stop";
pub const SWEEPER_STOP_FAILED: &str = "sweeper_stop_failed";
pub const SWEEP_SUMMARY: &str = "sweep_summary";
pub const REQUEST_EVICTED: &str = "request_evicted";

// Adapter lifecycle events.
pub const ADAPTER_INITIALIZE_OK: &str = "adapter_initialize_ok";
pub const ADAPTER_INITIALIZE_FAILED: &str = "adapter_initialize_failed";
pub const ADAPTER_START: &str = "adapter_start";
pub const ADAPTER_START_FAILED: &str = "adapter_start_failed";
pub const ADAPTER_STOP: &str = "adapter_stop";
pub const ADAPTER_STOP_FAILED: &str = "adapter_stop_failed";
pub const ADAPTER_DEINITIALIZE: &str = "adapter_deinitialize";

// Registration events.
pub const PLATFORM_SET: &str = "platform_set";
pub const DEVICE_ADD_OK: &str = "device_add_ok";
pub const DEVICE_ADD_FAILED: &str = "device_add_failed";
pub const RESOURCE_ADD_OK: &str = "resource_add_ok";
pub const RESOURCE_ADD_FAILED: &str = "resource_add_failed";
pub const RESOURCE_DELETE_OK: &str = "resource_delete_ok";
pub const RESOURCE_DELETE_FAILED: &str = "resource_delete_failed";

// Representation, server response and discovery events.
pub const REPRESENTATION_FAILED: &str = "representation_failed";
pub const SERVER_RESPONSE_FAILED: &str = "server_response_failed";
pub const DISCOVERY_FAILED: &str = "discovery_failed";
