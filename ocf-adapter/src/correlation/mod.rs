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

//! Request correlation layer.
//!
//! Every outgoing request gets a fresh [`RequestId`](request::RequestId) from the factory and
//! is filed in the registry under its kind before the transport sees it. Responses come back
//! through a per-kind dispatcher that resolves the id to the stored continuation. GET, DELETE,
//! POST and PUT entries leave the registry on their first response or when the sweeper finds
//! them older than the response timeout. Observe entries stay until they are cancelled.

pub(crate) mod request;
pub(crate) mod request_factory;
pub(crate) mod request_registry;
pub(crate) mod response_dispatcher;
pub(crate) mod stale_request_sweeper;
