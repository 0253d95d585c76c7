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

//! Registration layer.
//!
//! Platform, device and resource records the facade keeps while forwarding registration to
//! the local stack. None of it takes part in request correlation.

pub(crate) mod device;
pub(crate) mod registration_table;
pub(crate) mod resource;
