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

use ocf_adapter::{OcfResponse, ResponseHandler};
use std::sync::{Arc, Mutex};

/// Collects every response handed to the handler it produces.
#[derive(Clone, Default)]
pub struct ResponseRecorder {
    responses: Arc<Mutex<Vec<OcfResponse>>>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> ResponseHandler {
        let responses = self.responses.clone();
        Arc::new(move |response: &OcfResponse| {
            if let Ok(mut responses) = responses.lock() {
                responses.push(response.clone());
            }
        })
    }

    pub fn responses(&self) -> Vec<OcfResponse> {
        self.responses
            .lock()
            .map(|responses| responses.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.responses
            .lock()
            .map(|responses| responses.len())
            .unwrap_or_default()
    }
}
