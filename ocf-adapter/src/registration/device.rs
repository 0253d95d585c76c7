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

use crate::config::DeviceConfig;

/// Device registered with the local stack. Ids are assigned sequentially from 0.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OcfDevice {
    pub(crate) id: usize,
    pub(crate) uri: String,
    pub(crate) resource_type: String,
    pub(crate) name: String,
    pub(crate) spec_version: String,
    pub(crate) data_model_version: Option<String>,
}

impl OcfDevice {
    pub(crate) fn from_config(id: usize, config: DeviceConfig) -> Self {
        let DeviceConfig {
            uri,
            resource_type,
            name,
            spec_version,
            data_model_version,
        } = config;
        Self {
            id,
            uri,
            resource_type,
            name,
            spec_version,
            data_model_version,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn data_model_version(&self) -> Option<&str> {
        self.data_model_version.as_deref()
    }
}
