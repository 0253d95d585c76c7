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

//! Storage owner for the platform name, devices and resources.

use crate::config::DeviceConfig;
use crate::registration::device::OcfDevice;
use crate::registration::resource::{HandlerId, OcfResource};

/// Registration records the adapter keeps on behalf of the local stack.
pub(crate) struct RegistrationTable {
    platform: String,
    devices: Vec<OcfDevice>,
    resources: Vec<OcfResource>,
    next_device_id: usize,
    next_handler_id: HandlerId,
}

impl RegistrationTable {
    pub(crate) fn new() -> Self {
        Self {
            platform: String::new(),
            devices: Vec::new(),
            resources: Vec::new(),
            next_device_id: 0,
            next_handler_id: 0,
        }
    }

    pub(crate) fn set_platform(&mut self, manufacturer_name: &str) {
        self.platform = manufacturer_name.to_string();
    }

    pub(crate) fn platform(&self) -> &str {
        &self.platform
    }

    /// Builds the next device record without storing it.
    pub(crate) fn prepare_device(&self, config: DeviceConfig) -> OcfDevice {
        OcfDevice::from_config(self.next_device_id, config)
    }

    /// Stores a device built by [`Self::prepare_device`] and advances the id counter.
    pub(crate) fn commit_device(&mut self, device: OcfDevice) -> usize {
        let id = device.id();
        self.next_device_id = id + 1;
        self.devices.push(device);
        id
    }

    pub(crate) fn devices(&self) -> &[OcfDevice] {
        &self.devices
    }

    pub(crate) fn has_device(&self, device_id: usize) -> bool {
        self.devices.iter().any(|device| device.id() == device_id)
    }

    pub(crate) fn has_resource(&self, uri: &str) -> bool {
        self.resources.iter().any(|resource| resource.uri() == uri)
    }

    /// Gives every bound method of `resource` a fresh handler id.
    pub(crate) fn assign_handler_ids(&mut self, resource: &mut OcfResource) {
        resource.handler_ids.clear();
        for method in resource.handlers.keys() {
            resource.handler_ids.insert(*method, self.next_handler_id);
            self.next_handler_id += 1;
        }
    }

    pub(crate) fn commit_resource(&mut self, resource: OcfResource) {
        self.resources.push(resource);
    }

    pub(crate) fn resource(&self, uri: &str) -> Option<&OcfResource> {
        self.resources.iter().find(|resource| resource.uri() == uri)
    }

    pub(crate) fn remove_resource(&mut self, uri: &str) -> Option<OcfResource> {
        let position = self
            .resources
            .iter()
            .position(|resource| resource.uri() == uri)?;
        Some(self.resources.remove(position))
    }

    pub(crate) fn resources(&self) -> &[OcfResource] {
        &self.resources
    }
}
