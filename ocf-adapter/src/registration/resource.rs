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

//! Server-side resource record.

use crate::constants::{InterfaceMask, Method};
use crate::message::ResourceHandler;
use crate::registration::device::OcfDevice;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

/// Identifier the stack uses to call back into a resource handler.
pub type HandlerId = u32;

/// Malformed resource parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceError {
    EmptyUri,
    RelativeUri(String),
    NoResourceTypes,
    NoInterfaces,
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::EmptyUri => write!(f, "resource uri must not be empty"),
            ResourceError::RelativeUri(uri) => {
                write!(f, "resource uri must start with '/': {uri}")
            }
            ResourceError::NoResourceTypes => {
                write!(f, "resource needs at least one resource type")
            }
            ResourceError::NoInterfaces => {
                write!(f, "resource needs at least one interface mask")
            }
        }
    }
}

impl Error for ResourceError {}

/// A resource served by one of our devices.
///
/// Handler ids are assigned when the resource is added to an
/// [`OcfAdapter`][crate::OcfAdapter].
#[derive(Clone)]
pub struct OcfResource {
    pub(crate) device_id: usize,
    pub(crate) name: String,
    pub(crate) uri: String,
    pub(crate) types: Vec<String>,
    pub(crate) interface_mask: InterfaceMask,
    pub(crate) default_interface: InterfaceMask,
    pub(crate) discoverable: Option<bool>,
    pub(crate) period_seconds: Option<u32>,
    pub(crate) handlers: BTreeMap<Method, ResourceHandler>,
    pub(crate) handler_ids: BTreeMap<Method, HandlerId>,
}

impl OcfResource {
    /// Builds a resource of `device`. All masks are or-ed together; the first one is the
    /// default interface.
    pub fn new(
        device: &OcfDevice,
        name: &str,
        uri: &str,
        types: &[&str],
        interface_masks: &[InterfaceMask],
    ) -> Result<Self, ResourceError> {
        if uri.is_empty() {
            return Err(ResourceError::EmptyUri);
        }
        if !uri.starts_with('/') {
            return Err(ResourceError::RelativeUri(uri.to_string()));
        }
        if types.is_empty() {
            return Err(ResourceError::NoResourceTypes);
        }
        let Some(default_interface) = interface_masks.first().copied() else {
            return Err(ResourceError::NoInterfaces);
        };
        let interface_mask = interface_masks
            .iter()
            .fold(InterfaceMask::empty(), |combined, mask| combined | *mask);

        Ok(Self {
            device_id: device.id(),
            name: name.to_string(),
            uri: uri.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            interface_mask,
            default_interface,
            discoverable: None,
            period_seconds: None,
            handlers: BTreeMap::new(),
            handler_ids: BTreeMap::new(),
        })
    }

    pub fn set_discoverable(&mut self, discoverable: bool) {
        self.discoverable = Some(discoverable);
    }

    pub fn set_periodic_observable(&mut self, period_seconds: u32) {
        self.period_seconds = Some(period_seconds);
    }

    /// Binds `handler` to `method`, replacing an earlier binding.
    pub fn set_handler(&mut self, method: Method, handler: ResourceHandler) {
        self.handlers.insert(method, handler);
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn interface_mask(&self) -> InterfaceMask {
        self.interface_mask
    }

    pub fn default_interface(&self) -> InterfaceMask {
        self.default_interface
    }

    pub fn discoverable(&self) -> Option<bool> {
        self.discoverable
    }

    pub fn period_seconds(&self) -> Option<u32> {
        self.period_seconds
    }

    pub fn handler(&self, method: Method) -> Option<&ResourceHandler> {
        self.handlers.get(&method)
    }

    /// Bound methods with their handler ids, once registered.
    pub fn handler_ids(&self) -> impl Iterator<Item = (Method, HandlerId)> + '_ {
        self.handler_ids.iter().map(|(method, id)| (*method, *id))
    }
}

impl Debug for OcfResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcfResource")
            .field("device_id", &self.device_id)
            .field("name", &self.name)
            .field("uri", &self.uri)
            .field("types", &self.types)
            .field("interface_mask", &self.interface_mask)
            .field("default_interface", &self.default_interface)
            .field("discoverable", &self.discoverable)
            .field("period_seconds", &self.period_seconds)
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .field("handler_ids", &self.handler_ids)
            .finish()
    }
}
