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

use std::fmt::{Display, Formatter};

///
/// [`Endpoint`] is the opaque transport address of a remote OCF device, as handed out by
/// discovery. The adapter never interprets it; it is only compared and passed back to the
/// [`OcfTransport`][crate::OcfTransport].
///
/// # Examples
///
/// ```
/// use ocf_adapter::Endpoint;
///
/// let light = Endpoint::new("light", "coap://192.168.1.100:5683");
///
/// assert_eq!(light.name(), "light");
/// assert_eq!(light.address(), "coap://192.168.1.100:5683");
/// assert_eq!(light, Endpoint::new("light", "coap://192.168.1.100:5683"));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Endpoint {
    pub(crate) name: String,
    pub(crate) address: String,
}

impl Endpoint {
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.address)
    }
}
