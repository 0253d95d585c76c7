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

//! Enumerated OCF constants: interface masks, methods, QoS classes and status codes.

use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

/// OCF interface bit flags. Combine with `|`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct InterfaceMask(u32);

impl InterfaceMask {
    pub const BASELINE: Self = Self(1 << 1);
    pub const LL: Self = Self(1 << 2);
    pub const B: Self = Self(1 << 3);
    pub const R: Self = Self(1 << 4);
    pub const RW: Self = Self(1 << 5);
    pub const A: Self = Self(1 << 6);
    pub const S: Self = Self(1 << 7);
    pub const CREATE: Self = Self(1 << 8);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for InterfaceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InterfaceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Request methods a resource handler can be bound to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Method {
    Get = 1,
    Post = 2,
    Put = 3,
    Delete = 4,
}

impl Method {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Method {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Method::Get),
            2 => Ok(Method::Post),
            3 => Ok(Method::Put),
            4 => Ok(Method::Delete),
            other => Err(other),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

/// Delivery class of an outgoing request.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Qos {
    /// Confirmable, reliable delivery.
    #[default]
    High = 0,
    /// Non-confirmable, best-effort delivery.
    Low = 1,
}

impl Qos {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Response status codes, numbered as the underlying stack numbers them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0,
    Created = 1,
    Changed = 2,
    Deleted = 3,
    NotModified = 4,
    BadRequest = 5,
    Unauthorized = 6,
    BadOption = 7,
    Forbidden = 8,
    NotFound = 9,
    MethodNotAllowed = 10,
    NotAcceptable = 11,
    RequestEntityTooLarge = 12,
    UnsupportedMediaType = 13,
    InternalServerError = 14,
    NotImplemented = 15,
    BadGateway = 16,
    ServiceUnavailable = 17,
    GatewayTimeout = 18,
    ProxyingNotSupported = 19,
}

impl StatusCode {
    const ALL: [StatusCode; 20] = [
        StatusCode::Ok,
        StatusCode::Created,
        StatusCode::Changed,
        StatusCode::Deleted,
        StatusCode::NotModified,
        StatusCode::BadRequest,
        StatusCode::Unauthorized,
        StatusCode::BadOption,
        StatusCode::Forbidden,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::NotAcceptable,
        StatusCode::RequestEntityTooLarge,
        StatusCode::UnsupportedMediaType,
        StatusCode::InternalServerError,
        StatusCode::NotImplemented,
        StatusCode::BadGateway,
        StatusCode::ServiceUnavailable,
        StatusCode::GatewayTimeout,
        StatusCode::ProxyingNotSupported,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// `true` for the 2.xx family (`Ok` through `NotModified`).
    pub const fn is_success(self) -> bool {
        (self as u8) < StatusCode::BadRequest as u8
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        StatusCode::ALL.get(usize::from(code)).copied().ok_or(code)
    }
}
