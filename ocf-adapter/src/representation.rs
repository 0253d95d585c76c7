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

//! Typed representation values.
//!
//! The caller picks the variant; nothing here guesses integer versus double from the shape
//! of a number.

use std::fmt::{Display, Formatter};

/// A single value of a representation's root object.
///
/// ```
/// use ocf_adapter::RepValue;
///
/// assert_eq!(RepValue::from(true), RepValue::Boolean(true));
/// assert_eq!(RepValue::from(42), RepValue::Integer(42));
/// assert_eq!(RepValue::from(42.0), RepValue::Double(42.0));
/// assert_eq!(RepValue::from("on"), RepValue::String("on".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RepValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl From<bool> for RepValue {
    fn from(value: bool) -> Self {
        RepValue::Boolean(value)
    }
}

impl From<i32> for RepValue {
    fn from(value: i32) -> Self {
        RepValue::Integer(i64::from(value))
    }
}

impl From<i64> for RepValue {
    fn from(value: i64) -> Self {
        RepValue::Integer(value)
    }
}

impl From<u32> for RepValue {
    fn from(value: u32) -> Self {
        RepValue::Integer(i64::from(value))
    }
}

impl From<f32> for RepValue {
    fn from(value: f32) -> Self {
        RepValue::Double(f64::from(value))
    }
}

impl From<f64> for RepValue {
    fn from(value: f64) -> Self {
        RepValue::Double(value)
    }
}

impl From<&str> for RepValue {
    fn from(value: &str) -> Self {
        RepValue::String(value.to_string())
    }
}

impl From<String> for RepValue {
    fn from(value: String) -> Self {
        RepValue::String(value)
    }
}

impl Display for RepValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RepValue::Boolean(value) => write!(f, "{value}"),
            RepValue::Integer(value) => write!(f, "{value}"),
            RepValue::Double(value) => write!(f, "{value}"),
            RepValue::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// Ordered key/value fields of a representation's root object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Representation {
    fields: Vec<(String, RepValue)>,
}

impl Representation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: impl Into<RepValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<RepValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RepValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RepValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
