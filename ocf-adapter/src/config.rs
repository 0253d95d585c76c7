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

//! Adapter configuration, loadable from a JSON5 file.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 2000;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 2000;

/// Failures while loading or validating an [`AdapterConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(json5::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "unable to read config file: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse config file: {err}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<json5::Error> for ConfigError {
    fn from(err: json5::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Everything the adapter needs before it can issue its first request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    pub platform: PlatformConfig,
    /// Device registered while the adapter is being built.
    pub device: DeviceConfig,
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    pub manufacturer_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub uri: String,
    pub resource_type: String,
    pub name: String,
    pub spec_version: String,
    #[serde(default)]
    pub data_model_version: Option<String>,
}

impl DeviceConfig {
    pub fn new(uri: &str, resource_type: &str, name: &str, spec_version: &str) -> Self {
        Self {
            uri: uri.to_string(),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            spec_version: spec_version.to_string(),
            data_model_version: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.uri.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "device.uri must start with '/': {:?}",
                self.uri
            )));
        }
        Ok(())
    }

    pub fn with_data_model_version(mut self, data_model_version: &str) -> Self {
        self.data_model_version = Some(data_model_version.to_string());
        self
    }
}

/// Timing of pending-request reclamation.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequestTrackingConfig {
    /// Age after which an unanswered GET/PUT/POST/DELETE is evicted.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
    /// Cadence of the eviction sweep.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

fn default_response_timeout_ms() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_MS
}

fn default_sweep_interval_ms() -> u64 {
    DEFAULT_SWEEP_INTERVAL_MS
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl RequestTrackingConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            platform: PlatformConfig {
                manufacturer_name: "ant".to_string(),
            },
            device: DeviceConfig::new("/oic/d", "oic.d.light", "Light", "ocf.res.1.0.0"),
            request_tracking: RequestTrackingConfig::default(),
        }
    }
}

impl AdapterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json5_str(&contents)
    }

    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AdapterConfig = json5::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platform.manufacturer_name.is_empty() {
            return Err(ConfigError::Invalid(
                "platform.manufacturer_name must not be empty".to_string(),
            ));
        }
        self.device.validate()?;
        if self.request_tracking.response_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_tracking.response_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_tracking.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_tracking.sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
