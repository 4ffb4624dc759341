// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `mitsu_mqtt` library.
//!
//! Nothing in this library is fatal. Errors fall in four groups:
//!
//! - [`ValueError`]: a host asked for something the unit cannot do (empty
//!   temperature, unknown swing label). No state change, no publish.
//! - [`ParseError`]: an inbound MQTT message could not be understood. The
//!   message is dropped and prior state is kept.
//! - [`ProtocolError`]: the transport failed to publish or subscribe.
//! - [`DeviceError`]: the unit configuration is unusable.

use thiserror::Error;

use crate::types::HvacMode;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command input was absent or invalid.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing an inbound message.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The input is meaningfully absent (empty string, zero temperature).
    #[error("no {0} given")]
    Absent(&'static str),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown device mode code was provided.
    #[error("invalid device mode: {0}")]
    InvalidDeviceMode(String),

    /// An unknown canonical HVAC mode was provided.
    #[error("invalid hvac mode: {0}")]
    InvalidHvacMode(String),

    /// The canonical mode has no device counterpart.
    #[error("hvac mode {0} is not a device mode")]
    NotADeviceMode(HvacMode),

    /// An unknown fan speed was provided.
    #[error("invalid fan speed: {0}")]
    InvalidFanSpeed(String),

    /// An unknown vane code was provided.
    #[error("invalid vane position: {0}")]
    InvalidVane(String),

    /// The swing label is not part of the active swing table.
    #[error("unknown swing mode: {0}")]
    UnknownSwingMode(String),

    /// The MQTT quality of service level is out of range.
    #[error("invalid qos level {0}, expected 0, 1 or 2")]
    InvalidQos(u8),
}

/// Errors related to protocol communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing inbound status messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the message.
    #[error("missing field in message: {0}")]
    MissingField(String),

    /// The message arrived on a topic this unit does not listen to.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// The payload is not valid UTF-8.
    #[error("payload on {0} is not valid UTF-8")]
    NotUtf8(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
