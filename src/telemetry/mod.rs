// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of inbound status messages.
//!
//! A heat pump publishes on two topics:
//!
//! - the state topic, carrying the operation settings
//!   (`{"power":"ON","mode":"HEAT","temperature":"21","fan":"AUTO","vane":"3"}`)
//! - the optional temperature topic, carrying room sensor readings
//!   (`{"roomTemperature":20.5,"operating":true}`)
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::telemetry::{StatusMessage, StatusTopics, parse_status};
//!
//! let topics = StatusTopics::new("heatpump/status")
//!     .with_temperature_topic("heatpump/status/temperature");
//!
//! let msg = parse_status(
//!     &topics,
//!     "heatpump/status/temperature",
//!     r#"{"roomTemperature":20.5,"operating":true}"#,
//! ).unwrap();
//!
//! assert!(matches!(msg, StatusMessage::RoomSensor(_)));
//! ```

mod operation_parser;
mod sensor_parser;

pub use operation_parser::OperationStatus;
pub use sensor_parser::RoomSensor;

use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ParseError, ValueError};
use crate::state::StateChange;

/// The inbound topics of one heat pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTopics {
    state_topic: String,
    temperature_topic: Option<String>,
}

impl StatusTopics {
    /// Creates topics with only a state topic.
    #[must_use]
    pub fn new(state_topic: impl Into<String>) -> Self {
        Self {
            state_topic: state_topic.into(),
            temperature_topic: None,
        }
    }

    /// Adds the room-sensor topic.
    #[must_use]
    pub fn with_temperature_topic(mut self, topic: impl Into<String>) -> Self {
        self.temperature_topic = Some(topic.into());
        self
    }

    /// Returns the state topic.
    #[must_use]
    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    /// Returns the room-sensor topic, if configured.
    #[must_use]
    pub fn temperature_topic(&self) -> Option<&str> {
        self.temperature_topic.as_deref()
    }

    /// Returns every topic to subscribe to, state topic first.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        let mut topics = vec![self.state_topic.as_str()];
        if let Some(temperature) = self.temperature_topic()
            && temperature != self.state_topic
        {
            topics.push(temperature);
        }
        topics
    }

    /// Returns `true` if `topic` is one of these topics.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        topic == self.state_topic || self.temperature_topic() == Some(topic)
    }
}

/// A parsed inbound status message.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    /// Operation settings from the state topic.
    Operation(OperationStatus),

    /// Room sensor reading from the temperature topic.
    RoomSensor(RoomSensor),
}

impl StatusMessage {
    /// Converts the message into state changes.
    #[must_use]
    pub fn to_state_changes(&self) -> Vec<StateChange> {
        match self {
            Self::Operation(status) => status.to_state_changes(),
            Self::RoomSensor(sensor) => sensor.to_state_changes(),
        }
    }
}

/// Parses a payload received on one of `topics`.
///
/// If the state and temperature topics are the same string, messages are
/// read as operation status.
///
/// # Errors
///
/// Returns `ParseError::UnknownTopic` if `topic` is not one of `topics`, or
/// any error from the payload parser.
pub fn parse_status(
    topics: &StatusTopics,
    topic: &str,
    payload: &str,
) -> Result<StatusMessage, ParseError> {
    if topic == topics.state_topic() {
        return OperationStatus::parse(payload).map(StatusMessage::Operation);
    }
    if topics.temperature_topic() == Some(topic) {
        return RoomSensor::parse(payload).map(StatusMessage::RoomSensor);
    }
    Err(ParseError::UnknownTopic(topic.to_string()))
}

/// A number some firmwares send as a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn to_celsius(&self, field: &str) -> Result<f32, ParseError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|e| ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("{s:?}: {e}"),
            })?,
        };
        let celsius = value as f32;
        if !celsius.is_finite() {
            return Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("{value} is not a temperature"),
            });
        }
        Ok(celsius)
    }
}

/// Reads a required coded field.
pub(crate) fn field<T>(name: &str, raw: Option<&str>) -> Result<T, ParseError>
where
    T: FromStr<Err = ValueError>,
{
    let raw = raw.ok_or_else(|| ParseError::MissingField(name.to_string()))?;
    raw.parse().map_err(|e: ValueError| ParseError::InvalidValue {
        field: name.to_string(),
        message: e.to_string(),
    })
}
