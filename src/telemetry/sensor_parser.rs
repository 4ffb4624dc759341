// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for room-sensor messages.

use serde::Deserialize;

use crate::error::ParseError;
use crate::state::StateChange;

use super::Numeric;

/// Room temperature and activity reported on the temperature topic.
///
/// # Examples
///
/// ```
/// use mitsu_mqtt::telemetry::RoomSensor;
///
/// let sensor = RoomSensor::parse(r#"{"roomTemperature":20.5,"operating":true}"#).unwrap();
/// assert_eq!(sensor.room_temperature(), 20.5);
/// assert!(sensor.operating());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSensor {
    room_temperature: f32,
    operating: bool,
}

#[derive(Debug, Deserialize)]
struct RawRoomSensor {
    #[serde(rename = "roomTemperature", default)]
    room_temperature: Option<Numeric>,
    #[serde(default)]
    operating: Option<Flag>,
}

/// Some firmwares report `operating` as 0/1 instead of a boolean.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0,
        }
    }
}

impl RoomSensor {
    /// Parses a room-sensor JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON is malformed, a field is missing or
    /// the temperature is not numeric.
    pub fn parse(payload: &str) -> Result<Self, ParseError> {
        let raw: RawRoomSensor = serde_json::from_str(payload)?;

        let room_temperature = raw
            .room_temperature
            .ok_or_else(|| ParseError::MissingField("roomTemperature".to_string()))?
            .to_celsius("roomTemperature")?;
        let operating = raw
            .operating
            .ok_or_else(|| ParseError::MissingField("operating".to_string()))?
            .is_set();

        Ok(Self {
            room_temperature,
            operating,
        })
    }

    /// Returns the measured room temperature in °C.
    #[must_use]
    pub fn room_temperature(&self) -> f32 {
        self.room_temperature
    }

    /// Returns `true` if the compressor or fan is running.
    #[must_use]
    pub fn operating(&self) -> bool {
        self.operating
    }

    /// Converts the reading into field-level state changes.
    #[must_use]
    pub fn to_state_changes(&self) -> Vec<StateChange> {
        vec![
            StateChange::CurrentTemperature(self.room_temperature),
            StateChange::Operating(self.operating),
        ]
    }
}
