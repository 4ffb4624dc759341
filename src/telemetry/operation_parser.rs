// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for operation-status messages.

use serde::Deserialize;

use crate::error::ParseError;
use crate::state::StateChange;
use crate::types::{DeviceMode, FanSpeed, HorizontalVane, PowerState, VerticalVane};

use super::{Numeric, field};

/// Settings reported on the unit's state topic.
///
/// `mode` is only carried while the unit is on. An OFF report therefore never
/// touches the stored mode, which is kept for the next power-on.
///
/// # Examples
///
/// ```
/// use mitsu_mqtt::telemetry::OperationStatus;
/// use mitsu_mqtt::types::{DeviceMode, PowerState};
///
/// let status = OperationStatus::parse(
///     r#"{"power":"ON","mode":"HEAT","temperature":"21","fan":"AUTO","vane":"3"}"#,
/// ).unwrap();
///
/// assert_eq!(status.power(), PowerState::On);
/// assert_eq!(status.mode(), Some(DeviceMode::Heat));
/// assert_eq!(status.target_temperature(), 21.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStatus {
    target_temperature: f32,
    fan_speed: FanSpeed,
    vertical_vane: VerticalVane,
    horizontal_vane: Option<HorizontalVane>,
    power: PowerState,
    mode: Option<DeviceMode>,
}

#[derive(Debug, Deserialize)]
struct RawOperationStatus {
    #[serde(default)]
    temperature: Option<Numeric>,
    #[serde(default)]
    fan: Option<String>,
    #[serde(default)]
    vane: Option<String>,
    #[serde(rename = "wideVane", default)]
    wide_vane: Option<String>,
    #[serde(default)]
    power: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

impl OperationStatus {
    /// Parses an operation-status JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON is malformed, a required field is
    /// missing, or a value is not a code the unit uses.
    pub fn parse(payload: &str) -> Result<Self, ParseError> {
        let raw: RawOperationStatus = serde_json::from_str(payload)?;

        let power: PowerState = field("power", raw.power.as_deref())?;
        let mode = if power.is_on() {
            Some(field("mode", raw.mode.as_deref())?)
        } else {
            None
        };

        let horizontal_vane = match raw.wide_vane.as_deref() {
            Some(code) => Some(field("wideVane", Some(code))?),
            None => None,
        };

        Ok(Self {
            target_temperature: raw
                .temperature
                .ok_or_else(|| ParseError::MissingField("temperature".to_string()))?
                .to_celsius("temperature")?,
            fan_speed: field("fan", raw.fan.as_deref())?,
            vertical_vane: field("vane", raw.vane.as_deref())?,
            horizontal_vane,
            power,
            mode,
        })
    }

    /// Returns the target temperature in °C.
    #[must_use]
    pub fn target_temperature(&self) -> f32 {
        self.target_temperature
    }

    /// Returns the fan speed.
    #[must_use]
    pub fn fan_speed(&self) -> FanSpeed {
        self.fan_speed
    }

    /// Returns the vertical vane position.
    #[must_use]
    pub fn vertical_vane(&self) -> VerticalVane {
        self.vertical_vane
    }

    /// Returns the horizontal vane position, if the unit reports one.
    #[must_use]
    pub fn horizontal_vane(&self) -> Option<HorizontalVane> {
        self.horizontal_vane
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Returns the mode. Always `None` while the unit is off.
    #[must_use]
    pub fn mode(&self) -> Option<DeviceMode> {
        self.mode
    }

    /// Converts the status into field-level state changes.
    #[must_use]
    pub fn to_state_changes(&self) -> Vec<StateChange> {
        let mut changes = vec![
            StateChange::TargetTemperature(self.target_temperature),
            StateChange::FanSpeed(self.fan_speed),
            StateChange::VerticalVane(self.vertical_vane),
        ];
        if let Some(vane) = self.horizontal_vane {
            changes.push(StateChange::HorizontalVane(vane));
        }
        changes.push(StateChange::Power(self.power));
        if let Some(mode) = self.mode {
            changes.push(StateChange::Mode(mode));
        }
        changes
    }
}
