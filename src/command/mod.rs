// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound heat pump commands.
//!
//! A [`Command`] pairs the JSON payload to publish on the command topic with
//! the [`StateChange`]s the unit applies optimistically. Payloads only carry
//! the fields being changed; the controller leaves the rest as they are.
//!
//! | Intent | Payload |
//! |--------|---------|
//! | target temperature | `{"temperature":"21.5"}` |
//! | fan speed | `{"fan":"QUIET"}` |
//! | mode | `{"power":"ON","mode":"HEAT"}` |
//! | off | `{"power":"OFF"}` |
//! | swing | `{"vane":"1","wideVane":"<<"}` |
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::command::CommandBuilder;
//! use mitsu_mqtt::types::HvacMode;
//!
//! let commands = CommandBuilder::new(false);
//!
//! let cmd = commands.set_hvac_mode(HvacMode::Cool);
//! assert_eq!(cmd.to_json().unwrap(), r#"{"power":"ON","mode":"COOL"}"#);
//!
//! let cmd = commands.set_swing_mode("Bottom").unwrap();
//! assert_eq!(cmd.to_json().unwrap(), r#"{"vane":"5"}"#);
//! ```

mod builder;

pub use builder::{CommandBuilder, is_absent_label, is_absent_temperature};

use serde::Serialize;

use crate::error::ParseError;
use crate::state::StateChange;
use crate::types::{DeviceMode, FanSpeed, HorizontalVane, PowerState, VerticalVane};

/// JSON body of a command, in the field order the controller expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandPayload {
    /// Target temperature, one decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,

    /// Fan speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<FanSpeed>,

    /// Vertical vane.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vane: Option<VerticalVane>,

    /// Horizontal vane.
    #[serde(rename = "wideVane", skip_serializing_if = "Option::is_none")]
    pub wide_vane: Option<HorizontalVane>,

    /// Power.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerState>,

    /// Device mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<DeviceMode>,
}

impl CommandPayload {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copies every field set in `other` over this payload.
    pub fn merge(&mut self, other: CommandPayload) {
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        self.fan = other.fan.or(self.fan);
        self.vane = other.vane.or(self.vane);
        self.wide_vane = other.wide_vane.or(self.wide_vane);
        self.power = other.power.or(self.power);
        self.mode = other.mode.or(self.mode);
    }
}

/// A payload to publish plus the state changes it implies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    payload: CommandPayload,
    changes: Vec<StateChange>,
}

impl Command {
    /// Creates a command from its parts.
    #[must_use]
    pub fn new(payload: CommandPayload, changes: Vec<StateChange>) -> Self {
        Self { payload, changes }
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &CommandPayload {
        &self.payload
    }

    /// Returns the optimistic state changes.
    #[must_use]
    pub fn changes(&self) -> &[StateChange] {
        &self.changes
    }

    /// Folds `other` into this command so both go out in one publish.
    #[must_use]
    pub fn merged(mut self, other: Command) -> Self {
        self.payload.merge(other.payload);
        self.changes.extend(other.changes);
        self
    }

    /// Encodes the payload as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(&self.payload)?)
    }
}
