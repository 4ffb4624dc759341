// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of host intents into commands.

use crate::error::ValueError;
use crate::state::StateChange;
use crate::swing::SwingTable;
use crate::types::{DeviceMode, FanSpeed, HvacMode, PowerState};

use super::{Command, CommandPayload};

/// Returns `true` if `value` means "no temperature given".
///
/// The host sends 0 when a temperature field was left empty, so 0 °C itself
/// cannot be requested.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_absent_temperature(value: f32) -> bool {
    value == 0.0 || !value.is_finite()
}

/// Returns `true` if `label` means "nothing selected".
#[must_use]
pub fn is_absent_label(label: &str) -> bool {
    label.is_empty()
}

/// Builds commands for one unit.
///
/// The builder is stateless apart from its vane configuration: it never
/// looks at the current state, so every command is the same regardless of
/// what the unit last reported.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder {
    swing: &'static SwingTable,
    wide_vane: bool,
}

impl CommandBuilder {
    /// Creates a builder. `wide_vane` selects the full swing table and sends
    /// the horizontal vane.
    #[must_use]
    pub fn new(wide_vane: bool) -> Self {
        Self {
            swing: SwingTable::for_wide_vane(wide_vane),
            wide_vane,
        }
    }

    /// Returns the swing table this builder accepts labels from.
    #[must_use]
    pub fn swing_table(&self) -> &'static SwingTable {
        self.swing
    }

    /// Returns `true` if the horizontal vane is sent.
    #[must_use]
    pub fn wide_vane(&self) -> bool {
        self.wide_vane
    }

    /// Sets the target temperature, optionally switching mode in the same
    /// publish.
    ///
    /// The value is rounded to the nearest half degree, ties to even.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Absent` if `value` is 0 or not finite.
    pub fn set_temperature(
        &self,
        value: f32,
        hvac_mode: Option<HvacMode>,
    ) -> Result<Command, ValueError> {
        if is_absent_temperature(value) {
            return Err(ValueError::Absent("temperature"));
        }

        let rounded = (value * 2.0).round_ties_even() / 2.0;
        let command = Command::new(
            CommandPayload {
                temperature: Some(format!("{rounded:.1}")),
                ..CommandPayload::default()
            },
            vec![StateChange::TargetTemperature(rounded)],
        );

        Ok(match hvac_mode {
            Some(mode) => command.merged(self.set_hvac_mode(mode)),
            None => command,
        })
    }

    /// Sets the fan speed from a label such as `"Quiet"` or `"2"`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Absent` for an empty label and
    /// `ValueError::InvalidFanSpeed` for one the unit does not know.
    pub fn set_fan_mode(&self, label: &str) -> Result<Command, ValueError> {
        if is_absent_label(label) {
            return Err(ValueError::Absent("fan mode"));
        }

        let speed: FanSpeed = label.parse()?;
        Ok(Command::new(
            CommandPayload {
                fan: Some(speed),
                ..CommandPayload::default()
            },
            vec![StateChange::FanSpeed(speed)],
        ))
    }

    /// Switches the unit off or into a running mode.
    ///
    /// `Off` only cuts power; the stored mode is kept for the next power-on.
    #[must_use]
    pub fn set_hvac_mode(&self, mode: HvacMode) -> Command {
        match DeviceMode::try_from(mode) {
            Ok(device_mode) => Command::new(
                CommandPayload {
                    power: Some(PowerState::On),
                    mode: Some(device_mode),
                    ..CommandPayload::default()
                },
                vec![
                    StateChange::Power(PowerState::On),
                    StateChange::Mode(device_mode),
                ],
            ),
            Err(_) => self.turn_off(),
        }
    }

    /// Powers the unit on in its last mode.
    #[must_use]
    pub fn turn_on(&self) -> Command {
        Self::power(PowerState::On)
    }

    /// Powers the unit off.
    #[must_use]
    pub fn turn_off(&self) -> Command {
        Self::power(PowerState::Off)
    }

    fn power(state: PowerState) -> Command {
        Command::new(
            CommandPayload {
                power: Some(state),
                ..CommandPayload::default()
            },
            vec![StateChange::Power(state)],
        )
    }

    /// Moves the vanes to the position named by a swing label.
    ///
    /// Both vanes are stored locally; the horizontal vane is only sent when
    /// the unit has a wide vane.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Absent` for an empty label and
    /// `ValueError::UnknownSwingMode` for a label outside the active table.
    pub fn set_swing_mode(&self, label: &str) -> Result<Command, ValueError> {
        if is_absent_label(label) {
            return Err(ValueError::Absent("swing mode"));
        }

        let position = self
            .swing
            .position(label)
            .ok_or_else(|| ValueError::UnknownSwingMode(label.to_string()))?;

        Ok(Command::new(
            CommandPayload {
                vane: Some(position.vertical),
                wide_vane: self.wide_vane.then_some(position.horizontal),
                ..CommandPayload::default()
            },
            vec![
                StateChange::VerticalVane(position.vertical),
                StateChange::HorizontalVane(position.horizontal),
            ],
        ))
    }
}
