// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::swing::SwingTable;
use crate::types::{
    DeviceMode, FanSpeed, HorizontalVane, HvacAction, HvacMode, PowerState, VanePosition,
    VerticalVane,
};

use super::StateChange;

/// Last known state of one heat pump.
///
/// A fresh state is unpowered with every optional field unknown. Fields are
/// only ever written one at a time through [`apply`](Self::apply), so a
/// message that carries some fields leaves the others untouched.
///
/// The mode survives power-off: switching the unit off and on again keeps the
/// mode it was running in.
///
/// # Examples
///
/// ```
/// use mitsu_mqtt::state::{DeviceState, StateChange};
/// use mitsu_mqtt::types::{DeviceMode, HvacAction, PowerState};
///
/// let mut state = DeviceState::new();
/// assert_eq!(state.hvac_action(), Some(HvacAction::Off));
///
/// state.apply(&StateChange::Power(PowerState::On));
/// state.apply(&StateChange::Mode(DeviceMode::Heat));
/// state.apply(&StateChange::Operating(true));
/// assert_eq!(state.hvac_action(), Some(HvacAction::Heating));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    powered: bool,
    /// Meaningful only while powered.
    mode: Option<DeviceMode>,
    target_temperature: Option<f32>,
    current_temperature: Option<f32>,
    fan_speed: Option<FanSpeed>,
    vertical_vane: Option<VerticalVane>,
    horizontal_vane: Option<HorizontalVane>,
    /// Compressor or fan running, as opposed to idling while on.
    operating: bool,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Raw fields ==========

    /// Returns `true` if the unit is powered.
    #[must_use]
    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Returns the last device mode, kept across power-off.
    #[must_use]
    pub fn mode(&self) -> Option<DeviceMode> {
        self.mode
    }

    /// Gets the target temperature in °C.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f32> {
        self.target_temperature
    }

    /// Gets the measured room temperature in °C.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f32> {
        self.current_temperature
    }

    /// Gets the fan speed.
    #[must_use]
    pub fn fan_speed(&self) -> Option<FanSpeed> {
        self.fan_speed
    }

    /// Gets the vertical vane, if reported.
    #[must_use]
    pub fn vertical_vane(&self) -> Option<VerticalVane> {
        self.vertical_vane
    }

    /// Gets the horizontal vane, if reported.
    #[must_use]
    pub fn horizontal_vane(&self) -> Option<HorizontalVane> {
        self.horizontal_vane
    }

    /// Returns `true` if the compressor or fan is running.
    #[must_use]
    pub fn operating(&self) -> bool {
        self.operating
    }

    // ========== Derived values ==========

    /// Returns the vane position, reading unreported vanes as auto.
    #[must_use]
    pub fn vane_position(&self) -> VanePosition {
        VanePosition::new(
            self.vertical_vane.unwrap_or(VerticalVane::Auto),
            self.horizontal_vane.unwrap_or(HorizontalVane::Auto),
        )
    }

    /// Returns the swing label of the current vane position in `table`.
    #[must_use]
    pub fn swing_mode<'t>(&self, table: &'t SwingTable) -> Option<&'t str> {
        table.label(self.vane_position())
    }

    /// Returns the canonical mode: `Off` while unpowered or before any mode
    /// has been reported.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        if !self.powered {
            return HvacMode::Off;
        }
        self.mode.map_or(HvacMode::Off, HvacMode::from)
    }

    /// Derives what the unit is doing right now.
    ///
    /// Returns `None` when the answer depends on a value that has not been
    /// reported yet: no mode, or `AUTO` without both temperatures.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        if !self.powered {
            return Some(HvacAction::Off);
        }
        if !self.operating {
            return Some(HvacAction::Idle);
        }

        let action = match self.mode? {
            DeviceMode::Auto => {
                let current = self.current_temperature?;
                let target = self.target_temperature?;
                if current < target {
                    HvacAction::Heating
                } else {
                    HvacAction::Cooling
                }
            }
            DeviceMode::Heat => HvacAction::Heating,
            DeviceMode::Cool => HvacAction::Cooling,
            DeviceMode::Dry => HvacAction::Drying,
            DeviceMode::Fan => HvacAction::Fan,
            DeviceMode::Off => HvacAction::Off,
        };
        Some(action)
    }

    // ========== State Changes ==========

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match change {
            StateChange::Power(power) => replace(&mut self.powered, power.is_on()),
            StateChange::Mode(mode) => replace(&mut self.mode, Some(*mode)),
            StateChange::TargetTemperature(value) => {
                replace(&mut self.target_temperature, Some(*value))
            }
            StateChange::CurrentTemperature(value) => {
                replace(&mut self.current_temperature, Some(*value))
            }
            StateChange::FanSpeed(speed) => replace(&mut self.fan_speed, Some(*speed)),
            StateChange::VerticalVane(vane) => replace(&mut self.vertical_vane, Some(*vane)),
            StateChange::HorizontalVane(vane) => replace(&mut self.horizontal_vane, Some(*vane)),
            StateChange::Operating(operating) => replace(&mut self.operating, *operating),
        }
    }
}
