// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] updates exactly one field of a
//! [`DeviceState`](super::DeviceState). Inbound status messages and outbound
//! commands are both expressed as lists of changes, so the reconciler and the
//! optimistic command path write the state with the same vocabulary.
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::state::{DeviceState, StateChange};
//! use mitsu_mqtt::types::PowerState;
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Power(PowerState::On)));
//! assert!(!state.apply(&StateChange::Power(PowerState::On)));
//! ```

use crate::types::{DeviceMode, FanSpeed, HorizontalVane, PowerState, VerticalVane};

/// A change to one field of the device state.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Power switched.
    Power(PowerState),

    /// Operating mode changed.
    Mode(DeviceMode),

    /// Target temperature in °C.
    TargetTemperature(f32),

    /// Measured room temperature in °C.
    CurrentTemperature(f32),

    /// Fan speed changed.
    FanSpeed(FanSpeed),

    /// Vertical vane moved.
    VerticalVane(VerticalVane),

    /// Horizontal vane moved.
    HorizontalVane(HorizontalVane),

    /// Compressor or fan started or stopped.
    Operating(bool),
}
