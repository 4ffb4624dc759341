// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! The [`DeviceState`] struct holds the last known status of one heat pump,
//! while [`StateChange`] represents a single field update that can be applied
//! to it. Both inbound status messages and optimistic command updates are
//! expressed as state changes.
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::state::{DeviceState, StateChange};
//! use mitsu_mqtt::types::FanSpeed;
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::FanSpeed(FanSpeed::Quiet));
//!
//! assert_eq!(state.fan_speed(), Some(FanSpeed::Quiet));
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
