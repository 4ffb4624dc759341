// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for heat pump control.
//!
//! Each type covers exactly the codes the unit understands, so a value that
//! reaches a command payload is always valid on the wire.
//!
//! # Types
//!
//! - [`PowerState`] - ON/OFF power field
//! - [`DeviceMode`] / [`HvacMode`] - device and canonical operating modes
//! - [`HvacAction`] - derived current activity
//! - [`FanSpeed`] - AUTO, QUIET, 1-4
//! - [`VerticalVane`] / [`HorizontalVane`] / [`VanePosition`] - airflow direction

mod fan;
mod mode;
mod power;
mod vane;

pub use fan::FanSpeed;
pub use mode::{DeviceMode, HvacAction, HvacMode};
pub use power::PowerState;
pub use vane::{HorizontalVane, VanePosition, VerticalVane};
