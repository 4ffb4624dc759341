// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating modes.
//!
//! Two vocabularies meet here. [`DeviceMode`] is what the heat pump speaks on
//! the wire (`HEAT`, `COOL`, `DRY`, `FAN`, `AUTO`). [`HvacMode`] is the
//! canonical vocabulary a climate host uses (`heat`, `cool`, `dry`,
//! `fan_only`, `heat_cool`, `off`).
//!
//! The translation is a fixed bijection: `heat_cool` is `AUTO`, `fan_only`
//! is `FAN` and every other mode maps to the member of the same name.
//! `off` never travels as a mode field because power is a separate field on
//! the wire, so converting [`HvacMode::Off`] into a [`DeviceMode`] fails.
//!
//! [`HvacAction`] is the derived "what is the unit doing right now" signal.
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::types::{DeviceMode, HvacMode};
//!
//! let device = DeviceMode::try_from(HvacMode::HeatCool).unwrap();
//! assert_eq!(device, DeviceMode::Auto);
//! assert_eq!(HvacMode::from(device), HvacMode::HeatCool);
//!
//! assert!(DeviceMode::try_from(HvacMode::Off).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Mode codes understood by the heat pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceMode {
    /// Only valid in the configured mode list; never published.
    #[serde(rename = "OFF")]
    Off,
    /// Heating.
    #[serde(rename = "HEAT")]
    Heat,
    /// Cooling.
    #[serde(rename = "COOL")]
    Cool,
    /// Dehumidifying.
    #[serde(rename = "DRY")]
    Dry,
    /// Fan only.
    #[serde(rename = "FAN")]
    Fan,
    /// Automatic heat or cool.
    #[serde(rename = "AUTO")]
    Auto,
}

impl DeviceMode {
    /// All device modes, in the order a unit advertises them by default.
    pub const ALL: [Self; 6] = [
        Self::Auto,
        Self::Cool,
        Self::Dry,
        Self::Heat,
        Self::Fan,
        Self::Off,
    ];

    /// Returns the protocol string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::Dry => "DRY",
            Self::Fan => "FAN",
            Self::Auto => "AUTO",
        }
    }
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "HEAT" => Ok(Self::Heat),
            "COOL" => Ok(Self::Cool),
            "DRY" => Ok(Self::Dry),
            "FAN" => Ok(Self::Fan),
            "AUTO" => Ok(Self::Auto),
            _ => Err(ValueError::InvalidDeviceMode(s.to_string())),
        }
    }
}

impl TryFrom<HvacMode> for DeviceMode {
    type Error = ValueError;

    fn try_from(mode: HvacMode) -> Result<Self, Self::Error> {
        match mode {
            HvacMode::Off => Err(ValueError::NotADeviceMode(mode)),
            HvacMode::Heat => Ok(Self::Heat),
            HvacMode::Cool => Ok(Self::Cool),
            HvacMode::Dry => Ok(Self::Dry),
            HvacMode::FanOnly => Ok(Self::Fan),
            HvacMode::HeatCool => Ok(Self::Auto),
        }
    }
}

/// Canonical HVAC modes exposed to a climate host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Unit is switched off.
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Dehumidifying.
    Dry,
    /// Fan only.
    FanOnly,
    /// Automatic heat or cool.
    HeatCool,
}

impl HvacMode {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
            Self::HeatCool => "heat_cool",
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            "dry" => Ok(Self::Dry),
            "fan_only" => Ok(Self::FanOnly),
            "heat_cool" => Ok(Self::HeatCool),
            _ => Err(ValueError::InvalidHvacMode(s.to_string())),
        }
    }
}

impl From<DeviceMode> for HvacMode {
    fn from(mode: DeviceMode) -> Self {
        match mode {
            DeviceMode::Off => Self::Off,
            DeviceMode::Heat => Self::Heat,
            DeviceMode::Cool => Self::Cool,
            DeviceMode::Dry => Self::Dry,
            DeviceMode::Fan => Self::FanOnly,
            DeviceMode::Auto => Self::HeatCool,
        }
    }
}

/// What the unit is currently doing, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    /// Unit is switched off.
    Off,
    /// Powered but the compressor and fan are at rest.
    Idle,
    /// Heating.
    Heating,
    /// Cooling.
    Cooling,
    /// Dehumidifying.
    Drying,
    /// Moving air only.
    Fan,
}

impl HvacAction {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Idle => "idle",
            Self::Heating => "heating",
            Self::Cooling => "cooling",
            Self::Drying => "drying",
            Self::Fan => "fan",
        }
    }
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_device_mode() {
        for mode in [
            HvacMode::Heat,
            HvacMode::Cool,
            HvacMode::Dry,
            HvacMode::FanOnly,
            HvacMode::HeatCool,
        ] {
            let device = DeviceMode::try_from(mode).unwrap();
            assert_eq!(HvacMode::from(device), mode);
        }
    }

    #[test]
    fn heat_cool_is_auto() {
        assert_eq!(
            DeviceMode::try_from(HvacMode::HeatCool).unwrap(),
            DeviceMode::Auto
        );
        assert_eq!(HvacMode::from(DeviceMode::Auto), HvacMode::HeatCool);
        assert_eq!(HvacMode::from(DeviceMode::Fan), HvacMode::FanOnly);
    }

    #[test]
    fn off_is_rejected() {
        assert_eq!(
            DeviceMode::try_from(HvacMode::Off).unwrap_err(),
            ValueError::NotADeviceMode(HvacMode::Off)
        );
        assert_eq!(HvacMode::from(DeviceMode::Off), HvacMode::Off);
    }

    #[test]
    fn device_mode_from_str() {
        assert_eq!("heat".parse::<DeviceMode>().unwrap(), DeviceMode::Heat);
        assert_eq!("AUTO".parse::<DeviceMode>().unwrap(), DeviceMode::Auto);
        assert!("HEAT_COOL".parse::<DeviceMode>().is_err());
    }

    #[test]
    fn hvac_mode_from_str() {
        assert_eq!("fan_only".parse::<HvacMode>().unwrap(), HvacMode::FanOnly);
        assert_eq!("Heat_Cool".parse::<HvacMode>().unwrap(), HvacMode::HeatCool);
        assert!(matches!(
            "fan".parse::<HvacMode>(),
            Err(ValueError::InvalidHvacMode(_))
        ));
    }

    #[test]
    fn serde_codes() {
        assert_eq!(
            serde_json::to_string(&DeviceMode::Fan).unwrap(),
            r#""FAN""#
        );
        assert_eq!(
            serde_json::to_string(&HvacMode::HeatCool).unwrap(),
            r#""heat_cool""#
        );
        let mode: DeviceMode = serde_json::from_str(r#""DRY""#).unwrap();
        assert_eq!(mode, DeviceMode::Dry);
    }

    #[test]
    fn action_display() {
        assert_eq!(HvacAction::Heating.to_string(), "heating");
        assert_eq!(HvacAction::Idle.as_str(), "idle");
    }
}
