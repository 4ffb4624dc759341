// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Fan speed of the indoor unit.
///
/// The wire codes are upper case (`AUTO`, `QUIET`, `1`..`4`). Hosts show
/// them capitalized (`Auto`, `Quiet`, `1`..`4`) and parsing accepts either.
///
/// # Examples
///
/// ```
/// use mitsu_mqtt::types::FanSpeed;
///
/// let speed: FanSpeed = "Quiet".parse().unwrap();
/// assert_eq!(speed, FanSpeed::Quiet);
/// assert_eq!(speed.as_str(), "QUIET");
/// assert_eq!(speed.label(), "Quiet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FanSpeed {
    /// Unit picks the speed.
    #[serde(rename = "AUTO")]
    Auto,
    /// Lowest, silent speed.
    #[serde(rename = "QUIET")]
    Quiet,
    /// Speed 1.
    #[serde(rename = "1")]
    One,
    /// Speed 2.
    #[serde(rename = "2")]
    Two,
    /// Speed 3.
    #[serde(rename = "3")]
    Three,
    /// Speed 4.
    #[serde(rename = "4")]
    Four,
}

impl FanSpeed {
    /// All fan speeds in display order.
    pub const ALL: [Self; 6] = [
        Self::Auto,
        Self::Quiet,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
    ];

    /// Returns the protocol string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Quiet => "QUIET",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
        }
    }

    /// Returns the capitalized label shown to users.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Quiet => "Quiet",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FanSpeed {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" => Ok(Self::Auto),
            "QUIET" => Ok(Self::Quiet),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3" => Ok(Self::Three),
            "4" => Ok(Self::Four),
            _ => Err(ValueError::InvalidFanSpeed(s.to_string())),
        }
    }
}
