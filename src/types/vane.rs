// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vane positions.
//!
//! The vertical vane tilts the airflow up and down, the horizontal ("wide")
//! vane sweeps it left and right. Both can be parked at a fixed position,
//! left to the unit (`AUTO`, written `|` for the wide vane) or set to swing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Position of the vertical (up/down) vane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalVane {
    /// Unit picks the angle.
    #[serde(rename = "AUTO")]
    Auto,
    /// Position 1, highest.
    #[serde(rename = "1")]
    Top,
    /// Position 2.
    #[serde(rename = "2")]
    High,
    /// Position 3.
    #[serde(rename = "3")]
    Middle,
    /// Position 4.
    #[serde(rename = "4")]
    Low,
    /// Position 5, lowest.
    #[serde(rename = "5")]
    Bottom,
    /// Oscillates.
    #[serde(rename = "SWING")]
    Swing,
}

impl VerticalVane {
    /// The five fixed positions, top to bottom.
    pub const FIXED: [Self; 5] = [Self::Top, Self::High, Self::Middle, Self::Low, Self::Bottom];

    /// Returns the protocol code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Top => "1",
            Self::High => "2",
            Self::Middle => "3",
            Self::Low => "4",
            Self::Bottom => "5",
            Self::Swing => "SWING",
        }
    }

    /// Returns the human-readable name of a fixed position.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Top => "Top",
            Self::High => "High",
            Self::Middle => "Middle",
            Self::Low => "Low",
            Self::Bottom => "Bottom",
            Self::Swing => "Swing",
        }
    }
}

impl fmt::Display for VerticalVane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerticalVane {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO" => Ok(Self::Auto),
            "1" => Ok(Self::Top),
            "2" => Ok(Self::High),
            "3" => Ok(Self::Middle),
            "4" => Ok(Self::Low),
            "5" => Ok(Self::Bottom),
            "SWING" => Ok(Self::Swing),
            _ => Err(ValueError::InvalidVane(s.to_string())),
        }
    }
}

/// Position of the horizontal (wide, left/right) vane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalVane {
    /// Unit picks the direction. Written `|` on the wire.
    #[serde(rename = "|")]
    Auto,
    /// Far left.
    #[serde(rename = "<<")]
    WideLeft,
    /// Left.
    #[serde(rename = "<")]
    Left,
    /// Right.
    #[serde(rename = ">")]
    Right,
    /// Far right.
    #[serde(rename = ">>")]
    WideRight,
    /// Oscillates.
    #[serde(rename = "SWING")]
    Swing,
}

impl HorizontalVane {
    /// The four fixed positions, left to right.
    pub const FIXED: [Self; 4] = [Self::WideLeft, Self::Left, Self::Right, Self::WideRight];

    /// Returns the protocol code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "|",
            Self::WideLeft => "<<",
            Self::Left => "<",
            Self::Right => ">",
            Self::WideRight => ">>",
            Self::Swing => "SWING",
        }
    }

    /// Returns the human-readable name of a fixed position.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::WideLeft => "Wide left",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::WideRight => "Wide right",
            Self::Swing => "Swing",
        }
    }
}

impl fmt::Display for HorizontalVane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HorizontalVane {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "|" => Ok(Self::Auto),
            "<<" => Ok(Self::WideLeft),
            "<" => Ok(Self::Left),
            ">" => Ok(Self::Right),
            ">>" => Ok(Self::WideRight),
            "SWING" => Ok(Self::Swing),
            _ => Err(ValueError::InvalidVane(s.to_string())),
        }
    }
}

/// A combined vertical and horizontal vane position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VanePosition {
    /// Up/down position.
    pub vertical: VerticalVane,
    /// Left/right position.
    pub horizontal: HorizontalVane,
}

impl VanePosition {
    /// Both vanes left to the unit.
    pub const AUTO: Self = Self::new(VerticalVane::Auto, HorizontalVane::Auto);

    /// Creates a new vane position.
    #[must_use]
    pub const fn new(vertical: VerticalVane, horizontal: HorizontalVane) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

impl Default for VanePosition {
    fn default() -> Self {
        Self::AUTO
    }
}

impl fmt::Display for VanePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vertical, self.horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_codes_parse_back() {
        for vane in [
            VerticalVane::Auto,
            VerticalVane::Top,
            VerticalVane::Bottom,
            VerticalVane::Swing,
        ] {
            assert_eq!(vane.as_str().parse::<VerticalVane>().unwrap(), vane);
        }
        assert!("6".parse::<VerticalVane>().is_err());
    }

    #[test]
    fn horizontal_auto_is_bar() {
        assert_eq!(HorizontalVane::Auto.as_str(), "|");
        assert_eq!("|".parse::<HorizontalVane>().unwrap(), HorizontalVane::Auto);
        assert!(matches!(
            "<>".parse::<HorizontalVane>(),
            Err(ValueError::InvalidVane(_))
        ));
    }

    #[test]
    fn serde_uses_wire_codes() {
        assert_eq!(
            serde_json::to_string(&HorizontalVane::WideLeft).unwrap(),
            r#""<<""#
        );
        assert_eq!(
            serde_json::to_string(&VerticalVane::Middle).unwrap(),
            r#""3""#
        );
    }

    #[test]
    fn default_position_is_auto() {
        let position = VanePosition::default();
        assert_eq!(position.vertical, VerticalVane::Auto);
        assert_eq!(position.horizontal, HorizontalVane::Auto);
        assert_eq!(position.to_string(), "(AUTO, |)");
    }
}
