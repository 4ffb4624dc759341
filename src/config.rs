// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heat pump unit configuration.

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::protocol::QoS;
use crate::telemetry::StatusTopics;
use crate::types::DeviceMode;

/// Name used when none is configured.
pub const DEFAULT_NAME: &str = "MQTT Climate";

/// Configuration of one heat pump unit.
///
/// Deserializes from the same keys a host configuration file would use;
/// every key except the two topics has a default.
///
/// # Examples
///
/// ```
/// use mitsu_mqtt::HeatpumpConfig;
/// use mitsu_mqtt::protocol::QoS;
///
/// let config = HeatpumpConfig::new("heatpump/status", "heatpump/set")
///     .with_name("Living room")
///     .with_temperature_state_topic("heatpump/status/temperature")
///     .with_qos(QoS::AtLeastOnce)
///     .with_wide_vane(true);
///
/// assert!(config.validate().is_ok());
///
/// let config: HeatpumpConfig = serde_json::from_str(
///     r#"{"state_topic":"hp/status","command_topic":"hp/set"}"#,
/// ).unwrap();
/// assert_eq!(config.name, "MQTT Climate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatpumpConfig {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Topic carrying operation status.
    pub state_topic: String,

    /// Topic carrying room sensor readings.
    #[serde(default)]
    pub temperature_state_topic: Option<String>,

    /// Topic commands are published to.
    pub command_topic: String,

    /// Device modes offered to the host.
    #[serde(default = "default_modes")]
    pub modes: Vec<DeviceMode>,

    /// QoS for subscriptions and publishes.
    #[serde(default)]
    pub qos: QoS,

    /// Whether published commands are retained.
    #[serde(default)]
    pub retain: bool,

    /// Whether the unit has a horizontal (wide) vane.
    #[serde(default)]
    pub wide_vane: bool,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_modes() -> Vec<DeviceMode> {
    DeviceMode::ALL.to_vec()
}

impl HeatpumpConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new(state_topic: impl Into<String>, command_topic: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            state_topic: state_topic.into(),
            temperature_state_topic: None,
            command_topic: command_topic.into(),
            modes: default_modes(),
            qos: QoS::default(),
            retain: false,
            wide_vane: false,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the room sensor topic.
    #[must_use]
    pub fn with_temperature_state_topic(mut self, topic: impl Into<String>) -> Self {
        self.temperature_state_topic = Some(topic.into());
        self
    }

    /// Restricts the modes offered to the host.
    #[must_use]
    pub fn with_modes(mut self, modes: impl Into<Vec<DeviceMode>>) -> Self {
        self.modes = modes.into();
        self
    }

    /// Sets the QoS level.
    #[must_use]
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    /// Sets whether commands are retained.
    #[must_use]
    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    /// Sets whether the unit has a wide vane.
    #[must_use]
    pub fn with_wide_vane(mut self, wide_vane: bool) -> Self {
        self.wide_vane = wide_vane;
        self
    }

    /// Returns the inbound topics.
    #[must_use]
    pub fn status_topics(&self) -> StatusTopics {
        let topics = StatusTopics::new(self.state_topic.clone());
        match &self.temperature_state_topic {
            Some(topic) => topics.with_temperature_topic(topic.clone()),
            None => topics,
        }
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if a topic is empty or
    /// contains a `+` or `#` wildcard.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.state_topic.is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "state topic is empty".to_string(),
            ));
        }
        if self.command_topic.is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "command topic is empty".to_string(),
            ));
        }
        if self.command_topic.contains(['+', '#']) {
            return Err(DeviceError::InvalidConfiguration(format!(
                "command topic {} contains a wildcard",
                self.command_topic
            )));
        }
        if self
            .temperature_state_topic
            .as_deref()
            .is_some_and(str::is_empty)
        {
            return Err(DeviceError::InvalidConfiguration(
                "temperature state topic is empty".to_string(),
            ));
        }
        // Inbound routing matches topics exactly
        for topic in self.status_topics().all() {
            if topic.contains(['+', '#']) {
                return Err(DeviceError::InvalidConfiguration(format!(
                    "status topic {topic} contains a wildcard"
                )));
            }
        }
        Ok(())
    }
}
