// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish state changes.

use crate::error::ParseError;
use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{DeviceMode, FanSpeed, PowerState};

/// Trait for types that support event subscriptions.
///
/// Callbacks fire only for changes that actually altered the stored state,
/// whether they came from an inbound status message or an outbound command.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use mitsu_mqtt::{Heatpump, HeatpumpConfig};
/// use mitsu_mqtt::protocol::MqttBroker;
/// use mitsu_mqtt::subscription::Subscribable;
///
/// # async fn example() -> mitsu_mqtt::Result<()> {
/// let broker = Arc::new(MqttBroker::builder().host("192.168.1.50").build().await?);
/// let heatpump = Heatpump::new(
///     broker,
///     HeatpumpConfig::new("heatpump/status", "heatpump/set"),
/// )?;
///
/// let sub_id = heatpump.on_power_changed(|state| {
///     println!("Heat pump is now {state}");
/// });
///
/// heatpump.unsubscribe_callback(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to power changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to device mode changes.
    ///
    /// The mode is kept across power-off, so this does not fire when the
    /// unit is switched off.
    fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DeviceMode) + Send + Sync + 'static;

    /// Subscribes to target temperature changes, in °C.
    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static;

    /// Subscribes to room temperature changes, in °C.
    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static;

    /// Subscribes to fan speed changes.
    fn on_fan_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanSpeed) + Send + Sync + 'static;

    /// Subscribes to the operating flag.
    fn on_operating_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to inbound messages that were dropped.
    fn on_message_rejected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &ParseError) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe_callback(&self, id: SubscriptionId) -> bool;
}
