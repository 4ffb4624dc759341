// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level abstraction of one heat pump unit.
//!
//! A [`Heatpump`] ties the pieces together: it owns the unit's
//! [`DeviceState`], turns host intents into commands through a
//! [`CommandBuilder`], publishes them on its [`Transport`], and exposes the
//! climate properties a host platform reads.
//!
//! ```no_run
//! use mitsu_mqtt::{Heatpump, HeatpumpConfig};
//! use mitsu_mqtt::protocol::MqttBroker;
//! use mitsu_mqtt::subscription::Subscribable;
//! use mitsu_mqtt::types::HvacMode;
//!
//! # async fn example() -> mitsu_mqtt::Result<()> {
//! let broker = MqttBroker::builder().host("192.168.1.50").build().await?;
//!
//! let heatpump = Heatpump::new(
//!     broker,
//!     HeatpumpConfig::new("heatpump/status", "heatpump/set")
//!         .with_temperature_state_topic("heatpump/status/temperature"),
//! )?;
//! heatpump.subscribe().await?;
//!
//! heatpump.on_state_changed(|change| println!("{change:?}"));
//!
//! heatpump.set_temperature(21.5, Some(HvacMode::Heat)).await?;
//! heatpump.set_swing_mode("Middle").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::command::{Command, CommandBuilder};
use crate::config::HeatpumpConfig;
use crate::error::{Error, ParseError, ValueError};
use crate::protocol::{OutboundMessage, Transport};
use crate::reconciler::StatusReconciler;
use crate::state::{DeviceState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{DeviceMode, FanSpeed, HvacAction, HvacMode, PowerState};

/// Unit of every temperature this crate reads or writes.
pub const TEMPERATURE_UNIT: &str = "°C";

/// Smallest target temperature change offered to the host.
pub const TARGET_TEMPERATURE_STEP: f32 = 1.0;

/// One heat pump unit controlled over a [`Transport`].
///
/// State is updated optimistically: a command's changes are applied before
/// it is published, and confirmed or corrected by the next status message.
#[derive(Debug)]
pub struct Heatpump<T: Transport> {
    transport: T,
    config: HeatpumpConfig,
    commands: CommandBuilder,
    state: Arc<RwLock<DeviceState>>,
    callbacks: Arc<CallbackRegistry>,
    reconciler: Arc<StatusReconciler>,
    subscribed: AtomicBool,
}

impl<T: Transport> Heatpump<T> {
    /// Creates a unit. Nothing is subscribed until [`subscribe`](Self::subscribe).
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if `config` does not
    /// validate.
    pub fn new(transport: T, config: HeatpumpConfig) -> Result<Self, Error> {
        config.validate()?;

        let state = Arc::new(RwLock::new(DeviceState::new()));
        let callbacks = Arc::new(CallbackRegistry::new());
        let reconciler = Arc::new(StatusReconciler::new(
            config.status_topics(),
            Arc::clone(&state),
            Arc::clone(&callbacks),
        ));

        Ok(Self {
            transport,
            commands: CommandBuilder::new(config.wide_vane),
            config,
            state,
            callbacks,
            reconciler,
            subscribed: AtomicBool::new(false),
        })
    }

    /// Returns the unit configuration.
    #[must_use]
    pub fn config(&self) -> &HeatpumpConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    // ========== Subscription lifecycle ==========

    /// Subscribes to the unit's status topics.
    ///
    /// Calling it again while subscribed does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport rejects the subscription.
    pub async fn subscribe(&self) -> Result<(), Error> {
        if self.subscribed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        if let Err(e) = self
            .transport
            .subscribe(&self.reconciler, self.config.qos)
            .await
        {
            self.subscribed.store(false, Ordering::Release);
            return Err(e.into());
        }

        tracing::debug!(
            unit = %self.config.name,
            topics = ?self.reconciler.topics().all(),
            "Subscribed to status topics"
        );
        Ok(())
    }

    /// Unsubscribes from the unit's status topics.
    ///
    /// Safe to call when never subscribed, and safe to call twice.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport rejects the unsubscription.
    pub async fn unsubscribe(&self) -> Result<(), Error> {
        if !self.subscribed.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        self.transport.unsubscribe(&self.reconciler).await?;
        tracing::debug!(unit = %self.config.name, "Unsubscribed from status topics");
        Ok(())
    }

    /// Returns `true` while subscribed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }

    /// Feeds one inbound message to the unit, as a transport would.
    ///
    /// Returns `true` if the message was accepted.
    pub fn handle_message(&self, topic: &str, payload: &str) -> bool {
        self.reconciler.handle(topic, payload)
    }

    // ========== Commands ==========

    /// Applies a command's changes, publishes it, then notifies listeners.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the publish fails. The optimistic changes
    /// stay applied and listeners are still notified of them, so they match
    /// the state the next status message is compared against.
    pub async fn execute(&self, command: Command) -> Result<(), Error> {
        let payload = command.to_json()?;

        let applied: Vec<StateChange> = {
            let mut state = self.state.write();
            command
                .changes()
                .iter()
                .filter(|change| state.apply(change))
                .cloned()
                .collect()
        };

        tracing::debug!(
            unit = %self.config.name,
            topic = %self.config.command_topic,
            payload = %payload,
            "Sending command"
        );
        let published = self
            .transport
            .publish(OutboundMessage {
                topic: self.config.command_topic.clone(),
                payload,
                qos: self.config.qos,
                retain: self.config.retain,
            })
            .await;
        if let Err(e) = &published {
            tracing::warn!(unit = %self.config.name, error = %e, "Failed to publish command");
        }

        for change in &applied {
            self.callbacks.dispatch(change);
        }
        published.map_err(Error::from)
    }

    fn checked(&self, intent: &str, command: Result<Command, ValueError>) -> Result<Command, Error> {
        command.map_err(|e| {
            tracing::warn!(unit = %self.config.name, intent, error = %e, "Rejecting command");
            Error::Value(e)
        })
    }

    /// Sets the target temperature, optionally switching mode in the same
    /// publish.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Absent` for 0 or a non-finite value, or a
    /// transport error.
    pub async fn set_temperature(
        &self,
        value: f32,
        hvac_mode: Option<HvacMode>,
    ) -> Result<(), Error> {
        let command = self.checked(
            "set_temperature",
            self.commands.set_temperature(value, hvac_mode),
        )?;
        self.execute(command).await
    }

    /// Sets the fan speed from one of [`fan_modes`](Self::fan_modes).
    ///
    /// # Errors
    ///
    /// Returns a `ValueError` for an empty or unknown label, or a transport
    /// error.
    pub async fn set_fan_mode(&self, label: &str) -> Result<(), Error> {
        let command = self.checked("set_fan_mode", self.commands.set_fan_mode(label))?;
        self.execute(command).await
    }

    /// Switches mode. `HvacMode::Off` powers the unit down and keeps the
    /// last mode.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), Error> {
        self.execute(self.commands.set_hvac_mode(mode)).await
    }

    /// Powers the unit on in its last mode.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.execute(self.commands.turn_on()).await
    }

    /// Powers the unit off.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.execute(self.commands.turn_off()).await
    }

    /// Moves the vanes to one of [`swing_modes`](Self::swing_modes).
    ///
    /// # Errors
    ///
    /// Returns a `ValueError` for an empty or unknown label, or a transport
    /// error.
    pub async fn set_swing_mode(&self, label: &str) -> Result<(), Error> {
        let command = self.checked("set_swing_mode", self.commands.set_swing_mode(label))?;
        self.execute(command).await
    }

    // ========== Host-facing properties ==========

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    /// Returns the target temperature step offered to the host.
    #[must_use]
    pub fn target_temperature_step(&self) -> f32 {
        TARGET_TEMPERATURE_STEP
    }

    /// Returns the target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f32> {
        self.state.read().target_temperature()
    }

    /// Returns the room temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f32> {
        self.state.read().current_temperature()
    }

    /// Returns the fan speed label, such as `"Auto"` or `"2"`.
    #[must_use]
    pub fn fan_mode(&self) -> Option<&'static str> {
        self.state.read().fan_speed().map(|speed| speed.label())
    }

    /// Returns every fan speed label.
    #[must_use]
    pub fn fan_modes(&self) -> Vec<&'static str> {
        FanSpeed::ALL.iter().map(FanSpeed::label).collect()
    }

    /// Returns the canonical mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.state.read().hvac_mode()
    }

    /// Returns the configured modes in canonical form.
    #[must_use]
    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        self.config
            .modes
            .iter()
            .copied()
            .map(HvacMode::from)
            .collect()
    }

    /// Returns what the unit is doing right now, if known.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.state.read().hvac_action()
    }

    /// Returns the swing label of the current vane position.
    #[must_use]
    pub fn swing_mode(&self) -> Option<&'static str> {
        self.state.read().swing_mode(self.commands.swing_table())
    }

    /// Returns every swing label, in table order.
    #[must_use]
    pub fn swing_modes(&self) -> Vec<&'static str> {
        self.commands.swing_table().labels().collect()
    }
}

impl<T: Transport> Subscribable for Heatpump<T> {
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DeviceMode) + Send + Sync + 'static,
    {
        self.callbacks.on_mode_changed(callback)
    }

    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.callbacks.on_target_temperature_changed(callback)
    }

    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.callbacks.on_current_temperature_changed(callback)
    }

    fn on_fan_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanSpeed) + Send + Sync + 'static,
    {
        self.callbacks.on_fan_speed_changed(callback)
    }

    fn on_operating_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_operating_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn on_message_rejected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &ParseError) + Send + Sync + 'static,
    {
        self.callbacks.on_message_rejected(callback)
    }

    fn unsubscribe_callback(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}
