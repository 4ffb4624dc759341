// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for heat pump state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::ParseError;
use crate::state::StateChange;
use crate::types::{DeviceMode, FanSpeed, PowerState};

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type ModeCallback = Arc<dyn Fn(DeviceMode) + Send + Sync>;
type TemperatureCallback = Arc<dyn Fn(f32) + Send + Sync>;
type FanSpeedCallback = Arc<dyn Fn(FanSpeed) + Send + Sync>;
type OperatingCallback = Arc<dyn Fn(bool) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;
type RejectedCallback = Arc<dyn Fn(&str, &ParseError) + Send + Sync>;

/// Registry for heat pump subscription callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability so it can be shared
/// between the MQTT event loop and host code. Callbacks run synchronously
/// on the dispatching task.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    mode_callbacks: RwLock<HashMap<SubscriptionId, ModeCallback>>,
    target_temperature_callbacks: RwLock<HashMap<SubscriptionId, TemperatureCallback>>,
    current_temperature_callbacks: RwLock<HashMap<SubscriptionId, TemperatureCallback>>,
    fan_speed_callbacks: RwLock<HashMap<SubscriptionId, FanSpeedCallback>>,
    operating_callbacks: RwLock<HashMap<SubscriptionId, OperatingCallback>>,
    /// Receives every change, vane moves included.
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    rejected_callbacks: RwLock<HashMap<SubscriptionId, RejectedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            mode_callbacks: RwLock::new(HashMap::new()),
            target_temperature_callbacks: RwLock::new(HashMap::new()),
            current_temperature_callbacks: RwLock::new(HashMap::new()),
            fan_speed_callbacks: RwLock::new(HashMap::new()),
            operating_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            rejected_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for device mode changes.
    pub fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(DeviceMode) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.mode_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for target temperature changes.
    pub fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for room temperature changes.
    pub fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.current_temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for fan speed changes.
    pub fn on_fan_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanSpeed) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.fan_speed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for the operating flag.
    pub fn on_operating_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.operating_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for inbound messages that were dropped.
    ///
    /// The callback receives the topic and the parse error.
    pub fn on_message_rejected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &ParseError) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.rejected_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
            || self.mode_callbacks.write().remove(&id).is_some()
            || self.target_temperature_callbacks.write().remove(&id).is_some()
            || self
                .current_temperature_callbacks
                .write()
                .remove(&id)
                .is_some()
            || self.fan_speed_callbacks.write().remove(&id).is_some()
            || self.operating_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
            || self.rejected_callbacks.write().remove(&id).is_some()
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to relevant callbacks.
    ///
    /// Generic callbacks run first, then the typed ones. Callbacks may
    /// register or unsubscribe callbacks; those take effect from the next
    /// dispatch.
    pub fn dispatch(&self, change: &StateChange) {
        for callback in snapshot(&self.state_changed_callbacks) {
            callback(change);
        }

        match change {
            StateChange::Power(power) => {
                for callback in snapshot(&self.power_callbacks) {
                    callback(*power);
                }
            }
            StateChange::Mode(mode) => {
                for callback in snapshot(&self.mode_callbacks) {
                    callback(*mode);
                }
            }
            StateChange::TargetTemperature(value) => {
                for callback in snapshot(&self.target_temperature_callbacks) {
                    callback(*value);
                }
            }
            StateChange::CurrentTemperature(value) => {
                for callback in snapshot(&self.current_temperature_callbacks) {
                    callback(*value);
                }
            }
            StateChange::FanSpeed(speed) => {
                for callback in snapshot(&self.fan_speed_callbacks) {
                    callback(*speed);
                }
            }
            StateChange::Operating(operating) => {
                for callback in snapshot(&self.operating_callbacks) {
                    callback(*operating);
                }
            }
            StateChange::VerticalVane(_) | StateChange::HorizontalVane(_) => {
                // Vanes only reach generic callbacks
            }
        }
    }

    /// Dispatches a rejected inbound message.
    pub fn dispatch_rejected(&self, topic: &str, error: &ParseError) {
        for callback in snapshot(&self.rejected_callbacks) {
            callback(topic, error);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.power_callbacks.read().len()
            + self.mode_callbacks.read().len()
            + self.target_temperature_callbacks.read().len()
            + self.current_temperature_callbacks.read().len()
            + self.fan_speed_callbacks.read().len()
            + self.operating_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
            + self.rejected_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

/// Copies the callbacks out so none runs under the registry lock.
fn snapshot<C: Clone>(callbacks: &RwLock<HashMap<SubscriptionId, C>>) -> Vec<C> {
    callbacks.read().values().cloned().collect()
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VerticalVane;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_power_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_power_changed(move |_state| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch(&StateChange::Power(PowerState::On));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&StateChange::Power(PowerState::Off));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_typed_callbacks_receive_values() {
        let registry = CallbackRegistry::new();
        let mode = Arc::new(RwLock::new(None::<DeviceMode>));
        let target = Arc::new(RwLock::new(None::<f32>));
        let fan = Arc::new(RwLock::new(None::<FanSpeed>));

        let m = mode.clone();
        registry.on_mode_changed(move |value| *m.write() = Some(value));
        let t = target.clone();
        registry.on_target_temperature_changed(move |value| *t.write() = Some(value));
        let f = fan.clone();
        registry.on_fan_speed_changed(move |value| *f.write() = Some(value));

        for change in [
            StateChange::Mode(DeviceMode::Dry),
            StateChange::TargetTemperature(23.0),
            StateChange::FanSpeed(FanSpeed::Two),
        ] {
            registry.dispatch(&change);
        }

        assert_eq!(*mode.read(), Some(DeviceMode::Dry));
        assert_eq!(*target.read(), Some(23.0));
        assert_eq!(*fan.read(), Some(FanSpeed::Two));
    }

    #[test]
    fn registry_temperature_callbacks_are_separate() {
        let registry = CallbackRegistry::new();
        let target = Arc::new(AtomicU32::new(0));
        let current = Arc::new(AtomicU32::new(0));
        let t = target.clone();
        let c = current.clone();

        registry.on_target_temperature_changed(move |_| {
            t.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_current_temperature_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::CurrentTemperature(19.5));

        assert_eq!(target.load(Ordering::SeqCst), 0);
        assert_eq!(current.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_state_changed_sees_vanes() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_state_changed(move |_change| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::VerticalVane(VerticalVane::Low));
        registry.dispatch(&StateChange::Operating(true));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registry_callback_can_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(RwLock::new(None::<SubscriptionId>));
        let calls = Arc::new(AtomicU32::new(0));

        let (r, s, c) = (registry.clone(), slot.clone(), calls.clone());
        let id = registry.on_state_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *s.read() {
                r.unsubscribe(id);
            }
        });
        *slot.write() = Some(id);

        registry.dispatch(&StateChange::Operating(true));
        registry.dispatch(&StateChange::Operating(false));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_callback_can_register_callbacks() {
        let registry = Arc::new(CallbackRegistry::new());
        let r = registry.clone();
        registry.on_power_changed(move |_| {
            r.on_mode_changed(|_| {});
        });
        let r = registry.clone();
        registry.on_message_rejected(move |_, _| {
            r.on_message_rejected(|_, _| {});
        });

        registry.dispatch(&StateChange::Power(PowerState::On));
        registry.dispatch_rejected("hp/state", &ParseError::NotUtf8("hp/state".to_string()));

        assert_eq!(registry.callback_count(), 4);
    }

    #[test]
    fn registry_rejected_callback() {
        let registry = CallbackRegistry::new();
        let topics = Arc::new(RwLock::new(Vec::<String>::new()));
        let topics_clone = topics.clone();

        registry.on_message_rejected(move |topic, _err| {
            topics_clone.write().push(topic.to_string());
        });

        registry.dispatch_rejected(
            "hp/state",
            &ParseError::MissingField("power".to_string()),
        );

        assert_eq!(*topics.read(), vec!["hp/state".to_string()]);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_power_changed(|_| {});
        let id2 = registry.on_mode_changed(|_| {});
        let id3 = registry.on_state_changed(|_| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_power_changed(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
