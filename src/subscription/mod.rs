// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for heat pump state changes.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait for types that support event subscriptions
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use mitsu_mqtt::state::StateChange;
//! use mitsu_mqtt::subscription::CallbackRegistry;
//! use mitsu_mqtt::types::PowerState;
//!
//! let registry = CallbackRegistry::new();
//! let seen = Arc::new(AtomicBool::new(false));
//! let seen_clone = seen.clone();
//!
//! let id = registry.on_power_changed(move |state| {
//!     seen_clone.store(state.is_on(), Ordering::SeqCst);
//! });
//!
//! registry.dispatch(&StateChange::Power(PowerState::On));
//! assert!(seen.load(Ordering::SeqCst));
//! assert!(registry.unsubscribe(id));
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
