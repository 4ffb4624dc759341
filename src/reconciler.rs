// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Folding of inbound status messages into the device state.
//!
//! ```text
//! MQTT message on heatpump/status → {"power":"ON","mode":"HEAT",...}
//!                     ↓
//!          StatusReconciler.handle()
//!                     ↓
//!          parse_status() → StatusMessage
//!                     ↓
//!       DeviceState.apply() for each change
//!                     ↓
//!   callbacks.dispatch() for each change that stuck
//! ```
//!
//! A message that fails to parse leaves the state exactly as it was.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ParseError;
use crate::state::{DeviceState, StateChange};
use crate::subscription::CallbackRegistry;
use crate::telemetry::{StatusTopics, parse_status};

/// Applies inbound status messages to a shared device state.
#[derive(Debug)]
pub struct StatusReconciler {
    topics: StatusTopics,
    state: Arc<RwLock<DeviceState>>,
    callbacks: Arc<CallbackRegistry>,
}

impl StatusReconciler {
    /// Creates a reconciler writing into `state` and notifying `callbacks`.
    #[must_use]
    pub fn new(
        topics: StatusTopics,
        state: Arc<RwLock<DeviceState>>,
        callbacks: Arc<CallbackRegistry>,
    ) -> Self {
        Self {
            topics,
            state,
            callbacks,
        }
    }

    /// Returns the topics this reconciler reads.
    #[must_use]
    pub fn topics(&self) -> &StatusTopics {
        &self.topics
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Parses `payload` and applies it to the state.
    ///
    /// Returns the changes that altered the state. Callbacks are not invoked.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the topic is unknown or the payload cannot be
    /// parsed. The state is untouched in that case.
    pub fn reconcile(&self, topic: &str, payload: &str) -> Result<Vec<StateChange>, ParseError> {
        let message = parse_status(&self.topics, topic, payload)?;

        let mut state = self.state.write();
        let applied = message
            .to_state_changes()
            .into_iter()
            .filter(|change| state.apply(change))
            .collect();
        Ok(applied)
    }

    /// Handles one inbound message end to end.
    ///
    /// Rejected messages are logged and reported to `on_message_rejected`
    /// callbacks. Returns `true` if the message was accepted.
    pub fn handle(&self, topic: &str, payload: &str) -> bool {
        match self.reconcile(topic, payload) {
            Ok(changes) => {
                tracing::debug!(
                    topic = %topic,
                    change_count = changes.len(),
                    "Applied status message"
                );
                for change in &changes {
                    self.callbacks.dispatch(change);
                }
                true
            }
            Err(e) => {
                tracing::warn!(topic = %topic, payload = %payload, error = %e, "Dropping status message");
                self.callbacks.dispatch_rejected(topic, &e);
                false
            }
        }
    }

    /// Handles one inbound message given as raw bytes.
    ///
    /// A payload that is not UTF-8 is rejected with `ParseError::NotUtf8`.
    pub fn handle_bytes(&self, topic: &str, payload: &[u8]) -> bool {
        if let Ok(payload) = std::str::from_utf8(payload) {
            return self.handle(topic, payload);
        }

        let error = ParseError::NotUtf8(topic.to_string());
        tracing::warn!(topic = %topic, len = payload.len(), "Dropping non UTF-8 status message");
        self.callbacks.dispatch_rejected(topic, &error);
        false
    }
}
