// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT topic routing for heat pump units.
//!
//! The [`TopicRouter`] hands incoming MQTT messages to the reconciler of the
//! unit listening on that topic. It holds weak references so units can be
//! dropped without unregistering first.
//!
//! ```text
//! MQTT Message: heatpump/status → {"power":"ON",...}
//!                     ↓
//!             TopicRouter.route()
//!                     ↓
//!      Lookup "heatpump/status" in subscribers
//!                     ↓
//!        Weak<StatusReconciler>.upgrade()
//!                     ↓
//!            reconciler.handle(topic, payload)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::reconciler::StatusReconciler;

/// Routes MQTT messages to unit reconcilers.
#[derive(Debug, Default)]
pub struct TopicRouter {
    /// Map from exact inbound topic to the reconciler reading it.
    subscribers: RwLock<HashMap<String, Weak<StatusReconciler>>>,
}

impl TopicRouter {
    /// Creates a new empty topic router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `reconciler` for every one of its topics.
    ///
    /// A topic already registered to another unit is taken over.
    pub fn register(&self, reconciler: &Arc<StatusReconciler>) {
        let mut subscribers = self.subscribers.write();
        for topic in reconciler.topics().all() {
            tracing::debug!(topic = %topic, "Registering unit for routing");
            subscribers.insert(topic.to_string(), Arc::downgrade(reconciler));
        }
    }

    /// Removes the topics of `reconciler`.
    ///
    /// Topics that were since taken over by another unit are left alone.
    /// Returns `true` if anything was removed.
    pub fn unregister(&self, reconciler: &StatusReconciler) -> bool {
        let mut subscribers = self.subscribers.write();
        let mut removed = false;
        for topic in reconciler.topics().all() {
            let owned = subscribers
                .get(topic)
                .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), reconciler));
            if owned {
                tracing::debug!(topic = %topic, "Unregistering unit from routing");
                subscribers.remove(topic);
                removed = true;
            }
        }
        removed
    }

    /// Routes an MQTT message to the unit listening on `topic`.
    ///
    /// Returns `true` if a unit received the message, whether or not it
    /// accepted it.
    pub fn route(&self, topic: &str, payload: &str) -> bool {
        let Some(reconciler) = self.lookup(topic) else {
            return false;
        };
        reconciler.handle(topic, payload);
        true
    }

    /// Routes a raw MQTT payload, which the unit rejects if it is not UTF-8.
    ///
    /// Returns `true` if a unit received the message.
    pub fn route_bytes(&self, topic: &str, payload: &[u8]) -> bool {
        let Some(reconciler) = self.lookup(topic) else {
            return false;
        };
        reconciler.handle_bytes(topic, payload);
        true
    }

    fn lookup(&self, topic: &str) -> Option<Arc<StatusReconciler>> {
        // The lock is released before the reconciler runs
        let reconciler = self.subscribers.read().get(topic).and_then(Weak::upgrade);
        if reconciler.is_none() {
            tracing::trace!(topic = %topic, "No registered unit for topic");
        }
        reconciler
    }

    /// Returns the number of registered topics.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Returns `true` if `topic` is routed to a live unit.
    #[must_use]
    pub fn is_routed(&self, topic: &str) -> bool {
        self.subscribers
            .read()
            .get(topic)
            .is_some_and(|weak| weak.strong_count() > 0)
    }
}
