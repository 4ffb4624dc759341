// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message transport for heat pump units.
//!
//! A unit only needs two things from its transport: publish a JSON command
//! and deliver inbound status messages to its [`StatusReconciler`]. The
//! [`Transport`] trait captures exactly that, so hosts can plug in their own
//! MQTT client. [`MqttBroker`] is the bundled `rumqttc` implementation.
//!
//! # Routing
//!
//! - [`MqttBroker`]: one connection shared by any number of units
//! - [`TopicRouter`]: maps inbound topics to unit reconcilers

#[cfg(feature = "mqtt")]
mod mqtt_broker;
mod topic_router;

#[cfg(feature = "mqtt")]
pub use mqtt_broker::{MqttBroker, MqttBrokerBuilder};
pub use topic_router::TopicRouter;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ValueError};
use crate::reconciler::StatusReconciler;

/// MQTT quality of service level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QoS {
    /// Fire and forget.
    #[default]
    AtMostOnce,
    /// Acknowledged delivery.
    AtLeastOnce,
    /// Assured single delivery.
    ExactlyOnce,
}

impl QoS {
    /// Returns the numeric level.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::AtMostOnce => 0,
            Self::AtLeastOnce => 1,
            Self::ExactlyOnce => 2,
        }
    }
}

impl TryFrom<u8> for QoS {
    type Error = ValueError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::AtMostOnce),
            1 => Ok(Self::AtLeastOnce),
            2 => Ok(Self::ExactlyOnce),
            other => Err(ValueError::InvalidQos(other)),
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> Self {
        qos.level()
    }
}

#[cfg(feature = "mqtt")]
impl From<QoS> for rumqttc::QoS {
    fn from(qos: QoS) -> Self {
        match qos {
            QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
            QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
            QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
        }
    }
}

/// A message ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Destination topic.
    pub topic: String,
    /// JSON payload.
    pub payload: String,
    /// Delivery guarantee.
    pub qos: QoS,
    /// Whether the broker keeps the message for late subscribers.
    pub retain: bool,
}

/// Publish/subscribe collaborator of a heat pump unit.
///
/// Implementations own reconnects and delivery guarantees. Inbound messages
/// must be handed to [`StatusReconciler::handle`] in delivery order, without
/// holding any lock the reconciler might need.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Publishes a message.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message could not be queued.
    async fn publish(&self, message: OutboundMessage) -> Result<(), ProtocolError>;

    /// Starts delivering the reconciler's topics to it.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the subscription fails.
    async fn subscribe(
        &self,
        reconciler: &Arc<StatusReconciler>,
        qos: QoS,
    ) -> Result<(), ProtocolError>;

    /// Stops delivering the reconciler's topics.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the unsubscription fails.
    async fn unsubscribe(&self, reconciler: &StatusReconciler) -> Result<(), ProtocolError>;
}

impl<T: Transport> Transport for Arc<T> {
    async fn publish(&self, message: OutboundMessage) -> Result<(), ProtocolError> {
        self.as_ref().publish(message).await
    }

    async fn subscribe(
        &self,
        reconciler: &Arc<StatusReconciler>,
        qos: QoS,
    ) -> Result<(), ProtocolError> {
        self.as_ref().subscribe(reconciler, qos).await
    }

    async fn unsubscribe(&self, reconciler: &StatusReconciler) -> Result<(), ProtocolError> {
        self.as_ref().unsubscribe(reconciler).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qos_levels() {
        assert_eq!(QoS::default(), QoS::AtMostOnce);
        assert_eq!(QoS::try_from(1).unwrap(), QoS::AtLeastOnce);
        assert_eq!(u8::from(QoS::ExactlyOnce), 2);
        assert_eq!(QoS::try_from(3), Err(ValueError::InvalidQos(3)));
    }

    #[test]
    fn qos_serde() {
        let qos: QoS = serde_json::from_str("2").unwrap();
        assert_eq!(qos, QoS::ExactlyOnce);
        assert_eq!(serde_json::to_string(&QoS::AtLeastOnce).unwrap(), "1");
        assert!(serde_json::from_str::<QoS>("7").is_err());
    }

    #[cfg(feature = "mqtt")]
    #[test]
    fn qos_to_rumqttc() {
        assert_eq!(
            rumqttc::QoS::from(QoS::AtLeastOnce),
            rumqttc::QoS::AtLeastOnce
        );
    }
}
