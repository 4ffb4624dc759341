// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT broker connection for heat pump units.
//!
//! One [`MqttBroker`] holds a single `rumqttc` connection that any number of
//! units share. Keep-alive, QoS handshakes and reconnects are left to
//! `rumqttc`; the broker routes inbound publishes to the unit reading the
//! topic and restores its subscriptions when a reconnect starts a fresh
//! session.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use mitsu_mqtt::protocol::MqttBroker;
//!
//! # async fn example() -> mitsu_mqtt::Result<()> {
//! let broker = MqttBroker::builder()
//!     .host("192.168.1.50")
//!     .credentials("user", "password")
//!     .connection_timeout(Duration::from_secs(5))
//!     .build()
//!     .await?;
//!
//! if broker.is_connected() {
//!     println!("Connected to MQTT broker");
//! }
//!
//! broker.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use rumqttc::{AsyncClient, ConnAck, Event, EventLoop, MqttOptions, Outgoing, Packet};
use tokio::sync::oneshot;

use crate::error::ProtocolError;
use crate::protocol::{OutboundMessage, QoS, TopicRouter, Transport};
use crate::reconciler::StatusReconciler;

/// Global counter for generating unique client IDs.
static BROKER_CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

const DEFAULT_PORT: u16 = 1883;
const KEEP_ALIVE: Duration = Duration::from_secs(30);
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const REQUEST_CAPACITY: usize = 10;

/// An MQTT broker connection that can be shared across multiple units.
///
/// `MqttBroker` is cheaply cloneable (via `Arc`). The connection's event
/// loop stops once every clone is dropped.
#[derive(Clone)]
pub struct MqttBroker {
    inner: Arc<MqttBrokerInner>,
}

struct MqttBrokerInner {
    client: AsyncClient,
    router: TopicRouter,
    /// Topics subscribed on the wire, with their QoS.
    subscriptions: RwLock<HashMap<String, QoS>>,
    host: String,
    port: u16,
    connected: AtomicBool,
}

impl MqttBroker {
    /// Creates a new builder for configuring an MQTT broker connection.
    #[must_use]
    pub fn builder() -> MqttBrokerBuilder {
        MqttBrokerBuilder::default()
    }

    /// Returns whether the broker is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Returns the number of routed inbound topics.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.inner.router.topic_count()
    }

    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.host,
            port = %self.inner.port,
            "Disconnecting from MQTT broker"
        );

        self.inner.client.disconnect().await?;
        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl Transport for MqttBroker {
    async fn publish(&self, message: OutboundMessage) -> Result<(), ProtocolError> {
        tracing::debug!(
            topic = %message.topic,
            payload = %message.payload,
            qos = message.qos.level(),
            retain = message.retain,
            "Publishing command"
        );
        self.inner
            .client
            .publish(
                message.topic,
                message.qos.into(),
                message.retain,
                message.payload,
            )
            .await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        reconciler: &Arc<StatusReconciler>,
        qos: QoS,
    ) -> Result<(), ProtocolError> {
        // Route first so retained messages arriving right after SUBACK land
        self.inner.router.register(reconciler);

        for topic in reconciler.topics().all() {
            if let Err(e) = self.inner.client.subscribe(topic, qos.into()).await {
                self.inner.router.unregister(reconciler);
                return Err(e.into());
            }
            self.inner
                .subscriptions
                .write()
                .insert(topic.to_string(), qos);
            tracing::debug!(topic = %topic, qos = qos.level(), "Subscribed to status topic");
        }
        Ok(())
    }

    async fn unsubscribe(&self, reconciler: &StatusReconciler) -> Result<(), ProtocolError> {
        self.inner.router.unregister(reconciler);

        for topic in reconciler.topics().all() {
            // Another unit may still read this topic
            if self.inner.router.is_routed(topic) {
                continue;
            }
            self.inner.subscriptions.write().remove(topic);
            self.inner.client.unsubscribe(topic).await?;
            tracing::debug!(topic = %topic, "Unsubscribed from status topic");
        }
        Ok(())
    }
}

impl std::fmt::Debug for MqttBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttBroker")
            .field("host", &self.inner.host)
            .field("port", &self.inner.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for creating an MQTT broker connection.
#[derive(Debug)]
pub struct MqttBrokerBuilder {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    connection_timeout: Duration,
}

impl Default for MqttBrokerBuilder {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            credentials: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

impl MqttBrokerBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets how long to wait for the first connection (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.connection_timeout = duration;
        self
    }

    /// Builds and connects to the MQTT broker.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if no host is set, and
    /// `ProtocolError::ConnectionFailed` if the broker refuses the
    /// connection or does not answer within the timeout.
    pub async fn build(self) -> Result<MqttBroker, ProtocolError> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let counter = BROKER_CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let client_id = format!("mitsu_{}_{}", std::process::id(), counter);

        let mut options = MqttOptions::new(&client_id, &self.host, self.port);
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(true);
        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let inner = Arc::new(MqttBrokerInner {
            client,
            router: TopicRouter::new(),
            subscriptions: RwLock::new(HashMap::new()),
            host: self.host,
            port: self.port,
            connected: AtomicBool::new(false),
        });

        let (connected_tx, connected_rx) = oneshot::channel();
        tokio::spawn(run_event_loop(
            event_loop,
            Arc::downgrade(&inner),
            connected_tx,
        ));

        let timeout = self.connection_timeout;
        match tokio::time::timeout(timeout, connected_rx).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => return Err(e),
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}ms",
                    timeout.as_millis()
                )));
            }
        }

        tracing::info!(
            host = %inner.host,
            port = %inner.port,
            client_id = %client_id,
            "Connected to MQTT broker"
        );
        Ok(MqttBroker { inner })
    }
}

/// Drives the connection until it is closed or the broker is dropped.
///
/// Before the first ConnAck an error ends the loop and is reported to the
/// builder. Afterwards errors are logged and polling resumes, which makes
/// `rumqttc` reconnect.
async fn run_event_loop(
    mut event_loop: EventLoop,
    broker: Weak<MqttBrokerInner>,
    connected_tx: oneshot::Sender<Result<(), ProtocolError>>,
) {
    let mut connected_tx = Some(connected_tx);

    loop {
        let event = event_loop.poll().await;
        let Some(inner) = broker.upgrade() else {
            tracing::debug!("MQTT broker dropped, stopping event loop");
            break;
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                inner.connected.store(true, Ordering::Release);
                match connected_tx.take() {
                    Some(tx) => {
                        let _ = tx.send(Ok(()));
                    }
                    None => on_reconnect(&inner, &connack),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(
                    topic = %publish.topic,
                    len = publish.payload.len(),
                    "MQTT message received"
                );
                inner.router.route_bytes(&publish.topic, &publish.payload);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::info!(host = %inner.host, "MQTT connection closed");
                inner.connected.store(false, Ordering::Release);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                inner.connected.store(false, Ordering::Release);
                if let Some(tx) = connected_tx.take() {
                    let _ = tx.send(Err(ProtocolError::ConnectionFailed(e.to_string())));
                    break;
                }
                tracing::warn!(
                    host = %inner.host,
                    error = %e,
                    retry_in = ?RECONNECT_DELAY,
                    "MQTT connection lost"
                );
                drop(inner);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Restores subscriptions the broker forgot across a reconnect.
fn on_reconnect(inner: &MqttBrokerInner, connack: &ConnAck) {
    tracing::info!(host = %inner.host, "Reconnected to MQTT broker");
    if connack.session_present {
        return;
    }

    let subscriptions: Vec<(String, QoS)> = inner
        .subscriptions
        .read()
        .iter()
        .map(|(topic, qos)| (topic.clone(), *qos))
        .collect();
    if subscriptions.is_empty() {
        return;
    }

    // Requests are drained by the event loop, so they are queued from a task
    let client = inner.client.clone();
    tokio::spawn(async move {
        for (topic, qos) in subscriptions {
            if let Err(e) = client.subscribe(topic.as_str(), qos.into()).await {
                tracing::error!(topic = %topic, error = %e, "Failed to restore subscription");
            }
        }
    });
}
