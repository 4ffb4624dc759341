// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use mitsu_mqtt::protocol::MqttBroker;
use mitsu_mqtt::{Heatpump, HeatpumpConfig};
use tokio::time::sleep;

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18850);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind
    sleep(Duration::from_millis(500)).await;
}

async fn connect(port: u16) -> MqttBroker {
    MqttBroker::builder()
        .host("127.0.0.1")
        .port(port)
        .build()
        .await
        .expect("broker should accept the connection")
}

// ============================================================================
// Broker Connection Tests
// ============================================================================

mod broker_connection {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        assert!(broker.is_connected());
        assert_eq!(broker.host(), "127.0.0.1");
        assert_eq!(broker.port(), port);
    }

    #[tokio::test]
    async fn disconnect_from_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        broker.disconnect().await.unwrap();
        assert!(!broker.is_connected());
    }

    #[tokio::test]
    async fn connect_without_broker_fails() {
        let port = get_test_port();

        let result = MqttBroker::builder()
            .host("127.0.0.1")
            .port(port)
            .connection_timeout(Duration::from_millis(500))
            .build()
            .await;

        assert!(result.is_err());
    }
}

// ============================================================================
// Heat Pump over MQTT
// ============================================================================
//
// The mockforge-mqtt broker does not forward publishes between clients, so
// these tests cover the subscribe/publish plumbing only. Inbound routing is
// covered by the TopicRouter and StatusReconciler unit tests and by
// tests/heatpump.rs.

mod heatpump_mqtt {
    use super::*;
    use mitsu_mqtt::types::HvacMode;

    fn config() -> HeatpumpConfig {
        HeatpumpConfig::new("heatpump/status", "heatpump/set")
            .with_temperature_state_topic("heatpump/status/temperature")
    }

    #[tokio::test]
    async fn subscribe_routes_both_topics() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        let heatpump = Heatpump::new(broker.clone(), config()).unwrap();

        heatpump.subscribe().await.unwrap();
        assert!(heatpump.is_subscribed());
        assert_eq!(broker.topic_count(), 2);

        heatpump.unsubscribe().await.unwrap();
        assert_eq!(broker.topic_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        let heatpump = Heatpump::new(broker, config()).unwrap();

        // Never subscribed
        heatpump.unsubscribe().await.unwrap();

        heatpump.subscribe().await.unwrap();
        heatpump.unsubscribe().await.unwrap();
        heatpump.unsubscribe().await.unwrap();
        assert!(!heatpump.is_subscribed());
    }

    #[tokio::test]
    async fn commands_publish_and_update_state() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        let heatpump = Heatpump::new(broker, config()).unwrap();

        heatpump
            .set_temperature(22.0, Some(HvacMode::Cool))
            .await
            .unwrap();
        heatpump.set_fan_mode("2").await.unwrap();

        assert_eq!(heatpump.hvac_mode(), HvacMode::Cool);
        assert_eq!(heatpump.target_temperature(), Some(22.0));
        assert_eq!(heatpump.fan_mode(), Some("2"));
    }

    #[tokio::test]
    async fn two_units_share_one_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker = connect(port).await;
        let living = Heatpump::new(
            broker.clone(),
            HeatpumpConfig::new("living/status", "living/set"),
        )
        .unwrap();
        let bedroom = Heatpump::new(
            broker.clone(),
            HeatpumpConfig::new("bedroom/status", "bedroom/set"),
        )
        .unwrap();

        living.subscribe().await.unwrap();
        bedroom.subscribe().await.unwrap();
        assert_eq!(broker.topic_count(), 2);

        living.unsubscribe().await.unwrap();
        assert_eq!(broker.topic_count(), 1);
    }
}
