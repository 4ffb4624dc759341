// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end behaviour of a heat pump unit over an in-memory transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;

use mitsu_mqtt::error::{Error, ProtocolError, ValueError};
use mitsu_mqtt::protocol::{OutboundMessage, QoS, TopicRouter, Transport};
use mitsu_mqtt::subscription::Subscribable;
use mitsu_mqtt::types::{DeviceMode, HvacAction, HvacMode, PowerState};
use mitsu_mqtt::{Heatpump, HeatpumpConfig, StatusReconciler, SwingTable};

/// In-memory transport: records publishes and routes injected messages.
#[derive(Debug, Default)]
struct MemoryTransport {
    router: TopicRouter,
    published: RwLock<Vec<OutboundMessage>>,
}

impl MemoryTransport {
    fn inject(&self, topic: &str, payload: &str) -> bool {
        self.router.route(topic, payload)
    }

    fn payloads(&self) -> Vec<String> {
        self.published
            .read()
            .iter()
            .map(|m| m.payload.clone())
            .collect()
    }
}

impl Transport for MemoryTransport {
    async fn publish(&self, message: OutboundMessage) -> Result<(), ProtocolError> {
        self.published.write().push(message);
        Ok(())
    }

    async fn subscribe(
        &self,
        reconciler: &Arc<StatusReconciler>,
        _qos: QoS,
    ) -> Result<(), ProtocolError> {
        self.router.register(reconciler);
        Ok(())
    }

    async fn unsubscribe(&self, reconciler: &StatusReconciler) -> Result<(), ProtocolError> {
        self.router.unregister(reconciler);
        Ok(())
    }
}

const STATE: &str = "heatpump/status";
const TEMPERATURE: &str = "heatpump/status/temperature";
const SET: &str = "heatpump/set";

async fn unit(wide_vane: bool) -> Heatpump<Arc<MemoryTransport>> {
    let transport = Arc::new(MemoryTransport::default());
    let heatpump = Heatpump::new(
        transport,
        HeatpumpConfig::new(STATE, SET)
            .with_temperature_state_topic(TEMPERATURE)
            .with_wide_vane(wide_vane),
    )
    .unwrap();
    heatpump.subscribe().await.unwrap();
    heatpump
}

// ============================================================================
// Swing tables
// ============================================================================

#[test]
fn swing_labels_round_trip() {
    for table in [SwingTable::full(), SwingTable::vertical_only()] {
        for label in table.labels() {
            let position = table.position(label).unwrap();
            assert_eq!(table.label(position), Some(label), "label {label}");
        }
    }
}

// ============================================================================
// Mode translation
// ============================================================================

#[test]
fn running_modes_round_trip() {
    for mode in [
        HvacMode::Heat,
        HvacMode::Cool,
        HvacMode::Dry,
        HvacMode::FanOnly,
        HvacMode::HeatCool,
    ] {
        let device = DeviceMode::try_from(mode).unwrap();
        assert_eq!(HvacMode::from(device), mode);
    }
    assert!(DeviceMode::try_from(HvacMode::Off).is_err());
}

// ============================================================================
// Inbound status
// ============================================================================

mod inbound {
    use super::*;

    #[tokio::test]
    async fn auto_mode_action_follows_temperatures() {
        let heatpump = unit(false).await;
        let transport = heatpump.transport();

        transport.inject(
            STATE,
            r#"{"power":"ON","mode":"AUTO","temperature":"22","fan":"AUTO","vane":"AUTO"}"#,
        );
        transport.inject(TEMPERATURE, r#"{"roomTemperature":18,"operating":true}"#);
        assert_eq!(heatpump.hvac_action(), Some(HvacAction::Heating));

        transport.inject(TEMPERATURE, r#"{"roomTemperature":25,"operating":true}"#);
        assert_eq!(heatpump.hvac_action(), Some(HvacAction::Cooling));

        transport.inject(TEMPERATURE, r#"{"roomTemperature":25,"operating":false}"#);
        assert_eq!(heatpump.hvac_action(), Some(HvacAction::Idle));
    }

    #[tokio::test]
    async fn unpowered_unit_is_off() {
        let heatpump = unit(false).await;
        let transport = heatpump.transport();

        transport.inject(
            STATE,
            r#"{"power":"OFF","temperature":"22","fan":"AUTO","vane":"AUTO"}"#,
        );
        transport.inject(TEMPERATURE, r#"{"roomTemperature":18,"operating":true}"#);

        assert_eq!(heatpump.hvac_mode(), HvacMode::Off);
        assert_eq!(heatpump.hvac_action(), Some(HvacAction::Off));
    }

    #[tokio::test]
    async fn off_status_keeps_mode() {
        let heatpump = unit(false).await;
        let transport = heatpump.transport();

        transport.inject(
            STATE,
            r#"{"power":"ON","mode":"DRY","temperature":"22","fan":"AUTO","vane":"AUTO"}"#,
        );
        transport.inject(
            STATE,
            r#"{"power":"OFF","mode":"HEAT","temperature":"22","fan":"AUTO","vane":"AUTO"}"#,
        );
        assert_eq!(heatpump.hvac_mode(), HvacMode::Off);

        heatpump.turn_on().await.unwrap();
        assert_eq!(heatpump.hvac_mode(), HvacMode::Dry);
    }

    #[tokio::test]
    async fn malformed_messages_are_reported() {
        let heatpump = unit(false).await;
        let transport = heatpump.transport();

        let rejected = Arc::new(AtomicU32::new(0));
        let rejected_clone = rejected.clone();
        heatpump.on_message_rejected(move |_, _| {
            rejected_clone.fetch_add(1, Ordering::SeqCst);
        });

        transport.inject(
            STATE,
            r#"{"power":"ON","mode":"HEAT","temperature":"21","fan":"AUTO","vane":"AUTO"}"#,
        );
        let before = heatpump.state();

        transport.inject(STATE, "{");
        transport.inject(STATE, r#"{"power":"ON","temperature":"21","fan":"AUTO","vane":"AUTO"}"#);
        transport.inject(
            STATE,
            r#"{"power":"ON","mode":"HEAT","temperature":"hot","fan":"AUTO","vane":"AUTO"}"#,
        );
        transport.inject(TEMPERATURE, r#"{"roomTemperature":20}"#);

        assert_eq!(rejected.load(Ordering::SeqCst), 4);
        assert_eq!(heatpump.state(), before);
    }

    #[tokio::test]
    async fn unsubscribed_unit_stops_receiving() {
        let heatpump = unit(false).await;
        heatpump.unsubscribe().await.unwrap();

        let routed = heatpump
            .transport()
            .inject(TEMPERATURE, r#"{"roomTemperature":20,"operating":false}"#);

        assert!(!routed);
        assert_eq!(heatpump.current_temperature(), None);
    }

    #[tokio::test]
    async fn callbacks_only_see_real_changes() {
        let heatpump = unit(false).await;
        let transport = heatpump.transport();

        let powers = Arc::new(RwLock::new(Vec::new()));
        let powers_clone = powers.clone();
        heatpump.on_power_changed(move |state| powers_clone.write().push(state));

        let on = r#"{"power":"ON","mode":"FAN","temperature":"20","fan":"1","vane":"AUTO"}"#;
        transport.inject(STATE, on);
        transport.inject(STATE, on);
        heatpump.turn_off().await.unwrap();

        assert_eq!(*powers.read(), vec![PowerState::On, PowerState::Off]);
    }
}

// ============================================================================
// Outbound commands
// ============================================================================

mod outbound {
    use super::*;

    #[tokio::test]
    async fn temperature_is_rounded_to_half_degree() {
        let heatpump = unit(false).await;

        heatpump.set_temperature(21.3, None).await.unwrap();

        assert_eq!(
            heatpump.transport().payloads(),
            vec![r#"{"temperature":"21.5"}"#]
        );
        assert_eq!(heatpump.target_temperature(), Some(21.5));
    }

    #[tokio::test]
    async fn zero_temperature_is_a_no_op() {
        let heatpump = unit(false).await;

        let err = heatpump.set_temperature(0.0, None).await.unwrap_err();

        assert!(matches!(err, Error::Value(ValueError::Absent(_))));
        assert!(heatpump.transport().payloads().is_empty());
        assert_eq!(heatpump.target_temperature(), None);
    }

    #[tokio::test]
    async fn bottom_without_wide_vane_sends_vertical_vane_only() {
        let heatpump = unit(false).await;

        heatpump.set_swing_mode("Bottom").await.unwrap();

        assert_eq!(heatpump.transport().payloads(), vec![r#"{"vane":"5"}"#]);
        assert_eq!(heatpump.swing_mode(), Some("Bottom"));
    }

    #[tokio::test]
    async fn wide_vane_swing_sends_both_vanes() {
        let heatpump = unit(true).await;

        heatpump.set_swing_mode("Low right").await.unwrap();

        assert_eq!(
            heatpump.transport().payloads(),
            vec![r#"{"vane":"4","wideVane":">"}"#]
        );
        assert_eq!(heatpump.swing_mode(), Some("Low right"));
    }

    #[tokio::test]
    async fn unknown_swing_label_is_rejected() {
        let heatpump = unit(false).await;

        let err = heatpump.set_swing_mode("Sideways").await.unwrap_err();

        assert!(matches!(
            err,
            Error::Value(ValueError::UnknownSwingMode(ref label)) if label == "Sideways"
        ));
        assert!(heatpump.transport().payloads().is_empty());
        assert_eq!(heatpump.swing_mode(), Some("Auto"));
    }

    #[tokio::test]
    async fn mode_change_is_published_to_command_topic() {
        let heatpump = unit(false).await;

        heatpump.set_hvac_mode(HvacMode::HeatCool).await.unwrap();
        heatpump.set_hvac_mode(HvacMode::Off).await.unwrap();

        let published = heatpump.transport().published.read().clone();
        assert!(published.iter().all(|m| m.topic == SET));
        assert_eq!(
            heatpump.transport().payloads(),
            vec![r#"{"power":"ON","mode":"AUTO"}"#, r#"{"power":"OFF"}"#]
        );
        assert_eq!(heatpump.state().mode(), Some(DeviceMode::Auto));
    }
}
