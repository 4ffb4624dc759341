// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `mitsu_mqtt` - Mitsubishi heat pumps over MQTT.
//!
//! This library drives Mitsubishi ductless heat pumps fitted with a
//! SwiCago `HeatPump` controller, which speaks JSON over MQTT, and presents
//! them through a generic climate model.
//!
//! # Features
//!
//! - **Swing modes**: every vertical × horizontal vane position has a
//!   readable label (`"Swing top"`, `"Middle wide right"`)
//! - **Mode translation**: `HEAT`/`COOL`/`DRY`/`FAN`/`AUTO` ↔ canonical
//!   [`HvacMode`](types::HvacMode)
//! - **Partial updates**: status messages only overwrite the fields they
//!   carry; the mode survives power-off
//! - **Current activity**: [`HvacAction`](types::HvacAction) derived from
//!   power, operating flag, mode and temperatures
//! - **Callbacks**: subscribe to individual field changes
//!
//! # Quick Start
//!
//! ```no_run
//! use mitsu_mqtt::{Heatpump, HeatpumpConfig};
//! use mitsu_mqtt::protocol::MqttBroker;
//! use mitsu_mqtt::subscription::Subscribable;
//! use mitsu_mqtt::types::HvacMode;
//!
//! #[tokio::main]
//! async fn main() -> mitsu_mqtt::Result<()> {
//!     let broker = MqttBroker::builder()
//!         .host("192.168.1.50")
//!         .build()
//!         .await?;
//!
//!     let heatpump = Heatpump::new(
//!         broker,
//!         HeatpumpConfig::new("heatpump/status", "heatpump/set")
//!             .with_temperature_state_topic("heatpump/status/temperature")
//!             .with_wide_vane(true),
//!     )?;
//!     heatpump.subscribe().await?;
//!
//!     heatpump.on_mode_changed(|mode| println!("mode: {mode}"));
//!     heatpump.set_hvac_mode(HvacMode::Heat).await?;
//!     heatpump.set_swing_mode("Swing middle").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Without a broker
//!
//! The translation pieces work on their own:
//!
//! ```
//! use mitsu_mqtt::command::CommandBuilder;
//! use mitsu_mqtt::state::DeviceState;
//! use mitsu_mqtt::types::HvacAction;
//!
//! let commands = CommandBuilder::new(true);
//! let cmd = commands.set_swing_mode("Top wide left").unwrap();
//! assert_eq!(cmd.to_json().unwrap(), r#"{"vane":"1","wideVane":"<<"}"#);
//!
//! let mut state = DeviceState::new();
//! for change in cmd.changes() {
//!     state.apply(change);
//! }
//! assert_eq!(state.hvac_action(), Some(HvacAction::Off));
//! ```

pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod protocol;
pub mod reconciler;
pub mod state;
pub mod subscription;
pub mod swing;
pub mod telemetry;
pub mod types;

pub use command::{Command, CommandBuilder};
pub use config::HeatpumpConfig;
pub use device::{Heatpump, TARGET_TEMPERATURE_STEP, TEMPERATURE_UNIT};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttBroker, MqttBrokerBuilder};
pub use protocol::{QoS, TopicRouter, Transport};
pub use reconciler::StatusReconciler;
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use swing::SwingTable;
pub use types::{DeviceMode, FanSpeed, HvacAction, HvacMode, PowerState};
