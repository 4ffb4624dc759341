// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swing mode tables.
//!
//! A swing mode is a human-readable label for a [`VanePosition`]. The table
//! is generated once, in a fixed order:
//!
//! 1. four presets: `Auto`, `Horizontal`, `Vertical`, `Both`
//! 2. per vertical position (`Top` .. `Bottom`): `Swing <name>` (horizontal
//!    swinging) and `<name>` (horizontal auto)
//! 3. per horizontal position (`Wide left` .. `Wide right`): `Swing <name>`
//!    (vertical swinging) and `<name>` (vertical auto)
//! 4. every vertical × horizontal pair: `<Vertical> <horizontal>`, for
//!    example `Top wide left`
//!
//! Units without a wide vane use [`SwingTable::vertical_only`], the subset of
//! entries whose horizontal vane is `|`.
//!
//! Inverting the table walks the labels in generation order and later labels
//! win when two share a position. The generated labels cover 42 distinct
//! positions, so every label is currently authoritative for its position.
//!
//! # Examples
//!
//! ```
//! use mitsu_mqtt::SwingTable;
//! use mitsu_mqtt::types::{HorizontalVane, VanePosition, VerticalVane};
//!
//! let table = SwingTable::full();
//! let position = table.position("Top wide left").unwrap();
//! assert_eq!(position, VanePosition::new(VerticalVane::Top, HorizontalVane::WideLeft));
//! assert_eq!(table.label(position), Some("Top wide left"));
//!
//! let vertical = SwingTable::vertical_only();
//! assert!(vertical.position("Top wide left").is_none());
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{HorizontalVane, VanePosition, VerticalVane};

static FULL: LazyLock<SwingTable> = LazyLock::new(SwingTable::generate);
static VERTICAL_ONLY: LazyLock<SwingTable> = LazyLock::new(|| FULL.restrict_to_vertical());

/// Bidirectional mapping between swing labels and vane positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwingTable {
    /// Labels in generation order.
    labels: Vec<String>,
    by_label: HashMap<String, VanePosition>,
    by_position: HashMap<VanePosition, String>,
    vertical_only: bool,
}

impl SwingTable {
    /// Generates the complete vertical × horizontal table.
    #[must_use]
    pub fn generate() -> Self {
        let mut table = TableBuilder::default();

        table.insert("Auto", VerticalVane::Auto, HorizontalVane::Auto);
        table.insert("Horizontal", VerticalVane::Auto, HorizontalVane::Swing);
        table.insert("Vertical", VerticalVane::Swing, HorizontalVane::Auto);
        table.insert("Both", VerticalVane::Swing, HorizontalVane::Swing);

        for vertical in VerticalVane::FIXED {
            let name = vertical.name();
            table.insert(
                format!("Swing {}", name.to_lowercase()),
                vertical,
                HorizontalVane::Swing,
            );
            table.insert(name, vertical, HorizontalVane::Auto);
        }

        for horizontal in HorizontalVane::FIXED {
            let name = horizontal.name();
            table.insert(
                format!("Swing {}", name.to_lowercase()),
                VerticalVane::Swing,
                horizontal,
            );
            table.insert(name, VerticalVane::Auto, horizontal);
        }

        for vertical in VerticalVane::FIXED {
            for horizontal in HorizontalVane::FIXED {
                table.insert(
                    format!("{} {}", vertical.name(), horizontal.name().to_lowercase()),
                    vertical,
                    horizontal,
                );
            }
        }

        table.finish(false)
    }

    /// Returns the shared full table.
    #[must_use]
    pub fn full() -> &'static Self {
        &FULL
    }

    /// Returns the shared table for units without wide vane reporting.
    #[must_use]
    pub fn vertical_only() -> &'static Self {
        &VERTICAL_ONLY
    }

    /// Picks the shared table matching a unit's wide vane setting.
    #[must_use]
    pub fn for_wide_vane(wide_vane: bool) -> &'static Self {
        if wide_vane {
            Self::full()
        } else {
            Self::vertical_only()
        }
    }

    /// Builds the subset of entries whose horizontal vane is auto (`|`).
    #[must_use]
    pub fn restrict_to_vertical(&self) -> Self {
        let mut table = TableBuilder::default();
        for label in &self.labels {
            if let Some(position) = self.by_label.get(label)
                && position.horizontal == HorizontalVane::Auto
            {
                table.insert(label.as_str(), position.vertical, position.horizontal);
            }
        }
        table.finish(true)
    }

    /// Returns `true` if this table ignores the horizontal vane.
    #[must_use]
    pub fn is_vertical_only(&self) -> bool {
        self.vertical_only
    }

    /// Looks up the vane position for a label.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<VanePosition> {
        self.by_label.get(label).copied()
    }

    /// Looks up the label for a vane position.
    ///
    /// The vertical-only table reads every horizontal position as `|`.
    #[must_use]
    pub fn label(&self, position: VanePosition) -> Option<&str> {
        let position = if self.vertical_only {
            VanePosition::new(position.vertical, HorizontalVane::Auto)
        } else {
            position
        };
        self.by_position.get(&position).map(String::as_str)
    }

    /// Returns `true` if the label is part of this table.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// Iterates over the labels in generation order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the table has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Ordered label map: re-inserting a label keeps its slot, replaces the value.
#[derive(Default)]
struct TableBuilder {
    labels: Vec<String>,
    by_label: HashMap<String, VanePosition>,
}

impl TableBuilder {
    fn insert(
        &mut self,
        label: impl Into<String>,
        vertical: VerticalVane,
        horizontal: HorizontalVane,
    ) {
        let label = label.into();
        let position = VanePosition::new(vertical, horizontal);
        if self.by_label.insert(label.clone(), position).is_none() {
            self.labels.push(label);
        }
    }

    fn finish(self, vertical_only: bool) -> SwingTable {
        let mut by_position = HashMap::with_capacity(self.labels.len());
        for label in &self.labels {
            if let Some(position) = self.by_label.get(label) {
                // later labels win
                by_position.insert(*position, label.clone());
            }
        }

        SwingTable {
            labels: self.labels,
            by_label: self.by_label,
            by_position,
            vertical_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_table_size() {
        let table = SwingTable::generate();
        // 4 presets + 5 * 2 vertical + 4 * 2 horizontal + 5 * 4 combined
        assert_eq!(table.len(), 42);
        assert_eq!(table.by_position.len(), 42);
        assert!(!table.is_vertical_only());
    }

    #[test]
    fn every_label_round_trips() {
        let table = SwingTable::full();
        for label in table.labels() {
            let position = table.position(label).unwrap();
            assert_eq!(table.label(position), Some(label), "label {label}");
        }
    }

    #[test]
    fn every_position_round_trips() {
        let table = SwingTable::full();
        for (position, label) in &table.by_position {
            assert_eq!(table.position(label), Some(*position));
        }
    }

    #[test]
    fn generation_order() {
        let table = SwingTable::full();
        let first: Vec<&str> = table.labels().take(8).collect();
        assert_eq!(
            first,
            [
                "Auto",
                "Horizontal",
                "Vertical",
                "Both",
                "Swing top",
                "Top",
                "Swing high",
                "High"
            ]
        );
        assert_eq!(table.labels().last(), Some("Bottom wide right"));
    }

    #[test]
    fn named_positions() {
        let table = SwingTable::full();
        assert_eq!(
            table.position("Swing wide left"),
            Some(VanePosition::new(VerticalVane::Swing, HorizontalVane::WideLeft))
        );
        assert_eq!(
            table.position("Right"),
            Some(VanePosition::new(VerticalVane::Auto, HorizontalVane::Right))
        );
        assert_eq!(
            table.position("Swing bottom"),
            Some(VanePosition::new(VerticalVane::Bottom, HorizontalVane::Swing))
        );
        assert_eq!(
            table.position("Middle right"),
            Some(VanePosition::new(VerticalVane::Middle, HorizontalVane::Right))
        );
        assert!(table.position("Middle").is_some());
        assert!(table.position("middle").is_none());
    }

    #[test]
    fn vertical_only_subset() {
        let table = SwingTable::vertical_only();
        assert!(table.is_vertical_only());
        let labels: Vec<&str> = table.labels().collect();
        assert_eq!(
            labels,
            ["Auto", "Vertical", "Top", "High", "Middle", "Low", "Bottom"]
        );
        assert_eq!(
            table.position("Bottom"),
            Some(VanePosition::new(VerticalVane::Bottom, HorizontalVane::Auto))
        );
        assert!(!table.contains("Both"));
    }

    #[test]
    fn vertical_only_ignores_horizontal_on_lookup() {
        let table = SwingTable::vertical_only();
        let reported = VanePosition::new(VerticalVane::Low, HorizontalVane::WideRight);
        assert_eq!(table.label(reported), Some("Low"));
    }

    #[test]
    fn later_label_wins_on_collision() {
        let mut builder = TableBuilder::default();
        builder.insert("First", VerticalVane::Top, HorizontalVane::Auto);
        builder.insert("Second", VerticalVane::Top, HorizontalVane::Auto);
        let table = builder.finish(false);

        let position = VanePosition::new(VerticalVane::Top, HorizontalVane::Auto);
        assert_eq!(table.label(position), Some("Second"));
        assert_eq!(table.position("First"), Some(position));
    }

    #[test]
    fn reinserted_label_keeps_its_slot() {
        let mut builder = TableBuilder::default();
        builder.insert("A", VerticalVane::Top, HorizontalVane::Auto);
        builder.insert("B", VerticalVane::High, HorizontalVane::Auto);
        builder.insert("A", VerticalVane::Low, HorizontalVane::Auto);
        let table = builder.finish(false);

        assert_eq!(table.labels().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(
            table.position("A"),
            Some(VanePosition::new(VerticalVane::Low, HorizontalVane::Auto))
        );
    }

    #[test]
    fn for_wide_vane_picks_table() {
        assert_eq!(SwingTable::for_wide_vane(true).len(), 42);
        assert_eq!(SwingTable::for_wide_vane(false).len(), 7);
    }
}
