//! Roster snapshot entries.

use serde::{Deserialize, Serialize};

use crate::enums::{Side, Weapon};

/// The state of one participant at the moment a roster snapshot is taken.
///
/// Supplied by the replay feed; the scanning core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name from the replay.
    #[serde(default)]
    pub name: String,
    /// The team the participant is currently playing on.
    pub side: Side,
    /// Whether the participant is alive.
    pub is_alive: bool,
    /// Remaining health points.
    pub hp: i32,
    /// Remaining armor points. Zero means no kevlar.
    #[serde(default)]
    pub armor: i32,
    /// Whether the participant wears a helmet.
    #[serde(default)]
    pub has_helmet: bool,
    /// Whether the participant carries a defuse kit.
    #[serde(default)]
    pub has_defuse_kit: bool,
    /// The weapon in hand, if any.
    #[serde(default)]
    pub active_weapon: Option<Weapon>,
    /// Total value of the participant's current equipment.
    #[serde(default)]
    pub equipment_value: i32,
}
