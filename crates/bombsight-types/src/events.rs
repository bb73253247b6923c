//! The decoded match-telemetry event stream.
//!
//! A replay decoder turns the recorded match into an ordered, finite
//! sequence of [`MatchEvent`] values. The scanning core consumes them one
//! at a time and never rewinds.

use serde::{Deserialize, Serialize};

use crate::enums::Side;

/// A single low-level event produced while replaying a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Simulated time advanced by one tick.
    TickAdvanced,

    /// Freeze time ended and a new round began.
    PhaseStarted,

    /// The bomb was planted.
    ObjectivePlanted {
        /// Bomb site letter reported by the replay (usually `A` or `B`).
        site: char,
        /// Name of the planting player, when the replay carries one.
        #[serde(default)]
        actor: Option<String>,
    },

    /// The planted bomb exploded.
    ObjectiveExploded,

    /// The planted bomb was defused.
    ObjectiveDefused,

    /// The round ended with a winner.
    RoundEnded {
        /// The side that won the round.
        winner: Side,
    },
}

impl MatchEvent {
    /// Short, stable name of the event kind for structured logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TickAdvanced => "tick_advanced",
            Self::PhaseStarted => "phase_started",
            Self::ObjectivePlanted { .. } => "objective_planted",
            Self::ObjectiveExploded => "objective_exploded",
            Self::ObjectiveDefused => "objective_defused",
            Self::RoundEnded { .. } => "round_ended",
        }
    }
}
