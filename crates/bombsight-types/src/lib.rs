//! Shared type definitions for bombsight.
//!
//! This crate is the single source of truth for the values that flow
//! between the replay feed, the scanning core, and the batch driver.
//!
//! # Modules
//!
//! - [`enums`] -- Sides and equipment elements
//! - [`events`] -- [`MatchEvent`], the decoded telemetry stream
//! - [`roster`] -- [`Participant`], one entry of a roster snapshot
//! - [`record`] -- Partial results, labeled training records, and the
//!   tabular column layout

pub mod enums;
pub mod events;
pub mod record;
pub mod roster;

// Re-export all public types at crate root for convenience.
pub use enums::{Side, Weapon};
pub use events::MatchEvent;
pub use record::{
    PLAYERS_PER_SIDE, PartialResult, PlayerState, RoundMeta, TrainingRecord, UNKNOWN_SITE,
    column_names,
};
pub use roster::Participant;
