//! Replay feed seams and the in-memory scripted feed.
//!
//! A [`DemoFeed`] is a decoded match: an ordered, finite stream of
//! [`MatchEvent`] values, a fixed tick duration, a map identifier, and a
//! roster snapshot that is valid at whatever point iteration has reached.
//! Decoding a concrete replay format is the feed's business; the scanner
//! only pulls events and reads the roster.
//!
//! [`ScriptedFeed`] replays a prepared script, which lets the whole scanning
//! pipeline be exercised without a recorded match.

use std::collections::VecDeque;

use bombsight_types::{MatchEvent, Participant};

/// Errors a feed can report while decoding.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Reading the underlying source failed.
    #[error("failed to read replay source: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The source ended before a header was read.
    #[error("replay source has no header")]
    MissingHeader,

    /// The header declared a tick rate that cannot be turned into a tick
    /// duration.
    #[error("invalid tick rate {tick_rate}")]
    InvalidTickRate {
        /// The tick rate found in the header.
        tick_rate: f64,
    },

    /// A line of the source could not be decoded.
    #[error("malformed replay line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Description of the decoding failure.
        reason: String,
    },

    /// Any other decoder failure.
    #[error("replay decode error: {message}")]
    Decode {
        /// Description of the failure.
        message: String,
    },
}

/// Supplies the current set of participant states.
///
/// Must answer synchronously from already-decoded state.
pub trait RosterSource {
    /// Participants as of the most recently yielded event.
    fn current_roster(&self) -> &[Participant];
}

/// A decoded, replayable match.
pub trait DemoFeed: RosterSource {
    /// Map identifier, available from the start of the stream.
    fn map_id(&self) -> &str;

    /// Simulated seconds covered by one [`MatchEvent::TickAdvanced`].
    fn seconds_per_tick(&self) -> f64;

    /// Pull the next event.
    ///
    /// Returns `None` once the stream is exhausted. A decoding failure is
    /// returned as `Some(Err(..))`; callers must not pull again after it.
    fn next_event(&mut self) -> Option<Result<MatchEvent, FeedError>>;
}

/// One step of a [`ScriptedFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Yield this event.
    Event(MatchEvent),
    /// Replace the roster before the next event is yielded.
    Roster(Vec<Participant>),
    /// Fail with a decode error.
    Fail(String),
}

/// An in-memory feed that replays a prepared script.
#[derive(Debug, Clone)]
pub struct ScriptedFeed {
    map_id: String,
    seconds_per_tick: f64,
    roster: Vec<Participant>,
    steps: VecDeque<ScriptStep>,
}

impl ScriptedFeed {
    /// Create an empty script for the given map and tick duration.
    pub fn new(map_id: impl Into<String>, seconds_per_tick: f64) -> Self {
        Self {
            map_id: map_id.into(),
            seconds_per_tick,
            roster: Vec::new(),
            steps: VecDeque::new(),
        }
    }

    /// Append a single event.
    #[must_use]
    pub fn event(mut self, event: MatchEvent) -> Self {
        self.steps.push_back(ScriptStep::Event(event));
        self
    }

    /// Append `count` tick events.
    #[must_use]
    pub fn ticks(mut self, count: u32) -> Self {
        for _ in 0..count {
            self.steps.push_back(ScriptStep::Event(MatchEvent::TickAdvanced));
        }
        self
    }

    /// Replace the roster at this point of the script.
    #[must_use]
    pub fn roster(mut self, participants: Vec<Participant>) -> Self {
        self.steps.push_back(ScriptStep::Roster(participants));
        self
    }

    /// Fail with a decode error at this point of the script.
    #[must_use]
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.steps.push_back(ScriptStep::Fail(message.into()));
        self
    }

    /// Number of steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl RosterSource for ScriptedFeed {
    fn current_roster(&self) -> &[Participant] {
        &self.roster
    }
}

impl DemoFeed for ScriptedFeed {
    fn map_id(&self) -> &str {
        &self.map_id
    }

    fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_tick
    }

    fn next_event(&mut self) -> Option<Result<MatchEvent, FeedError>> {
        while let Some(step) = self.steps.pop_front() {
            match step {
                ScriptStep::Roster(participants) => self.roster = participants,
                ScriptStep::Event(event) => return Some(Ok(event)),
                ScriptStep::Fail(message) => {
                    self.steps.clear();
                    return Some(Err(FeedError::Decode { message }));
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bombsight_types::Side;

    use super::*;

    fn participant(side: Side) -> Participant {
        Participant {
            name: String::from("p"),
            side,
            is_alive: true,
            hp: 100,
            armor: 100,
            has_helmet: true,
            has_defuse_kit: false,
            active_weapon: None,
            equipment_value: 1000,
        }
    }

    #[test]
    fn replays_events_in_order() {
        let mut feed = ScriptedFeed::new("de_dust2", 1.0 / 64.0)
            .event(MatchEvent::PhaseStarted)
            .ticks(2)
            .event(MatchEvent::ObjectiveDefused);

        assert_eq!(feed.next_event().unwrap().unwrap(), MatchEvent::PhaseStarted);
        assert_eq!(feed.next_event().unwrap().unwrap(), MatchEvent::TickAdvanced);
        assert_eq!(feed.next_event().unwrap().unwrap(), MatchEvent::TickAdvanced);
        assert_eq!(
            feed.next_event().unwrap().unwrap(),
            MatchEvent::ObjectiveDefused
        );
        assert!(feed.next_event().is_none());
    }

    #[test]
    fn roster_updates_apply_before_next_event() {
        let mut feed = ScriptedFeed::new("de_dust2", 0.0156)
            .event(MatchEvent::PhaseStarted)
            .roster(vec![participant(Side::Terrorist)])
            .event(MatchEvent::TickAdvanced);

        let _ = feed.next_event();
        assert!(feed.current_roster().is_empty());
        let _ = feed.next_event();
        assert_eq!(feed.current_roster().len(), 1);
    }

    #[test]
    fn fail_stops_the_script() {
        let mut feed = ScriptedFeed::new("de_nuke", 0.0156)
            .fail("corrupt packet")
            .event(MatchEvent::PhaseStarted);

        assert!(matches!(
            feed.next_event(),
            Some(Err(FeedError::Decode { .. }))
        ));
        assert_eq!(feed.remaining(), 0);
        assert!(feed.next_event().is_none());
    }

    #[test]
    fn exposes_header_values() {
        let feed = ScriptedFeed::new("de_mirage", 0.0078125);
        assert_eq!(feed.map_id(), "de_mirage");
        assert!((feed.seconds_per_tick() - 0.0078125).abs() < f64::EPSILON);
    }
}
