//! Round lifecycle state.
//!
//! [`RoundContext`] is the single live record of where the match is: which
//! round, whether the bomb is down and where, whether the round is over,
//! and the tick counters the sampler reads. [`RoundContext::apply`] is a
//! total transition function over [`MatchEvent`]; it never fails.
//!
//! Invariants maintained by every transition:
//!
//! - `objective_planted` is false while `round_over` is true and right after
//!   a phase start.
//! - At most one planted span exists per round.
//! - `objective_site` is `Some` only while `objective_planted` is true.

use bombsight_types::{MatchEvent, Side};
use tracing::debug;

/// What the caller must do after an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSignal {
    /// Nothing further.
    Idle,
    /// Simulated time advanced; the sampler decides whether to capture.
    Tick,
    /// The round ended; buffered partial results resolve with this winner.
    Resolve(Side),
}

/// Mutable state of the round currently being replayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundContext {
    /// Incremented on every phase start. Zero before the first round.
    round_number: u32,
    objective_planted: bool,
    /// Set once the bomb has been planted this round, cleared on phase start.
    objective_span_used: bool,
    objective_site: Option<char>,
    round_over: bool,
    ticks_since_objective_planted: u32,
    ticks_since_last_sample: u32,
}

impl RoundContext {
    /// A context positioned before the first round.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and report what follows from it.
    pub fn apply(&mut self, event: &MatchEvent) -> RoundSignal {
        match event {
            MatchEvent::TickAdvanced => RoundSignal::Tick,
            MatchEvent::PhaseStarted => {
                self.round_number = self.round_number.saturating_add(1);
                self.objective_planted = false;
                self.objective_span_used = false;
                self.objective_site = None;
                self.round_over = false;
                self.ticks_since_objective_planted = 0;
                debug!(round = self.round_number, "Round started");
                RoundSignal::Idle
            }
            MatchEvent::ObjectivePlanted { site, actor } => {
                if self.round_over || self.objective_span_used {
                    debug!(
                        round = self.round_number,
                        round_over = self.round_over,
                        "Ignoring bomb plant outside an open round"
                    );
                    return RoundSignal::Idle;
                }
                self.objective_planted = true;
                self.objective_span_used = true;
                self.objective_site = Some(*site);
                self.ticks_since_objective_planted = 0;
                self.ticks_since_last_sample = 0;
                debug!(
                    round = self.round_number,
                    site = %site,
                    actor = actor.as_deref().unwrap_or("unknown"),
                    "Bomb planted"
                );
                RoundSignal::Idle
            }
            MatchEvent::ObjectiveExploded | MatchEvent::ObjectiveDefused => {
                self.objective_planted = false;
                self.objective_site = None;
                debug!(round = self.round_number, event = event.kind(), "Bomb span closed");
                RoundSignal::Idle
            }
            MatchEvent::RoundEnded { winner } => {
                self.round_over = true;
                self.objective_planted = false;
                self.objective_site = None;
                self.ticks_since_objective_planted = 0;
                RoundSignal::Resolve(*winner)
            }
        }
    }

    /// Whether ticks currently count toward sampling.
    pub const fn is_sampling(&self) -> bool {
        self.objective_planted && !self.round_over
    }

    /// Advance both tick counters by one, if sampling is active.
    ///
    /// Returns whether the counters moved.
    pub const fn record_tick(&mut self) -> bool {
        if !self.is_sampling() {
            return false;
        }
        self.ticks_since_objective_planted = self.ticks_since_objective_planted.saturating_add(1);
        self.ticks_since_last_sample = self.ticks_since_last_sample.saturating_add(1);
        true
    }

    /// Restart the interval measured from the last snapshot.
    pub const fn reset_sample_clock(&mut self) {
        self.ticks_since_last_sample = 0;
    }

    /// Current round number.
    pub const fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Whether the bomb is currently planted.
    pub const fn objective_planted(&self) -> bool {
        self.objective_planted
    }

    /// Site of the current plant, if the bomb is down.
    pub const fn objective_site(&self) -> Option<char> {
        self.objective_site
    }

    /// Whether the current round has ended.
    pub const fn round_over(&self) -> bool {
        self.round_over
    }

    /// Ticks counted since the bomb was planted.
    pub const fn ticks_since_objective_planted(&self) -> u32 {
        self.ticks_since_objective_planted
    }

    /// Ticks counted since the last captured snapshot.
    pub const fn ticks_since_last_sample(&self) -> u32 {
        self.ticks_since_last_sample
    }
}
