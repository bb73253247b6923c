//! Elapsed-time sampling and snapshot capture.
//!
//! While the bomb is planted, every tick advances the round's counters.
//! Once the simulated time since the last captured snapshot strictly
//! exceeds the configured interval, the [`Sampler`] reads the roster and
//! builds a [`PartialResult`]. The interval is measured from the last
//! capture, not from the plant, so drift stays within one interval.
//!
//! A roster that does not hold exactly [`PLAYERS_PER_SIDE`] participants
//! per side yields a [`RosterError`] and leaves the counters untouched: the
//! next tick tries again.

use bombsight_types::{
    PLAYERS_PER_SIDE, Participant, PartialResult, PlayerState, RoundMeta, Side, UNKNOWN_SITE,
};

use crate::config::SamplingConfig;
use crate::feed::RosterSource;
use crate::round::RoundContext;

/// Why a snapshot could not be captured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// One side does not have the number of participants a record holds.
    #[error("expected {expected} {side} participants, found {found}")]
    WrongSideSize {
        /// The side with the wrong count.
        side: Side,
        /// Participants required per side.
        expected: usize,
        /// Participants present.
        found: usize,
    },
}

/// Decides when to snapshot and assembles the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampler {
    seconds_per_tick: f64,
    interval_seconds: f64,
}

impl Sampler {
    /// Create a sampler for a feed with the given tick duration.
    pub const fn new(seconds_per_tick: f64, config: &SamplingConfig) -> Self {
        Self {
            seconds_per_tick,
            interval_seconds: config.interval_seconds,
        }
    }

    /// Convert a tick count to simulated seconds.
    pub fn seconds(&self, ticks: u32) -> f64 {
        f64::from(ticks) * self.seconds_per_tick
    }

    /// Count one tick against `ctx` and report whether a snapshot is due.
    ///
    /// Does nothing outside a planted span.
    pub fn on_tick(&self, ctx: &mut RoundContext) -> bool {
        if !ctx.record_tick() {
            return false;
        }
        self.seconds(ctx.ticks_since_last_sample()) > self.interval_seconds
    }

    /// Capture a snapshot of the current round from `roster`.
    ///
    /// On success the interval restarts from this capture.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::WrongSideSize`] when either side does not have
    /// exactly [`PLAYERS_PER_SIDE`] participants. The context is not
    /// modified in that case.
    pub fn capture(
        &self,
        ctx: &mut RoundContext,
        map_id: &str,
        roster: &dyn RosterSource,
    ) -> Result<PartialResult, RosterError> {
        let participants = roster.current_roster();
        let counter_terrorists = side_slots(participants, Side::CounterTerrorist)?;
        let terrorists = side_slots(participants, Side::Terrorist)?;

        let partial = PartialResult::new(
            map_id.to_owned(),
            RoundMeta::for_round(ctx.round_number()),
            ctx.objective_site().unwrap_or(UNKNOWN_SITE),
            self.seconds(ctx.ticks_since_objective_planted()),
            counter_terrorists,
            terrorists,
        );
        ctx.reset_sample_clock();
        Ok(partial)
    }
}

/// Collect one side's participants into fixed slots, in roster order.
fn side_slots(
    participants: &[Participant],
    side: Side,
) -> Result<[PlayerState; PLAYERS_PER_SIDE], RosterError> {
    let states: Vec<PlayerState> = participants
        .iter()
        .filter(|p| p.side == side)
        .map(PlayerState::from)
        .collect();
    let found = states.len();
    <[PlayerState; PLAYERS_PER_SIDE]>::try_from(states).map_err(|_rejected| {
        RosterError::WrongSideSize {
            side,
            expected: PLAYERS_PER_SIDE,
            found,
        }
    })
}
