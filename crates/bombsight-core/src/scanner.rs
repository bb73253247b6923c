//! The lazy, single-pass record stream over one match.
//!
//! [`MatchScanner`] pulls one event at a time from its [`DemoFeed`], routes
//! it through the round state, the sampler, and the result buffer, and then
//! hands out every record that became ready before pulling the next event.
//! Records therefore leave in the order their rounds resolved, and at most
//! one round's snapshots are ever held back.
//!
//! When the feed runs out, snapshots of an unfinished round are dropped. A
//! feed error is yielded once and ends the stream; records yielded before
//! it are not retracted, but the match as a whole should be treated as
//! incomplete.

use bombsight_types::{MatchEvent, TrainingRecord};
use tracing::{debug, warn};

use crate::buffer::ResultBuffer;
use crate::config::SamplingConfig;
use crate::feed::{DemoFeed, FeedError};
use crate::round::{RoundContext, RoundSignal};
use crate::sampling::Sampler;

/// Errors that end a match scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The feed failed to decode.
    #[error("feed error: {source}")]
    Feed {
        /// The underlying feed error.
        #[from]
        source: FeedError,
    },

    /// The feed reported a tick duration that cannot drive sampling.
    #[error("invalid tick duration {seconds_per_tick}s")]
    InvalidTickDuration {
        /// The reported tick duration.
        seconds_per_tick: f64,
    },
}

/// Counters describing a scan so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Events pulled from the feed.
    pub events: u64,
    /// Snapshots captured.
    pub captured: u64,
    /// Snapshots skipped because the roster was malformed.
    pub discarded: u64,
    /// Rounds resolved.
    pub rounds_resolved: u64,
    /// Snapshots dropped because their round never ended.
    pub unresolved: u64,
}

/// Iterator of labeled records for one match.
#[derive(Debug)]
pub struct MatchScanner<F> {
    feed: F,
    map_id: String,
    context: RoundContext,
    sampler: Sampler,
    buffer: ResultBuffer,
    stats: ScanStats,
    finished: bool,
}

impl<F: DemoFeed> MatchScanner<F> {
    /// Prepare a scan over `feed`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidTickDuration`] if the feed's tick duration
    /// is not a positive, finite number.
    pub fn new(feed: F, config: &SamplingConfig) -> Result<Self, ScanError> {
        let seconds_per_tick = feed.seconds_per_tick();
        if !seconds_per_tick.is_finite() || seconds_per_tick <= 0.0 {
            return Err(ScanError::InvalidTickDuration { seconds_per_tick });
        }
        let map_id = feed.map_id().to_owned();
        Ok(Self {
            feed,
            map_id,
            context: RoundContext::new(),
            sampler: Sampler::new(seconds_per_tick, config),
            buffer: ResultBuffer::new(),
            stats: ScanStats::default(),
            finished: false,
        })
    }

    /// Process one event. Returns how many records became ready.
    pub fn step(&mut self, event: &MatchEvent) -> usize {
        self.stats.events = self.stats.events.saturating_add(1);
        match self.context.apply(event) {
            RoundSignal::Idle => 0,
            RoundSignal::Tick => {
                if self.sampler.on_tick(&mut self.context) {
                    self.capture();
                }
                0
            }
            RoundSignal::Resolve(winner) => {
                let resolved = self.buffer.resolve(winner);
                self.stats.rounds_resolved = self.stats.rounds_resolved.saturating_add(1);
                debug!(
                    round = self.context.round_number(),
                    winner = %winner,
                    records = resolved,
                    "Round resolved"
                );
                resolved
            }
        }
    }

    fn capture(&mut self) {
        match self
            .sampler
            .capture(&mut self.context, &self.map_id, &self.feed)
        {
            Ok(partial) => {
                self.buffer.add_partial(partial);
                self.stats.captured = self.stats.captured.saturating_add(1);
            }
            Err(e) => {
                self.stats.discarded = self.stats.discarded.saturating_add(1);
                warn!(
                    map = %self.map_id,
                    round = self.context.round_number(),
                    error = %e,
                    "Discarding snapshot"
                );
            }
        }
    }

    /// Drop whatever the unfinished round captured and stop.
    fn finish(&mut self) {
        self.finished = true;
        let dropped = self.buffer.discard_pending();
        if dropped > 0 {
            self.stats.unresolved = self
                .stats
                .unresolved
                .saturating_add(u64::try_from(dropped).unwrap_or(u64::MAX));
            warn!(
                map = %self.map_id,
                round = self.context.round_number(),
                dropped,
                "Replay ended mid-round, dropping unresolved snapshots"
            );
        }
    }

    /// Map identifier of the feed.
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    /// Current round state.
    pub const fn context(&self) -> &RoundContext {
        &self.context
    }

    /// Counters for the scan so far.
    pub const fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Snapshots waiting for their round to end.
    pub const fn pending_len(&self) -> usize {
        self.buffer.pending_len()
    }
}

impl<F: DemoFeed> Iterator for MatchScanner<F> {
    type Item = Result<TrainingRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_ready() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            match self.feed.next_event() {
                Some(Ok(event)) => {
                    let _ = self.step(&event);
                }
                Some(Err(e)) => {
                    self.finish();
                    return Some(Err(ScanError::Feed { source: e }));
                }
                None => self.finish(),
            }
        }
    }
}

impl<F: DemoFeed> core::iter::FusedIterator for MatchScanner<F> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bombsight_types::{Participant, Side};

    use super::*;
    use crate::feed::ScriptedFeed;

    fn roster() -> Vec<Participant> {
        [Side::CounterTerrorist, Side::Terrorist]
            .into_iter()
            .flat_map(|side| {
                (0..5).map(move |i| Participant {
                    name: format!("{side}{i}"),
                    side,
                    is_alive: true,
                    hp: 100,
                    armor: 100,
                    has_helmet: true,
                    has_defuse_kit: false,
                    active_weapon: None,
                    equipment_value: 5000,
                })
            })
            .collect()
    }

    fn planted() -> MatchEvent {
        MatchEvent::ObjectivePlanted {
            site: 'A',
            actor: None,
        }
    }

    #[test]
    fn rejects_non_positive_tick_duration() {
        let feed = ScriptedFeed::new("de_dust2", 0.0);
        let result = MatchScanner::new(feed, &SamplingConfig::default());
        assert!(matches!(
            result,
            Err(ScanError::InvalidTickDuration { .. })
        ));
    }

    #[test]
    fn step_holds_records_until_round_end() {
        let feed = ScriptedFeed::new("de_dust2", 0.0156).roster(roster());
        let mut scanner = MatchScanner::new(feed, &SamplingConfig::default()).unwrap();
        // Drains the script, leaving only the roster in place.
        assert!(scanner.feed.next_event().is_none());

        let _ = scanner.step(&MatchEvent::PhaseStarted);
        let _ = scanner.step(&planted());
        for _ in 0..130 {
            assert_eq!(scanner.step(&MatchEvent::TickAdvanced), 0);
        }
        assert_eq!(scanner.pending_len(), 2);
        assert_eq!(scanner.buffer.ready_len(), 0);

        let ready = scanner.step(&MatchEvent::RoundEnded {
            winner: Side::Terrorist,
        });
        assert_eq!(ready, 2);
        assert_eq!(scanner.pending_len(), 0);
        assert_eq!(scanner.stats().rounds_resolved, 1);
    }

    #[test]
    fn unresolved_round_is_dropped_at_end_of_feed() {
        let feed = ScriptedFeed::new("de_dust2", 0.0156)
            .roster(roster())
            .event(MatchEvent::PhaseStarted)
            .event(planted())
            .ticks(200);
        let mut scanner = MatchScanner::new(feed, &SamplingConfig::default()).unwrap();

        assert!(scanner.next().is_none());
        assert_eq!(scanner.stats().captured, 3);
        assert_eq!(scanner.stats().unresolved, 3);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn feed_error_is_yielded_once() {
        let feed = ScriptedFeed::new("de_dust2", 0.0156)
            .event(MatchEvent::PhaseStarted)
            .fail("truncated packet");
        let mut scanner = MatchScanner::new(feed, &SamplingConfig::default()).unwrap();

        assert!(matches!(scanner.next(), Some(Err(ScanError::Feed { .. }))));
        assert!(scanner.next().is_none());
    }
}
