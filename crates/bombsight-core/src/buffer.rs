//! Partial-result buffering and outcome resolution.
//!
//! Snapshots of the open round wait in the pending list until the round's
//! winner is known. [`ResultBuffer::resolve`] labels every pending snapshot
//! in capture order, moves the records to the ready queue, and clears the
//! pending list whether or not it held anything.

use std::collections::VecDeque;

use bombsight_types::{PartialResult, Side, TrainingRecord};

/// Holds the open round's partial results and the labeled records waiting
/// to be emitted.
#[derive(Debug, Default)]
pub struct ResultBuffer {
    pending: Vec<PartialResult>,
    ready: VecDeque<TrainingRecord>,
}

impl ResultBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a partial result for the open round.
    pub fn add_partial(&mut self, partial: PartialResult) {
        self.pending.push(partial);
    }

    /// Label every pending partial result with `winner` and queue the
    /// records. Returns how many records were queued.
    pub fn resolve(&mut self, winner: Side) -> usize {
        let resolved = self.pending.len();
        self.ready
            .extend(self.pending.drain(..).map(|partial| partial.resolve(winner)));
        resolved
    }

    /// Drop every pending partial result without labeling it. Returns how
    /// many were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Take the oldest labeled record, if any.
    pub fn pop_ready(&mut self) -> Option<TrainingRecord> {
        self.ready.pop_front()
    }

    /// Number of partial results awaiting a winner.
    pub const fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of labeled records not yet taken.
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bombsight_types::{PLAYERS_PER_SIDE, PlayerState, RoundMeta, Weapon};

    use super::*;

    fn partial(elapsed: f64) -> PartialResult {
        let slot = PlayerState {
            is_alive: true,
            equipped_weapon: Weapon::Knife,
            has_helmet: false,
            has_armor: false,
            hp: 100,
            equipment_value: 0,
            has_defuse_kit: false,
        };
        PartialResult::new(
            "de_vertigo".to_owned(),
            RoundMeta::for_round(4),
            'A',
            elapsed,
            [slot; PLAYERS_PER_SIDE],
            [slot; PLAYERS_PER_SIDE],
        )
    }

    #[test]
    fn resolve_preserves_capture_order() {
        let mut buffer = ResultBuffer::new();
        for elapsed in [1.0, 2.0, 3.0] {
            buffer.add_partial(partial(elapsed));
        }

        assert_eq!(buffer.resolve(Side::CounterTerrorist), 3);
        assert_eq!(buffer.pending_len(), 0);
        assert_eq!(buffer.ready_len(), 3);

        let order: Vec<f64> = std::iter::from_fn(|| buffer.pop_ready())
            .map(|r| r.partial().elapsed_since_objective_planted())
            .collect();
        assert_eq!(order.len(), 3);
        assert!(
            order
                .iter()
                .zip([1.0, 2.0, 3.0])
                .all(|(got, want)| (got - want).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn resolve_labels_relative_to_side_a() {
        let mut buffer = ResultBuffer::new();
        buffer.add_partial(partial(1.5));
        let _ = buffer.resolve(Side::Terrorist);
        assert!(!buffer.pop_ready().unwrap().outcome_label());

        buffer.add_partial(partial(1.5));
        let _ = buffer.resolve(Side::CounterTerrorist);
        assert!(buffer.pop_ready().unwrap().outcome_label());
    }

    #[test]
    fn resolve_on_empty_buffer_is_a_no_op() {
        let mut buffer = ResultBuffer::new();
        assert_eq!(buffer.resolve(Side::Terrorist), 0);
        assert!(buffer.pop_ready().is_none());
    }

    #[test]
    fn each_partial_resolves_exactly_once() {
        let mut buffer = ResultBuffer::new();
        buffer.add_partial(partial(1.1));
        let _ = buffer.resolve(Side::Terrorist);
        assert_eq!(buffer.resolve(Side::CounterTerrorist), 0);
        assert_eq!(buffer.ready_len(), 1);
    }

    #[test]
    fn discard_drops_pending_only() {
        let mut buffer = ResultBuffer::new();
        buffer.add_partial(partial(1.0));
        let _ = buffer.resolve(Side::Terrorist);
        buffer.add_partial(partial(2.0));

        assert_eq!(buffer.discard_pending(), 1);
        assert_eq!(buffer.pending_len(), 0);
        assert_eq!(buffer.ready_len(), 1);
    }
}
