//! Partial results, labeled training records, and their tabular layout.
//!
//! A [`PartialResult`] is a snapshot captured while the bomb is planted. It
//! carries every output column except the outcome label, which is unknown
//! until the round ends. The only way to obtain a [`TrainingRecord`] is
//! [`PartialResult::resolve`], so a record can never exist without both
//! halves.
//!
//! The column header is generated from the static tables below; the values
//! come from the structured per-side player arrays in the same order.

use crate::enums::{Side, Weapon};
use crate::roster::Participant;

/// Number of player slots per side in every record.
pub const PLAYERS_PER_SIDE: usize = 5;

/// Site letter written when the replay never reported one.
pub const UNKNOWN_SITE: char = 'U';

/// Rounds played in regulation before overtime begins.
const REGULATION_ROUNDS: u32 = 30;

/// Rounds per half during regulation.
const REGULATION_ROUNDS_PER_HALF: u32 = 15;

/// Rounds per half during overtime.
const OVERTIME_ROUNDS_PER_HALF: u32 = 3;

/// Leading per-record columns, in output order.
const META_COLUMNS: [&str; 7] = [
    "team_ct_wins_round",
    "map_id",
    "elapsed_since_bombplant",
    "bombplant_site",
    "round_number",
    "round_of_half",
    "rounds_per_half",
];

/// Per-player columns present for both sides, in output order.
const PLAYER_COLUMNS: [&str; 6] = [
    "is_alive",
    "equipped_weapon",
    "has_helmet",
    "has_kevlar",
    "hp",
    "equipment_value",
];

/// Per-player columns present only for side A.
const SIDE_A_COLUMNS: [&str; 1] = ["has_defuse_kit"];

// ---------------------------------------------------------------------------
// Round metadata
// ---------------------------------------------------------------------------

/// Competitive-format metadata derived from the round number.
///
/// Regulation is two halves of 15 rounds; overtime halves are 3 rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundMeta {
    /// 1-based round number within the match.
    pub round_number: u32,
    /// 1-based position of the round within its half.
    pub round_of_half: u32,
    /// Length of the half this round belongs to.
    pub rounds_per_half: u32,
}

impl RoundMeta {
    /// Derive the metadata for the given round number.
    pub fn for_round(round_number: u32) -> Self {
        let rounds_per_half = if round_number <= REGULATION_ROUNDS {
            REGULATION_ROUNDS_PER_HALF
        } else {
            OVERTIME_ROUNDS_PER_HALF
        };
        let round_of_half = round_number
            .saturating_sub(1)
            .checked_rem(rounds_per_half)
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            round_number,
            round_of_half,
            rounds_per_half,
        }
    }
}

// ---------------------------------------------------------------------------
// Player slots
// ---------------------------------------------------------------------------

/// Normalized state of one player slot in a record.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    /// Whether the player is alive.
    pub is_alive: bool,
    /// The weapon in hand, [`Weapon::Unknown`] if none.
    pub equipped_weapon: Weapon,
    /// Whether the player wears a helmet.
    pub has_helmet: bool,
    /// Whether the player has any armor left.
    pub has_armor: bool,
    /// Remaining health points.
    pub hp: i32,
    /// Total value of the player's equipment.
    pub equipment_value: i32,
    /// Whether the player carries a defuse kit. Only written for side A.
    pub has_defuse_kit: bool,
}

impl From<&Participant> for PlayerState {
    fn from(p: &Participant) -> Self {
        Self {
            is_alive: p.is_alive,
            equipped_weapon: p.active_weapon.unwrap_or_default(),
            has_helmet: p.has_helmet,
            has_armor: p.armor > 0,
            hp: p.hp,
            equipment_value: p.equipment_value,
            has_defuse_kit: p.has_defuse_kit,
        }
    }
}

impl PlayerState {
    /// Append this slot's column values to `row`, in column-table order.
    fn write_values(&self, side: Side, row: &mut Vec<String>) {
        row.push(self.is_alive.to_string());
        row.push(self.equipped_weapon.to_string());
        row.push(self.has_helmet.to_string());
        row.push(self.has_armor.to_string());
        row.push(self.hp.to_string());
        row.push(self.equipment_value.to_string());
        if side.is_side_a() {
            row.push(self.has_defuse_kit.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Partial result
// ---------------------------------------------------------------------------

/// A snapshot captured during a planted-bomb span, awaiting its label.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult {
    map_id: String,
    round: RoundMeta,
    objective_site: char,
    elapsed_since_objective_planted: f64,
    counter_terrorists: [PlayerState; PLAYERS_PER_SIDE],
    terrorists: [PlayerState; PLAYERS_PER_SIDE],
}

impl PartialResult {
    /// Assemble a partial result from its parts.
    pub const fn new(
        map_id: String,
        round: RoundMeta,
        objective_site: char,
        elapsed_since_objective_planted: f64,
        counter_terrorists: [PlayerState; PLAYERS_PER_SIDE],
        terrorists: [PlayerState; PLAYERS_PER_SIDE],
    ) -> Self {
        Self {
            map_id,
            round,
            objective_site,
            elapsed_since_objective_planted,
            counter_terrorists,
            terrorists,
        }
    }

    /// Map identifier from the replay header.
    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    /// Round metadata at capture time.
    pub const fn round(&self) -> RoundMeta {
        self.round
    }

    /// Bomb site letter, [`UNKNOWN_SITE`] if the replay did not report one.
    pub const fn objective_site(&self) -> char {
        self.objective_site
    }

    /// Seconds of simulated time since the bomb was planted.
    pub const fn elapsed_since_objective_planted(&self) -> f64 {
        self.elapsed_since_objective_planted
    }

    /// Player slots for the given side.
    pub const fn players(&self, side: Side) -> &[PlayerState; PLAYERS_PER_SIDE] {
        match side {
            Side::CounterTerrorist => &self.counter_terrorists,
            Side::Terrorist => &self.terrorists,
        }
    }

    /// Attach the round outcome, consuming the partial result.
    pub const fn resolve(self, winner: Side) -> TrainingRecord {
        TrainingRecord {
            team_ct_wins_round: winner.is_side_a(),
            partial: self,
        }
    }
}

// ---------------------------------------------------------------------------
// Training record
// ---------------------------------------------------------------------------

/// A label-complete training sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    team_ct_wins_round: bool,
    partial: PartialResult,
}

impl TrainingRecord {
    /// True when side A (the counter-terrorists) won the round.
    pub const fn outcome_label(&self) -> bool {
        self.team_ct_wins_round
    }

    /// The snapshot this record was built from.
    pub const fn partial(&self) -> &PartialResult {
        &self.partial
    }

    /// Render the record as one row of column values, matching
    /// [`column_names`] position for position.
    pub fn to_row(&self) -> Vec<String> {
        let p = &self.partial;
        let mut row = Vec::with_capacity(column_count());
        row.push(self.team_ct_wins_round.to_string());
        row.push(p.map_id.clone());
        row.push(format!("{:.4}", p.elapsed_since_objective_planted));
        row.push(p.objective_site.to_string());
        row.push(p.round.round_number.to_string());
        row.push(p.round.round_of_half.to_string());
        row.push(p.round.rounds_per_half.to_string());
        for side in [Side::CounterTerrorist, Side::Terrorist] {
            for player in p.players(side) {
                player.write_values(side, &mut row);
            }
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Column table
// ---------------------------------------------------------------------------

/// Total number of output columns.
const fn column_count() -> usize {
    let side_a = PLAYER_COLUMNS
        .len()
        .saturating_add(SIDE_A_COLUMNS.len())
        .saturating_mul(PLAYERS_PER_SIDE);
    let side_b = PLAYER_COLUMNS.len().saturating_mul(PLAYERS_PER_SIDE);
    META_COLUMNS
        .len()
        .saturating_add(side_a)
        .saturating_add(side_b)
}

/// The output header, one name per column of [`TrainingRecord::to_row`].
pub fn column_names() -> Vec<String> {
    let mut names = Vec::with_capacity(column_count());
    names.extend(META_COLUMNS.iter().map(|c| (*c).to_owned()));

    for side in [Side::CounterTerrorist, Side::Terrorist] {
        let prefix = side.column_prefix();
        for slot in 1..=PLAYERS_PER_SIDE {
            let side_only: &[&str] = if side.is_side_a() {
                &SIDE_A_COLUMNS
            } else {
                &[]
            };
            for field in PLAYER_COLUMNS.iter().chain(side_only) {
                names.push(format!("team_{prefix}_player{slot}_{field}"));
            }
        }
    }
    names
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn player(hp: i32, kit: bool) -> PlayerState {
        PlayerState {
            is_alive: hp > 0,
            equipped_weapon: Weapon::AK47,
            has_helmet: true,
            has_armor: true,
            hp,
            equipment_value: 4700,
            has_defuse_kit: kit,
        }
    }

    fn sample_partial() -> PartialResult {
        PartialResult::new(
            "de_inferno".to_owned(),
            RoundMeta::for_round(17),
            'B',
            2.5,
            [player(100, true); PLAYERS_PER_SIDE],
            [player(0, false); PLAYERS_PER_SIDE],
        )
    }

    #[test]
    fn regulation_round_meta() {
        assert_eq!(
            RoundMeta::for_round(1),
            RoundMeta {
                round_number: 1,
                round_of_half: 1,
                rounds_per_half: 15
            }
        );
        assert_eq!(RoundMeta::for_round(15).round_of_half, 15);
        assert_eq!(RoundMeta::for_round(16).round_of_half, 1);
        assert_eq!(RoundMeta::for_round(30).round_of_half, 15);
        assert_eq!(RoundMeta::for_round(30).rounds_per_half, 15);
    }

    #[test]
    fn overtime_round_meta() {
        let r31 = RoundMeta::for_round(31);
        assert_eq!(r31.rounds_per_half, 3);
        assert_eq!(r31.round_of_half, 1);
        assert_eq!(RoundMeta::for_round(33).round_of_half, 3);
        assert_eq!(RoundMeta::for_round(34).round_of_half, 1);
    }

    #[test]
    fn round_zero_does_not_underflow() {
        let meta = RoundMeta::for_round(0);
        assert_eq!(meta.round_of_half, 1);
        assert_eq!(meta.rounds_per_half, 15);
    }

    #[test]
    fn header_and_row_line_up() {
        let header = column_names();
        let record = sample_partial().resolve(Side::CounterTerrorist);
        let row = record.to_row();
        assert_eq!(header.len(), 72);
        assert_eq!(header.len(), row.len());
        assert_eq!(
            header[..7],
            [
                "team_ct_wins_round",
                "map_id",
                "elapsed_since_bombplant",
                "bombplant_site",
                "round_number",
                "round_of_half",
                "rounds_per_half",
            ]
        );
        assert_eq!(
            row[..7],
            ["true", "de_inferno", "2.5000", "B", "17", "2", "15"]
        );
        assert_eq!(header[7], "team_ct_player1_is_alive");
    }

    #[test]
    fn defuse_kit_column_only_for_side_a() {
        let header = column_names();
        let kit_columns: Vec<&String> = header
            .iter()
            .filter(|c| c.ends_with("has_defuse_kit"))
            .collect();
        assert_eq!(kit_columns.len(), PLAYERS_PER_SIDE);
        assert!(kit_columns.iter().all(|c| c.starts_with("team_ct_")));
    }

    #[test]
    fn terrorist_columns_follow_counter_terrorists() {
        let header = column_names();
        let row = sample_partial().resolve(Side::Terrorist).to_row();
        let first_t = header
            .iter()
            .position(|c| c == "team_t_player1_is_alive")
            .unwrap();
        assert_eq!(first_t, 7 + 5 * 7);
        assert_eq!(row[first_t], "false");
        assert_eq!(row[first_t + 4], "0");
    }

    #[test]
    fn resolve_labels_relative_to_side_a() {
        assert!(sample_partial().resolve(Side::CounterTerrorist).outcome_label());
        assert!(!sample_partial().resolve(Side::Terrorist).outcome_label());
    }

    #[test]
    fn participant_without_weapon_maps_to_unknown() {
        let p = Participant {
            name: "bot".to_owned(),
            side: Side::Terrorist,
            is_alive: true,
            hp: 42,
            armor: 0,
            has_helmet: false,
            has_defuse_kit: false,
            active_weapon: None,
            equipment_value: 200,
        };
        let state = PlayerState::from(&p);
        assert_eq!(state.equipped_weapon, Weapon::Unknown);
        assert!(!state.has_armor);
        assert_eq!(state.hp, 42);
    }
}
