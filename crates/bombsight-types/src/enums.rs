//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// One of the two competing teams.
///
/// Records are normalized so the counter-terrorists are always side A: the
/// outcome label is true when they win, and only their slots carry the
/// defuse-kit column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Side A. Defends the bomb sites and can defuse.
    CounterTerrorist,
    /// Side B. Plants the bomb.
    Terrorist,
}

impl Side {
    /// Short prefix used in column names (`ct` or `t`).
    pub const fn column_prefix(self) -> &'static str {
        match self {
            Self::CounterTerrorist => "ct",
            Self::Terrorist => "t",
        }
    }

    /// Whether this is the side the outcome label is relative to.
    pub const fn is_side_a(self) -> bool {
        matches!(self, Self::CounterTerrorist)
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CounterTerrorist => write!(f, "counter_terrorist"),
            Self::Terrorist => write!(f, "terrorist"),
        }
    }
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// An equipment element a participant can hold as their active weapon.
///
/// [`Weapon::Unknown`] stands in when the replay carries no active weapon
/// for a participant (dead players, spectating bots, decoding gaps).
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weapon {
    /// No active weapon known.
    #[default]
    Unknown,

    // --- Pistols ---
    /// P2000.
    P2000,
    /// Glock-18.
    Glock,
    /// P250.
    P250,
    /// Desert Eagle.
    Deagle,
    /// Five-SeveN.
    FiveSeven,
    /// Dual Berettas.
    DualBarettas,
    /// Tec-9.
    Tec9,
    /// CZ75-Auto.
    CZ,
    /// USP-S.
    USP,
    /// R8 Revolver.
    Revolver,

    // --- SMGs ---
    /// MP7.
    MP7,
    /// MP9.
    MP9,
    /// PP-Bizon.
    Bizon,
    /// MAC-10.
    Mac10,
    /// UMP-45.
    UMP,
    /// P90.
    P90,
    /// MP5-SD.
    MP5SD,

    // --- Heavy ---
    /// Sawed-Off.
    SawedOff,
    /// Nova.
    Nova,
    /// MAG-7.
    Swag7,
    /// XM1014.
    XM1014,
    /// M249.
    M249,
    /// Negev.
    Negev,

    // --- Rifles ---
    /// Galil AR.
    Gallil,
    /// FAMAS.
    Famas,
    /// AK-47.
    AK47,
    /// M4A4.
    M4A4,
    /// M4A1-S.
    M4A1,
    /// SSG 08.
    Scout,
    /// SG 553.
    SG556,
    /// AUG.
    AUG,
    /// AWP.
    AWP,
    /// SCAR-20.
    Scar20,
    /// G3SG1.
    G3SG1,

    // --- Equipment ---
    /// Zeus x27.
    Zeus,
    /// Body armor.
    Kevlar,
    /// Helmet.
    Helmet,
    /// The bomb itself.
    Bomb,
    /// Any knife.
    Knife,
    /// Defuse kit.
    DefuseKit,
    /// Damage dealt by the world (falls, trigger hurt).
    World,

    // --- Grenades ---
    /// Decoy grenade.
    Decoy,
    /// Molotov.
    Molotov,
    /// Incendiary grenade.
    Incendiary,
    /// Flashbang.
    Flash,
    /// Smoke grenade.
    Smoke,
    /// HE grenade.
    HE,
}

impl Weapon {
    /// The variant name as written into tabular output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::P2000 => "P2000",
            Self::Glock => "Glock",
            Self::P250 => "P250",
            Self::Deagle => "Deagle",
            Self::FiveSeven => "FiveSeven",
            Self::DualBarettas => "DualBarettas",
            Self::Tec9 => "Tec9",
            Self::CZ => "CZ",
            Self::USP => "USP",
            Self::Revolver => "Revolver",
            Self::MP7 => "MP7",
            Self::MP9 => "MP9",
            Self::Bizon => "Bizon",
            Self::Mac10 => "Mac10",
            Self::UMP => "UMP",
            Self::P90 => "P90",
            Self::MP5SD => "MP5SD",
            Self::SawedOff => "SawedOff",
            Self::Nova => "Nova",
            Self::Swag7 => "Swag7",
            Self::XM1014 => "XM1014",
            Self::M249 => "M249",
            Self::Negev => "Negev",
            Self::Gallil => "Gallil",
            Self::Famas => "Famas",
            Self::AK47 => "AK47",
            Self::M4A4 => "M4A4",
            Self::M4A1 => "M4A1",
            Self::Scout => "Scout",
            Self::SG556 => "SG556",
            Self::AUG => "AUG",
            Self::AWP => "AWP",
            Self::Scar20 => "Scar20",
            Self::G3SG1 => "G3SG1",
            Self::Zeus => "Zeus",
            Self::Kevlar => "Kevlar",
            Self::Helmet => "Helmet",
            Self::Bomb => "Bomb",
            Self::Knife => "Knife",
            Self::DefuseKit => "DefuseKit",
            Self::World => "World",
            Self::Decoy => "Decoy",
            Self::Molotov => "Molotov",
            Self::Incendiary => "Incendiary",
            Self::Flash => "Flash",
            Self::Smoke => "Smoke",
            Self::HE => "HE",
        }
    }
}

impl core::fmt::Display for Weapon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
