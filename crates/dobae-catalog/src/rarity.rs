//! Rarity tiers and grade normalization.
//!
//! The sheet's `grade` column is free text. Three spellings are accepted, in
//! order: the enum name itself ("MYTHIC"), a letter grade (A-D), and the
//! Korean job titles used in-game. Anything unrecognized lands on Rare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Character rarity, ascending desirability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// All tiers, ascending.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Draw-share weight used when the sheet gives no probability.
    /// Larger means more common; these are shares of the total, not percents.
    pub fn draw_weight(self) -> f64 {
        match self {
            Rarity::Mythic => 10.0,
            Rarity::Legendary => 40.0,
            Rarity::Epic => 70.0,
            Rarity::Rare => 90.0,
            Rarity::Common => 120.0,
        }
    }

    /// Default work power for characters whose sheet row has no skill value.
    pub fn default_work_power(self) -> f64 {
        match self {
            Rarity::Common => 10.0,
            Rarity::Rare => 20.0,
            Rarity::Epic => 30.0,
            Rarity::Legendary => 40.0,
            Rarity::Mythic => 50.0,
        }
    }

    /// In-game Korean job title for this tier.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "알바",
            Rarity::Rare => "도모",
            Rarity::Epic => "준기공",
            Rarity::Legendary => "기공",
            Rarity::Mythic => "반장",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
            Rarity::Mythic => "MYTHIC",
        };
        write!(f, "{}", name)
    }
}

/// Normalize a free-text grade cell to a rarity tier.
///
/// "준기공" is checked before "기공" because the shorter title is a
/// substring of the longer one.
pub fn normalize_grade(value: &str) -> Rarity {
    let grade = value.trim().to_uppercase();
    match grade.as_str() {
        "COMMON" => return Rarity::Common,
        "RARE" => return Rarity::Rare,
        "EPIC" => return Rarity::Epic,
        "LEGENDARY" => return Rarity::Legendary,
        "MYTHIC" => return Rarity::Mythic,
        "A" => return Rarity::Mythic,
        "B" => return Rarity::Legendary,
        "C" => return Rarity::Epic,
        "D" => return Rarity::Rare,
        _ => {}
    }

    if value.contains("반장") {
        Rarity::Mythic
    } else if value.contains("준기공") {
        Rarity::Epic
    } else if value.contains("기공") {
        Rarity::Legendary
    } else if value.contains("도모") {
        Rarity::Rare
    } else if value.contains("알바") {
        Rarity::Common
    } else {
        Rarity::Rare
    }
}
