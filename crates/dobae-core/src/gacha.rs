//! Gacha engine
//!
//! Weighted draws over the character catalog, stat assignment, and the
//! bounded owned-collection. Pools are validated before drawing: an empty
//! catalog or a zero total weight is an input error, not a NaN draw.

use crate::error::{Error, Result};
use crate::rng::GameRng;
use dobae_catalog::{CharacterDef, Rarity, WorkerRow};
use serde::{Deserialize, Serialize};

/// Price of one pull.
pub const PULL_COST: i64 = 10_000_000;

/// A character the player owns, created only by a successful pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCharacter {
    /// Unique per pull.
    pub uid: String,
    pub def_id: String,
    pub name: String,
    pub rarity: Rarity,
    /// Always in [0, 100] with at most one decimal digit.
    pub work_power: f64,
    /// Unix milliseconds of the pull.
    pub obtained_at: i64,
}

/// Clamp a work-power value to [0, 100] and one decimal digit.
pub fn quantize_work_power(value: f64) -> f64 {
    (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Work power for a drawn definition: the explicit sheet skill if present,
/// otherwise the rarity default. Quantized either way.
pub fn work_power_for(def: &CharacterDef) -> f64 {
    quantize_work_power(def.skill.unwrap_or_else(|| def.rarity.default_work_power()))
}

/// Draw one definition from the pool, weighted by draw share.
///
/// Replacement across pulls: the same character can be drawn repeatedly.
pub fn pick_weighted<'a>(rng: &mut GameRng, pool: &'a [CharacterDef]) -> Result<&'a CharacterDef> {
    let weights: Vec<f64> = pool.iter().map(|c| c.weight).collect();
    let index = rng.weighted_index(&weights).ok_or(Error::InvalidCatalog)?;
    Ok(&pool[index])
}

/// Materialize a drawn definition into an owned character.
pub fn to_owned_character(def: &CharacterDef, uid: String, obtained_at: i64) -> OwnedCharacter {
    OwnedCharacter {
        uid,
        def_id: def.id.clone(),
        name: def.name.clone(),
        rarity: def.rarity,
        work_power: work_power_for(def),
        obtained_at,
    }
}

/// Insert a fresh pull at the front of the collection, then truncate to the
/// slot capacity. Entries past the capacity are silently discarded.
pub fn insert_owned(owned: &mut Vec<OwnedCharacter>, character: OwnedCharacter, slots: usize) {
    owned.insert(0, character);
    owned.truncate(slots.max(1));
}

/// Refresh owned characters against a fresh worker catalog.
///
/// Matching is by display name, as the original save format stores only
/// names. Distinct pulls sharing a name all take the first matching row.
pub fn resync_owned(owned: &mut [OwnedCharacter], rows: &[WorkerRow]) {
    for item in owned.iter_mut() {
        if let Some(row) = rows.iter().find(|w| w.name == item.name) {
            item.rarity = dobae_catalog::normalize_grade(&row.grade);
            item.work_power = quantize_work_power(row.skill);
        }
    }
}
