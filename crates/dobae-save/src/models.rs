//! The save-blob wire format.
//!
//! One JSON object holds everything a player can lose: money, the owned
//! crew, slot count and weapon state. The same shape is written locally and
//! pushed to the spreadsheet proxy. Decoding is forgiving: a malformed blob
//! becomes a fresh save, and legacy remote rows (bare weapon names, crews
//! stored as name lists) are upgraded on read.

use dobae_catalog::{Rarity, SaveRow};
use dobae_core::gacha::quantize_work_power;
use dobae_core::{board, OwnedCharacter, PlayerState, WeaponState, MAX_SLOTS, MIN_SLOTS};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Key prefix for save blobs; versioned so a future format bump can coexist.
pub const SAVE_KEY_PREFIX: &str = "dobae_v1_save";

/// Storage key for a save blob, per account when one is logged in.
pub fn user_key(account_id: Option<&str>) -> String {
    match account_id {
        Some(id) if !id.is_empty() => format!("{SAVE_KEY_PREFIX}_{id}"),
        _ => SAVE_KEY_PREFIX.to_string(),
    }
}

/// The persisted save blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub money: i64,
    /// Blobs written before the rename carried this under `worker`.
    #[serde(alias = "worker")]
    pub owned: Vec<OwnedCharacter>,
    pub storage_slots: u8,
    /// Older blobs carried this as a JSON-encoded string or a bare weapon
    /// name; both still decode.
    #[serde(deserialize_with = "weapon_field")]
    pub weapon: WeaponState,
}

fn weapon_field<'de, D>(deserializer: D) -> std::result::Result<WeaponState, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        State(WeaponState),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::State(state) => state,
        Raw::Text(raw) => parse_weapon_column(&raw),
    })
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            money: 0,
            owned: Vec::new(),
            storage_slots: MIN_SLOTS,
            weapon: WeaponState::default(),
        }
    }
}

impl SaveData {
    /// Snapshot the player state for writing.
    pub fn from_player(player: &PlayerState) -> Self {
        Self {
            money: player.money,
            owned: player.owned.clone(),
            storage_slots: player.storage_slots,
            weapon: player.weapons.clone(),
        }
    }

    /// Turn a decoded blob back into player state, re-applying the
    /// invariants a hand-edited or stale blob may violate.
    pub fn into_player(self) -> PlayerState {
        let storage_slots = self.storage_slots.clamp(MIN_SLOTS, MAX_SLOTS);
        let mut owned = self.owned;
        owned.truncate(storage_slots as usize);
        for character in &mut owned {
            character.work_power = quantize_work_power(character.work_power);
        }
        PlayerState { money: self.money, owned, storage_slots, weapons: self.weapon }
    }
}

/// Decode a save blob. Anything unreadable yields a fresh save rather than
/// an error; losing a corrupt blob beats refusing to start.
pub fn decode_save(raw: &[u8]) -> SaveData {
    serde_json::from_slice(raw).unwrap_or_default()
}

/// Encode a save blob for storage.
pub fn encode_save(data: &SaveData) -> Vec<u8> {
    serde_json::to_vec(data).unwrap_or_default()
}

/// Upgrade a remote save row into the current blob shape.
///
/// Old rows stored the crew as a list of names and the weapon as a bare
/// name. Name-only crew members get placeholder stats; the next catalog
/// refresh resyncs them to their real grade and skill.
pub fn normalize_remote_save(row: &SaveRow) -> SaveData {
    let owned = parse_worker_column(&row.worker);
    let storage_slots = (owned.len() as u8).clamp(MIN_SLOTS, MAX_SLOTS);
    SaveData {
        money: row.money,
        owned,
        storage_slots,
        weapon: parse_weapon_column(&row.weapon),
    }
}

fn parse_worker_column(raw: &str) -> Vec<OwnedCharacter> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    // Current format: a JSON array of full character objects.
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        let full: Vec<OwnedCharacter> = items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect();
        if !full.is_empty() {
            return full;
        }
    }
    // Legacy formats carry names only.
    board::parse_worker_names(raw)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| OwnedCharacter {
            uid: format!("{name}-{idx}"),
            def_id: name.clone(),
            name,
            rarity: Rarity::Rare,
            work_power: quantize_work_power(Rarity::Rare.default_work_power()),
            obtained_at: 0,
        })
        .collect()
}

fn parse_weapon_column(raw: &str) -> WeaponState {
    if raw.trim().is_empty() {
        return WeaponState::default();
    }
    if let Ok(state) = serde_json::from_str::<WeaponState>(raw) {
        return state;
    }
    // Legacy rows stored just the equipped weapon's name.
    match board::parse_equipped_weapon(raw) {
        Some(name) => WeaponState { owned: vec![name.clone()], equipped: name },
        None => WeaponState::default(),
    }
}
