//! Player state: money, the owned-character collection, storage slots and
//! the weapon track.

use crate::error::{Error, Result};
use crate::gacha::OwnedCharacter;
use dobae_catalog::WeaponRow;
use serde::{Deserialize, Serialize};

/// Price of unlocking one more storage slot.
pub const SLOT_UNLOCK_COST: i64 = 10_000_000;

/// Storage slot capacity bounds.
pub const MIN_SLOTS: u8 = 1;
pub const MAX_SLOTS: u8 = 3;

/// Which weapons the player owns and which one is equipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponState {
    pub owned: Vec<String>,
    /// Empty string when nothing is equipped.
    pub equipped: String,
}

impl WeaponState {
    pub fn owns(&self, name: &str) -> bool {
        self.owned.iter().any(|w| w == name)
    }
}

/// The full mutable player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub money: i64,
    /// Newest first; never longer than `storage_slots`.
    pub owned: Vec<OwnedCharacter>,
    pub storage_slots: u8,
    pub weapons: WeaponState,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            money: 0,
            owned: Vec::new(),
            storage_slots: MIN_SLOTS,
            weapons: WeaponState::default(),
        }
    }
}

impl PlayerState {
    /// Additive work power across the owned collection.
    pub fn total_work_power(&self) -> f64 {
        self.owned.iter().map(|c| c.work_power).sum()
    }

    /// Deduct a cost, rejecting without mutation when funds are short.
    pub fn spend(&mut self, cost: i64) -> Result<()> {
        if self.money < cost {
            return Err(Error::InsufficientFunds { needed: cost, have: self.money });
        }
        self.money -= cost;
        Ok(())
    }

    /// Unlock one more storage slot.
    pub fn unlock_slot(&mut self) -> Result<()> {
        if self.storage_slots >= MAX_SLOTS {
            return Err(Error::StorageAtMax);
        }
        self.spend(SLOT_UNLOCK_COST)?;
        self.storage_slots += 1;
        Ok(())
    }
}

/// Whether a weapon may be purchased yet. The catalog's row order is a
/// strict linear unlock chain: each row needs the previous one owned.
pub fn can_buy_weapon(rows: &[WeaponRow], state: &WeaponState, name: &str) -> bool {
    let Some(index) = rows.iter().position(|row| row.weapon_name == name) else {
        return false;
    };
    if index == 0 {
        return true;
    }
    state.owns(&rows[index - 1].weapon_name)
}

/// Buy a weapon off the track. The first purchase auto-equips.
pub fn buy_weapon(player: &mut PlayerState, rows: &[WeaponRow], name: &str) -> Result<()> {
    let row = rows
        .iter()
        .find(|row| row.weapon_name == name)
        .ok_or_else(|| Error::UnknownWeapon(name.to_string()))?;

    if player.weapons.owns(name) {
        return Err(Error::WeaponOwned(name.to_string()));
    }
    if !can_buy_weapon(rows, &player.weapons, name) {
        return Err(Error::WeaponLocked(name.to_string()));
    }
    player.spend(row.price)?;

    player.weapons.owned.push(name.to_string());
    if player.weapons.equipped.is_empty() {
        player.weapons.equipped = name.to_string();
    }
    Ok(())
}

/// Equip an owned weapon.
pub fn equip_weapon(player: &mut PlayerState, name: &str) -> Result<()> {
    if !player.weapons.owns(name) {
        return Err(Error::WeaponNotOwned(name.to_string()));
    }
    player.weapons.equipped = name.to_string();
    Ok(())
}

/// Multiplier of the equipped weapon, 1.0 when nothing usable is equipped.
pub fn weapon_multiplier(rows: &[WeaponRow], state: &WeaponState) -> f64 {
    if state.equipped.is_empty() {
        return 1.0;
    }
    rows.iter()
        .find(|row| row.weapon_name == state.equipped)
        .map(|row| if row.skill > 0.0 { row.skill } else { 1.0 })
        .unwrap_or(1.0)
}
