//! Leaderboard standings
//!
//! A pure join over the catalog's bulk rows: each account's save row yields
//! its money and crew, the crew's skill is summed from the worker sheet,
//! and the equipped weapon multiplies the total. Sorted by money, richest
//! first.

use dobae_catalog::{AccountRow, SaveRow, WeaponRow, WorkerRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRow {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    /// Nickname, falling back to the account id.
    pub name: String,
    pub money: i64,
    pub work_power: f64,
}

/// Extract crew member names from a save row's `worker` column.
///
/// Tolerated shapes: a JSON array of names, a JSON array of owned-character
/// objects (their `name` fields), or a bare comma-separated list.
pub fn parse_worker_names(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        return items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .filter(|name| !name.is_empty())
            .collect();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Extract the equipped weapon name from a save row's `weapon` column,
/// which holds either a JSON `WeaponState` or a bare weapon name.
pub fn parse_equipped_weapon(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) {
        return obj
            .get("equipped")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from);
    }
    Some(raw.to_string())
}

/// Compute the standings for every account, sorted by money descending.
pub fn standings(
    accounts: &[AccountRow],
    saves: &[SaveRow],
    weapons: &[WeaponRow],
    workers: &[WorkerRow],
) -> Vec<RankRow> {
    let mut rows: Vec<RankRow> = accounts
        .iter()
        .map(|account| {
            let save = saves.iter().find(|s| s.id == account.id);
            let money = save.map_or(0, |s| s.money);

            let base_work: f64 = save
                .map(|s| parse_worker_names(&s.worker))
                .unwrap_or_default()
                .iter()
                .filter_map(|name| workers.iter().find(|w| &w.name == name))
                .map(|w| w.skill)
                .sum();

            let multiplier = save
                .and_then(|s| parse_equipped_weapon(&s.weapon))
                .and_then(|name| weapons.iter().find(|w| w.weapon_name == name).map(|w| w.skill))
                .filter(|skill| *skill > 0.0)
                .unwrap_or(1.0);

            RankRow {
                rank: 0,
                id: account.id.clone(),
                name: if account.nickname.is_empty() {
                    account.id.clone()
                } else {
                    account.nickname.clone()
                },
                money,
                work_power: (base_work * multiplier).round(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.money.cmp(&a.money));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}
