//! Typed rows fetched from the spreadsheet proxy.
//!
//! The proxy returns one JSON object with an array per sheet. Cells are
//! untrustworthy: numbers arrive as strings with `%`, thousands separators
//! or stray spaces, and whole arrays may be missing. Parsing is therefore
//! lenient: a bad cell becomes `0` or `""`, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub password: String,
    pub nickname: String,
}

/// One weapon on the store's linear upgrade track. Row order defines the
/// unlock chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponRow {
    pub weapon_name: String,
    /// Work-power multiplier applied while equipped.
    pub skill: f64,
    pub price: i64,
    pub png: Option<String>,
}

/// One playable district with its difficulty rank and work-amount range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRow {
    pub rank: i64,
    pub area: String,
    pub minimum: i64,
    pub maximum: i64,
}

/// One gacha character definition as entered in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRow {
    pub name: String,
    /// Explicit work power. Zero means "not filled in".
    pub skill: f64,
    /// Free-text grade, normalized by [`crate::normalize_grade`].
    pub grade: String,
    pub probability: Option<f64>,
}

/// One persisted save row, keyed by account id. The `worker` column is a
/// JSON-encoded list (see `dobae-save` for the tolerated shapes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRow {
    pub id: String,
    pub money: i64,
    pub weapon: String,
    pub worker: String,
}

/// The full catalog payload from one bulk fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub account: Vec<AccountRow>,
    pub weapon: Vec<WeaponRow>,
    pub area: Vec<AreaRow>,
    pub worker: Vec<WorkerRow>,
    pub save: Vec<SaveRow>,
}

fn cell_text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_number(row: &Value, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '%' | ',' | ' ')).collect();
            cleaned.trim().parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn rows<'a>(raw: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter())
        .unwrap_or_default()
}

impl SheetData {
    /// Parse a bulk catalog payload. Missing sheets become empty vectors.
    pub fn from_json(raw: &Value) -> Self {
        let account = rows(raw, "account")
            .map(|row| AccountRow {
                id: cell_text(row, "id"),
                password: cell_text(row, "password"),
                nickname: cell_text(row, "nickname"),
            })
            .collect();

        let weapon = rows(raw, "weapon")
            .map(|row| {
                let png = cell_text(row, "png");
                WeaponRow {
                    weapon_name: cell_text(row, "weaponname"),
                    skill: cell_number(row, "skill"),
                    price: cell_number(row, "price") as i64,
                    png: if png.is_empty() { None } else { Some(png) },
                }
            })
            .collect();

        let area = rows(raw, "area")
            .map(|row| AreaRow {
                rank: cell_number(row, "rank") as i64,
                area: cell_text(row, "area"),
                minimum: cell_number(row, "minimum") as i64,
                maximum: cell_number(row, "maximum") as i64,
            })
            .collect();

        let worker = rows(raw, "worker")
            .map(|row| {
                let probability = cell_number(row, "probability");
                WorkerRow {
                    name: cell_text(row, "name"),
                    skill: cell_number(row, "skill"),
                    grade: cell_text(row, "grade"),
                    probability: if probability > 0.0 { Some(probability) } else { None },
                }
            })
            .collect();

        let save = rows(raw, "save")
            .map(|row| SaveRow {
                id: cell_text(row, "id"),
                money: cell_number(row, "money") as i64,
                weapon: cell_text(row, "weapon"),
                worker: cell_text(row, "worker"),
            })
            .collect();

        Self { account, weapon, area, worker, save }
    }
}
