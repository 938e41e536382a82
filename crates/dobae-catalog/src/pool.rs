//! Gacha pool construction and built-in fallback catalogs.
//!
//! The pool is rebuilt from worker rows on every catalog refresh. When the
//! fetch fails or yields nothing usable the built-in defaults keep the game
//! playable (never block gameplay on the proxy).

use crate::rarity::{normalize_grade, Rarity};
use crate::rows::{AreaRow, WorkerRow};
use serde::{Deserialize, Serialize};

/// One drawable character definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    /// Draw-share weight, always > 0.
    pub weight: f64,
    /// Explicit work power from the sheet, if any.
    pub skill: Option<f64>,
}

/// Normalize a sheet probability cell into a draw weight.
///
/// Values in (0,1) are treated as fractions and scaled by 100. The result
/// is clamped to a minimum of 1 so no entry can vanish from the draw.
pub fn normalize_probability(value: Option<f64>) -> Option<f64> {
    let value = value?;
    if !value.is_finite() {
        return None;
    }
    let scaled = if value > 0.0 && value < 1.0 { value * 100.0 } else { value };
    Some(scaled.max(1.0))
}

/// Build the gacha pool from worker rows. Blank names are skipped; an empty
/// result falls back to [`default_pool`].
pub fn build_pool(rows: &[WorkerRow]) -> Vec<CharacterDef> {
    let pool: Vec<CharacterDef> = rows
        .iter()
        .filter(|row| !row.name.trim().is_empty())
        .enumerate()
        .map(|(idx, row)| {
            let rarity = normalize_grade(&row.grade);
            CharacterDef {
                id: format!("{}-{}", row.name, idx),
                name: row.name.clone(),
                rarity,
                weight: normalize_probability(row.probability).unwrap_or_else(|| rarity.draw_weight()),
                skill: if row.skill > 0.0 { Some(row.skill) } else { None },
            }
        })
        .collect();

    if pool.is_empty() {
        default_pool()
    } else {
        pool
    }
}

/// The built-in character pool used when the catalog is unreachable.
pub fn default_pool() -> Vec<CharacterDef> {
    let defaults = [
        ("lee1", "이점순", Rarity::Mythic),
        ("jang1", "장엽자", Rarity::Mythic),
        ("hong1", "홍줍의", Rarity::Legendary),
        ("lee2", "이밈희", Rarity::Legendary),
        ("im1", "임점순", Rarity::Epic),
        ("kim1", "김섬용", Rarity::Rare),
    ];
    defaults
        .into_iter()
        .map(|(id, name, rarity)| CharacterDef {
            id: id.to_string(),
            name: name.to_string(),
            rarity,
            weight: rarity.draw_weight(),
            skill: None,
        })
        .collect()
}

/// Work-amount ranges for the 25 built-in districts, hardest first.
const DEFAULT_DISTRICTS: [(&str, i64, i64); 25] = [
    ("금천구", 100_000, 300_000),
    ("관악구", 80_000, 100_000),
    ("구로구", 60_000, 80_000),
    ("강북구", 50_000, 60_000),
    ("은평구", 40_000, 50_000),
    ("성북구", 30_000, 40_000),
    ("중랑구", 20_000, 30_000),
    ("서대문구", 10_000, 20_000),
    ("동대문구", 8_000, 10_000),
    ("도봉구", 7_000, 8_000),
    ("영등포구", 6_000, 7_000),
    ("동작구", 5_000, 6_000),
    ("종로구", 4_000, 5_000),
    ("중구", 3_000, 4_000),
    ("성동구", 2_000, 3_000),
    ("강서구", 1_000, 2_000),
    ("양천구", 900, 1_000),
    ("노원구", 800, 900),
    ("용산구", 700, 800),
    ("광진구", 600, 700),
    ("강동구", 500, 600),
    ("서초구", 400, 500),
    ("강남구", 300, 400),
    ("송파구", 200, 300),
    ("마포구", 100, 200),
];

/// The built-in area table used when the catalog is unreachable. Ranks are
/// assigned 1..=25 by descending maximum work amount (rank 1 is hardest).
pub fn default_areas() -> Vec<AreaRow> {
    DEFAULT_DISTRICTS
        .iter()
        .enumerate()
        .map(|(idx, &(area, minimum, maximum))| AreaRow {
            rank: idx as i64 + 1,
            area: area.to_string(),
            minimum,
            maximum,
        })
        .collect()
}
