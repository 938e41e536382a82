//! Procedural district map generation
//!
//! Each place gets a fixed 30x18 tile map derived purely from its name and
//! difficulty rank: a couple of roads spanning the grid, one or two plazas,
//! and a handful of houses the player can enter to start work. The place
//! name is hashed into the RNG seed, so the same `(place, rank)` pair always
//! lays out the same map without anything being stored.

use crate::rng::{seed_from_name, GameRng};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Map width in tiles.
pub const MAP_W: i64 = 30;
/// Map height in tiles.
pub const MAP_H: i64 = 18;

/// Minimum distance of houses and plazas from the map edge.
const MIN_MARGIN: i64 = 1;
/// Minimum distance of roads from the map edge.
const MIN_PATH_MARGIN: i64 = 2;
/// Cap on house placement attempts; hitting it is not an error.
const MAX_HOUSE_ATTEMPTS: u32 = 400;

/// A tile coordinate, `(x, y)` with the origin at the top left.
pub type Coord = (i64, i64);

/// The derived tile layout for one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub houses: IndexSet<Coord>,
    pub path_tiles: IndexSet<Coord>,
    pub plaza_tiles: IndexSet<Coord>,
}

impl MapConfig {
    /// Classify a tile. Plazas win over paths where they overlap.
    pub fn tile_kind(&self, x: i64, y: i64) -> TileKind {
        if self.plaza_tiles.contains(&(x, y)) {
            TileKind::Plaza
        } else if self.path_tiles.contains(&(x, y)) {
            TileKind::Path
        } else {
            TileKind::Grass
        }
    }

    /// Whether a house stands on this tile.
    pub fn has_house(&self, x: i64, y: i64) -> bool {
        self.houses.contains(&(x, y))
    }
}

fn clamp_int(n: f64, min: i64, max: i64) -> i64 {
    (n.floor() as i64).clamp(min, max)
}

fn clamp_rank(rank: Option<i64>) -> i64 {
    rank.unwrap_or(15).clamp(1, 25)
}

fn add_horizontal_line(path_tiles: &mut IndexSet<Coord>, y: i64) {
    for x in 0..MAP_W {
        path_tiles.insert((x, y));
    }
}

fn add_vertical_line(path_tiles: &mut IndexSet<Coord>, x: i64) {
    for y in 0..MAP_H {
        path_tiles.insert((x, y));
    }
}

fn add_rect_tiles(target: &mut IndexSet<Coord>, x: i64, y: i64, w: i64, h: i64) {
    let x0 = x.clamp(0, MAP_W - 1);
    let y0 = y.clamp(0, MAP_H - 1);
    let x1 = (x + w - 1).clamp(0, MAP_W - 1);
    let y1 = (y + h - 1).clamp(0, MAP_H - 1);
    for yy in y0..=y1 {
        for xx in x0..=x1 {
            target.insert((xx, yy));
        }
    }
}

/// Generate the tile map for a place. Deterministic in `(place, rank)`.
pub fn generate_map(place: &str, rank: Option<i64>) -> MapConfig {
    let seed = seed_from_name(place);
    let mut rng = GameRng::new(u64::from(seed));
    let mut path_tiles = IndexSet::new();
    let mut plaza_tiles = IndexSet::new();
    let rank_value = clamp_rank(rank);

    // Main roads: one horizontal, one vertical, both clear of the edges.
    let main_y = clamp_int(
        2.0 + rng.next_f64() * (MAP_H - 4) as f64,
        MIN_PATH_MARGIN,
        MAP_H - 1 - MIN_PATH_MARGIN,
    );
    let main_x = clamp_int(
        2.0 + rng.next_f64() * (MAP_W - 4) as f64,
        MIN_PATH_MARGIN,
        MAP_W - 1 - MIN_PATH_MARGIN,
    );

    add_horizontal_line(&mut path_tiles, main_y);
    add_vertical_line(&mut path_tiles, main_x);

    // Optional secondary roads offset from the main ones.
    if rng.next_f64() > 0.35 {
        let offset = if rng.next_f64() > 0.5 { 3 } else { -3 };
        let y2 = (main_y + offset).clamp(MIN_PATH_MARGIN, MAP_H - 1 - MIN_PATH_MARGIN);
        add_horizontal_line(&mut path_tiles, y2);
    }

    if rng.next_f64() > 0.35 {
        let offset = if rng.next_f64() > 0.5 { 4 } else { -4 };
        let x2 = (main_x + offset).clamp(MIN_PATH_MARGIN, MAP_W - 1 - MIN_PATH_MARGIN);
        add_vertical_line(&mut path_tiles, x2);
    }

    // Plaza near the road intersection, perturbed by up to 2.5 tiles.
    let plaza_size = 3 + (rng.next_f64() * 3.0).floor() as i64;
    let plaza_center_x = clamp_int(
        main_x as f64 + (rng.next_f64() * 5.0 - 2.5),
        MIN_PATH_MARGIN,
        MAP_W - 1 - MIN_PATH_MARGIN,
    );
    let plaza_center_y = clamp_int(
        main_y as f64 + (rng.next_f64() * 5.0 - 2.5),
        MIN_PATH_MARGIN,
        MAP_H - 1 - MIN_PATH_MARGIN,
    );
    add_rect_tiles(
        &mut plaza_tiles,
        plaza_center_x - plaza_size / 2,
        plaza_center_y - plaza_size / 2,
        plaza_size,
        plaza_size,
    );

    // Sometimes a second, smaller plaza anywhere on the map.
    if rng.next_f64() > 0.55 {
        let second_size = 3 + (rng.next_f64() * 2.0).floor() as i64;
        let second_x = clamp_int(
            rng.next_f64() * (MAP_W - second_size) as f64,
            MIN_MARGIN,
            MAP_W - second_size - MIN_MARGIN,
        );
        let second_y = clamp_int(
            rng.next_f64() * (MAP_H - second_size) as f64,
            MIN_MARGIN,
            MAP_H - second_size - MIN_MARGIN,
        );
        add_rect_tiles(&mut plaza_tiles, second_x, second_y, second_size, second_size);
    }

    // Houses on free grass, more of them in harder districts (lower rank
    // value). Exhausting the attempt budget with fewer houses than targeted
    // is fine.
    let mut houses = IndexSet::new();
    let base_count = 12 - ((rank_value - 1) as f64 / 2.5).floor() as i64;
    let variation = i64::from(seed % 3) - 1;
    let house_count = (base_count + variation).clamp(3, 14) as usize;

    let mut attempts = 0;
    while houses.len() < house_count && attempts < MAX_HOUSE_ATTEMPTS {
        attempts += 1;
        let x = clamp_int(
            MIN_MARGIN as f64 + rng.next_f64() * (MAP_W - 2 * MIN_MARGIN) as f64,
            MIN_MARGIN,
            MAP_W - 1 - MIN_MARGIN,
        );
        let y = clamp_int(
            MIN_MARGIN as f64 + rng.next_f64() * (MAP_H - 2 * MIN_MARGIN) as f64,
            MIN_MARGIN,
            MAP_H - 1 - MIN_MARGIN,
        );
        if path_tiles.contains(&(x, y)) || plaza_tiles.contains(&(x, y)) {
            continue;
        }
        houses.insert((x, y));
    }

    MapConfig { houses, path_tiles, plaza_tiles }
}

/// What a tile is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Path,
    Plaza,
}

/// An HSL color descriptor for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainColor {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for TerrainColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Terrain color for a tile kind at a difficulty rank.
///
/// Hue slides linearly from green at rank 1 to red at rank 25, with up to
/// 10 points of extra darkening along the way.
pub fn terrain_color(rank: Option<i64>, kind: TileKind) -> TerrainColor {
    let rank_value = clamp_rank(rank);
    let t = (rank_value - 1) as f64 / 24.0;
    let hue = 120.0 - 110.0 * t;
    let base = match kind {
        TileKind::Grass => 32,
        TileKind::Path => 52,
        TileKind::Plaza => 62,
    };
    let lightness = (base - (t * 10.0).round() as i64).clamp(18, 70) as u8;
    let saturation = if kind == TileKind::Plaza { 85 } else { 80 };
    TerrainColor { hue, saturation, lightness }
}

/// Banded color for the district picker, by rank.
pub fn rank_color(rank: i64) -> &'static str {
    if rank <= 5 {
        "hsl(0 80% 45%)"
    } else if rank <= 10 {
        "hsl(0 70% 60%)"
    } else if rank <= 15 {
        "hsl(330 70% 70%)"
    } else if rank <= 20 {
        "hsl(90 60% 65%)"
    } else {
        "hsl(120 65% 40%)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACES: [&str; 6] = ["서울", "마포구", "금천구", "송파구", "강남구", "은평구"];

    #[test]
    fn test_generation_is_deterministic() {
        for place in PLACES {
            for rank in [None, Some(1), Some(13), Some(25)] {
                assert_eq!(generate_map(place, rank), generate_map(place, rank));
            }
        }
    }

    #[test]
    fn test_houses_avoid_paths_and_plazas() {
        for place in PLACES {
            let map = generate_map(place, Some(7));
            for house in &map.houses {
                assert!(!map.path_tiles.contains(house), "house on path in {place}");
                assert!(!map.plaza_tiles.contains(house), "house on plaza in {place}");
            }
        }
    }

    #[test]
    fn test_all_tiles_within_bounds() {
        let map = generate_map("관악구", Some(2));
        let all = map
            .houses
            .iter()
            .chain(&map.path_tiles)
            .chain(&map.plaza_tiles);
        for &(x, y) in all {
            assert!((0..MAP_W).contains(&x));
            assert!((0..MAP_H).contains(&y));
        }
    }

    #[test]
    fn test_main_roads_span_the_grid() {
        let map = generate_map("구로구", Some(10));
        // At least one full row and one full column of path tiles.
        let full_row = (0..MAP_H)
            .any(|y| (0..MAP_W).all(|x| map.path_tiles.contains(&(x, y))));
        let full_col = (0..MAP_W)
            .any(|x| (0..MAP_H).all(|y| map.path_tiles.contains(&(x, y))));
        assert!(full_row);
        assert!(full_col);
    }

    #[test]
    fn test_house_count_bounds() {
        for place in PLACES {
            for rank in [1, 8, 15, 25] {
                let map = generate_map(place, Some(rank));
                assert!(map.houses.len() >= 3, "too few houses for {place} rank {rank}");
                assert!(map.houses.len() <= 14);
            }
        }
    }

    #[test]
    fn test_rank_changes_layout_target_not_roads() {
        // Roads and plazas depend only on the place hash; rank only moves
        // the house-count target.
        let easy = generate_map("성동구", Some(25));
        let hard = generate_map("성동구", Some(1));
        assert_eq!(easy.path_tiles, hard.path_tiles);
        assert_eq!(easy.plaza_tiles, hard.plaza_tiles);
        assert!(hard.houses.len() >= easy.houses.len());
    }

    #[test]
    fn test_tile_kind_priority() {
        let mut map = generate_map("중구", Some(12));
        // Force an overlap to check plaza wins over path.
        map.path_tiles.insert((0, 0));
        map.plaza_tiles.insert((0, 0));
        assert_eq!(map.tile_kind(0, 0), TileKind::Plaza);
    }

    #[test]
    fn test_terrain_color_formula() {
        // Rank 1: hue 120, no darkening.
        let grass = terrain_color(Some(1), TileKind::Grass);
        assert_eq!(grass.hue, 120.0);
        assert_eq!(grass.lightness, 32);
        assert_eq!(grass.saturation, 80);

        // Rank 25: hue 10, each base darkened by 10.
        let plaza = terrain_color(Some(25), TileKind::Plaza);
        assert_eq!(plaza.hue, 10.0);
        assert_eq!(plaza.lightness, 52);
        assert_eq!(plaza.saturation, 85);

        // Missing rank defaults to 15.
        assert_eq!(terrain_color(None, TileKind::Path), terrain_color(Some(15), TileKind::Path));
        let mid = terrain_color(Some(15), TileKind::Path);
        assert!((mid.hue - (120.0 - 110.0 * 14.0 / 24.0)).abs() < 1e-9);
        assert_eq!(mid.lightness, 46);
    }

    #[test]
    fn test_lightness_stays_clamped() {
        for rank in 1..=25 {
            for kind in [TileKind::Grass, TileKind::Path, TileKind::Plaza] {
                let c = terrain_color(Some(rank), kind);
                assert!((18..=70).contains(&c.lightness));
            }
        }
    }
}
