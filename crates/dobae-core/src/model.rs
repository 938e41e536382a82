//! The game model: catalog, player, clock and RNG in one value.

use crate::gacha::OwnedCharacter;
use crate::player::{weapon_multiplier, PlayerState};
use crate::rng::GameRng;
use crate::time::Clock;
use crate::work::{effective_work_power, SessionId, WorkSession};
use dobae_catalog::{
    build_pool, default_areas, AccountRow, AreaRow, CharacterDef, SaveRow, SheetData, WeaponRow,
    WorkerRow,
};
use serde::{Deserialize, Serialize};

/// Ticks the remote mirror waits after the latest change (400 ms).
pub const SAVE_DEBOUNCE_TICKS: u64 = 4;

/// Work-amount range used for districts missing from the area table.
pub const FALLBACK_WORK_RANGE: (i64, i64) = (100, 200);

/// The in-memory catalog, rebuilt from each bulk fetch. Starts from the
/// built-in defaults so the game is playable before (or without) a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub pool: Vec<CharacterDef>,
    pub weapons: Vec<WeaponRow>,
    pub areas: Vec<AreaRow>,
    pub accounts: Vec<AccountRow>,
    pub saves: Vec<SaveRow>,
    pub workers: Vec<WorkerRow>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            pool: dobae_catalog::default_pool(),
            weapons: Vec::new(),
            areas: default_areas(),
            accounts: Vec::new(),
            saves: Vec::new(),
            workers: Vec::new(),
        }
    }
}

impl Catalog {
    /// Replace the catalog with a fresh fetch. Rows with blank key cells are
    /// dropped; an empty area sheet falls back to the built-in table.
    pub fn apply_sheet(&mut self, data: &SheetData) {
        self.weapons = data
            .weapon
            .iter()
            .filter(|row| !row.weapon_name.trim().is_empty())
            .cloned()
            .collect();

        let areas: Vec<AreaRow> = data
            .area
            .iter()
            .filter(|row| !row.area.trim().is_empty())
            .cloned()
            .collect();
        self.areas = if areas.is_empty() { default_areas() } else { areas };

        self.pool = build_pool(&data.worker);
        self.workers = data.worker.clone();
        self.accounts = data.account.clone();
        self.saves = data.save.clone();
    }

    /// Look up a district by name.
    pub fn area(&self, place: &str) -> Option<&AreaRow> {
        self.areas.iter().find(|row| row.area == place)
    }

    /// Work-amount range for a district, with the fallback for unknown names.
    pub fn work_range(&self, place: &str) -> (i64, i64) {
        self.area(place)
            .map(|row| (row.minimum, row.maximum))
            .unwrap_or(FALLBACK_WORK_RANGE)
    }

    /// Difficulty rank for a district, if it is in the table.
    pub fn place_rank(&self, place: &str) -> Option<i64> {
        self.area(place).map(|row| row.rank)
    }

    /// Leaderboard standings over the fetched account and save rows.
    pub fn standings(&self) -> Vec<crate::board::RankRow> {
        crate::board::standings(&self.accounts, &self.saves, &self.weapons, &self.workers)
    }
}

/// Complete game state. The player portion is what gets persisted; the rest
/// is session-local.
#[derive(Debug, Clone)]
pub struct Model {
    pub player: PlayerState,
    pub catalog: Catalog,
    pub time: Clock,
    pub rng: GameRng,
    /// The job in progress (or pending, or just finished) at a house.
    pub session: Option<WorkSession>,
    /// The most recent pull, for the reveal screen.
    pub last_pull: Option<OwnedCharacter>,
    save_generation: u64,
    next_session_id: SessionId,
    pull_seq: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            player: PlayerState::default(),
            catalog: Catalog::default(),
            time: Clock::new(),
            rng: GameRng::default(),
            session: None,
            last_pull: None,
            save_generation: 0,
            next_session_id: 0,
            pull_seq: 0,
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with a fixed RNG seed and clock anchor, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: GameRng::new(seed), ..Self::default() }
    }

    /// Work power applied to jobs: the crew total scaled by the equipped
    /// weapon, never below 1.
    pub fn effective_power(&self) -> f64 {
        effective_work_power(
            self.player.total_work_power(),
            weapon_multiplier(&self.catalog.weapons, &self.player.weapons),
        )
    }

    /// The generation of the latest persisted-state change.
    pub fn save_generation(&self) -> u64 {
        self.save_generation
    }

    /// Record a persisted-state change, invalidating any pending remote flush.
    pub(crate) fn bump_save_generation(&mut self) -> u64 {
        self.save_generation += 1;
        self.save_generation
    }

    pub(crate) fn next_session_id(&mut self) -> SessionId {
        self.next_session_id += 1;
        self.next_session_id
    }

    /// A uid for a fresh pull, unique within the run.
    pub(crate) fn make_uid(&mut self) -> String {
        self.pull_seq += 1;
        format!("{}-{}", self.time.now_ms(), self.pull_seq)
    }
}
