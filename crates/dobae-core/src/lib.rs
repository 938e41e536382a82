//! Dobae Core - Deterministic game core for the wallpaper-foreman idle game
//!
//! This crate provides the rules and the Elm-style runtime:
//! - Seeded procedural town maps, one per district
//! - Weighted gacha draws over the character catalog
//! - Timed work sessions with room variants, payout and bail penalty
//! - The linear weapon upgrade track and storage-slot economy
//! - Leaderboard standings over fetched account rows
//!
//! All randomness flows through one xorshift64 state and all timing is
//! tick-based, so every behavior is reproducible under test. Side effects
//! (persistence, network, logging) leave the core as [`Cmd`] values for the
//! host to execute.

pub mod board;
mod cmd;
mod error;
pub mod gacha;
pub mod map;
mod model;
mod msg;
pub mod player;
mod rng;
pub mod runtime;
pub mod time;
pub mod work;

pub use cmd::{Cmd, LogLevel};
pub use error::{Error, Result};
pub use gacha::{OwnedCharacter, PULL_COST};
pub use map::{generate_map, rank_color, terrain_color, MapConfig, TerrainColor, TileKind};
pub use model::{Catalog, Model, FALLBACK_WORK_RANGE, SAVE_DEBOUNCE_TICKS};
pub use msg::Msg;
pub use player::{PlayerState, WeaponState, MAX_SLOTS, MIN_SLOTS, SLOT_UNLOCK_COST};
pub use rng::{seed_from_name, GameRng};
pub use runtime::Runtime;
pub use time::{Clock, Tick, TICKS_PER_SECOND, TICK_MS};
pub use work::{SessionId, SessionPhase, WorkSession, WorkTerms};
