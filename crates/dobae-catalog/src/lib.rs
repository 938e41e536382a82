//! Dobae Catalog - typed spreadsheet rows and gacha pool building
//!
//! The game's configuration lives in a spreadsheet behind an HTTP proxy.
//! This crate owns the typed row shapes, the lenient payload parser, grade
//! and probability normalization, and the built-in fallback catalogs used
//! when the proxy is unreachable. Everything here is pure and synchronous;
//! the transport that produces the JSON payload stays outside.

mod pool;
mod rarity;
mod rows;

pub use pool::{build_pool, default_areas, default_pool, normalize_probability, CharacterDef};
pub use rarity::{normalize_grade, Rarity};
pub use rows::{AccountRow, AreaRow, SaveRow, SheetData, WeaponRow, WorkerRow};
