//! Dobae Save - Save-blob persistence using native_db
//!
//! Provides the durable half of the game:
//! - The versioned JSON save blob and its legacy-format upgrades
//! - A local native_db store keyed per account
//! - The remote mirror port behind the debounced spreadsheet push
//! - A bridge that executes the core's persistence commands

mod bridge;
mod error;
mod mirror;
mod models;
mod store;

pub use bridge::SaveBridge;
pub use error::{Error, Result};
pub use mirror::{MemoryMirror, RemoteMirror};
pub use models::{
    decode_save, encode_save, normalize_remote_save, user_key, SaveData, SAVE_KEY_PREFIX,
};
pub use store::{Store, StoredSave};
