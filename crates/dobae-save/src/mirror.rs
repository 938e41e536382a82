//! Remote mirror port.
//!
//! The spreadsheet proxy is the shared backing store behind the
//! leaderboard; pushes to it are fire-and-forget from the game's point of
//! view. The trait keeps the transport out of this crate: hosts plug in an
//! HTTP client, tests use [`MemoryMirror`].

use crate::error::Result;
use crate::models::SaveData;
use std::collections::HashMap;

/// Destination for debounced remote save pushes.
pub trait RemoteMirror {
    /// Push the latest blob for a storage key.
    fn push(&mut self, key: &str, data: &SaveData) -> Result<()>;
}

/// In-memory mirror keeping the last pushed blob per key.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    saved: HashMap<String, SaveData>,
    push_count: usize,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last blob pushed for a key.
    pub fn last(&self, key: &str) -> Option<&SaveData> {
        self.saved.get(key)
    }

    /// Total pushes across all keys, for debounce assertions.
    pub fn push_count(&self) -> usize {
        self.push_count
    }
}

impl RemoteMirror for MemoryMirror {
    fn push(&mut self, key: &str, data: &SaveData) -> Result<()> {
        self.saved.insert(key.to_string(), data.clone());
        self.push_count += 1;
        Ok(())
    }
}
