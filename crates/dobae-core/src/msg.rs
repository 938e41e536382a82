//! Messages driving the update function

use crate::player::PlayerState;
use crate::work::SessionId;
use dobae_catalog::SheetData;
use serde::{Deserialize, Serialize};

/// Everything that can happen to the game, user input and internal
/// timers alike. The runtime feeds these to [`crate::runtime::Runtime`]
/// one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    /// Heartbeat, delivered once per runtime tick.
    Tick,

    /// The bulk sheet fetch came back.
    CatalogLoaded(SheetData),

    /// A previously written save blob was read back at startup.
    SaveLoaded(PlayerState),

    /// The player pressed the gacha button.
    PullRequested,

    /// The player bought one more storage slot.
    UnlockSlot,

    /// The player bought the named weapon off the track.
    BuyWeapon(String),

    /// The player equipped an already-owned weapon.
    EquipWeapon(String),

    /// The player knocked on a house door in the named district.
    EnterHouse { place: String },

    /// The player accepted the pending job.
    StartWork,

    /// The player bailed out of the current job.
    AbortWork,

    /// A scheduled completion fired. Ignored unless the id still matches
    /// the live session.
    WorkFinished { session: SessionId },

    /// The debounced remote mirror fired. Ignored unless the generation
    /// still matches the latest change.
    FlushRemote { generation: u64 },
}
