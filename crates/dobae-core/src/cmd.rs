//! Commands (side effects) produced by the update function
//!
//! The core never touches storage or the network itself; it hands these to
//! the shell. `Schedule` entries are absorbed by the runtime's own
//! scheduler, persistence commands go to the save bridge, and `Log` lines
//! go wherever the host wants them.

use crate::msg::Msg;
use crate::player::PlayerState;
use serde::{Deserialize, Serialize};

/// A command to be executed outside the update function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Cmd>),

    /// Deliver a message after a tick delay
    Schedule { msg: Msg, delay_ticks: u64 },

    /// Write the save blob to local storage, immediately
    PersistLocal(PlayerState),

    /// Mirror the save blob to the remote proxy (fire-and-forget)
    PushRemote(PlayerState),

    /// Log a message
    Log { level: LogLevel, message: String },
}

/// Log level for log commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Cmd {
    /// Create an empty command
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch of commands, flattening nested batches and dropping None
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.is_empty() {
            Cmd::None
        } else if flattened.len() == 1 {
            flattened.into_iter().next().unwrap()
        } else {
            Cmd::Batch(flattened)
        }
    }

    /// Create a schedule command
    pub fn schedule(msg: Msg, delay_ticks: u64) -> Self {
        Cmd::Schedule { msg, delay_ticks }
    }

    /// Create a log command
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Cmd::Log { level, message: message.into() }
    }

    /// Create an info log command
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Check if this is a None command
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Iterate the leaf commands, flattening batches.
    pub fn leaves(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(inner) => inner.into_iter().flat_map(Cmd::leaves).collect(),
            other => vec![other],
        }
    }
}
