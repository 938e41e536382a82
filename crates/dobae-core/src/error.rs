//! Error types for dobae-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("catalog is empty or has no positive draw weight")]
    InvalidCatalog,

    #[error("not enough money: need {needed}, have {have}")]
    InsufficientFunds { needed: i64, have: i64 },

    #[error("unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("weapon already owned: {0}")]
    WeaponOwned(String),

    #[error("previous weapon on the track not owned yet: {0}")]
    WeaponLocked(String),

    #[error("weapon not owned: {0}")]
    WeaponNotOwned(String),

    #[error("storage slots already at maximum")]
    StorageAtMax,

    #[error("no pending job to start")]
    NoPendingJob,

    #[error("a work session is already running")]
    SessionActive,

    #[error("no active work session")]
    NoActiveSession,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
