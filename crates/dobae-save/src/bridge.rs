//! Command execution against the local store and the remote mirror.
//!
//! The game core emits [`Cmd`] values instead of doing IO. The bridge is
//! the host-side half: it writes `PersistLocal` blobs to the native_db
//! store, forwards `PushRemote` blobs to the mirror, and hands `Log` lines
//! back to the caller.

use crate::error::Result;
use crate::mirror::RemoteMirror;
use crate::models::SaveData;
use crate::store::Store;
use dobae_core::{Cmd, LogLevel, PlayerState};

/// Executes persistence commands for one storage key.
pub struct SaveBridge<M: RemoteMirror> {
    store: Store,
    mirror: M,
    key: String,
}

impl<M: RemoteMirror> SaveBridge<M> {
    pub fn new(store: Store, mirror: M, key: impl Into<String>) -> Self {
        Self { store, mirror, key: key.into() }
    }

    /// Read the locally stored player state, if any.
    pub fn load(&self) -> Result<Option<PlayerState>> {
        Ok(self.store.read_save(&self.key)?.map(SaveData::into_player))
    }

    /// Execute a command batch, returning any log lines it carried.
    ///
    /// A mirror failure aborts the rest of the batch; the local write has
    /// already landed by then, so nothing is lost and the next debounced
    /// flush retries with fresher data anyway.
    pub fn execute(&mut self, cmd: Cmd) -> Result<Vec<(LogLevel, String)>> {
        let mut logs = Vec::new();
        for leaf in cmd.leaves() {
            match leaf {
                Cmd::PersistLocal(player) => {
                    self.store.write_save(&self.key, &SaveData::from_player(&player))?;
                }
                Cmd::PushRemote(player) => {
                    self.mirror.push(&self.key, &SaveData::from_player(&player))?;
                }
                Cmd::Log { level, message } => logs.push((level, message)),
                // Schedule leaves stay inside the runtime; anything else
                // carries no side effect here.
                _ => {}
            }
        }
        Ok(logs)
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MemoryMirror;
    use crate::models::user_key;
    use dobae_core::{Model, Msg, Runtime, SAVE_DEBOUNCE_TICKS};

    fn bridge() -> SaveBridge<MemoryMirror> {
        SaveBridge::new(Store::in_memory().unwrap(), MemoryMirror::new(), user_key(Some("kim")))
    }

    #[test]
    fn test_persist_local_lands_in_store() {
        let mut bridge = bridge();
        let player = PlayerState { money: 777, ..Default::default() };

        bridge.execute(Cmd::PersistLocal(player.clone())).unwrap();
        assert_eq!(bridge.load().unwrap(), Some(player));
    }

    #[test]
    fn test_push_remote_lands_in_mirror() {
        let mut bridge = bridge();
        let player = PlayerState { money: 5, ..Default::default() };

        bridge.execute(Cmd::PushRemote(player)).unwrap();
        assert_eq!(bridge.mirror().last(&user_key(Some("kim"))).unwrap().money, 5);
    }

    #[test]
    fn test_logs_are_returned_not_executed() {
        let mut bridge = bridge();
        let logs = bridge
            .execute(Cmd::batch(vec![
                Cmd::log(LogLevel::Info, "a"),
                Cmd::log(LogLevel::Warn, "b"),
            ]))
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].0, LogLevel::Warn);
    }

    // End-to-end: a pull writes locally at once and reaches the mirror only
    // after the debounce window.
    #[test]
    fn test_full_save_pipeline() {
        let mut bridge = bridge();
        let mut model = Model::with_seed(3);
        let mut runtime = Runtime::new();
        model.player.money = 30_000_000;

        let cmd = runtime.dispatch(&mut model, Msg::PullRequested).unwrap();
        bridge.execute(cmd).unwrap();

        let local = bridge.load().unwrap().unwrap();
        assert_eq!(local.money, model.player.money);
        assert_eq!(local.owned.len(), 1);
        assert_eq!(bridge.mirror().push_count(), 0);

        for _ in 0..SAVE_DEBOUNCE_TICKS + 1 {
            let cmd = runtime.tick(&mut model);
            bridge.execute(cmd).unwrap();
        }
        assert_eq!(bridge.mirror().push_count(), 1);
        assert_eq!(
            bridge.mirror().last(&user_key(Some("kim"))).unwrap().money,
            model.player.money
        );
    }
}
