//! Message-driven runtime
//!
//! Owns the message queue and the scheduled-delivery list. User input goes
//! through [`Runtime::dispatch`], which can reject with a domain error; the
//! host calls [`Runtime::tick`] every 100 ms, which releases due scheduled
//! messages (work completions, the debounced remote flush) and never fails.

use crate::cmd::{Cmd, LogLevel};
use crate::error::{Error, Result};
use crate::gacha::{insert_owned, pick_weighted, resync_owned, to_owned_character, PULL_COST};
use crate::model::{Model, SAVE_DEBOUNCE_TICKS};
use crate::msg::Msg;
use crate::player::{buy_weapon, equip_weapon, MAX_SLOTS, MIN_SLOTS};
use crate::time::{Clock, Tick};
use crate::work::{
    bail_penalty, compute_work_session, draw_work_amount, RoomVariant, SessionPhase, WorkSession,
};
use std::collections::VecDeque;

/// The main runtime that processes messages and updates the model.
pub struct Runtime {
    /// Pending messages to process
    message_queue: VecDeque<Msg>,
    /// Scheduled messages (tick, msg)
    scheduled: Vec<(Tick, Msg)>,
}

impl Runtime {
    /// Create a new runtime
    pub fn new() -> Self {
        Self { message_queue: VecDeque::new(), scheduled: Vec::new() }
    }

    /// Queue a message for processing
    pub fn send(&mut self, msg: Msg) {
        self.message_queue.push_back(msg);
    }

    /// Schedule a message for a future tick
    pub fn schedule(&mut self, msg: Msg, delay_ticks: u64, current_tick: Tick) {
        self.scheduled.push((current_tick + delay_ticks, msg));
        self.scheduled.sort_by_key(|(tick, _)| *tick);
    }

    /// Process one user action immediately.
    ///
    /// Domain rejections (insufficient funds, locked weapon, ...) come back
    /// as errors with the model untouched.
    pub fn dispatch(&mut self, model: &mut Model, msg: Msg) -> Result<Cmd> {
        let cmd = self.update(model, msg)?;
        Ok(self.absorb_schedules(cmd, model.time.tick))
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, model: &mut Model) -> Cmd {
        model.time.advance();
        let current_tick = model.time.tick;

        // Move scheduled messages that are due to the queue
        let due: Vec<Msg> = self
            .scheduled
            .iter()
            .filter(|(tick, _)| *tick <= current_tick)
            .map(|(_, msg)| msg.clone())
            .collect();
        self.scheduled.retain(|(tick, _)| *tick > current_tick);

        for msg in due {
            self.message_queue.push_back(msg);
        }

        self.send(Msg::Tick);
        self.process_queue(model)
    }

    /// Process all messages in the queue. Scheduled messages cannot be
    /// rejected by the user, so errors here only become log commands.
    fn process_queue(&mut self, model: &mut Model) -> Cmd {
        let mut cmds = Vec::new();
        while let Some(msg) = self.message_queue.pop_front() {
            match self.update(model, msg) {
                Ok(cmd) => cmds.push(self.absorb_schedules(cmd, model.time.tick)),
                Err(err) => cmds.push(Cmd::log(LogLevel::Error, format!("update failed: {err}"))),
            }
        }
        Cmd::batch(cmds)
    }

    /// Move `Schedule` leaves into the scheduler, returning the rest for the
    /// host to execute.
    fn absorb_schedules(&mut self, cmd: Cmd, current_tick: Tick) -> Cmd {
        let mut rest = Vec::new();
        for leaf in cmd.leaves() {
            match leaf {
                Cmd::Schedule { msg, delay_ticks } => self.schedule(msg, delay_ticks, current_tick),
                other => rest.push(other),
            }
        }
        Cmd::batch(rest)
    }

    /// Process a single message
    fn update(&mut self, model: &mut Model, msg: Msg) -> Result<Cmd> {
        match msg {
            Msg::Tick => Ok(Cmd::none()),

            Msg::CatalogLoaded(data) => {
                let had_workers = !data.worker.is_empty();
                model.catalog.apply_sheet(&data);

                if had_workers {
                    resync_owned(&mut model.player.owned, &model.catalog.workers);
                    Ok(Cmd::batch(vec![
                        Cmd::info(format!(
                            "catalog refreshed: {} characters, {} areas",
                            model.catalog.pool.len(),
                            model.catalog.areas.len()
                        )),
                        persist(model),
                    ]))
                } else {
                    Ok(Cmd::info("catalog refreshed without worker rows, pool unchanged"))
                }
            }

            Msg::SaveLoaded(mut player) => {
                player.storage_slots = player.storage_slots.clamp(MIN_SLOTS, MAX_SLOTS);
                player.owned.truncate(player.storage_slots as usize);
                model.player = player;
                // Write the normalized state straight back so local and
                // remote copies agree with what is actually in memory.
                Ok(persist(model))
            }

            Msg::PullRequested => {
                // Funds are checked before the draw so a rejected pull never
                // advances the RNG, and the draw runs before the charge so a
                // broken catalog never costs money.
                if model.player.money < PULL_COST {
                    return Err(Error::InsufficientFunds {
                        needed: PULL_COST,
                        have: model.player.money,
                    });
                }
                let def = pick_weighted(&mut model.rng, &model.catalog.pool)?.clone();
                model.player.spend(PULL_COST)?;

                let uid = model.make_uid();
                let character = to_owned_character(&def, uid, model.time.now_ms());
                let slots = model.player.storage_slots as usize;
                insert_owned(&mut model.player.owned, character.clone(), slots);

                let cmd = Cmd::batch(vec![
                    Cmd::info(format!("pulled {} ({})", character.name, character.rarity)),
                    persist(model),
                ]);
                model.last_pull = Some(character);
                Ok(cmd)
            }

            Msg::UnlockSlot => {
                model.player.unlock_slot()?;
                Ok(persist(model))
            }

            Msg::BuyWeapon(name) => {
                buy_weapon(&mut model.player, &model.catalog.weapons, &name)?;
                Ok(Cmd::batch(vec![Cmd::info(format!("bought weapon {name}")), persist(model)]))
            }

            Msg::EquipWeapon(name) => {
                equip_weapon(&mut model.player, &name)?;
                Ok(persist(model))
            }

            Msg::EnterHouse { place } => {
                if matches!(&model.session, Some(s) if s.phase == SessionPhase::Running) {
                    return Err(Error::SessionActive);
                }
                let (minimum, maximum) = model.catalog.work_range(&place);
                let base_work = draw_work_amount(&mut model.rng, minimum, maximum);
                let variant = RoomVariant::roll(&mut model.rng);
                let terms = compute_work_session(base_work, model.effective_power(), variant);
                let id = model.next_session_id();

                model.session = Some(WorkSession {
                    id,
                    place,
                    base_work,
                    variant,
                    terms,
                    phase: SessionPhase::Pending,
                    started_tick: None,
                });
                Ok(Cmd::none())
            }

            Msg::StartWork => {
                let power = model.effective_power();
                let tick = model.time.tick;
                let session = match &mut model.session {
                    Some(s) if s.phase == SessionPhase::Pending => s,
                    _ => return Err(Error::NoPendingJob),
                };
                // The crew may have changed since the door was knocked on,
                // so the duration is re-priced at the moment work starts.
                session.terms = compute_work_session(session.base_work, power, session.variant);
                session.phase = SessionPhase::Running;
                session.started_tick = Some(tick);

                Ok(Cmd::schedule(
                    Msg::WorkFinished { session: session.id },
                    Clock::ticks_for_seconds(session.terms.duration_seconds),
                ))
            }

            Msg::AbortWork => {
                let session = match model.session.take() {
                    Some(s) if s.phase != SessionPhase::Done => s,
                    other => {
                        model.session = other;
                        return Err(Error::NoActiveSession);
                    }
                };
                let penalty = bail_penalty(session.terms.pay);
                // Bailing can push the balance negative.
                model.player.money -= penalty;

                Ok(Cmd::batch(vec![
                    Cmd::log(
                        LogLevel::Warn,
                        format!("bailed out of {} job, penalty {penalty}", session.place),
                    ),
                    persist(model),
                ]))
            }

            Msg::WorkFinished { session: id } => {
                let session = match &mut model.session {
                    Some(s) if s.id == id && s.phase == SessionPhase::Running => s,
                    // Aborted or replaced since it was scheduled.
                    _ => return Ok(Cmd::none()),
                };
                session.phase = SessionPhase::Done;
                let pay = session.terms.pay;
                let place = session.place.clone();
                model.player.money += pay;

                Ok(Cmd::batch(vec![
                    Cmd::info(format!("finished {place} job, paid {pay}")),
                    persist(model),
                ]))
            }

            Msg::FlushRemote { generation } => {
                if generation == model.save_generation() {
                    Ok(Cmd::PushRemote(model.player.clone()))
                } else {
                    // A newer change rescheduled the flush.
                    Ok(Cmd::none())
                }
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands for one persisted-state change: write locally right away and
/// schedule the debounced remote flush against a fresh generation.
fn persist(model: &mut Model) -> Cmd {
    let generation = model.bump_save_generation();
    Cmd::batch(vec![
        Cmd::PersistLocal(model.player.clone()),
        Cmd::schedule(Msg::FlushRemote { generation }, SAVE_DEBOUNCE_TICKS),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::OwnedCharacter;
    use dobae_catalog::Rarity;

    fn crew_member(power: f64) -> OwnedCharacter {
        OwnedCharacter {
            uid: "u1".to_string(),
            def_id: "d1".to_string(),
            name: "이점순".to_string(),
            rarity: Rarity::Mythic,
            work_power: power,
            obtained_at: 0,
        }
    }

    fn push_remotes(cmd: &Cmd) -> usize {
        cmd.clone().leaves().iter().filter(|c| matches!(c, Cmd::PushRemote(_))).count()
    }

    #[test]
    fn test_pull_charges_and_collects() {
        let mut model = Model::with_seed(7);
        let mut runtime = Runtime::new();
        model.player.money = 25_000_000;

        let cmd = runtime.dispatch(&mut model, Msg::PullRequested).unwrap();
        assert_eq!(model.player.money, 15_000_000);
        assert_eq!(model.player.owned.len(), 1);
        assert!(model.last_pull.is_some());
        assert!(cmd.leaves().iter().any(|c| matches!(c, Cmd::PersistLocal(_))));
    }

    #[test]
    fn test_rejected_pull_leaves_rng_untouched() {
        let mut model = Model::with_seed(7);
        let mut runtime = Runtime::new();
        model.player.money = 0;

        let state_before = model.rng.state();
        assert!(matches!(
            runtime.dispatch(&mut model, Msg::PullRequested),
            Err(Error::InsufficientFunds { .. })
        ));
        assert_eq!(model.rng.state(), state_before);
        assert!(model.player.owned.is_empty());
    }

    #[test]
    fn test_remote_flush_is_debounced_to_latest_change() {
        let mut model = Model::with_seed(7);
        let mut runtime = Runtime::new();
        model.player.money = 30_000_000;

        // Two changes inside the debounce window.
        runtime.dispatch(&mut model, Msg::PullRequested).unwrap();
        runtime.dispatch(&mut model, Msg::PullRequested).unwrap();

        let mut flushes = 0;
        for _ in 0..SAVE_DEBOUNCE_TICKS + 2 {
            flushes += push_remotes(&runtime.tick(&mut model));
        }
        // The first generation went stale; only the latest one flushed.
        assert_eq!(flushes, 1);
    }

    #[test]
    fn test_stale_flush_generation_is_dropped() {
        let mut model = Model::with_seed(7);
        let mut runtime = Runtime::new();
        model.player.money = 30_000_000;
        runtime.dispatch(&mut model, Msg::PullRequested).unwrap();

        let stale = model.save_generation();
        runtime.dispatch(&mut model, Msg::PullRequested).unwrap();

        let cmd = runtime.dispatch(&mut model, Msg::FlushRemote { generation: stale }).unwrap();
        assert_eq!(push_remotes(&cmd), 0);

        let current = model.save_generation();
        let cmd = runtime.dispatch(&mut model, Msg::FlushRemote { generation: current }).unwrap();
        assert_eq!(push_remotes(&cmd), 1);
    }

    #[test]
    fn test_work_session_pays_out_on_completion() {
        let mut model = Model::with_seed(11);
        let mut runtime = Runtime::new();
        model.player.owned.push(crew_member(50.0));

        runtime.dispatch(&mut model, Msg::EnterHouse { place: "마포구".to_string() }).unwrap();
        let terms = model.session.as_ref().unwrap().terms;
        runtime.dispatch(&mut model, Msg::StartWork).unwrap();
        assert_eq!(model.session.as_ref().unwrap().phase, SessionPhase::Running);

        for _ in 0..Clock::ticks_for_seconds(terms.duration_seconds) + 1 {
            runtime.tick(&mut model);
        }
        assert_eq!(model.session.as_ref().unwrap().phase, SessionPhase::Done);
        assert_eq!(model.player.money, terms.pay);
    }

    #[test]
    fn test_abort_charges_penalty_and_cancels_completion() {
        let mut model = Model::with_seed(11);
        let mut runtime = Runtime::new();
        model.player.owned.push(crew_member(50.0));

        runtime.dispatch(&mut model, Msg::EnterHouse { place: "마포구".to_string() }).unwrap();
        let terms = model.session.as_ref().unwrap().terms;
        runtime.dispatch(&mut model, Msg::StartWork).unwrap();
        runtime.dispatch(&mut model, Msg::AbortWork).unwrap();

        assert_eq!(model.player.money, -bail_penalty(terms.pay));
        assert!(model.session.is_none());

        // The scheduled completion fires against a dead session id.
        for _ in 0..Clock::ticks_for_seconds(terms.duration_seconds) + 1 {
            runtime.tick(&mut model);
        }
        assert_eq!(model.player.money, -bail_penalty(terms.pay));
    }

    #[test]
    fn test_running_session_blocks_new_jobs() {
        let mut model = Model::with_seed(11);
        let mut runtime = Runtime::new();
        model.player.owned.push(crew_member(50.0));

        runtime.dispatch(&mut model, Msg::EnterHouse { place: "마포구".to_string() }).unwrap();
        runtime.dispatch(&mut model, Msg::StartWork).unwrap();

        assert_eq!(
            runtime.dispatch(&mut model, Msg::EnterHouse { place: "송파구".to_string() }),
            Err(Error::SessionActive)
        );
        assert_eq!(runtime.dispatch(&mut model, Msg::StartWork), Err(Error::NoPendingJob));
    }

    #[test]
    fn test_pending_job_can_be_replaced() {
        let mut model = Model::with_seed(11);
        let mut runtime = Runtime::new();
        model.player.owned.push(crew_member(50.0));

        runtime.dispatch(&mut model, Msg::EnterHouse { place: "마포구".to_string() }).unwrap();
        let first = model.session.as_ref().unwrap().id;
        runtime.dispatch(&mut model, Msg::EnterHouse { place: "송파구".to_string() }).unwrap();

        let session = model.session.as_ref().unwrap();
        assert_ne!(session.id, first);
        assert_eq!(session.place, "송파구");
    }

    #[test]
    fn test_save_loaded_clamps_slots() {
        let mut model = Model::with_seed(1);
        let mut runtime = Runtime::new();

        let mut player = crate::player::PlayerState { storage_slots: 9, ..Default::default() };
        player.owned = (0..5).map(|_| crew_member(10.0)).collect();

        runtime.dispatch(&mut model, Msg::SaveLoaded(player)).unwrap();
        assert_eq!(model.player.storage_slots, MAX_SLOTS);
        assert_eq!(model.player.owned.len(), MAX_SLOTS as usize);
    }

    #[test]
    fn test_catalog_without_workers_keeps_pool() {
        let mut model = Model::with_seed(1);
        let mut runtime = Runtime::new();
        let pool_before = model.catalog.pool.clone();

        runtime
            .dispatch(&mut model, Msg::CatalogLoaded(dobae_catalog::SheetData::default()))
            .unwrap();
        assert_eq!(model.catalog.pool, pool_before);
    }
}
