//! Work sessions and pay
//!
//! A job drawn on the map becomes a timed session: the room variant scales
//! the effort (never the reward), total work power sets the duration, and
//! pay is a flat rate per 100 units of the *unadjusted* work amount.
//! Bailing out mid-session costs half the pay.

use crate::rng::GameRng;
use crate::time::Tick;
use serde::{Deserialize, Serialize};

/// Pay per 100 units of base work.
pub const PAY_PER_100_WORK: i64 = 300_000;

/// Condition of the room behind the door, rolled once per job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomVariant {
    /// 20% chance, effort up 30%.
    Dirty,
    /// 60% chance, no change.
    Normal,
    /// 20% chance, effort down 30%.
    Good,
}

impl RoomVariant {
    /// Roll a variant with the 20/60/20 bands.
    pub fn roll(rng: &mut GameRng) -> Self {
        let roll = rng.next_f64();
        if roll < 0.2 {
            RoomVariant::Dirty
        } else if roll < 0.8 {
            RoomVariant::Normal
        } else {
            RoomVariant::Good
        }
    }
}

/// The computed terms of one work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTerms {
    /// Room-adjusted effort, floored to the nearest 100.
    pub adjusted_work: i64,
    pub duration_seconds: i64,
    /// Pay from the unadjusted base amount; the room changes effort, not reward.
    pub pay: i64,
}

/// Room-adjusted work amount, floored to the nearest 100.
pub fn adjusted_work(base: i64, variant: RoomVariant) -> i64 {
    match variant {
        RoomVariant::Dirty => (base as f64 * 1.3 / 100.0).floor() as i64 * 100,
        RoomVariant::Good => (base as f64 * 0.7 / 100.0).floor() as i64 * 100,
        RoomVariant::Normal => base,
    }
}

/// Seconds to finish `adjusted` units at the given total work power.
pub fn duration_seconds(adjusted: i64, total_work_power: f64) -> i64 {
    let power = total_work_power.round().max(1.0);
    ((adjusted as f64 / power).ceil() as i64).max(1)
}

/// Pay for a job of `base` units.
pub fn labor_pay(base: i64) -> i64 {
    base / 100 * PAY_PER_100_WORK
}

/// Penalty for bailing out of a running session.
pub fn bail_penalty(pay: i64) -> i64 {
    pay / 2
}

/// Full session terms for a base work amount.
pub fn compute_work_session(base: i64, total_work_power: f64, variant: RoomVariant) -> WorkTerms {
    let adjusted = adjusted_work(base, variant);
    WorkTerms {
        adjusted_work: adjusted,
        duration_seconds: duration_seconds(adjusted, total_work_power),
        pay: labor_pay(base),
    }
}

/// Draw a job size from an area's range, floored to the nearest 100.
pub fn draw_work_amount(rng: &mut GameRng, minimum: i64, maximum: i64) -> i64 {
    let (lo, hi) = if minimum <= maximum { (minimum, maximum) } else { (maximum, minimum) };
    rng.range_i64(lo, hi) / 100 * 100
}

/// Sum of character work power scaled by the equipped weapon, at least 1.
pub fn effective_work_power(total: f64, weapon_multiplier: f64) -> f64 {
    (total * weapon_multiplier).round().max(1.0)
}

/// Lifecycle of a session. A pending job has its room rolled but no timer;
/// a running one has a completion scheduled against its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Pending,
    Running,
    Done,
}

/// Identifier for one session; stale scheduled completions carry an old id
/// and are dropped.
pub type SessionId = u64;

/// One job at a house, from the door opening to payout or bail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: SessionId,
    pub place: String,
    pub base_work: i64,
    pub variant: RoomVariant,
    pub terms: WorkTerms,
    pub phase: SessionPhase,
    /// Tick the session started running, if it has.
    pub started_tick: Option<Tick>,
}

impl WorkSession {
    /// Seconds left at `tick`, for progress display. Zero once done.
    pub fn seconds_left(&self, tick: Tick) -> i64 {
        match (self.phase, self.started_tick) {
            (SessionPhase::Running, Some(started)) => {
                let elapsed = (tick.saturating_sub(started) / crate::time::TICKS_PER_SECOND) as i64;
                (self.terms.duration_seconds - elapsed).max(0)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_room_vectors() {
        let terms = compute_work_session(1000, 50.0, RoomVariant::Normal);
        assert_eq!(terms.adjusted_work, 1000);
        assert_eq!(terms.duration_seconds, 20);
        assert_eq!(terms.pay, 3_000_000);
    }

    #[test]
    fn test_dirty_room_vectors() {
        let terms = compute_work_session(1000, 50.0, RoomVariant::Dirty);
        assert_eq!(terms.adjusted_work, 1300);
        assert_eq!(terms.duration_seconds, 26);
        // Pay still comes from the unadjusted base.
        assert_eq!(terms.pay, 3_000_000);
    }

    #[test]
    fn test_good_room_rounds_down() {
        // 1050 * 0.7 = 735 -> floored to 700.
        assert_eq!(adjusted_work(1050, RoomVariant::Good), 700);
        assert_eq!(adjusted_work(1000, RoomVariant::Good), 700);
    }

    #[test]
    fn test_duration_floors() {
        // Zero or tiny power still takes finite time.
        assert_eq!(duration_seconds(500, 0.0), 500);
        assert_eq!(duration_seconds(0, 50.0), 1);
        // Power is rounded before dividing.
        assert_eq!(duration_seconds(100, 49.6), 2);
    }

    #[test]
    fn test_bail_penalty_is_half_pay() {
        assert_eq!(bail_penalty(labor_pay(1000)), 1_500_000);
        assert_eq!(bail_penalty(labor_pay(150)), 150_000);
    }

    #[test]
    fn test_room_variant_bands() {
        let mut rng = GameRng::new(2024);
        let mut counts = [0u32; 3];
        for _ in 0..30_000 {
            match RoomVariant::roll(&mut rng) {
                RoomVariant::Dirty => counts[0] += 1,
                RoomVariant::Normal => counts[1] += 1,
                RoomVariant::Good => counts[2] += 1,
            }
        }
        let share = |n: u32| f64::from(n) / 30_000.0;
        assert!((0.17..0.23).contains(&share(counts[0])));
        assert!((0.57..0.63).contains(&share(counts[1])));
        assert!((0.17..0.23).contains(&share(counts[2])));
    }

    #[test]
    fn test_draw_work_amount_snaps_to_100() {
        let mut rng = GameRng::new(5);
        for _ in 0..200 {
            let amount = draw_work_amount(&mut rng, 1_000, 2_000);
            assert_eq!(amount % 100, 0);
            assert!((1_000..=2_000).contains(&amount));
        }
    }

    #[test]
    fn test_effective_work_power() {
        assert_eq!(effective_work_power(30.0, 1.5), 45.0);
        assert_eq!(effective_work_power(0.0, 2.0), 1.0);
        assert_eq!(effective_work_power(33.4, 1.0), 33.0);
    }

    #[test]
    fn test_seconds_left() {
        let session = WorkSession {
            id: 1,
            place: "서울".to_string(),
            base_work: 1000,
            variant: RoomVariant::Normal,
            terms: compute_work_session(1000, 50.0, RoomVariant::Normal),
            phase: SessionPhase::Running,
            started_tick: Some(100),
        };
        assert_eq!(session.seconds_left(100), 20);
        assert_eq!(session.seconds_left(100 + 5 * crate::time::TICKS_PER_SECOND), 15);
        assert_eq!(session.seconds_left(100 + 60 * crate::time::TICKS_PER_SECOND), 0);
    }
}
