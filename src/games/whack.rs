//! Whack-a-mole against a countdown
//!
//! One mole at a time. It hides after a random lifetime and another pops up at
//! once; a hit scores, flags the hole as whacked briefly, and the next mole
//! follows after a short respawn delay.

use serde::Serialize;

use super::{Action, Game, GameKind, Outcome, Snapshot};
use crate::error::StoreError;
use crate::persistence::{ScoreStore, Scoreboard};
use crate::records::WhackRecord;
use crate::settings::WhackParams;
use crate::sim::{Cadence, GameRng, Lifecycle, Scheduler, StateMachine, TimerHandle, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mole {
    pub hole: usize,
    /// Session time at which it hides
    pub active_until_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WhackTimer {
    /// Countdown, once per second
    Clock,
    MoleExpire,
    Respawn,
    WhackedFade,
}

#[derive(Debug)]
struct WhackSession {
    score: u32,
    time_left: u32,
    hits: u32,
    mole: Option<Mole>,
    mole_timer: Option<TimerHandle>,
    /// Hole showing the whacked flash
    whacked: Option<usize>,
    timers: Scheduler<WhackTimer>,
}

impl WhackSession {
    fn new(params: &WhackParams) -> Self {
        Self {
            score: 0,
            time_left: params.round_secs,
            hits: 0,
            mole: None,
            mole_timer: None,
            whacked: None,
            timers: Scheduler::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhackSnapshot {
    pub lifecycle: Lifecycle,
    pub holes: usize,
    pub mole: Option<Mole>,
    pub whacked: Option<usize>,
    pub score: u32,
    pub hits: u32,
    pub time_left: u32,
    pub elapsed_ms: u64,
    pub outcome: Option<Outcome>,
    pub record: WhackRecord,
}

#[derive(Debug)]
pub struct WhackGame {
    params: WhackParams,
    machine: StateMachine,
    session: WhackSession,
    rng: GameRng,
    scores: Scoreboard<WhackRecord>,
}

impl WhackGame {
    pub fn new(params: WhackParams, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let session = WhackSession::new(&params);
        Self {
            params,
            machine: StateMachine::new(),
            session,
            rng: GameRng::new(seed),
            scores: Scoreboard::load(store),
        }
    }

    pub fn mole(&self) -> Option<Mole> {
        self.session.mole
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn time_left(&self) -> u32 {
        self.session.time_left
    }

    pub fn record(&self) -> &WhackRecord {
        self.scores.record()
    }

    /// Points for a hit with `time_left` seconds on the clock
    pub fn points_for(&self, time_left: u32) -> u32 {
        self.params.base_points + time_left / 5 + 1
    }

    fn arm_clock(&mut self) {
        self.session.timers.after(1000, WhackTimer::Clock);
    }

    /// Give `hole` a mole with a fresh random lifetime
    fn show_mole(&mut self, hole: usize) {
        let lifetime = self
            .rng
            .between(self.params.mole_min_ms, self.params.mole_max_ms);
        let session = &mut self.session;
        if let Some(handle) = session.mole_timer.take() {
            session.timers.cancel(handle);
        }
        session.mole = Some(Mole {
            hole,
            active_until_ms: session.timers.now_ms() + lifetime,
        });
        session.mole_timer = Some(session.timers.after(lifetime, WhackTimer::MoleExpire));
        log::debug!("Mole up in hole {hole} for {lifetime}ms");
    }

    fn spawn_mole(&mut self) {
        let hole = self.rng.below(self.params.holes.max(1));
        self.show_mole(hole);
    }

    fn hit(&mut self, hole: usize) -> bool {
        match self.session.mole {
            Some(mole) if mole.hole == hole => {}
            _ => return false,
        }

        let points = self.points_for(self.session.time_left);
        let session = &mut self.session;
        session.score += points;
        session.hits += 1;
        session.mole = None;
        if let Some(handle) = session.mole_timer.take() {
            session.timers.cancel(handle);
        }
        session.whacked = Some(hole);
        session
            .timers
            .after(self.params.whacked_flash_ms, WhackTimer::WhackedFade);
        session.timers.after(self.params.respawn_ms, WhackTimer::Respawn);
        log::debug!("Whacked hole {hole} for {points} points");
        true
    }

    fn on_timer(&mut self, timer: WhackTimer) {
        match timer {
            WhackTimer::Clock => {
                self.session.time_left = self.session.time_left.saturating_sub(1);
                match self.outcome() {
                    Some(outcome) => self.finish(outcome),
                    None => self.arm_clock(),
                }
            }
            WhackTimer::MoleExpire => {
                self.session.mole = None;
                self.session.mole_timer = None;
                self.spawn_mole();
            }
            WhackTimer::Respawn => self.spawn_mole(),
            WhackTimer::WhackedFade => self.session.whacked = None,
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if !self.machine.fire(Transition::Finish) {
            return;
        }
        let session = &mut self.session;
        session.timers.cancel_all();
        session.mole = None;
        session.mole_timer = None;
        session.whacked = None;
        let score = session.score;
        log::info!("Whack-a-mole {:?}: {score} points, {} hits", outcome, session.hits);
        self.scores.commit(|r| r.record_round(score));
    }

    fn begin(&mut self) {
        self.arm_clock();
        self.spawn_mole();
    }
}

impl Game for WhackGame {
    fn kind(&self) -> GameKind {
        GameKind::Whack
    }

    fn cadence(&self) -> Cadence {
        Cadence::FixedDelay
    }

    fn lifecycle(&self) -> Lifecycle {
        self.machine.state()
    }

    fn outcome(&self) -> Option<Outcome> {
        (self.session.time_left == 0).then_some(Outcome::TimeUp)
    }

    fn start(&mut self) -> bool {
        if !self.machine.fire(Transition::Start) {
            return false;
        }
        log::info!("Whack-a-mole started, {}s round", self.params.round_secs);
        self.begin();
        true
    }

    fn pause(&mut self) -> bool {
        if !self.machine.fire(Transition::Pause) {
            return false;
        }
        let session = &mut self.session;
        session.timers.cancel_all();
        session.mole_timer = None;
        session.whacked = None;
        true
    }

    fn resume(&mut self) -> bool {
        if !self.machine.fire(Transition::Resume) {
            return false;
        }
        self.arm_clock();
        match self.session.mole {
            Some(mole) => self.show_mole(mole.hole),
            None => self.spawn_mole(),
        }
        true
    }

    fn restart(&mut self) -> bool {
        if !self.machine.allows(Transition::Restart) {
            return false;
        }
        self.session = WhackSession::new(&self.params);
        self.machine.fire(Transition::Restart);
        self.begin();
        true
    }

    fn play(&mut self, action: &Action) -> bool {
        match *action {
            Action::HoleHit(hole) => self.hit(hole),
            _ => false,
        }
    }

    fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        let until = self.session.timers.deadline(dt_ms);
        while self.machine.is_running() {
            let Some(timer) = self.session.timers.pop_due(until) else {
                break;
            };
            self.on_timer(timer);
        }
        if self.machine.is_running() {
            self.session.timers.rest_at(until);
        }
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Whack(WhackSnapshot {
            lifecycle: self.machine.state(),
            holes: self.params.holes,
            mole: self.session.mole,
            whacked: self.session.whacked,
            score: self.session.score,
            hits: self.session.hits,
            time_left: self.session.time_left,
            elapsed_ms: self.session.timers.now_ms(),
            outcome: if self.machine.state() == Lifecycle::Ended {
                self.outcome()
            } else {
                None
            },
            record: self.scores.record().clone(),
        })
    }

    fn take_store_error(&mut self) -> Option<StoreError> {
        self.scores.take_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn running() -> WhackGame {
        let mut game = WhackGame::new(WhackParams::default(), Box::new(MemoryStore::new()), 5);
        game.handle(&Action::Start);
        game
    }

    #[test]
    fn test_mole_up_on_start() {
        let game = running();
        let mole = game.mole().unwrap();
        assert!(mole.hole < 9);
        assert!((800..2000).contains(&mole.active_until_ms));
        assert_eq!(game.time_left(), 30);
    }

    #[test]
    fn test_no_hits_before_start() {
        let mut game = WhackGame::new(WhackParams::default(), Box::new(MemoryStore::new()), 5);
        assert!(!game.handle(&Action::HoleHit(0)));
        assert!(game.mole().is_none());
    }

    #[test]
    fn test_points_scale_with_time_left() {
        let game = running();
        assert_eq!(game.points_for(30), 17);
        assert_eq!(game.points_for(26), 16);
        assert_eq!(game.points_for(4), 11);
    }

    #[test]
    fn test_hit_scores_and_respawns() {
        let mut game = running();
        let hole = game.mole().unwrap().hole;
        let miss = (hole + 1) % 9;
        assert!(!game.handle(&Action::HoleHit(miss)));
        assert!(game.handle(&Action::HoleHit(hole)));
        assert_eq!(game.score(), 17);
        assert!(game.mole().is_none());

        let Snapshot::Whack(snap) = game.snapshot() else {
            unreachable!()
        };
        assert_eq!(snap.whacked, Some(hole));

        game.advance(300);
        let Snapshot::Whack(snap) = game.snapshot() else {
            unreachable!()
        };
        assert_eq!(snap.whacked, None);
        assert!(game.mole().is_none());

        game.advance(200);
        assert!(game.mole().is_some());
    }

    #[test]
    fn test_expired_mole_is_replaced() {
        let mut game = running();
        let first = game.mole().unwrap();
        game.advance(first.active_until_ms);
        let next = game.mole().unwrap();
        assert!(next.active_until_ms > first.active_until_ms);
    }

    #[test]
    fn test_round_ends_after_thirty_seconds() {
        let mut game = running();
        game.advance(29_999);
        assert_eq!(game.lifecycle(), Lifecycle::Running);
        assert_eq!(game.time_left(), 1);
        game.advance(1);
        assert_eq!(game.lifecycle(), Lifecycle::Ended);
        assert_eq!(game.outcome(), Some(Outcome::TimeUp));
        assert!(game.mole().is_none());
        assert_eq!(game.record().games_played, 1);
    }

    #[test]
    fn test_pause_freezes_countdown() {
        let mut game = running();
        game.advance(2500);
        assert_eq!(game.time_left(), 28);
        game.handle(&Action::Pause);
        game.advance(10_000);
        assert_eq!(game.time_left(), 28);
        assert!(!game.handle(&Action::HoleHit(0)));

        game.handle(&Action::Resume);
        let mole = game.mole().unwrap();
        assert!(mole.active_until_ms >= 2500 + 800);
        game.advance(999);
        assert_eq!(game.time_left(), 28);
        game.advance(1);
        assert_eq!(game.time_left(), 27);
    }

    #[test]
    fn test_restart_does_not_record() {
        let mut game = running();
        game.advance(5000);
        assert!(game.handle(&Action::Restart));
        assert_eq!(game.time_left(), 30);
        assert_eq!(game.score(), 0);
        assert_eq!(game.record().games_played, 0);
    }

    #[test]
    fn test_zero_mole_lifetime_advances() {
        let config = crate::settings::ArcadeConfig::from_json(
            r#"{"whack":{"mole_min_ms":0,"mole_max_ms":0}}"#,
        )
        .unwrap();
        let mut game = WhackGame::new(config.whack, Box::new(MemoryStore::new()), 5);
        game.handle(&Action::Start);
        assert!(game.advance(16));
        assert!(game.mole().is_some());
        game.advance(30_000);
        assert_eq!(game.lifecycle(), Lifecycle::Ended);
    }
}
