//! Snake on a square grid
//!
//! One step per tick. The tick re-arms itself with the current delay, which
//! shortens each time the score lands on a multiple of `speedup_every`.

use std::collections::VecDeque;

use serde::Serialize;

use super::{Action, Direction, Game, GameKind, Outcome, Snapshot};
use crate::error::StoreError;
use crate::persistence::{ScoreStore, Scoreboard};
use crate::records::SnakeRecord;
use crate::settings::SnakeParams;
use crate::sim::{
    Cadence, Cell, GameRng, Lifecycle, Scheduler, StateMachine, Transition, hits_body,
    out_of_bounds, sample_free_cell,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnakeTimer {
    Step,
}

#[derive(Debug)]
struct SnakeSession {
    /// Head first
    body: VecDeque<Cell>,
    /// Applied on the last step; `None` until the first steer
    heading: Option<Direction>,
    /// Takes effect on the next step
    queued: Option<Direction>,
    food: Option<Cell>,
    score: u32,
    delay_ms: u64,
    result: Option<Outcome>,
    timers: Scheduler<SnakeTimer>,
}

impl SnakeSession {
    fn new(params: &SnakeParams, rng: &mut GameRng) -> Self {
        let tiles = params.tile_count();
        let body = VecDeque::from([Cell::new(tiles / 2, tiles / 2)]);
        let food = sample_free_cell(rng, tiles, &body);
        Self {
            body,
            heading: None,
            queued: None,
            food,
            score: 0,
            delay_ms: params.start_delay_ms,
            result: None,
            timers: Scheduler::new(),
        }
    }

    fn head(&self) -> Cell {
        // A session always has at least the starting segment
        self.body.front().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeSnapshot {
    pub lifecycle: Lifecycle,
    /// Head first
    pub body: Vec<Cell>,
    pub heading: Option<Direction>,
    pub food: Option<Cell>,
    pub score: u32,
    pub delay_ms: u64,
    pub tile_count: i32,
    pub cell_size: u32,
    pub elapsed_ms: u64,
    pub outcome: Option<Outcome>,
    pub record: SnakeRecord,
}

#[derive(Debug)]
pub struct SnakeGame {
    params: SnakeParams,
    machine: StateMachine,
    session: SnakeSession,
    rng: GameRng,
    scores: Scoreboard<SnakeRecord>,
}

impl SnakeGame {
    pub fn new(params: SnakeParams, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let session = SnakeSession::new(&params, &mut rng);
        Self {
            params,
            machine: StateMachine::new(),
            session,
            rng,
            scores: Scoreboard::load(store),
        }
    }

    pub fn head(&self) -> Cell {
        self.session.head()
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.session.body
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn delay_ms(&self) -> u64 {
        self.session.delay_ms
    }

    pub fn record(&self) -> &SnakeRecord {
        self.scores.record()
    }

    fn arm_step(&mut self) {
        let delay = self.session.delay_ms;
        self.session.timers.after(delay, SnakeTimer::Step);
    }

    fn steer(&mut self, dir: Direction) -> bool {
        // Reversal is judged against the heading actually applied, so two
        // quick turns can't fold the snake back onto itself
        if self.session.heading.is_some_and(|h| h.opposite() == dir) {
            return false;
        }
        self.session.queued = Some(dir);
        true
    }

    fn step(&mut self) {
        let tiles = self.params.tile_count();
        let session = &mut self.session;
        session.heading = session.queued;
        let Some(heading) = session.heading else {
            // Not moving yet
            return;
        };

        let (dx, dy) = heading.delta();
        let next = session.head().step(dx, dy);
        if out_of_bounds(next, tiles) || hits_body(next, &session.body) {
            log::debug!("Snake crashed at {:?}", next);
            session.result = Some(Outcome::Lost);
            return;
        }

        session.body.push_front(next);
        if session.food != Some(next) {
            session.body.pop_back();
            return;
        }

        session.score += self.params.food_points;
        let every = self.params.speedup_every.max(1);
        if session.score % every == 0 {
            session.delay_ms = session
                .delay_ms
                .saturating_sub(self.params.speedup_step_ms)
                .max(self.params.min_delay_ms);
            log::debug!("Snake speed up: {}ms", session.delay_ms);
        }

        session.food = sample_free_cell(&mut self.rng, tiles, &session.body);
        if session.food.is_none() {
            session.result = Some(Outcome::Won);
        }
    }

    fn on_timer(&mut self, timer: SnakeTimer) {
        match timer {
            SnakeTimer::Step => {
                self.step();
                match self.outcome() {
                    Some(outcome) => self.finish(outcome),
                    None => self.arm_step(),
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if !self.machine.fire(Transition::Finish) {
            return;
        }
        self.session.timers.cancel_all();
        let score = self.session.score;
        log::info!("Snake {:?} with score {score}", outcome);
        self.scores.commit(|r| r.record_game(score));
    }
}

impl Game for SnakeGame {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn cadence(&self) -> Cadence {
        Cadence::FixedDelay
    }

    fn lifecycle(&self) -> Lifecycle {
        self.machine.state()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.session.result
    }

    fn start(&mut self) -> bool {
        if !self.machine.fire(Transition::Start) {
            return false;
        }
        log::info!("Snake started on a {0}x{0} grid", self.params.tile_count());
        self.arm_step();
        true
    }

    fn pause(&mut self) -> bool {
        if !self.machine.fire(Transition::Pause) {
            return false;
        }
        self.session.timers.cancel_all();
        true
    }

    fn resume(&mut self) -> bool {
        if !self.machine.fire(Transition::Resume) {
            return false;
        }
        self.arm_step();
        true
    }

    fn restart(&mut self) -> bool {
        if !self.machine.allows(Transition::Restart) {
            return false;
        }
        self.session = SnakeSession::new(&self.params, &mut self.rng);
        self.machine.fire(Transition::Restart);
        self.arm_step();
        true
    }

    fn play(&mut self, action: &Action) -> bool {
        match *action {
            Action::Steer(dir) => self.steer(dir),
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
        Snapshot::Snake(SnakeSnapshot {
            lifecycle: self.machine.state(),
            body: self.session.body.iter().copied().collect(),
            heading: self.session.heading,
            food: self.session.food,
            score: self.session.score,
            delay_ms: self.session.delay_ms,
            tile_count: self.params.tile_count(),
            cell_size: self.params.cell_size,
            elapsed_ms: self.session.timers.now_ms(),
            outcome: self.session.result,
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

    fn running() -> SnakeGame {
        let mut game = SnakeGame::new(SnakeParams::default(), Box::new(MemoryStore::new()), 99);
        game.handle(&Action::Start);
        game
    }

    #[test]
    fn test_starts_centered_and_still() {
        let mut game = running();
        assert_eq!(game.head(), Cell::new(10, 10));
        game.advance(1500);
        assert_eq!(game.head(), Cell::new(10, 10));
        assert_eq!(game.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_food_never_on_body() {
        let game = running();
        let food = game.session.food.unwrap();
        assert!(!hits_body(food, game.body()));
    }

    #[test]
    fn test_steps_on_each_tick() {
        let mut game = running();
        game.session.food = None;
        game.handle(&Action::Steer(Direction::Right));
        // 400ms at 150ms per step: two steps, third pending
        game.advance(400);
        assert_eq!(game.head(), Cell::new(12, 10));
        game.advance(50);
        assert_eq!(game.head(), Cell::new(13, 10));
    }

    #[test]
    fn test_reversal_rejected() {
        let mut game = running();
        game.session.food = None;
        game.handle(&Action::Steer(Direction::Up));
        game.advance(150);
        assert!(!game.handle(&Action::Steer(Direction::Down)));
        assert!(game.handle(&Action::Steer(Direction::Left)));
        // Judged against the applied Up, not the queued Left
        assert!(game.handle(&Action::Steer(Direction::Right)));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = running();
        game.session.food = Some(Cell::new(11, 10));
        game.handle(&Action::Steer(Direction::Right));
        game.advance(150);
        assert_eq!(game.score(), 10);
        assert_eq!(game.body().len(), 2);
        let food = game.session.food.unwrap();
        assert!(!hits_body(food, game.body()));
    }

    #[test]
    fn test_speedup_on_multiple_of_fifty() {
        let mut game = running();
        game.session.score = 40;
        game.session.food = Some(Cell::new(11, 10));
        game.handle(&Action::Steer(Direction::Right));
        game.advance(150);
        assert_eq!(game.score(), 50);
        assert_eq!(game.delay_ms(), 140);
    }

    #[test]
    fn test_delay_floor() {
        let mut game = running();
        game.session.delay_ms = 55;
        game.session.score = 90;
        game.session.food = Some(Cell::new(11, 10));
        game.handle(&Action::Steer(Direction::Right));
        game.advance(150);
        assert_eq!(game.delay_ms(), 50);
    }

    #[test]
    fn test_wall_ends_session_and_records() {
        let mut game = running();
        game.session.food = None;
        game.session.score = 30;
        game.handle(&Action::Steer(Direction::Left));
        // 10 steps reach column 0, the 11th leaves the board
        game.advance(150 * 11);
        assert_eq!(game.lifecycle(), Lifecycle::Ended);
        assert_eq!(game.outcome(), Some(Outcome::Lost));
        assert_eq!(game.head(), Cell::new(0, 10));
        assert_eq!(game.record().high_score, 30);
        assert_eq!(game.record().games_played, 1);
    }

    #[test]
    fn test_self_collision() {
        let mut game = running();
        game.session.food = None;
        game.session.body = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
        ]);
        game.session.heading = Some(Direction::Left);
        game.handle(&Action::Steer(Direction::Down));
        game.advance(150);
        assert_eq!(game.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn test_pause_freezes_steps() {
        let mut game = running();
        game.session.food = None;
        game.handle(&Action::Steer(Direction::Down));
        game.advance(100);
        game.handle(&Action::Pause);
        assert!(!game.handle(&Action::Steer(Direction::Left)));
        game.advance(1000);
        assert_eq!(game.head(), Cell::new(10, 10));
        game.handle(&Action::Resume);
        // Fresh delay after resume
        game.advance(149);
        assert_eq!(game.head(), Cell::new(10, 10));
        game.advance(1);
        assert_eq!(game.head(), Cell::new(10, 11));
    }

    #[test]
    fn test_restart_resets_speed() {
        let mut game = running();
        game.session.delay_ms = 90;
        game.session.score = 200;
        assert!(game.handle(&Action::Restart));
        assert_eq!(game.delay_ms(), 150);
        assert_eq!(game.score(), 0);
        assert_eq!(game.body().len(), 1);
    }

    #[test]
    fn test_full_board_wins() {
        let params = SnakeParams {
            board_size: 40,
            cell_size: 20,
            ..Default::default()
        };
        let mut game = SnakeGame::new(params, Box::new(MemoryStore::new()), 1);
        game.handle(&Action::Start);
        // 2x2 board: fill three cells and leave the food in the last one
        game.session.body = VecDeque::from([Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]);
        game.session.heading = Some(Direction::Up);
        game.session.food = Some(Cell::new(1, 0));
        game.handle(&Action::Steer(Direction::Right));
        game.advance(150);
        assert_eq!(game.outcome(), Some(Outcome::Won));
        assert_eq!(game.lifecycle(), Lifecycle::Ended);
    }

    #[test]
    fn test_zero_delay_config_advances() {
        let config = crate::settings::ArcadeConfig::from_json(
            r#"{"snake":{"start_delay_ms":0,"min_delay_ms":0}}"#,
        )
        .unwrap();
        let mut game = SnakeGame::new(config.snake, Box::new(MemoryStore::new()), 99);
        game.handle(&Action::Start);
        game.handle(&Action::Steer(Direction::Right));
        assert!(game.advance(3));
        assert_eq!(game.head(), Cell::new(13, 10));
    }
}
