//! Pong against a trailing AI paddle
//!
//! Driven once per display frame. Velocities are pixels per frame, so the
//! simulation is not scaled by wall-clock time. Each frame runs, in order:
//! player paddle, ball motion, AI paddle, wall and paddle collisions, scoring.

use glam::Vec2;
use serde::Serialize;

use super::{Action, Game, GameKind, Outcome, PaddleIntent, Snapshot};
use crate::error::StoreError;
use crate::persistence::{ScoreStore, Scoreboard};
use crate::records::PongRecord;
use crate::settings::PongParams;
use crate::sim::{
    Cadence, GameRng, Lifecycle, Rect, StateMachine, Transition, paddle_reflect, wall_bounce,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    fn centered(x: f32, params: &PongParams) -> Self {
        Self {
            pos: Vec2::new(x, params.height / 2.0 - params.paddle_height / 2.0),
            width: params.paddle_width,
            height: params.paddle_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// Move vertically, kept inside `[0, bounds_height - height]`
    fn shift(&mut self, dy: f32, bounds_height: f32) {
        let floor = (bounds_height - self.height).max(0.0);
        self.pos.y = (self.pos.y + dy).clamp(0.0, floor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ball {
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: f32,
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct HeldKeys {
    up: bool,
    down: bool,
}

#[derive(Debug, Clone)]
struct PongSession {
    player: Paddle,
    ai: Paddle,
    ball: Ball,
    player_score: u32,
    ai_score: u32,
    keys: HeldKeys,
    frames: u64,
    elapsed_ms: u64,
}

impl PongSession {
    fn new(params: &PongParams, rng: &mut GameRng) -> Self {
        let player_x = params.paddle_inset;
        let ai_x = params.width - params.paddle_inset - params.paddle_width;
        let mut session = Self {
            player: Paddle::centered(player_x, params),
            ai: Paddle::centered(ai_x, params),
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                size: params.ball_size,
            },
            player_score: 0,
            ai_score: 0,
            keys: HeldKeys::default(),
            frames: 0,
            elapsed_ms: 0,
        };
        session.serve(params, rng);
        session
    }

    /// Ball back to the center, diagonal in a random quadrant
    fn serve(&mut self, params: &PongParams, rng: &mut GameRng) {
        self.ball.pos = Vec2::new(params.width / 2.0, params.height / 2.0);
        self.ball.vel = Vec2::new(
            params.ball_speed * rng.sign(),
            params.ball_speed * rng.sign(),
        );
    }
}

/// Who took the point on this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Point {
    Player,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongSnapshot {
    pub lifecycle: Lifecycle,
    pub width: f32,
    pub height: f32,
    pub player: Paddle,
    pub ai: Paddle,
    pub ball: Ball,
    pub player_score: u32,
    pub ai_score: u32,
    pub winning_score: u32,
    pub frames: u64,
    pub elapsed_ms: u64,
    pub outcome: Option<Outcome>,
    pub record: PongRecord,
}

#[derive(Debug)]
pub struct PongGame {
    params: PongParams,
    machine: StateMachine,
    session: PongSession,
    rng: GameRng,
    scores: Scoreboard<PongRecord>,
}

impl PongGame {
    pub fn new(params: PongParams, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let session = PongSession::new(&params, &mut rng);
        Self {
            params,
            machine: StateMachine::new(),
            session,
            rng,
            scores: Scoreboard::load(store),
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.session.ball
    }

    pub fn player(&self) -> &Paddle {
        &self.session.player
    }

    pub fn ai(&self) -> &Paddle {
        &self.session.ai
    }

    pub fn score(&self) -> (u32, u32) {
        (self.session.player_score, self.session.ai_score)
    }

    pub fn record(&self) -> &PongRecord {
        self.scores.record()
    }

    fn update_player(&mut self) {
        let keys = self.session.keys;
        let speed = self.params.paddle_speed;
        let height = self.params.height;
        if keys.up {
            self.session.player.shift(-speed, height);
        }
        if keys.down {
            self.session.player.shift(speed, height);
        }
    }

    /// Trail the ball's y with a dead zone, slower than the player
    fn update_ai(&mut self) {
        let target = self.session.ball.pos.y;
        let center = self.session.ai.center_y();
        let speed = self.params.paddle_speed * self.params.ai_speed_factor;
        let dead_zone = self.params.ai_dead_zone;

        if center < target - dead_zone {
            self.session.ai.shift(speed, self.params.height);
        } else if center > target + dead_zone {
            self.session.ai.shift(-speed, self.params.height);
        }
    }

    fn collide(&mut self) {
        let ball = &mut self.session.ball;
        ball.vel.y = wall_bounce(ball.pos.y, ball.vel.y, self.params.height, ball.size);

        // Each paddle only returns a ball travelling toward it
        for (paddle, incoming) in [
            (self.session.player, ball.vel.x < 0.0),
            (self.session.ai, ball.vel.x > 0.0),
        ] {
            if incoming && ball.rect().overlaps(&paddle.rect()) {
                ball.vel = paddle_reflect(
                    ball.vel,
                    ball.pos.y,
                    paddle.pos.y,
                    paddle.height,
                    self.params.ball_speed,
                    self.params.speed_growth,
                );
                log::debug!("Paddle hit, ball velocity {:?}", ball.vel);
            }
        }
    }

    fn check_point(&self) -> Option<Point> {
        let x = self.session.ball.pos.x;
        if x <= 0.0 {
            Some(Point::Ai)
        } else if x >= self.params.width {
            Some(Point::Player)
        } else {
            None
        }
    }

    fn score_point(&mut self, point: Point) {
        match point {
            Point::Player => self.session.player_score += 1,
            Point::Ai => self.session.ai_score += 1,
        }
        log::debug!(
            "Point {:?}: {} - {}",
            point,
            self.session.player_score,
            self.session.ai_score
        );
        self.session.serve(&self.params, &mut self.rng);

        if let Some(outcome) = self.outcome() {
            self.finish(outcome);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if !self.machine.fire(Transition::Finish) {
            return;
        }
        let (player, ai) = self.score();
        log::info!("Pong ended {player} - {ai}");
        self.session.keys = HeldKeys::default();
        self.scores.commit(|r| r.record_match(outcome == Outcome::Won));
    }
}

impl Game for PongGame {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn cadence(&self) -> Cadence {
        Cadence::Continuous
    }

    fn lifecycle(&self) -> Lifecycle {
        self.machine.state()
    }

    fn outcome(&self) -> Option<Outcome> {
        let target = self.params.winning_score;
        if self.session.player_score >= target {
            Some(Outcome::Won)
        } else if self.session.ai_score >= target {
            Some(Outcome::Lost)
        } else {
            None
        }
    }

    fn start(&mut self) -> bool {
        if !self.machine.fire(Transition::Start) {
            return false;
        }
        log::info!("Pong started, first to {}", self.params.winning_score);
        true
    }

    fn pause(&mut self) -> bool {
        if !self.machine.fire(Transition::Pause) {
            return false;
        }
        // Releases are not delivered while paused
        self.session.keys = HeldKeys::default();
        true
    }

    fn resume(&mut self) -> bool {
        self.machine.fire(Transition::Resume)
    }

    fn restart(&mut self) -> bool {
        if !self.machine.allows(Transition::Restart) {
            return false;
        }
        self.session = PongSession::new(&self.params, &mut self.rng);
        self.machine.fire(Transition::Restart)
    }

    fn play(&mut self, action: &Action) -> bool {
        match *action {
            Action::Paddle { intent, pressed } => {
                match intent {
                    PaddleIntent::Up => self.session.keys.up = pressed,
                    PaddleIntent::Down => self.session.keys.down = pressed,
                }
                true
            }
            _ => false,
        }
    }

    fn frame(&mut self) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        self.session.frames += 1;

        self.update_player();
        self.session.ball.pos += self.session.ball.vel;
        self.update_ai();
        self.collide();
        if let Some(point) = self.check_point() {
            self.score_point(point);
        }
        true
    }

    fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        self.session.elapsed_ms += dt_ms;
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Pong(PongSnapshot {
            lifecycle: self.machine.state(),
            width: self.params.width,
            height: self.params.height,
            player: self.session.player,
            ai: self.session.ai,
            ball: self.session.ball,
            player_score: self.session.player_score,
            ai_score: self.session.ai_score,
            winning_score: self.params.winning_score,
            frames: self.session.frames,
            elapsed_ms: self.session.elapsed_ms,
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
