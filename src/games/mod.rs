//! Game engines
//!
//! Each engine composes the shared lifecycle gate, session timers and
//! collision/match rules into one game. The presentation layer talks to an
//! engine only through [`Action`]s in and [`Snapshot`]s out.

pub mod memory;
pub mod pong;
pub mod snake;
pub mod tictactoe;
pub mod whack;

pub use memory::{Card, MemoryGame, MemorySnapshot};
pub use pong::{Ball, Paddle, PongGame, PongSnapshot};
pub use snake::{SnakeGame, SnakeSnapshot};
pub use tictactoe::{TicTacToeGame, TicTacToeSnapshot};
pub use whack::{Mole, WhackGame, WhackSnapshot};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::settings::Difficulty;
use crate::sim::{Cadence, Lifecycle, Mark};

/// Which game a cabinet is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Memory,
    Pong,
    Snake,
    TicTacToe,
    Whack,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Memory,
        GameKind::Pong,
        GameKind::Snake,
        GameKind::TicTacToe,
        GameKind::Whack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory",
            GameKind::Pong => "pong",
            GameKind::Snake => "snake",
            GameKind::TicTacToe => "tictactoe",
            GameKind::Whack => "whack-a-mole",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(GameKind::Memory),
            "pong" => Some(GameKind::Pong),
            "snake" => Some(GameKind::Snake),
            "tictactoe" | "tic-tac-toe" => Some(GameKind::TicTacToe),
            "whack" | "whack-a-mole" | "whackamole" => Some(GameKind::Whack),
            _ => None,
        }
    }
}

/// Grid heading for snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (dx, dy) with y growing downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Pong paddle key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleIntent {
    Up,
    Down,
}

/// Input from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Resume,
    Restart,
    /// Memory card or tic-tac-toe cell
    CellSelect(usize),
    /// Snake heading
    Steer(Direction),
    /// Pong key press / release
    Paddle { intent: PaddleIntent, pressed: bool },
    HoleHit(usize),
    DifficultyChange(Difficulty),
    ConfirmDestructiveChange,
    DeclineDestructiveChange,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Board cleared, match won
    Won,
    /// Crashed, match lost
    Lost,
    /// Three in a row
    Line(Mark),
    Draw,
    /// Round clock ran out
    TimeUp,
}

/// Render-ready state; the presentation layer draws from this only
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Snapshot {
    Memory(MemorySnapshot),
    Pong(PongSnapshot),
    Snake(SnakeSnapshot),
    TicTacToe(TicTacToeSnapshot),
    Whack(WhackSnapshot),
}

impl Snapshot {
    pub fn kind(&self) -> GameKind {
        match self {
            Snapshot::Memory(_) => GameKind::Memory,
            Snapshot::Pong(_) => GameKind::Pong,
            Snapshot::Snake(_) => GameKind::Snake,
            Snapshot::TicTacToe(_) => GameKind::TicTacToe,
            Snapshot::Whack(_) => GameKind::Whack,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Snapshot::Memory(s) => s.lifecycle,
            Snapshot::Pong(s) => s.lifecycle,
            Snapshot::Snake(s) => s.lifecycle,
            Snapshot::TicTacToe(s) => s.lifecycle,
            Snapshot::Whack(s) => s.lifecycle,
        }
    }
}

/// Engine contract shared by all five games
pub trait Game {
    fn kind(&self) -> GameKind;

    fn cadence(&self) -> Cadence;

    fn lifecycle(&self) -> Lifecycle;

    /// Terminal predicate for the current session
    fn outcome(&self) -> Option<Outcome>;

    fn start(&mut self) -> bool;

    fn pause(&mut self) -> bool;

    fn resume(&mut self) -> bool;

    /// Discard the session, deal a fresh one, run it
    fn restart(&mut self) -> bool;

    /// Gameplay actions. Only reached while running.
    fn play(&mut self, action: &Action) -> bool;

    /// Settings actions that are legal outside a running session
    fn configure(&mut self, _action: &Action) -> bool {
        false
    }

    /// Difficulty change awaiting confirmation, if any
    fn pending_confirmation(&self) -> Option<Difficulty> {
        None
    }

    /// One render-cadence step (continuous engines)
    fn frame(&mut self) -> bool {
        false
    }

    /// Feed wall-clock time. True if anything observable changed.
    fn advance(&mut self, dt_ms: u64) -> bool;

    fn snapshot(&self) -> Snapshot;

    /// A persistence failure not yet shown to the player
    fn take_store_error(&mut self) -> Option<StoreError>;

    /// Single entry point. Returns false for rejected actions, which leave
    /// the engine untouched.
    fn handle(&mut self, action: &Action) -> bool {
        match action {
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Resume => self.resume(),
            Action::Restart => self.restart(),
            Action::DifficultyChange(_)
            | Action::ConfirmDestructiveChange
            | Action::DeclineDestructiveChange => self.configure(action),
            _ if self.lifecycle() == Lifecycle::Running => self.play(action),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposites() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_game_kind_names() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
