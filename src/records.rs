//! Best-score records, one per game
//!
//! Records only change when a session ends, and "best" fields only ever
//! improve: times and move counts go down, counters go up.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::sim::Mark;

/// A persisted per-game record
pub trait ScoreRecord: Serialize + DeserializeOwned + Default + Clone + PartialEq {
    /// Stable storage key
    const KEY: &'static str;
}

/// Memory match: fastest clear, fewest moves, total wins
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Milliseconds
    pub best_time: Option<u64>,
    pub best_moves: Option<u32>,
    pub games_won: u32,
}

impl ScoreRecord for MemoryRecord {
    const KEY: &'static str = "memoryGameBestScores";
}

impl MemoryRecord {
    /// Fold in a cleared board
    pub fn record_win(&mut self, elapsed_ms: u64, moves: u32) {
        self.best_time = Some(self.best_time.map_or(elapsed_ms, |t| t.min(elapsed_ms)));
        self.best_moves = Some(self.best_moves.map_or(moves, |m| m.min(moves)));
        self.games_won += 1;
    }
}

/// Whack-a-mole lifetime stats
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhackRecord {
    pub high_score: u32,
    pub games_played: u32,
    pub total_score: u64,
}

impl ScoreRecord for WhackRecord {
    const KEY: &'static str = "whackAMoleStats";
}

impl WhackRecord {
    pub fn record_round(&mut self, score: u32) {
        self.games_played += 1;
        self.total_score += u64::from(score);
        self.high_score = self.high_score.max(score);
    }
}

/// Tic-tac-toe win/draw counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicTacToeRecord {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
    pub draw: u32,
}

impl ScoreRecord for TicTacToeRecord {
    const KEY: &'static str = "ticTacToeScores";
}

impl TicTacToeRecord {
    /// `None` records a draw
    pub fn record_result(&mut self, winner: Option<Mark>) {
        match winner {
            Some(Mark::X) => self.x += 1,
            Some(Mark::O) => self.o += 1,
            Some(Mark::Empty) | None => self.draw += 1,
        }
    }
}

/// Snake high score
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeRecord {
    pub high_score: u32,
    pub games_played: u32,
}

impl ScoreRecord for SnakeRecord {
    const KEY: &'static str = "snakeHighScore";
}

impl SnakeRecord {
    pub fn record_game(&mut self, score: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(score);
    }
}

/// Pong match tally
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PongRecord {
    pub player_wins: u32,
    pub ai_wins: u32,
}

impl ScoreRecord for PongRecord {
    const KEY: &'static str = "pongMatchRecord";
}

impl PongRecord {
    pub fn record_match(&mut self, player_won: bool) {
        if player_won {
            self.player_wins += 1;
        } else {
            self.ai_wins += 1;
        }
    }
}
