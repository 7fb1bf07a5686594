//! Symbolic match rules: card pairs and three-in-a-row lines

use serde::{Deserialize, Serialize};

/// Every 3×3 winning line: rows, columns, diagonals
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Delay before a matched pair locks in (ms)
pub const MATCH_SETTLE_MS: u64 = 500;
/// Delay before a mismatched pair flips back (ms)
pub const MISMATCH_SETTLE_MS: u64 = 1000;

/// Outcome of comparing two face-up cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Match,
    Mismatch,
}

impl PairOutcome {
    /// How long the presentation gets to show the comparison
    pub fn settle_ms(&self) -> u64 {
        match self {
            PairOutcome::Match => MATCH_SETTLE_MS,
            PairOutcome::Mismatch => MISMATCH_SETTLE_MS,
        }
    }
}

pub fn evaluate_pair(a: u8, b: u8) -> PairOutcome {
    if a == b {
        PairOutcome::Match
    } else {
        PairOutcome::Mismatch
    }
}

/// A tic-tac-toe cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
            Mark::Empty => Mark::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOutcome {
    Win { mark: Mark, line: [usize; 3] },
    Draw,
    Open,
}

/// First complete line of identical non-empty marks
pub fn winning_line(board: &[Mark; 9]) -> Option<(Mark, [usize; 3])> {
    WIN_LINES.iter().find_map(|&[a, b, c]| {
        let mark = board[a];
        (!mark.is_empty() && mark == board[b] && mark == board[c]).then_some((mark, [a, b, c]))
    })
}

/// Win beats draw: a full board with a line is a win
pub fn evaluate_board(board: &[Mark; 9]) -> BoardOutcome {
    if let Some((mark, line)) = winning_line(board) {
        return BoardOutcome::Win { mark, line };
    }
    if board.iter().all(|m| !m.is_empty()) {
        BoardOutcome::Draw
    } else {
        BoardOutcome::Open
    }
}
