//! Deterministic simulation building blocks
//!
//! Everything the five games share lives here:
//! - Lifecycle gate (Idle → Running ⇄ Paused → Ended)
//! - Session timers in virtual time
//! - Box and grid collision
//! - Pair and line matching
//! - Seeded RNG
//!
//! No rendering or platform dependencies.

pub mod collision;
pub mod lifecycle;
pub mod matching;
pub mod rng;
pub mod scheduler;

pub use collision::{
    Cell, Rect, hits_body, out_of_bounds, paddle_reflect, sample_free_cell, wall_bounce,
};
pub use lifecycle::{Lifecycle, StateMachine, Transition};
pub use matching::{
    BoardOutcome, Mark, PairOutcome, WIN_LINES, evaluate_board, evaluate_pair, winning_line,
};
pub use rng::GameRng;
pub use scheduler::{Cadence, Scheduler, TimerHandle};
