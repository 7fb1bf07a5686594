//! Pocket Arcade - engine core for five small arcade games
//!
//! Core modules:
//! - `sim`: Lifecycle gate, virtual-time timers, collision and match rules
//! - `games`: Memory, pong, snake, tic-tac-toe and whack-a-mole engines
//! - `cabinet`: Hosts one engine and pushes snapshots to a presenter
//! - `persistence`: Per-game score records behind a pluggable store
//! - `settings`: Data-driven game tunables
//! - `platform`: Browser/native logging setup and the wasm entry points

pub mod cabinet;
pub mod error;
pub mod games;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;

pub use cabinet::{Cabinet, Presenter};
pub use error::StoreError;
pub use games::{Action, Game, GameKind, Outcome, Snapshot};
pub use persistence::{MemoryStore, ScoreStore, Scoreboard};
pub use settings::{ArcadeConfig, Difficulty};
pub use sim::Lifecycle;
