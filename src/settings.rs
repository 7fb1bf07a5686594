//! Game configuration
//!
//! Tunables for every game, persisted separately from score records. Missing
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Memory-match difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Distinct symbols dealt (cards = 2 × pairs)
    pub fn pair_count(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 18,
        }
    }

    /// Grid columns the board is laid out in (3×4, 4×4, 6×6)
    pub fn columns(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryParams {
    pub difficulty: Difficulty,
    /// Display clock period (ms)
    pub clock_interval_ms: u64,
    pub match_settle_ms: u64,
    pub mismatch_settle_ms: u64,
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            clock_interval_ms: 1000,
            match_settle_ms: crate::sim::matching::MATCH_SETTLE_MS,
            mismatch_settle_ms: crate::sim::matching::MISMATCH_SETTLE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongParams {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between each paddle and its side wall
    pub paddle_inset: f32,
    pub ball_size: f32,
    /// Player paddle pixels per frame
    pub paddle_speed: f32,
    /// Serve speed per axis, pixels per frame
    pub ball_speed: f32,
    /// AI paddle speed as a fraction of the player's
    pub ai_speed_factor: f32,
    /// AI holds while its center is within this of the ball
    pub ai_dead_zone: f32,
    /// Velocity multiplier on each paddle hit (uncapped)
    pub speed_growth: f32,
    pub winning_score: u32,
}

impl Default for PongParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            paddle_width: 10.0,
            paddle_height: 80.0,
            paddle_inset: 20.0,
            ball_size: 8.0,
            paddle_speed: 5.0,
            ball_speed: 4.0,
            ai_speed_factor: 0.8,
            ai_dead_zone: 10.0,
            speed_growth: 1.05,
            winning_score: 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeParams {
    /// Board edge in pixels
    pub board_size: u32,
    /// Cell edge in pixels
    pub cell_size: u32,
    pub start_delay_ms: u64,
    pub min_delay_ms: u64,
    pub speedup_step_ms: u64,
    /// Speed up each time the score lands on a multiple of this
    pub speedup_every: u32,
    pub food_points: u32,
}

impl SnakeParams {
    pub fn tile_count(&self) -> i32 {
        (self.board_size / self.cell_size.max(1)) as i32
    }
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            board_size: 400,
            cell_size: 20,
            start_delay_ms: 150,
            min_delay_ms: 50,
            speedup_step_ms: 10,
            speedup_every: 50,
            food_points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhackParams {
    pub round_secs: u32,
    pub holes: usize,
    pub mole_min_ms: u64,
    pub mole_max_ms: u64,
    /// Pause between a hit and the next mole
    pub respawn_ms: u64,
    /// How long a hit hole shows as whacked
    pub whacked_flash_ms: u64,
    pub base_points: u32,
}

impl Default for WhackParams {
    fn default() -> Self {
        Self {
            round_secs: 30,
            holes: 9,
            mole_min_ms: 800,
            mole_max_ms: 2000,
            respawn_ms: 500,
            whacked_flash_ms: 300,
            base_points: 10,
        }
    }
}

/// All game tunables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub memory: MemoryParams,
    pub pong: PongParams,
    pub snake: SnakeParams,
    pub whack: WhackParams,
}

impl ArcadeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pocket_arcade_settings";

    /// Load config from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        use crate::persistence::{LocalStorageStore, ScoreStore};

        match LocalStorageStore::new().read(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from LocalStorage");
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring malformed stored config: {err}");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("Using default config: {err}");
                Self::default()
            }
        }
    }

    /// Load config from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring malformed config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::info!("Using default config ({}: {err})", path.display());
                Self::default()
            }
        }
    }
}
