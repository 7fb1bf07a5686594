//! Browser entry points
//!
//! The page script owns the DOM and the animation loop. It forwards input
//! here and redraws from the JSON snapshot after each call that returns true.

use wasm_bindgen::prelude::*;

use crate::cabinet::{Cabinet, Presenter};
use crate::error::StoreError;
use crate::games::{Action, Direction, GameKind, PaddleIntent, Snapshot};
use crate::persistence::LocalStorageStore;
use crate::settings::{ArcadeConfig, Difficulty};
use crate::sim::GameRng;

/// Keeps the latest snapshot as JSON for the page to pull
#[derive(Default)]
struct JsonPresenter {
    snapshot: Option<String>,
    error: Option<String>,
}

impl Presenter for JsonPresenter {
    fn on_state_changed(&mut self, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => self.snapshot = Some(json),
            Err(err) => log::error!("Snapshot serialization failed: {err}"),
        }
    }

    fn on_persistence_error(&mut self, kind: GameKind, error: &StoreError) {
        log::warn!("{} scores not persisted: {error}", kind.as_str());
        self.error = Some(error.to_string());
    }
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    super::init_logging();
    log::info!("Pocket Arcade starting...");
}

#[wasm_bindgen]
pub struct WebArcade {
    cabinet: Cabinet<LocalStorageStore, JsonPresenter>,
    /// Sub-millisecond remainder carried between frames
    carry_ms: f64,
}

#[wasm_bindgen]
impl WebArcade {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebArcade {
        let seed = GameRng::from_entropy().seed();
        WebArcade {
            cabinet: Cabinet::new(
                ArcadeConfig::load(),
                super::default_store(),
                JsonPresenter::default(),
                seed,
            ),
            carry_ms: 0.0,
        }
    }

    /// Switch games by name; false for an unknown name
    pub fn select(&mut self, name: &str) -> bool {
        match GameKind::from_str(name) {
            Some(kind) => {
                self.cabinet.select(kind);
                true
            }
            None => {
                log::warn!("Unknown game: {name}");
                false
            }
        }
    }

    pub fn start(&mut self) -> bool {
        self.cabinet.on_input(Action::Start)
    }

    pub fn pause(&mut self) -> bool {
        self.cabinet.on_input(Action::Pause)
    }

    pub fn resume(&mut self) -> bool {
        self.cabinet.on_input(Action::Resume)
    }

    pub fn restart(&mut self) -> bool {
        self.cabinet.on_input(Action::Restart)
    }

    pub fn select_cell(&mut self, index: usize) -> bool {
        self.cabinet.on_input(Action::CellSelect(index))
    }

    pub fn hit_hole(&mut self, index: usize) -> bool {
        self.cabinet.on_input(Action::HoleHit(index))
    }

    /// Arrow / WASD key name to a snake heading
    pub fn steer(&mut self, key: &str) -> bool {
        let dir = match key {
            "ArrowUp" | "w" | "W" => Direction::Up,
            "ArrowDown" | "s" | "S" => Direction::Down,
            "ArrowLeft" | "a" | "A" => Direction::Left,
            "ArrowRight" | "d" | "D" => Direction::Right,
            _ => return false,
        };
        self.cabinet.on_input(Action::Steer(dir))
    }

    pub fn paddle(&mut self, up: bool, pressed: bool) -> bool {
        let intent = if up { PaddleIntent::Up } else { PaddleIntent::Down };
        self.cabinet.on_input(Action::Paddle { intent, pressed })
    }

    pub fn set_difficulty(&mut self, level: &str) -> bool {
        match Difficulty::from_str(level) {
            Some(level) => self.cabinet.on_input(Action::DifficultyChange(level)),
            None => false,
        }
    }

    pub fn confirm(&mut self) -> bool {
        self.cabinet.on_input(Action::ConfirmDestructiveChange)
    }

    pub fn decline(&mut self) -> bool {
        self.cabinet.on_input(Action::DeclineDestructiveChange)
    }

    /// Called from requestAnimationFrame with the frame delta
    pub fn frame(&mut self, dt_ms: f64) -> bool {
        let total = self.carry_ms + dt_ms.max(0.0);
        let whole = total.floor();
        self.carry_ms = total - whole;
        let ticked = self.cabinet.advance(whole as u64);
        let stepped = self.cabinet.on_frame();
        ticked || stepped
    }

    pub fn snapshot_json(&self) -> Option<String> {
        self.cabinet.presenter().snapshot.clone()
    }

    /// Pending difficulty awaiting confirmation
    pub fn confirmation_prompt(&self) -> Option<String> {
        self.cabinet
            .active()
            .and_then(|game| game.pending_confirmation())
            .map(|level| level.as_str().to_string())
    }

    /// Last persistence failure, cleared once read
    pub fn take_error(&mut self) -> Option<String> {
        self.cabinet.presenter_mut().error.take()
    }
}

impl Default for WebArcade {
    fn default() -> Self {
        Self::new()
    }
}
