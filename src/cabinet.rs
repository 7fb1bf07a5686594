//! Host for the active game
//!
//! The cabinet owns exactly one engine at a time. Switching games drops the
//! old engine together with its session timers. Every accepted action, frame
//! or tick is followed by a fresh [`Snapshot`] pushed to the [`Presenter`],
//! preceded by any persistence failure or confirmation prompt it surfaced.

use crate::error::StoreError;
use crate::games::{
    Action, Game, GameKind, MemoryGame, PongGame, SnakeGame, Snapshot, TicTacToeGame, WhackGame,
};
use crate::persistence::ScoreStore;
use crate::settings::{ArcadeConfig, Difficulty};
use crate::sim::GameRng;

/// Presentation layer callbacks
pub trait Presenter {
    fn on_state_changed(&mut self, snapshot: &Snapshot);

    /// A record could not be loaded or saved; play continues regardless
    fn on_persistence_error(&mut self, kind: GameKind, error: &StoreError) {
        log::warn!("{} scores not persisted: {error}", kind.as_str());
    }

    /// A difficulty change would discard the running session
    fn on_confirmation_required(&mut self, _level: Difficulty) {}
}

pub struct Cabinet<S, P> {
    config: ArcadeConfig,
    store: S,
    presenter: P,
    rng: GameRng,
    active: Option<Box<dyn Game>>,
    /// Last prompt shown, so each pending change is announced once
    prompted: Option<Difficulty>,
}

impl<S, P> Cabinet<S, P>
where
    S: ScoreStore + Clone + 'static,
    P: Presenter,
{
    pub fn new(config: ArcadeConfig, store: S, presenter: P, seed: u64) -> Self {
        Self {
            config,
            store,
            presenter,
            rng: GameRng::new(seed),
            active: None,
            prompted: None,
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn active(&self) -> Option<&dyn Game> {
        self.active.as_deref()
    }

    pub fn active_kind(&self) -> Option<GameKind> {
        self.active.as_ref().map(|g| g.kind())
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.active.as_ref().map(|g| g.snapshot())
    }

    /// Replace the active engine with a fresh, idle one
    pub fn select(&mut self, kind: GameKind) {
        let seed = self.rng.next_seed();
        let store: Box<dyn ScoreStore> = Box::new(self.store.clone());
        let game: Box<dyn Game> = match kind {
            GameKind::Memory => Box::new(MemoryGame::new(self.config.memory.clone(), store, seed)),
            GameKind::Pong => Box::new(PongGame::new(self.config.pong.clone(), store, seed)),
            GameKind::Snake => Box::new(SnakeGame::new(self.config.snake.clone(), store, seed)),
            GameKind::TicTacToe => Box::new(TicTacToeGame::new(store)),
            GameKind::Whack => Box::new(WhackGame::new(self.config.whack.clone(), store, seed)),
        };

        if let Some(previous) = self.active.replace(game) {
            log::info!("Switched from {} to {}", previous.kind().as_str(), kind.as_str());
        } else {
            log::info!("Selected {}", kind.as_str());
        }
        self.prompted = None;
        self.publish();
    }

    /// Route one player action. False if rejected or no game is selected.
    pub fn on_input(&mut self, action: Action) -> bool {
        let Some(game) = self.active.as_mut() else {
            return false;
        };
        let accepted = game.handle(&action);
        if accepted {
            self.publish();
        }
        accepted
    }

    /// One display refresh for continuous games
    pub fn on_frame(&mut self) -> bool {
        let Some(game) = self.active.as_mut() else {
            return false;
        };
        let stepped = game.frame();
        if stepped {
            self.publish();
        }
        stepped
    }

    /// Feed elapsed wall-clock time to the active game's timers
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        let Some(game) = self.active.as_mut() else {
            return false;
        };
        let ticked = game.advance(dt_ms);
        if ticked {
            self.publish();
        }
        ticked
    }

    fn publish(&mut self) {
        let Some(game) = self.active.as_mut() else {
            return;
        };

        if let Some(error) = game.take_store_error() {
            self.presenter.on_persistence_error(game.kind(), &error);
        }

        let pending = game.pending_confirmation();
        if pending != self.prompted {
            if let Some(level) = pending {
                self.presenter.on_confirmation_required(level);
            }
            self.prompted = pending;
        }

        let snapshot = game.snapshot();
        self.presenter.on_state_changed(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::Lifecycle;

    #[derive(Default)]
    struct Recorder {
        snapshots: Vec<Snapshot>,
        errors: Vec<(GameKind, String)>,
        prompts: Vec<Difficulty>,
    }

    impl Presenter for Recorder {
        fn on_state_changed(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.clone());
        }

        fn on_persistence_error(&mut self, kind: GameKind, error: &StoreError) {
            self.errors.push((kind, error.to_string()));
        }

        fn on_confirmation_required(&mut self, level: Difficulty) {
            self.prompts.push(level);
        }
    }

    fn cabinet() -> (Cabinet<MemoryStore, Recorder>, MemoryStore) {
        let store = MemoryStore::new();
        let cab = Cabinet::new(ArcadeConfig::default(), store.clone(), Recorder::default(), 11);
        (cab, store)
    }

    #[test]
    fn test_input_without_game_is_ignored() {
        let (mut cab, _) = cabinet();
        assert!(!cab.on_input(Action::Start));
        assert!(!cab.advance(100));
        assert!(cab.presenter().snapshots.is_empty());
    }

    #[test]
    fn test_select_publishes_idle_snapshot() {
        let (mut cab, _) = cabinet();
        cab.select(GameKind::Snake);
        let last = cab.presenter().snapshots.last().unwrap();
        assert_eq!(last.kind(), GameKind::Snake);
        assert_eq!(last.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn test_rejected_input_publishes_nothing() {
        let (mut cab, _) = cabinet();
        cab.select(GameKind::TicTacToe);
        let count = cab.presenter().snapshots.len();
        assert!(!cab.on_input(Action::CellSelect(0)));
        assert_eq!(cab.presenter().snapshots.len(), count);
    }

    #[test]
    fn test_switching_games_drops_old_session() {
        let (mut cab, _) = cabinet();
        cab.select(GameKind::Whack);
        cab.on_input(Action::Start);
        cab.advance(3000);
        cab.select(GameKind::Memory);
        assert_eq!(cab.active_kind(), Some(GameKind::Memory));

        // Nothing from the whack-a-mole session survives
        cab.advance(60_000);
        let snap = cab.snapshot().unwrap();
        assert_eq!(snap.kind(), GameKind::Memory);
        assert_eq!(snap.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn test_store_failure_reported_once() {
        let (mut cab, store) = cabinet();
        store.fail_writes(true);
        cab.select(GameKind::TicTacToe);
        cab.on_input(Action::Start);
        for cell in [0, 4, 1, 5, 2] {
            cab.on_input(Action::CellSelect(cell));
        }
        assert_eq!(cab.presenter().errors.len(), 1);
        assert_eq!(cab.presenter().errors[0].0, GameKind::TicTacToe);

        cab.on_input(Action::Restart);
        assert_eq!(cab.presenter().errors.len(), 1);
    }

    #[test]
    fn test_confirmation_prompt_announced_once() {
        let (mut cab, _) = cabinet();
        cab.select(GameKind::Memory);
        cab.on_input(Action::Start);
        cab.on_input(Action::DifficultyChange(Difficulty::Hard));
        cab.advance(1000);
        assert_eq!(cab.presenter().prompts, vec![Difficulty::Hard]);

        cab.on_input(Action::ConfirmDestructiveChange);
        let Some(Snapshot::Memory(snap)) = cab.snapshot() else {
            panic!("memory not active");
        };
        assert_eq!(snap.cards.len(), 36);
        assert_eq!(snap.pending_difficulty, None);
    }

    #[test]
    fn test_frames_only_drive_pong() {
        let (mut cab, _) = cabinet();
        cab.select(GameKind::Snake);
        cab.on_input(Action::Start);
        assert!(!cab.on_frame());

        cab.select(GameKind::Pong);
        cab.on_input(Action::Start);
        assert!(cab.on_frame());
    }
}
