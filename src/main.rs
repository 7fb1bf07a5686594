//! Pocket Arcade entry point
//!
//! The browser build is driven from `platform::web`. Natively this runs a
//! short headless session of every game through the cabinet, logging each
//! state change and persisting records under `./scores`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use pocket_arcade::games::{Card, Direction, PaddleIntent};
    use pocket_arcade::platform;
    use pocket_arcade::sim::{GameRng, Lifecycle};
    use pocket_arcade::{
        Action, ArcadeConfig, Cabinet, Difficulty, GameKind, Presenter, ScoreStore, Snapshot,
    };

    /// Logs lifecycle changes and final results
    #[derive(Default)]
    struct LogPresenter {
        last: Option<(GameKind, Lifecycle)>,
        updates: u64,
    }

    impl Presenter for LogPresenter {
        fn on_state_changed(&mut self, snapshot: &Snapshot) {
            self.updates += 1;
            let key = (snapshot.kind(), snapshot.lifecycle());
            if self.last == Some(key) {
                return;
            }
            self.last = Some(key);
            log::info!("{} is {}", key.0.as_str(), key.1.as_str());

            if key.1 == Lifecycle::Ended {
                match snapshot {
                    Snapshot::Memory(s) => {
                        log::info!("  cleared in {} moves, {}ms", s.moves, s.elapsed_ms)
                    }
                    Snapshot::Pong(s) => log::info!("  final {} - {}", s.player_score, s.ai_score),
                    Snapshot::Snake(s) => {
                        log::info!("  score {} (best {})", s.score, s.record.high_score)
                    }
                    Snapshot::TicTacToe(s) => log::info!("  {:?}", s.outcome),
                    Snapshot::Whack(s) => log::info!("  {} points from {} hits", s.score, s.hits),
                }
            }
        }

        fn on_confirmation_required(&mut self, level: Difficulty) {
            log::info!("Switching to {} would discard the current board", level.as_str());
        }
    }

    type Arcade<S> = Cabinet<S, LogPresenter>;

    /// Next two cards to flip for a player with perfect recall
    fn pick_pair(cards: &[Card], seen: &[Option<u8>]) -> Option<(usize, usize)> {
        let hidden: Vec<usize> = (0..cards.len())
            .filter(|&i| !cards[i].matched && !cards[i].face_up)
            .collect();
        let known = hidden.iter().find_map(|&a| {
            let symbol = seen[a]?;
            let b = hidden.iter().find(|&&b| b != a && seen[b] == Some(symbol))?;
            Some((a, *b))
        });
        known.or_else(|| {
            let mut fresh = hidden.iter().filter(|&&i| seen[i].is_none());
            let a = *fresh.next()?;
            let b = fresh.next().or_else(|| hidden.iter().find(|&&i| i != a))?;
            Some((a, *b))
        })
    }

    fn play_memory<S: ScoreStore + Clone + 'static>(arcade: &mut Arcade<S>) {
        arcade.select(GameKind::Memory);
        arcade.on_input(Action::DifficultyChange(Difficulty::Easy));
        arcade.on_input(Action::Start);

        let mut seen: Vec<Option<u8>> = Vec::new();
        while let Some(Snapshot::Memory(snap)) = arcade.snapshot() {
            if snap.lifecycle != Lifecycle::Running {
                break;
            }
            seen.resize(snap.cards.len(), None);
            let Some((a, b)) = pick_pair(&snap.cards, &seen) else {
                break;
            };
            for index in [a, b] {
                arcade.on_input(Action::CellSelect(index));
                seen[index] = Some(snap.cards[index].symbol);
            }
            arcade.advance(1000);
        }
    }

    fn play_pong<S: ScoreStore + Clone + 'static>(arcade: &mut Arcade<S>) {
        arcade.select(GameKind::Pong);
        arcade.on_input(Action::Start);
        // Hold the paddle up for a moment, then leave it; the AI usually wins
        arcade.on_input(Action::Paddle {
            intent: PaddleIntent::Up,
            pressed: true,
        });
        for _ in 0..20 {
            arcade.on_frame();
        }
        arcade.on_input(Action::Paddle {
            intent: PaddleIntent::Up,
            pressed: false,
        });
        for _ in 0..200_000 {
            arcade.advance(16);
            if !arcade.on_frame() {
                break;
            }
        }
    }

    fn play_snake<S: ScoreStore + Clone + 'static>(arcade: &mut Arcade<S>, rng: &mut GameRng) {
        const TURNS: [Direction; 4] = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];
        arcade.select(GameKind::Snake);
        arcade.on_input(Action::Start);
        arcade.on_input(Action::Steer(Direction::Right));
        for _ in 0..2_000 {
            if rng.below(6) == 0 {
                arcade.on_input(Action::Steer(TURNS[rng.below(TURNS.len())]));
            }
            if !arcade.advance(50) {
                break;
            }
        }
    }

    fn play_tictactoe<S: ScoreStore + Clone + 'static>(arcade: &mut Arcade<S>) {
        arcade.select(GameKind::TicTacToe);
        arcade.on_input(Action::Start);
        for cell in [4, 0, 2, 6, 3, 5, 1, 7, 8] {
            arcade.on_input(Action::CellSelect(cell));
        }
    }

    fn play_whack<S: ScoreStore + Clone + 'static>(arcade: &mut Arcade<S>, rng: &mut GameRng) {
        arcade.select(GameKind::Whack);
        arcade.on_input(Action::Start);
        while arcade.advance(100) {
            // A player who reacts most of the time
            if let Some(Snapshot::Whack(snap)) = arcade.snapshot() {
                if let Some(mole) = snap.mole {
                    if rng.below(4) != 0 {
                        arcade.on_input(Action::HoleHit(mole.hole));
                    }
                }
            }
        }
    }

    pub fn run() {
        platform::init_logging();
        log::info!("Pocket Arcade (native) starting...");

        let config = match std::env::args().nth(1) {
            Some(path) => ArcadeConfig::load_from(&PathBuf::from(path)),
            None => ArcadeConfig::default(),
        };

        let mut rng = GameRng::from_entropy();
        log::info!("Seed {}", rng.seed());
        let store = platform::default_store();
        log::info!("Scores in {}", store.dir().display());

        let mut arcade = Cabinet::new(config, store, LogPresenter::default(), rng.next_seed());
        play_memory(&mut arcade);
        play_pong(&mut arcade);
        play_snake(&mut arcade, &mut rng);
        play_tictactoe(&mut arcade);
        play_whack(&mut arcade, &mut rng);

        log::info!("{} state updates published", arcade.presenter().updates);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
