//! Memory match
//!
//! Flip two cards per move. Equal symbols lock in after a short settle,
//! different ones flip back after a longer one. No third card is accepted
//! while a pair is settling. Clearing the board wins.

use serde::Serialize;

use super::{Action, Game, GameKind, Outcome, Snapshot};
use crate::error::StoreError;
use crate::persistence::{ScoreStore, Scoreboard};
use crate::records::MemoryRecord;
use crate::settings::{Difficulty, MemoryParams};
use crate::sim::{
    Cadence, GameRng, Lifecycle, PairOutcome, Scheduler, StateMachine, TimerHandle, Transition,
    evaluate_pair,
};

/// Glyphs for symbol ids, enough for the hardest board
pub const SYMBOLS: [&str; 18] = [
    "🎮", "🎲", "🎯", "🎪", "🎨", "🎭", "🎵", "🎸", "🎺", "🎻", "🎼", "🎹", "🎤", "🎧", "🎬",
    "🎳", "🎰", "🎱",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Index into [`SYMBOLS`]
    pub symbol: u8,
    pub face_up: bool,
    /// Never unset once true
    pub matched: bool,
}

impl Card {
    fn new(symbol: u8) -> Self {
        Self {
            symbol,
            face_up: false,
            matched: false,
        }
    }

    pub fn glyph(&self) -> &'static str {
        SYMBOLS[self.symbol as usize % SYMBOLS.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoryTimer {
    /// Display clock refresh
    Clock,
    /// Pair comparison finished
    Settle(PairOutcome),
}

#[derive(Debug)]
struct MemorySession {
    cards: Vec<Card>,
    /// Face-up, unmatched selections (at most two)
    selected: Vec<usize>,
    moves: u32,
    matched_pairs: usize,
    /// Elapsed time as of the last clock tick
    clock_ms: u64,
    /// Elapsed time frozen at the win
    finished_ms: Option<u64>,
    settle: Option<TimerHandle>,
    timers: Scheduler<MemoryTimer>,
}

impl MemorySession {
    fn deal(difficulty: Difficulty, rng: &mut GameRng) -> Self {
        let pairs = difficulty.pair_count().min(SYMBOLS.len());
        let mut cards: Vec<Card> = (0..pairs as u8)
            .chain(0..pairs as u8)
            .map(Card::new)
            .collect();
        rng.shuffle(&mut cards);
        log::debug!("Dealt {} cards ({})", cards.len(), difficulty.as_str());

        Self {
            cards,
            selected: Vec::with_capacity(2),
            moves: 0,
            matched_pairs: 0,
            clock_ms: 0,
            finished_ms: None,
            settle: None,
            timers: Scheduler::new(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.finished_ms.unwrap_or_else(|| self.timers.now_ms())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub lifecycle: Lifecycle,
    pub difficulty: Difficulty,
    pub pending_difficulty: Option<Difficulty>,
    pub cards: Vec<Card>,
    pub columns: usize,
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    /// A pair is face up and waiting to settle
    pub settling: bool,
    pub elapsed_ms: u64,
    /// Elapsed time as last refreshed by the display clock
    pub clock_ms: u64,
    pub outcome: Option<Outcome>,
    pub record: MemoryRecord,
}

#[derive(Debug)]
pub struct MemoryGame {
    params: MemoryParams,
    difficulty: Difficulty,
    pending_difficulty: Option<Difficulty>,
    machine: StateMachine,
    session: MemorySession,
    rng: GameRng,
    scores: Scoreboard<MemoryRecord>,
}

impl MemoryGame {
    pub fn new(params: MemoryParams, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let difficulty = params.difficulty;
        let session = MemorySession::deal(difficulty, &mut rng);
        Self {
            params,
            difficulty,
            pending_difficulty: None,
            machine: StateMachine::new(),
            session,
            rng,
            scores: Scoreboard::load(store),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn cards(&self) -> &[Card] {
        &self.session.cards
    }

    pub fn record(&self) -> &MemoryRecord {
        self.scores.record()
    }

    fn total_pairs(&self) -> usize {
        self.session.cards.len() / 2
    }

    fn arm_clock(&mut self) {
        let interval = self.params.clock_interval_ms;
        self.session.timers.after(interval, MemoryTimer::Clock);
    }

    /// Re-evaluate the face-up pair and arm its settle timer
    fn arm_settle(&mut self) {
        if let [a, b] = self.session.selected[..] {
            let outcome = evaluate_pair(self.session.cards[a].symbol, self.session.cards[b].symbol);
            let delay = match outcome {
                PairOutcome::Match => self.params.match_settle_ms,
                PairOutcome::Mismatch => self.params.mismatch_settle_ms,
            };
            self.session.settle = Some(self.session.timers.after(delay, MemoryTimer::Settle(outcome)));
        }
    }

    fn select(&mut self, index: usize) -> bool {
        let session = &mut self.session;
        if session.selected.len() >= 2 {
            return false;
        }
        let Some(card) = session.cards.get_mut(index) else {
            return false;
        };
        if card.face_up || card.matched {
            return false;
        }

        card.face_up = true;
        session.selected.push(index);

        if session.selected.len() == 2 {
            session.moves += 1;
            self.arm_settle();
        }
        true
    }

    fn on_timer(&mut self, timer: MemoryTimer) {
        match timer {
            MemoryTimer::Clock => {
                self.session.clock_ms = self.session.timers.now_ms();
                self.arm_clock();
            }
            MemoryTimer::Settle(outcome) => {
                self.session.settle = None;
                let pair: Vec<usize> = self.session.selected.drain(..).collect();
                for index in pair {
                    let card = &mut self.session.cards[index];
                    match outcome {
                        PairOutcome::Match => card.matched = true,
                        PairOutcome::Mismatch => card.face_up = false,
                    }
                }
                if outcome == PairOutcome::Match {
                    self.session.matched_pairs += 1;
                }
                if let Some(outcome) = self.outcome() {
                    self.finish(outcome);
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if !self.machine.fire(Transition::Finish) {
            return;
        }
        self.session.timers.cancel_all();
        let elapsed = self.session.timers.now_ms();
        let moves = self.session.moves;
        self.session.finished_ms = Some(elapsed);
        self.session.clock_ms = elapsed;
        log::info!("Memory {:?} in {elapsed}ms with {moves} moves", outcome);
        self.scores.commit(|r| r.record_win(elapsed, moves));
    }

    /// Lay out a fresh board without starting it
    fn redeal_idle(&mut self) {
        self.session = MemorySession::deal(self.difficulty, &mut self.rng);
        self.machine.reset();
    }
}

impl Game for MemoryGame {
    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    fn cadence(&self) -> Cadence {
        Cadence::EventDriven
    }

    fn lifecycle(&self) -> Lifecycle {
        self.machine.state()
    }

    fn outcome(&self) -> Option<Outcome> {
        let total = self.total_pairs();
        (total > 0 && self.session.matched_pairs == total).then_some(Outcome::Won)
    }

    fn start(&mut self) -> bool {
        if !self.machine.fire(Transition::Start) {
            return false;
        }
        log::info!("Memory started ({})", self.difficulty.as_str());
        self.arm_clock();
        true
    }

    fn pause(&mut self) -> bool {
        if !self.machine.fire(Transition::Pause) {
            return false;
        }
        self.session.timers.cancel_all();
        self.session.settle = None;
        true
    }

    fn resume(&mut self) -> bool {
        if !self.machine.fire(Transition::Resume) {
            return false;
        }
        self.arm_clock();
        self.arm_settle();
        true
    }

    fn restart(&mut self) -> bool {
        if !self.machine.allows(Transition::Restart) {
            return false;
        }
        self.session = MemorySession::deal(self.difficulty, &mut self.rng);
        self.pending_difficulty = None;
        self.machine.fire(Transition::Restart);
        log::info!("Memory restarted ({})", self.difficulty.as_str());
        self.arm_clock();
        true
    }

    fn play(&mut self, action: &Action) -> bool {
        match *action {
            Action::CellSelect(index) => self.select(index),
            _ => false,
        }
    }

    fn configure(&mut self, action: &Action) -> bool {
        match *action {
            Action::DifficultyChange(level) => {
                if self.machine.is_active() {
                    // Destructive mid-session: hold until confirmed
                    if level == self.difficulty {
                        // Back to the current level: nothing left to confirm
                        return self.pending_difficulty.take().is_some();
                    }
                    self.pending_difficulty = Some(level);
                    log::info!("Difficulty change to {} awaiting confirmation", level.as_str());
                    true
                } else {
                    if level == self.difficulty {
                        return false;
                    }
                    self.difficulty = level;
                    self.redeal_idle();
                    true
                }
            }
            Action::ConfirmDestructiveChange => {
                let Some(level) = self.pending_difficulty.take() else {
                    return false;
                };
                self.difficulty = level;
                if self.machine.allows(Transition::Restart) {
                    self.restart()
                } else {
                    self.redeal_idle();
                    true
                }
            }
            Action::DeclineDestructiveChange => self.pending_difficulty.take().is_some(),
            _ => false,
        }
    }

    fn pending_confirmation(&self) -> Option<Difficulty> {
        self.pending_difficulty
    }

    fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        let until = self.session.timers.deadline(dt_ms);
        while self.machine.is_running() {
            let Some(timer) = self.session.timers.pop_due(until) else {
                break;
            };
            self.on_timer(timer);
        }
        if self.machine.is_running() {
            self.session.timers.rest_at(until);
        }
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Memory(MemorySnapshot {
            lifecycle: self.machine.state(),
            difficulty: self.difficulty,
            pending_difficulty: self.pending_difficulty,
            cards: self.session.cards.clone(),
            columns: self.difficulty.columns(),
            moves: self.session.moves,
            matched_pairs: self.session.matched_pairs,
            total_pairs: self.total_pairs(),
            settling: self.session.settle.is_some() || self.session.selected.len() == 2,
            elapsed_ms: self.session.elapsed_ms(),
            clock_ms: self.session.clock_ms,
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
