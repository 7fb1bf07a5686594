//! Tic-tac-toe, two players on one board
//!
//! X always opens. After each claim the board is checked for a line first and
//! a draw second.

use serde::Serialize;

use super::{Action, Game, GameKind, Outcome, Snapshot};
use crate::error::StoreError;
use crate::persistence::{ScoreStore, Scoreboard};
use crate::records::TicTacToeRecord;
use crate::sim::{BoardOutcome, Cadence, Lifecycle, Mark, StateMachine, Transition, evaluate_board};

#[derive(Debug, Clone)]
struct TicTacToeSession {
    board: [Mark; 9],
    current: Mark,
    result: BoardOutcome,
    elapsed_ms: u64,
}

impl TicTacToeSession {
    fn new() -> Self {
        Self {
            board: [Mark::Empty; 9],
            current: Mark::X,
            result: BoardOutcome::Open,
            elapsed_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicTacToeSnapshot {
    pub lifecycle: Lifecycle,
    pub board: [Mark; 9],
    /// Whose turn it is (or who moved last once ended)
    pub current: Mark,
    pub winning_line: Option<[usize; 3]>,
    pub outcome: Option<Outcome>,
    pub elapsed_ms: u64,
    pub record: TicTacToeRecord,
}

#[derive(Debug)]
pub struct TicTacToeGame {
    machine: StateMachine,
    session: TicTacToeSession,
    scores: Scoreboard<TicTacToeRecord>,
}

impl TicTacToeGame {
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self {
            machine: StateMachine::new(),
            session: TicTacToeSession::new(),
            scores: Scoreboard::load(store),
        }
    }

    pub fn board(&self) -> &[Mark; 9] {
        &self.session.board
    }

    pub fn current(&self) -> Mark {
        self.session.current
    }

    pub fn record(&self) -> &TicTacToeRecord {
        self.scores.record()
    }

    fn claim(&mut self, index: usize) -> bool {
        let session = &mut self.session;
        match session.board.get(index) {
            Some(Mark::Empty) => {}
            _ => return false,
        }
        session.board[index] = session.current;
        session.result = evaluate_board(&session.board);

        match self.outcome() {
            Some(outcome) => self.finish(outcome),
            None => self.session.current = self.session.current.opponent(),
        }
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        if !self.machine.fire(Transition::Finish) {
            return;
        }
        log::info!("Tic-tac-toe ended: {:?}", outcome);
        let winner = match outcome {
            Outcome::Line(mark) => Some(mark),
            _ => None,
        };
        self.scores.commit(|r| r.record_result(winner));
    }
}

impl Game for TicTacToeGame {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn cadence(&self) -> Cadence {
        Cadence::EventDriven
    }

    fn lifecycle(&self) -> Lifecycle {
        self.machine.state()
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.session.result {
            BoardOutcome::Win { mark, .. } => Some(Outcome::Line(mark)),
            BoardOutcome::Draw => Some(Outcome::Draw),
            BoardOutcome::Open => None,
        }
    }

    fn start(&mut self) -> bool {
        self.machine.fire(Transition::Start)
    }

    fn pause(&mut self) -> bool {
        self.machine.fire(Transition::Pause)
    }

    fn resume(&mut self) -> bool {
        self.machine.fire(Transition::Resume)
    }

    fn restart(&mut self) -> bool {
        if !self.machine.allows(Transition::Restart) {
            return false;
        }
        self.session = TicTacToeSession::new();
        self.machine.fire(Transition::Restart)
    }

    fn play(&mut self, action: &Action) -> bool {
        match *action {
            Action::CellSelect(index) => self.claim(index),
            _ => false,
        }
    }

    fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        self.session.elapsed_ms += dt_ms;
        true
    }

    fn snapshot(&self) -> Snapshot {
        let winning_line = match self.session.result {
            BoardOutcome::Win { line, .. } => Some(line),
            _ => None,
        };
        Snapshot::TicTacToe(TicTacToeSnapshot {
            lifecycle: self.machine.state(),
            board: self.session.board,
            current: self.session.current,
            winning_line,
            outcome: self.outcome(),
            elapsed_ms: self.session.elapsed_ms,
            record: self.scores.record().clone(),
        })
    }

    fn take_store_error(&mut self) -> Option<StoreError> {
        self.scores.take_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn running() -> TicTacToeGame {
        let mut game = TicTacToeGame::new(Box::new(MemoryStore::new()));
        game.handle(&Action::Start);
        game
    }

    fn play_all(game: &mut TicTacToeGame, cells: &[usize]) {
        for &cell in cells {
            game.handle(&Action::CellSelect(cell));
        }
    }

    #[test]
    fn test_top_row_win() {
        let mut game = running();
        play_all(&mut game, &[0, 4, 1, 5, 2]);
        assert_eq!(game.lifecycle(), Lifecycle::Ended);
        assert_eq!(game.outcome(), Some(Outcome::Line(Mark::X)));
        assert_eq!(game.record().x, 1);
        let Snapshot::TicTacToe(snap) = game.snapshot() else {
            unreachable!()
        };
        assert_eq!(snap.winning_line, Some([0, 1, 2]));
    }

    #[test]
    fn test_draw() {
        let mut game = running();
        // X O X / X O O / O X X
        play_all(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(game.outcome(), Some(Outcome::Draw));
        assert_eq!(game.record().draw, 1);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut game = running();
        assert!(game.handle(&Action::CellSelect(4)));
        assert!(!game.handle(&Action::CellSelect(4)));
        assert_eq!(game.current(), Mark::O);
        assert!(!game.handle(&Action::CellSelect(9)));
    }

    #[test]
    fn test_no_moves_after_end() {
        let mut game = running();
        play_all(&mut game, &[0, 4, 1, 5, 2]);
        assert!(!game.handle(&Action::CellSelect(8)));
        assert_eq!(game.board()[8], Mark::Empty);
    }

    #[test]
    fn test_paused_rejects_claims() {
        let mut game = running();
        game.handle(&Action::Pause);
        assert!(!game.handle(&Action::CellSelect(0)));
        game.handle(&Action::Resume);
        assert!(game.handle(&Action::CellSelect(0)));
    }

    #[test]
    fn test_restart_clears_board_keeps_record() {
        let mut game = running();
        play_all(&mut game, &[3, 0, 4, 1, 5]);
        assert_eq!(game.record().x, 1);
        assert!(game.handle(&Action::Restart));
        assert!(game.board().iter().all(|m| m.is_empty()));
        assert_eq!(game.current(), Mark::X);
        assert_eq!(game.record().x, 1);
    }
}
