//! Session lifecycle shared by every game
//!
//! A single tagged state rather than separate active/paused flags, so
//! combinations like "paused while idle" cannot be expressed.

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Board laid out, waiting for start
    #[default]
    Idle,
    /// Accepting input and ticks
    Running,
    /// Frozen, all timers cancelled
    Paused,
    /// Terminal condition reached (win/lose/draw/timeout)
    Ended,
}

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Finish,
    Restart,
}

impl Lifecycle {
    /// Total transition function. `None` means the pair is undefined and the
    /// event must be ignored.
    pub fn apply(self, transition: Transition) -> Option<Lifecycle> {
        use Lifecycle::*;
        use Transition::*;
        match (self, transition) {
            (Idle, Start) => Some(Running),
            (Running, Pause) => Some(Paused),
            (Paused, Resume) => Some(Running),
            (Running, Finish) => Some(Ended),
            (Running | Paused | Ended, Restart) => Some(Running),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Running => "running",
            Lifecycle::Paused => "paused",
            Lifecycle::Ended => "ended",
        }
    }
}

/// Lifecycle gate owned by an engine
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: Lifecycle,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == Lifecycle::Running
    }

    /// Session exists and has not ended (running or paused)
    pub fn is_active(&self) -> bool {
        matches!(self.state, Lifecycle::Running | Lifecycle::Paused)
    }

    /// Fire a transition; returns false (and changes nothing) if undefined
    pub fn fire(&mut self, transition: Transition) -> bool {
        match self.state.apply(transition) {
            Some(next) => {
                log::debug!(
                    "lifecycle {} --{:?}--> {}",
                    self.state.as_str(),
                    transition,
                    next.as_str()
                );
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Would this transition be accepted right now
    pub fn allows(&self, transition: Transition) -> bool {
        self.state.apply(transition).is_some()
    }

    /// Drop back to `Idle` (new board laid out, nothing started)
    pub fn reset(&mut self) {
        self.state = Lifecycle::Idle;
    }
}
