//! Cancellable timers in session-local virtual time
//!
//! The host feeds wall-clock deltas to the engine, which drains due events
//! from here. Delayed work (snake steps, mole lifetimes, settle delays, the
//! per-second clock) is queued as a plain event value. Dropping the scheduler
//! or calling [`Scheduler::cancel_all`] guarantees no stale callback can reach
//! a later session.

/// How an engine is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// One fixed step per display refresh
    Continuous,
    /// Self re-arming timer with a delay that may change over the session
    FixedDelay,
    /// Advances only on player actions (plus a display-only clock)
    EventDriven,
}

/// Handle to a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<E> {
    handle: TimerHandle,
    due_ms: u64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time consumed so far
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Arm a one-shot timer, due at least 1ms out so a handler that re-arms
    /// itself always moves the clock forward
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due_ms: self.now_ms + delay_ms.max(1),
            event,
        });
        handle
    }

    /// Cancel one timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// End of a window `dt_ms` from now. Pull due events with
    /// [`Scheduler::pop_due`], then [`Scheduler::rest_at`] the deadline.
    /// Handlers may arm new timers between pulls; any that fall inside the
    /// window fire in the same pass.
    pub fn deadline(&self, dt_ms: u64) -> u64 {
        self.now_ms + dt_ms
    }

    /// Earliest event due at or before `until_ms` (ties by arming order);
    /// the clock jumps to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.handle.0))
            .map(|(i, _)| i)?;
        let fired = self.pending.remove(idx);
        self.now_ms = fired.due_ms;
        Some(fired.event)
    }

    /// Park the clock at the end of the window
    pub fn rest_at(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(sched: &mut Scheduler<&'static str>, dt: u64) -> Vec<&'static str> {
        let until = sched.deadline(dt);
        let mut fired = Vec::new();
        while let Some(ev) = sched.pop_due(until) {
            fired.push(ev);
        }
        sched.rest_at(until);
        fired
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        sched.after(300, "late");
        sched.after(100, "early");
        sched.after(100, "early-second");
        assert_eq!(drain(&mut sched, 50), Vec::<&str>::new());
        assert_eq!(drain(&mut sched, 300), vec!["early", "early-second", "late"]);
        assert_eq!(sched.now_ms(), 350);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let a = sched.after(100, "a");
        sched.after(100, "b");
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert!(!sched.is_pending(a));
        assert_eq!(drain(&mut sched, 200), vec!["b"]);
    }

    #[test]
    fn test_cancel_all_drops_everything() {
        let mut sched = Scheduler::new();
        sched.after(10, "a");
        sched.after(20, "b");
        sched.cancel_all();
        assert_eq!(drain(&mut sched, 1000), Vec::<&str>::new());
    }

    #[test]
    fn test_rearm_inside_window() {
        // Self re-arming 150ms tick across a 400ms advance fires twice
        let mut sched = Scheduler::new();
        sched.after(150, "tick");
        let until = sched.deadline(400);
        let mut count = 0;
        while sched.pop_due(until).is_some() {
            count += 1;
            sched.after(150, "tick");
        }
        sched.rest_at(until);
        assert_eq!(count, 2);
        assert_eq!(sched.now_ms(), 400);
        assert_eq!(sched.pending(), 1);
        // Remaining tick due at 450
        assert_eq!(drain(&mut sched, 50), vec!["tick"]);
    }

    #[test]
    fn test_zero_delay_still_moves_forward() {
        let mut sched = Scheduler::new();
        sched.after(0, "tick");
        let until = sched.deadline(16);
        let mut count = 0;
        while sched.pop_due(until).is_some() {
            count += 1;
            sched.after(0, "tick");
        }
        sched.rest_at(until);
        assert_eq!(count, 16);
        assert_eq!(sched.now_ms(), 16);
    }
}
