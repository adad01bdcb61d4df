//! Deferred events with session epochs
//!
//! Timers are plain entries checked once per tick. Each entry remembers the
//! epoch it was scheduled in; entries from an older epoch are dropped when
//! they come due.

use super::state::GamePhase;

/// What a deferred entry does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Move to `to`, but only if the game is still in `from`
    Transition { from: GamePhase, to: GamePhase },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    due_ms: f64,
    epoch: u64,
    action: Deferred,
}

/// One-shot timer queue driven by the frame clock
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Session clock (ms since the session started)
    now_ms: f64,
    epoch: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate everything scheduled so far
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Schedule `action` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f32, action: Deferred) {
        self.entries.push(Entry {
            due_ms: self.now_ms + delay_ms as f64,
            epoch: self.epoch,
            action,
        });
    }

    /// Number of entries not yet fired
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Whether a live (current-epoch) entry matching `action` is pending
    pub fn is_pending(&self, action: Deferred) -> bool {
        self.entries
            .iter()
            .any(|e| e.epoch == self.epoch && e.action == action)
    }

    /// Advance the clock and return the due actions of the current epoch in
    /// the order they were due. Stale entries are discarded.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<Deferred> {
        self.now_ms += dt_ms as f64;

        let now = self.now_ms;
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.due_ms <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));

        let epoch = self.epoch;
        due.into_iter()
            .filter(|e| {
                let live = e.epoch == epoch;
                if !live {
                    log::debug!("Discarding stale {:?} from epoch {}", e.action, e.epoch);
                }
                live
            })
            .map(|e| e.action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVE: Deferred = Deferred::Transition {
        from: GamePhase::MakingDrink,
        to: GamePhase::ServingCustomer,
    };

    #[test]
    fn test_fires_after_delay() {
        let mut sched = Scheduler::new();
        sched.schedule(1500.0, SERVE);

        assert!(sched.advance(1000.0).is_empty());
        assert!(sched.is_pending(SERVE));
        assert_eq!(sched.advance(500.0), vec![SERVE]);
        assert_eq!(sched.pending(), 0);
        assert!(sched.advance(5000.0).is_empty());
    }

    #[test]
    fn test_stale_epoch_is_dropped() {
        let mut sched = Scheduler::new();
        sched.schedule(100.0, SERVE);
        sched.advance_epoch();
        assert!(!sched.is_pending(SERVE));
        assert!(sched.advance(200.0).is_empty());
        assert_eq!(sched.pending(), 0);
    }
}
