use std::time::Duration;

/// Identifies one mount of a screen. Tasks scheduled from a scope only run while it is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    scope: ScopeId,
    task: T,
}

/// Fire-and-forget one-shot timers on the card clock.
///
/// There is no cancellation: every scheduled task eventually comes due. Tasks whose scope has
/// been torn down by then are discarded instead of run.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, scope: ScopeId, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: now.saturating_add(delay),
            seq,
            scope,
            task,
        });
    }

    /// Removes every task due at or before `now`, in deadline order (ties in scheduling order).
    ///
    /// Tasks from scopes rejected by `is_live` are dropped; the rest are returned to be run.
    pub fn advance(&mut self, now: Duration, is_live: impl Fn(ScopeId) -> bool) -> Vec<T>
    where
        T: std::fmt::Debug,
    {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| (s.due, s.seq));

        due.into_iter()
            .filter_map(|s| {
                if is_live(s.scope) {
                    Some(s.task)
                } else {
                    tracing::debug!(task = ?s.task, scope = s.scope.0, "dropping timer from torn-down scope");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    const LIVE: ScopeId = ScopeId(1);
    const DEAD: ScopeId = ScopeId(0);

    #[test]
    fn tasks_fire_once_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(0), ms(300), LIVE, "b");
        s.schedule(ms(0), ms(100), LIVE, "a");
        s.schedule(ms(50), ms(250), LIVE, "c");

        assert!(s.advance(ms(99), |_| true).is_empty());
        assert_eq!(s.advance(ms(300), |_| true), vec!["a", "b", "c"]);
        assert!(s.advance(ms(10_000), |_| true).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(0), ms(100), LIVE, 1);
        s.schedule(ms(0), ms(100), LIVE, 2);
        s.schedule(ms(0), ms(100), LIVE, 3);
        assert_eq!(s.advance(ms(100), |_| true), vec![1, 2, 3]);
    }

    #[test]
    fn torn_down_scope_turns_tasks_into_no_ops() {
        let mut s = Scheduler::new();
        s.schedule(ms(0), ms(100), DEAD, "stale");
        s.schedule(ms(0), ms(100), LIVE, "fresh");

        assert_eq!(s.advance(ms(100), |scope| scope == LIVE), vec!["fresh"]);
        assert!(s.is_empty());
    }
}
