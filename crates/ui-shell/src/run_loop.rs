//! Host-pumped deferred execution.
//!
//! The router never blocks and never spawns threads: anything delayed (a
//! `delay=` schema, a transition-completion hook) is queued here and runs
//! when the host pumps the loop. Time is virtual, which keeps delayed
//! dispatch deterministic under test; a host that wants wall-clock behavior
//! advances the loop by real elapsed time each frame.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

type Callback = Box<dyn FnOnce()>;

struct Scheduled {
    due: f64,
    seq: u64,
    callback: Callback,
}

#[derive(Default)]
struct Inner {
    now: f64,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

/// Single-threaded deferred-execution queue with a virtual clock.
///
/// Cheap to clone; clones share the same queue. Callbacks may schedule
/// further callbacks (completion chains re-enter the router through here),
/// so the queue is never borrowed while a callback runs.
#[derive(Clone, Default)]
pub struct RunLoop {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RunLoop")
            .field("now", &inner.now)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl RunLoop {
    /// Create an empty run loop at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in seconds.
    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Queue a callback to run `delay` seconds from now.
    ///
    /// A non-positive delay means "next turn of the loop": the callback
    /// never runs inline with the caller, only from [`Self::drain`] or
    /// [`Self::advance`].
    pub fn schedule(&self, delay: f64, callback: impl FnOnce() + 'static) {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay.max(0.0);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        trace!(due, seq, "scheduling deferred callback");
        inner.pending.push(Scheduled {
            due,
            seq,
            callback: Box::new(callback),
        });
    }

    /// Advance the virtual clock by `secs`, firing everything that comes
    /// due along the way in schedule order.
    pub fn advance(&self, secs: f64) {
        let target = self.inner.borrow().now + secs.max(0.0);
        self.run_due(target);
        self.inner.borrow_mut().now = target;
    }

    /// Fire everything already due without moving the clock. Callbacks
    /// scheduled with zero delay by a firing callback run in the same
    /// drain.
    pub fn drain(&self) {
        let now = self.inner.borrow().now;
        self.run_due(now);
    }

    fn run_due(&self, target: f64) {
        loop {
            // Take exactly one due callback per iteration so the queue is
            // free while it runs; callbacks re-enter schedule().
            let next = {
                let mut inner = self.inner.borrow_mut();
                let idx = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.due
                            .partial_cmp(&b.due)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.seq.cmp(&b.seq))
                    })
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let scheduled = inner.pending.swap_remove(i);
                        inner.now = inner.now.max(scheduled.due);
                        Some(scheduled)
                    }
                    None => None,
                }
            };
            match next {
                Some(scheduled) => (scheduled.callback)(),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_zero_delay_runs_on_drain_not_inline() {
        let fired = Rc::new(Cell::new(false));
        let run_loop = RunLoop::new();
        let flag = fired.clone();
        run_loop.schedule(0.0, move || flag.set(true));
        assert!(!fired.get());
        run_loop.drain();
        assert!(fired.get());
    }

    #[test]
    fn test_delay_fires_only_after_advance() {
        let fired = Rc::new(Cell::new(false));
        let run_loop = RunLoop::new();
        let flag = fired.clone();
        run_loop.schedule(2.0, move || flag.set(true));
        run_loop.advance(1.0);
        assert!(!fired.get());
        run_loop.advance(1.0);
        assert!(fired.get());
    }

    #[test]
    fn test_callbacks_fire_in_due_then_schedule_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let run_loop = RunLoop::new();
        for (delay, tag) in [(2.0, "late"), (1.0, "early"), (1.0, "early2")] {
            let order = order.clone();
            run_loop.schedule(delay, move || order.borrow_mut().push(tag));
        }
        run_loop.advance(3.0);
        assert_eq!(*order.borrow(), vec!["early", "early2", "late"]);
    }

    #[test]
    fn test_callback_may_schedule_followup() {
        let count = Rc::new(Cell::new(0));
        let run_loop = RunLoop::new();
        let inner_loop = run_loop.clone();
        let counter = count.clone();
        run_loop.schedule(0.0, move || {
            counter.set(counter.get() + 1);
            let counter = counter.clone();
            inner_loop.schedule(0.0, move || counter.set(counter.get() + 1));
        });
        run_loop.drain();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_weak_target_after_drop_is_noop() {
        let target = Rc::new(Cell::new(0));
        let weak = Rc::downgrade(&target);
        let run_loop = RunLoop::new();
        run_loop.schedule(1.0, move || {
            if let Some(target) = weak.upgrade() {
                target.set(target.get() + 1);
            }
        });
        drop(target);
        run_loop.advance(1.0);
        // Nothing to assert beyond "did not panic": the upgrade failed.
        assert_eq!(run_loop.pending(), 0);
    }
}
