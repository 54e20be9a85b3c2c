//! Repeating timers.
//!
//! The hero's auto-rotation is the only asynchronous thing on the page. It is
//! modeled as "every `period` logical milliseconds, fire timer `id`", behind the
//! [`Scheduler`] trait so the browser can back it with `setInterval` and tests
//! can drive it deterministically with [`ManualScheduler`].

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle for an armed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

pub trait Scheduler {
    /// Arm a repeating interval. The first fire is one `period` from now.
    fn set_interval(&mut self, period: Duration) -> TimerId;
    /// Cancel an interval. Unknown or already-cleared ids are ignored.
    fn clear_interval(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    next_due: Duration,
}

/// Logical clock with explicit time advancement.
///
/// Time only moves when the owner calls [`ManualScheduler::fire_next`] or
/// [`ManualScheduler::settle`]. Fires are yielded one at a time so the caller
/// can run the timer's handler before asking for the next one; a handler that
/// clears an interval is therefore seen by every later fire.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<TimerId, Interval>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed intervals.
    pub fn active(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.intervals.contains_key(&id)
    }

    /// Pop the earliest fire due at or before `deadline`.
    ///
    /// Advances `now` to the fire time and re-arms the interval one period
    /// later. Ties go to the lower timer id.
    pub fn fire_next(&mut self, deadline: Duration) -> Option<TimerId> {
        let (id, due) = self
            .intervals
            .iter()
            .filter(|(_, iv)| iv.next_due <= deadline)
            .min_by_key(|(id, iv)| (iv.next_due, **id))
            .map(|(id, iv)| (*id, iv.next_due))?;

        self.now = due;
        if let Some(iv) = self.intervals.get_mut(&id) {
            iv.next_due = due + iv.period;
        }
        let at_ms = due.as_millis() as u64;
        tracing::trace!(timer = id.0, at_ms, "interval fired");
        Some(id)
    }

    /// Move `now` forward to `deadline` once every due fire has been popped.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl Scheduler for ManualScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        // A zero period would fire forever without time moving.
        let period = period.max(Duration::from_millis(1));
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.insert(
            id,
            Interval {
                period,
                next_due: self.now + period,
            },
        );
        let period_ms = period.as_millis() as u64;
        tracing::trace!(timer = id.0, period_ms, "interval armed");
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        if self.intervals.remove(&id).is_some() {
            tracing::trace!(timer = id.0, "interval cleared");
        }
    }
}
