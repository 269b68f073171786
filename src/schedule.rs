//! Deterministic timers.
//!
//! The engine never sleeps or spawns: the host passes the current time (in
//! abstract units, milliseconds in a browser) and asks for the tasks that
//! are due. Re-arming a timer means cancelling its token and scheduling a
//! new one.

use std::collections::{BTreeMap, HashMap};

/// Time in abstract units.
pub type Time = u64;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Pending tasks ordered by deadline, then by scheduling order.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_token: u64,
    queue: BTreeMap<(Time, TimerToken), T>,
    deadlines: HashMap<TimerToken, Time>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_token: 1,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `task` to fire at `at`.
    pub fn schedule(&mut self, at: Time, task: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.queue.insert((at, token), task);
        self.deadlines.insert(token, at);
        token
    }

    /// Cancel a pending task. Returns it if it had not fired yet.
    pub fn cancel(&mut self, token: TimerToken) -> Option<T> {
        let at = self.deadlines.remove(&token)?;
        self.queue.remove(&(at, token))
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.deadlines.contains_key(&token)
    }

    /// Remove and return every task whose deadline is at or before `now`.
    pub fn due(&mut self, now: Time) -> Vec<(TimerToken, T)> {
        let fired = match now.checked_add(1) {
            Some(after) => {
                let later = self.queue.split_off(&(after, TimerToken(0)));
                std::mem::replace(&mut self.queue, later)
            }
            None => std::mem::take(&mut self.queue),
        };
        fired
            .into_iter()
            .map(|((_, token), task)| {
                self.deadlines.remove(&token);
                (token, task)
            })
            .collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Time> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

/// Trailing-edge debouncer.
///
/// Every trigger pushes the deadline to `now + window`; the task only fires
/// once triggers stop for a whole window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Time,
    token: Option<TimerToken>,
}

impl Debouncer {
    pub fn new(window: Time) -> Self {
        Self {
            window,
            token: None,
        }
    }

    pub fn window(&self) -> Time {
        self.window
    }

    /// Cancel the pending firing (if any) and arm a new one.
    pub fn trigger<T>(&mut self, scheduler: &mut Scheduler<T>, now: Time, task: T) -> TimerToken {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
        let token = scheduler.schedule(now.saturating_add(self.window), task);
        self.token = Some(token);
        token
    }

    /// Whether `token` is this debouncer's current firing; forgets it if so.
    pub fn settle(&mut self, token: TimerToken) -> bool {
        if self.token == Some(token) {
            self.token = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }

    /// Forget the pending firing without touching the scheduler.
    pub fn reset(&mut self) {
        self.token = None;
    }
}
