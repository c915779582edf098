//! Virtual-time timer queue.
//!
//! Nothing here reads a wall clock. The page advances `now` explicitly, which
//! keeps every animation deterministic under test.

use core_types::{Millis, TimerId, TimerKind};
use std::collections::{BTreeMap, HashMap};

use crate::animation::AnimationId;
use html::Id;

/// Work a timer performs when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Remove a transient node (ripple marker).
    RemoveNode(Id),
    /// Tick an animation state machine.
    Animation(AnimationId),
    /// Step the in-flight smooth scroll.
    ScrollFrame,
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    period: Option<Millis>,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_id: u64,
    next_seq: u64,
    // (due, seq): timers due at the same instant run in registration order.
    queue: BTreeMap<(Millis, u64), Timer>,
    slots: HashMap<TimerId, (Millis, u64)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn kind(&self, id: TimerId) -> Option<TimerKind> {
        let key = self.slots.get(&id)?;
        let timer = self.queue.get(key)?;
        Some(match timer.period {
            Some(_) => TimerKind::Interval,
            None => TimerKind::Timeout,
        })
    }

    fn insert(&mut self, due: Millis, timer: Timer) {
        let key = (due, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(timer.id, key);
        self.queue.insert(key, timer);
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    pub fn set_timeout(&mut self, delay: Millis, task: Task) -> TimerId {
        let id = self.allocate();
        self.insert(
            self.now.saturating_add(delay),
            Timer {
                id,
                period: None,
                task,
            },
        );
        id
    }

    /// A zero period is treated as one millisecond so an interval can never starve the clock.
    pub fn set_interval(&mut self, period: Millis, task: Task) -> TimerId {
        let id = self.allocate();
        let period = period.max(1);
        self.insert(
            self.now.saturating_add(period),
            Timer {
                id,
                period: Some(period),
                task,
            },
        );
        id
    }

    /// Cancels a timer. Returns `false` when it already fired (timeouts) or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.slots.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pops the earliest timer due at or before `deadline` and moves the clock to it.
    ///
    /// Intervals are re-armed before they are handed out, so a task may clear its own timer.
    pub fn pop_due(&mut self, deadline: Millis) -> Option<(TimerId, Task)> {
        let (&key, _) = self.queue.first_key_value()?;
        if key.0 > deadline {
            return None;
        }
        let timer = self.queue.remove(&key)?;
        self.slots.remove(&timer.id);
        self.now = self.now.max(key.0);
        let fired = (timer.id, timer.task);
        if let Some(period) = timer.period {
            self.insert(key.0.saturating_add(period), timer);
        }
        Some(fired)
    }

    /// Moves the clock forward without firing anything; never moves it backwards.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, deadline: Millis) -> Vec<(Millis, Task)> {
        let mut fired = Vec::new();
        while let Some((_, task)) = s.pop_due(deadline) {
            fired.push((s.now(), task));
        }
        s.set_now(deadline);
        fired
    }

    #[test]
    fn timeouts_fire_in_due_then_registration_order() {
        let mut s = Scheduler::new();
        s.set_timeout(20, Task::RemoveNode(Id(2)));
        s.set_timeout(10, Task::RemoveNode(Id(1)));
        s.set_timeout(20, Task::RemoveNode(Id(3)));
        let fired = drain(&mut s, 100);
        assert_eq!(
            fired,
            vec![
                (10, Task::RemoveNode(Id(1))),
                (20, Task::RemoveNode(Id(2))),
                (20, Task::RemoveNode(Id(3))),
            ]
        );
        assert_eq!(s.now(), 100);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn intervals_rearm_until_cleared() {
        let mut s = Scheduler::new();
        let id = s.set_interval(30, Task::ScrollFrame);
        assert_eq!(s.kind(id), Some(TimerKind::Interval));
        let fired = drain(&mut s, 95);
        assert_eq!(fired.iter().map(|(t, _)| *t).collect::<Vec<_>>(), vec![30, 60, 90]);
        assert!(s.clear(id));
        assert!(!s.clear(id));
        assert!(drain(&mut s, 1_000).is_empty());
    }

    #[test]
    fn interval_can_clear_itself_while_firing() {
        let mut s = Scheduler::new();
        let id = s.set_interval(10, Task::ScrollFrame);
        let (fired, _) = s.pop_due(10).unwrap();
        assert_eq!(fired, id);
        assert!(s.clear(fired));
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn fired_timeouts_cannot_be_cleared() {
        let mut s = Scheduler::new();
        let id = s.set_timeout(5, Task::ScrollFrame);
        assert!(s.pop_due(5).is_some());
        assert!(!s.is_active(id));
        assert!(!s.clear(id));
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut s = Scheduler::new();
        s.set_now(500);
        s.set_timeout(50, Task::ScrollFrame);
        assert_eq!(s.next_due(), Some(550));
        assert!(s.pop_due(549).is_none());
    }
}
