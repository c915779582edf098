use crate::event::Effect;
use core_types::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created, first tick not yet run.
    Pending,
    Running,
    Complete,
}

/// What the page should do with the animation's timer after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    /// Schedule a fresh one-shot tick after the given delay (timer chains).
    After(Millis),
    /// Leave the current interval armed.
    Continue,
    /// Cancel the timer and drop the animation.
    Done,
}

#[derive(Debug, PartialEq)]
pub struct Frame {
    pub effects: Vec<Effect>,
    pub next: Next,
}

impl Frame {
    pub fn done() -> Self {
        Self {
            effects: Vec::new(),
            next: Next::Done,
        }
    }
}

/// A timer-driven state machine. Ticks never touch the document directly;
/// they return effects the page applies.
pub trait Animation {
    fn phase(&self) -> Phase;

    fn tick(&mut self) -> Frame;
}

/// How the first tick is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    Timeout(Millis),
    Interval(Millis),
}
