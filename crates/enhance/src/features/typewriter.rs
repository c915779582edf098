//! One-shot typewriter reveal of the hero heading.

use crate::animation::{Animation, Frame, Next, Phase, Schedule};
use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::Effect;
use crate::page::Page;
use core_types::Millis;
use html::Id;

/// Replays captured text one character per tick.
///
/// The first tick runs after the start delay; each tick that writes a
/// character chains the next one `step` later. The tick that finds nothing
/// left completes the machine. Not restartable.
#[derive(Debug)]
pub struct Typewriter {
    node: Id,
    chars: Vec<char>,
    cursor: usize,
    step: Millis,
    phase: Phase,
}

impl Typewriter {
    pub fn new(node: Id, text: &str, step: Millis) -> Self {
        Self {
            node,
            chars: text.chars().collect(),
            cursor: 0,
            step,
            phase: Phase::Pending,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Next character to reveal, or `None` once everything is shown.
    pub fn advance(&mut self) -> Option<char> {
        if self.phase == Phase::Complete {
            return None;
        }
        match self.chars.get(self.cursor).copied() {
            Some(c) => {
                self.cursor += 1;
                self.phase = Phase::Running;
                Some(c)
            }
            None => {
                self.phase = Phase::Complete;
                None
            }
        }
    }
}

impl Animation for Typewriter {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn tick(&mut self) -> Frame {
        match self.advance() {
            Some(c) => Frame {
                effects: vec![Effect::AppendText {
                    node: self.node,
                    text: c.to_string(),
                }],
                next: Next::After(self.step),
            },
            None => Frame::done(),
        }
    }
}

/// Clears the first element matched by `selector` and schedules its text to be typed back.
pub fn install(
    page: &mut Page,
    selector: &str,
    start_delay: Millis,
    step: Millis,
) -> Result<bool, EnhanceError> {
    let list = parse_selectors("hero title", selector)?;
    let Some(title) = page.select_first(&list) else {
        log::debug!(target: "enhance.typewriter", "no element for `{selector}`");
        return Ok(false);
    };
    let text = page.document().text_content(title);
    page.document_mut().set_text_content(title, "")?;
    page.start_animation(
        Box::new(Typewriter::new(title, &text, step)),
        Schedule::Timeout(start_delay),
    );
    Ok(true)
}
