use crate::controls::ControlValues;
use crate::viewport::ScrollBehavior;
use core_types::Millis;
use html::{Document, Id};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// The node the event was dispatched at.
    pub target: Id,
    /// The node whose listener is running (changes while bubbling).
    pub current_target: Id,
}

/// A single document or page mutation requested by a handler or animation.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SetText { node: Id, text: String },
    AppendText { node: Id, text: String },
    SetValue { node: Id, value: String },
    SetAttribute { node: Id, name: String, value: String },
    RemoveAttribute { node: Id, name: String },
    AddClass { node: Id, class: String },
    /// Append `<tag class="...">` as the parent's last child and remove it after `lifetime`.
    AppendTransient {
        parent: Id,
        tag: String,
        class: String,
        lifetime: Millis,
    },
    ScrollIntoView { node: Id, behavior: ScrollBehavior },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effects(effects: Vec<Effect>) -> Self {
        Self {
            prevent_default: false,
            effects,
        }
    }

    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

/// Read-only view handed to handlers.
#[derive(Clone, Copy)]
pub struct HandlerCtx<'a> {
    pub doc: &'a Document,
    pub controls: &'a ControlValues,
}

pub trait Handler {
    fn handle(&self, event: &Event, ctx: HandlerCtx<'_>) -> Reaction;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// False when the target was missing or a disabled control swallowed the event.
    pub dispatched: bool,
    pub default_prevented: bool,
    pub listeners_run: usize,
}
