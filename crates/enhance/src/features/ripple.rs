//! Click ripple markers.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::{Effect, Event, EventKind, Handler, HandlerCtx, Reaction};
use crate::page::Page;
use core_types::Millis;
use std::rc::Rc;

/// Appends a `<span class="ripple">` to the clicked element on every click.
/// Each marker removes itself after `lifetime`; rapid clicks stack markers.
pub struct Ripple {
    pub class: String,
    pub lifetime: Millis,
}

impl Handler for Ripple {
    fn handle(&self, event: &Event, _ctx: HandlerCtx<'_>) -> Reaction {
        Reaction::effects(vec![Effect::AppendTransient {
            parent: event.current_target,
            tag: "span".into(),
            class: self.class.clone(),
            lifetime: self.lifetime,
        }])
    }
}

pub fn install(
    page: &mut Page,
    buttons: &str,
    class: &str,
    lifetime: Millis,
) -> Result<usize, EnhanceError> {
    let buttons = parse_selectors("ripple buttons", buttons)?;
    let handler = Rc::new(Ripple {
        class: class.to_string(),
        lifetime,
    });
    let targets = page.select_all(&buttons);
    for &button in &targets {
        page.add_listener(button, EventKind::Click, handler.clone());
    }
    Ok(targets.len())
}
