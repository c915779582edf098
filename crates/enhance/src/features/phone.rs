//! Live phone-number normalization.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::{Effect, Event, EventKind, Handler, HandlerCtx, Reaction};
use crate::page::Page;
use std::rc::Rc;

/// Normalizes a typed phone number to international form.
///
/// Non-digits are dropped first, then exactly one of, in order:
/// a leading country code gains a `+`; a leading trunk `0` becomes
/// `+<country code>`; anything else is prefixed with `+<country code>`.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(country_code) {
        format!("+{digits}")
    } else if let Some(local) = digits.strip_prefix('0') {
        format!("+{country_code}{local}")
    } else {
        // `digits` never carries a '+', so this branch always prefixes.
        format!("+{country_code}{digits}")
    }
}

pub struct PhoneFormatter {
    pub country_code: String,
}

impl Handler for PhoneFormatter {
    fn handle(&self, event: &Event, ctx: HandlerCtx<'_>) -> Reaction {
        let field = event.current_target;
        let Some(current) = ctx.controls.value(ctx.doc, field) else {
            return Reaction::none();
        };
        Reaction::effects(vec![Effect::SetValue {
            node: field,
            value: normalize_phone(&current, &self.country_code),
        }])
    }
}

pub fn install(page: &mut Page, inputs: &str, country_code: &str) -> Result<usize, EnhanceError> {
    let inputs = parse_selectors("phone inputs", inputs)?;
    let handler = Rc::new(PhoneFormatter {
        country_code: country_code.to_string(),
    });
    let targets = page.select_all(&inputs);
    for &input in &targets {
        page.add_listener(input, EventKind::Input, handler.clone());
    }
    Ok(targets.len())
}
