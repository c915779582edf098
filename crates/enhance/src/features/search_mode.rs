//! Plate/chassis detection for the search box.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::{Effect, Event, EventKind, Handler, HandlerCtx, Reaction};
use crate::page::Page;
use html::Id;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    Plate,
    Chassis,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Plate => "plate",
            SearchMode::Chassis => "chassis",
        }
    }
}

/// Guesses the search mode from what has been typed so far.
///
/// Long strictly alphanumeric values are chassis numbers and short values
/// are plates. A long value with other characters gives `None`, which leaves
/// the current mode alone.
pub fn classify(value: &str, plate_max_len: usize) -> Option<SearchMode> {
    let upper = value.to_uppercase();
    let len = upper.chars().count();
    if len > plate_max_len && upper.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        Some(SearchMode::Chassis)
    } else if len <= plate_max_len {
        Some(SearchMode::Plate)
    } else {
        None
    }
}

pub struct SearchModeSwitch {
    pub mode_select: Id,
    pub plate_max_len: usize,
    pub chassis_placeholder: String,
    pub plate_placeholder: String,
}

impl Handler for SearchModeSwitch {
    fn handle(&self, event: &Event, ctx: HandlerCtx<'_>) -> Reaction {
        let input = event.current_target;
        let value = ctx.controls.value(ctx.doc, input).unwrap_or_default();
        let Some(mode) = classify(&value, self.plate_max_len) else {
            return Reaction::none();
        };
        let placeholder = match mode {
            SearchMode::Chassis => &self.chassis_placeholder,
            SearchMode::Plate => &self.plate_placeholder,
        };
        Reaction::effects(vec![
            Effect::SetValue {
                node: self.mode_select,
                value: mode.as_str().to_string(),
            },
            Effect::SetAttribute {
                node: input,
                name: "placeholder".into(),
                value: placeholder.clone(),
            },
        ])
    }
}

pub struct SearchSelectors<'a> {
    pub form: &'a str,
    pub value: &'a str,
    pub mode: &'a str,
}

/// Wires the classifier to the first search form. Returns `false` when the
/// form, its value input, or its mode select is missing.
pub fn install(
    page: &mut Page,
    selectors: SearchSelectors<'_>,
    plate_max_len: usize,
    chassis_placeholder: &str,
    plate_placeholder: &str,
) -> Result<bool, EnhanceError> {
    let form_sel = parse_selectors("search form", selectors.form)?;
    let value_sel = parse_selectors("search value input", selectors.value)?;
    let mode_sel = parse_selectors("search mode select", selectors.mode)?;

    let Some(form) = page.select_first(&form_sel) else {
        return Ok(false);
    };
    let (Some(input), Some(select)) = (
        page.select_first_in(form, &value_sel),
        page.select_first_in(form, &mode_sel),
    ) else {
        log::debug!(target: "enhance.search", "search form lacks its value input or mode select");
        return Ok(false);
    };
    page.add_listener(
        input,
        EventKind::Input,
        Rc::new(SearchModeSwitch {
            mode_select: select,
            plate_max_len,
            chassis_placeholder: chassis_placeholder.to_string(),
            plate_placeholder: plate_placeholder.to_string(),
        }),
    );
    Ok(true)
}
