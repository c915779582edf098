//! Live values of form controls.
//!
//! A control's current value is state, not markup: typing into an `<input>`
//! does not rewrite its `value` attribute. Values are seeded from the DOM and
//! then owned here.

use html::{Document, Id};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Input,
    TextArea,
    Select,
}

pub fn control_kind(doc: &Document, node: Id) -> Option<ControlKind> {
    match doc.element_name(node)? {
        "input" => Some(ControlKind::Input),
        "textarea" => Some(ControlKind::TextArea),
        "select" => Some(ControlKind::Select),
        _ => None,
    }
}

pub fn is_disabled(doc: &Document, node: Id) -> bool {
    matches!(
        doc.element_name(node),
        Some("button" | "input" | "select" | "textarea")
    ) && doc.has_attr(node, "disabled")
}

/// Option value: the `value` attribute, else its whitespace-collapsed text.
pub fn option_value(doc: &Document, option: Id) -> String {
    match doc.attr(option, "value") {
        Some(v) => v.to_string(),
        None => doc
            .text_content(option)
            .split_ascii_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn options(doc: &Document, select: Id) -> impl Iterator<Item = Id> + '_ {
    doc.descendants(select)
        .filter(move |&n| doc.element_name(n) == Some("option"))
}

fn initial_value(doc: &Document, node: Id, kind: ControlKind) -> String {
    match kind {
        ControlKind::Input => doc.attr(node, "value").unwrap_or("").to_string(),
        ControlKind::TextArea => normalize_newlines(&doc.text_content(node)),
        ControlKind::Select => {
            // Last `selected` option wins, else the first option.
            let chosen = options(doc, node)
                .filter(|&o| doc.has_attr(o, "selected"))
                .last()
                .or_else(|| options(doc, node).next());
            chosen.map(|o| option_value(doc, o)).unwrap_or_default()
        }
    }
}

fn normalize_newlines(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[derive(Debug, Default, Clone)]
pub struct ControlValues {
    values: HashMap<Id, String>,
}

impl ControlValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every control currently in the document.
    pub fn seeded_from(doc: &Document) -> Self {
        let mut store = Self::new();
        for node in doc.descendants(Document::ROOT) {
            if let Some(kind) = control_kind(doc, node) {
                store.values.insert(node, initial_value(doc, node, kind));
            }
        }
        store
    }

    /// Current value, falling back to the markup for controls never seeded.
    pub fn value(&self, doc: &Document, node: Id) -> Option<String> {
        if let Some(v) = self.values.get(&node) {
            return Some(v.clone());
        }
        let kind = control_kind(doc, node)?;
        Some(initial_value(doc, node, kind))
    }

    /// Sets a control value. Returns `false` for non-controls.
    ///
    /// A `select` only accepts one of its option values; anything else clears
    /// the selection.
    pub fn set_value(&mut self, doc: &Document, node: Id, value: &str) -> bool {
        let Some(kind) = control_kind(doc, node) else {
            return false;
        };
        let stored = match kind {
            ControlKind::Select => {
                if options(doc, node).any(|o| option_value(doc, o) == value) {
                    value.to_string()
                } else {
                    String::new()
                }
            }
            ControlKind::TextArea => normalize_newlines(value),
            ControlKind::Input => value.to_string(),
        };
        self.values.insert(node, stored);
        true
    }

    pub fn forget(&mut self, node: Id) {
        self.values.remove(&node);
    }
}
