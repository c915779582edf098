use crate::syntax::{AttrOp, AttrSelector, Combinator, Compound, Selector, SelectorList, Simple};
use html::{Document, Id};

fn matches_attr(doc: &Document, id: Id, sel: &AttrSelector) -> bool {
    let Some(value) = doc.attr(id, &sel.name) else {
        return false;
    };
    let want = sel.value.as_str();
    match sel.op {
        AttrOp::Exists => true,
        AttrOp::Equals => value == want,
        AttrOp::Prefix => !want.is_empty() && value.starts_with(want),
        AttrOp::Suffix => !want.is_empty() && value.ends_with(want),
        AttrOp::Substring => !want.is_empty() && value.contains(want),
        AttrOp::Includes => value.split_ascii_whitespace().any(|w| w == want),
    }
}

fn matches_simple(doc: &Document, id: Id, name: &str, simple: &Simple) -> bool {
    match simple {
        Simple::Universal => true,
        Simple::Type(t) => name.eq_ignore_ascii_case(t),
        Simple::Id(want) => doc.attr(id, "id") == Some(want.as_str()),
        Simple::Class(want) => doc.has_class(id, want),
        Simple::Attr(a) => matches_attr(doc, id, a),
    }
}

pub fn matches_compound(doc: &Document, id: Id, compound: &Compound) -> bool {
    let Some(name) = doc.element_name(id) else {
        return false;
    };
    compound
        .parts
        .iter()
        .all(|part| matches_simple(doc, id, name, part))
}

/// Right-to-left match. Ancestors above `scope` still take part, as in `Element.querySelector`.
pub fn matches_selector(doc: &Document, id: Id, selector: &Selector) -> bool {
    if !matches_compound(doc, id, &selector.subject) {
        return false;
    }
    matches_ancestors(doc, id, &selector.ancestors)
}

fn matches_ancestors(doc: &Document, id: Id, rest: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), tail)) = rest.split_first() else {
        return true;
    };
    let mut cur = doc.parent(id);
    while let Some(ancestor) = cur {
        if matches_compound(doc, ancestor, compound) && matches_ancestors(doc, ancestor, tail) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        cur = doc.parent(ancestor);
    }
    false
}

pub fn matches_any(doc: &Document, id: Id, list: &SelectorList) -> bool {
    list.selectors.iter().any(|s| matches_selector(doc, id, s))
}
