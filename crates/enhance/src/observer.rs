//! Viewport intersection watching.

use crate::error::ConfigError;
use crate::event::Effect;
use crate::viewport::Rectangle;
use html::{Document, Id};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginValue {
    Px(f32),
    /// Percentage of the root's width (left/right) or height (top/bottom).
    Percent(f32),
}

impl MarginValue {
    fn resolve(self, basis: f32) -> f32 {
        match self {
            MarginValue::Px(v) => v,
            MarginValue::Percent(p) => basis * p / 100.0,
        }
    }
}

/// CSS margin shorthand; positive values grow the root, negative values shrink it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginValue::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl RootMargin {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let values = input
            .split_ascii_whitespace()
            .map(parse_margin_value)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "root margin needs 1 to 4 values, got `{input}`"
                )));
            }
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Applies the margin to `root`.
    pub fn apply(&self, root: Rectangle) -> Rectangle {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rectangle::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

fn parse_margin_value(token: &str) -> Result<MarginValue, ConfigError> {
    let invalid = || ConfigError::Invalid(format!("invalid root margin value `{token}`"));
    if let Some(num) = token.strip_suffix('%') {
        return num.parse().map(MarginValue::Percent).map_err(|_| invalid());
    }
    if let Some(num) = token.strip_suffix("px") {
        return num.parse().map(MarginValue::Px).map_err(|_| invalid());
    }
    // Unitless zero is the only bare number CSS accepts here.
    match token.parse::<f32>() {
        Ok(v) if v == 0.0 => Ok(MarginValue::Px(0.0)),
        _ => Err(invalid()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f32,
    pub root_margin: RootMargin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: Id,
    pub is_intersecting: bool,
    pub ratio: f32,
}

/// Visible fraction of `target` inside `root`.
///
/// A zero-area target counts as fully visible when it lies within the root.
pub fn intersection_ratio(target: Rectangle, root: Rectangle) -> f32 {
    let Some(overlap) = target.intersect(&root) else {
        return 0.0;
    };
    let area = target.area();
    if area == 0.0 {
        return 1.0;
    }
    (overlap.area() / area).min(1.0)
}

pub fn is_intersecting(target: Rectangle, root: Rectangle, threshold: f32) -> (bool, f32) {
    let ratio = intersection_ratio(target, root);
    let overlaps = target.intersect(&root).is_some();
    let hit = if threshold == 0.0 {
        overlaps
    } else {
        overlaps && ratio >= threshold
    };
    (hit, ratio)
}

pub trait IntersectionHandler {
    fn on_entries(&self, entries: &[IntersectionEntry], doc: &Document) -> Vec<Effect>;
}

pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: Vec<Id>,
    last: HashMap<Id, bool>,
    handler: Rc<dyn IntersectionHandler>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions, handler: Rc<dyn IntersectionHandler>) -> Self {
        Self {
            options,
            targets: Vec::new(),
            last: HashMap::new(),
            handler,
        }
    }

    pub fn observe(&mut self, target: Id) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    pub fn targets(&self) -> &[Id] {
        &self.targets
    }

    pub fn handler(&self) -> Rc<dyn IntersectionHandler> {
        Rc::clone(&self.handler)
    }

    /// Entries for targets seen for the first time or whose state flipped.
    ///
    /// Targets without a layout box are treated as not intersecting.
    pub fn take_records<F>(&mut self, viewport: Rectangle, doc: &Document, layout: F) -> Vec<IntersectionEntry>
    where
        F: Fn(Id) -> Option<Rectangle>,
    {
        let root = self.options.root_margin.apply(viewport);
        let mut entries = Vec::new();
        for &target in &self.targets {
            if !doc.is_live(target) {
                continue;
            }
            let (hit, ratio) = match layout(target) {
                Some(rect) => is_intersecting(rect, root, self.options.threshold),
                None => (false, 0.0),
            };
            if self.last.insert(target, hit) != Some(hit) {
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting: hit,
                    ratio,
                });
            }
        }
        entries
    }
}
