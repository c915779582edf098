//! Reveal-on-scroll class toggling.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::Effect;
use crate::observer::{IntersectionEntry, IntersectionHandler, ObserverOptions, RootMargin};
use crate::page::Page;
use html::Document;
use std::rc::Rc;

/// Adds the reveal class to targets entering the root. Never removes it.
pub struct RevealOnScroll {
    pub class: String,
}

impl IntersectionHandler for RevealOnScroll {
    fn on_entries(&self, entries: &[IntersectionEntry], _doc: &Document) -> Vec<Effect> {
        entries
            .iter()
            .filter(|e| e.is_intersecting)
            .map(|e| Effect::AddClass {
                node: e.target,
                class: self.class.clone(),
            })
            .collect()
    }
}

/// Registers every element matching `selector` right now with one shared observer.
pub fn install(
    page: &mut Page,
    selector: &str,
    threshold: f32,
    root_margin: &str,
    class: &str,
) -> Result<usize, EnhanceError> {
    let list = parse_selectors("reveal targets", selector)?;
    let root_margin = RootMargin::parse(root_margin)?;
    let targets = page.select_all(&list);
    if targets.is_empty() {
        return Ok(0);
    }
    let handler = Rc::new(RevealOnScroll {
        class: class.to_string(),
    });
    page.observe(
        ObserverOptions {
            threshold,
            root_margin,
        },
        &targets,
        handler,
    );
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Rectangle;

    fn page() -> Page {
        let mut page = Page::from_html(
            r#"<div class="card" id="a">A</div><div class="feature-card" id="b">B</div>"#,
        );
        page.resize(800.0, 600.0);
        let a = page.query("#a").unwrap();
        let b = page.query("#b").unwrap();
        page.set_layout(a, Rectangle::new(0.0, 100.0, 400.0, 200.0));
        page.set_layout(b, Rectangle::new(0.0, 900.0, 400.0, 200.0));
        page.set_content_height(2000.0);
        page
    }

    #[test]
    fn visible_targets_are_revealed_on_install() {
        let mut page = page();
        let n = install(&mut page, ".card, .feature-card", 0.1, "0px 0px -50px 0px", "animate-in")
            .unwrap();
        assert_eq!(n, 2);
        let a = page.query("#a").unwrap();
        let b = page.query("#b").unwrap();
        assert!(page.document().has_class(a, "animate-in"));
        assert!(!page.document().has_class(b, "animate-in"));
    }

    #[test]
    fn bottom_margin_delays_reveal_and_class_sticks() {
        let mut page = page();
        install(&mut page, ".card, .feature-card", 0.1, "0px 0px -50px 0px", "animate-in").unwrap();
        let b = page.query("#b").unwrap();

        // Root is y in [scroll, scroll + 550). At 360 the card shows 10px: 5%.
        page.scroll_to(360.0);
        assert!(!page.document().has_class(b, "animate-in"));
        // At 380, 30px of 200: 15%.
        page.scroll_to(380.0);
        assert!(page.document().has_class(b, "animate-in"));

        page.scroll_to(0.0);
        assert!(page.document().has_class(b, "animate-in"));
    }

    #[test]
    fn elements_added_later_are_not_observed() {
        let mut page = page();
        install(&mut page, ".card", 0.1, "0px", "animate-in").unwrap();
        let late = page.document_mut().create_element_with(
            "div",
            vec![("class".to_string(), Some("card".to_string()))],
        );
        page.document_mut().append_child(Document::ROOT, late).unwrap();
        page.set_layout(late, Rectangle::new(0.0, 0.0, 100.0, 100.0));
        assert!(!page.document().has_class(late, "animate-in"));
    }

    #[test]
    fn bad_root_margin_is_an_error() {
        let mut page = page();
        assert!(install(&mut page, ".card", 0.1, "50", "animate-in").is_err());
    }
}
