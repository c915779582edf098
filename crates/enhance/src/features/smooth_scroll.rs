//! In-page anchor links scroll smoothly instead of jumping.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::{Effect, Event, EventKind, Handler, HandlerCtx, Reaction};
use crate::page::Page;
use crate::viewport::ScrollBehavior;
use html::{Document, Id};
use std::rc::Rc;

/// Element an `href` of the form `#fragment` points at. An empty fragment matches nothing.
pub fn fragment_target(doc: &Document, href: &str) -> Option<Id> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    doc.element_by_id(fragment)
}

pub struct SmoothScroll;

impl Handler for SmoothScroll {
    fn handle(&self, event: &Event, ctx: HandlerCtx<'_>) -> Reaction {
        let link = event.current_target;
        let target = ctx
            .doc
            .attr(link, "href")
            .and_then(|href| fragment_target(ctx.doc, href));
        let reaction = match target {
            Some(node) => Reaction::effects(vec![Effect::ScrollIntoView {
                node,
                behavior: ScrollBehavior::Smooth,
            }]),
            None => {
                log::debug!(target: "enhance.scroll", "no fragment target for link {link:?}");
                Reaction::none()
            }
        };
        reaction.prevent_default()
    }
}

pub fn install(page: &mut Page, links: &str) -> Result<usize, EnhanceError> {
    let links = parse_selectors("fragment links", links)?;
    let handler = Rc::new(SmoothScroll);
    let targets = page.select_all(&links);
    for &link in &targets {
        page.add_listener(link, EventKind::Click, handler.clone());
    }
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Rectangle;

    const LINKS: &str = r##"a[href^="#"]"##;

    fn page() -> Page {
        let mut page = Page::from_html(
            r##"<nav><a href="#about">About</a><a href="#missing">Gone</a><a href="#">Top</a></nav><section id="about">About us</section>"##,
        );
        page.resize(800.0, 600.0);
        let about = page.query("#about").unwrap();
        page.set_layout(about, Rectangle::new(0.0, 1200.0, 800.0, 400.0));
        page.set_content_height(3000.0);
        page
    }

    #[test]
    fn scrolls_smoothly_to_the_fragment_target() {
        let mut page = page();
        assert_eq!(install(&mut page, LINKS).unwrap(), 3);
        let link = page.query(r##"a[href="#about"]"##).unwrap();

        let outcome = page.click(link);
        assert!(outcome.default_prevented);
        // Smooth: nothing moves until frames run.
        assert_eq!(page.viewport().scroll_y(), 0.0);
        page.advance(200);
        let midway = page.viewport().scroll_y();
        assert!(midway > 0.0 && midway < 1200.0, "midway = {midway}");
        page.advance(400);
        assert_eq!(page.viewport().scroll_y(), 1200.0);
        assert_eq!(page.scheduler().pending(), 0);
    }

    #[test]
    fn missing_target_is_a_silent_no_op() {
        let mut page = page();
        install(&mut page, LINKS).unwrap();
        for selector in [r##"a[href="#missing"]"##, r##"a[href="#"]"##] {
            let link = page.query(selector).unwrap();
            let outcome = page.click(link);
            assert!(outcome.dispatched);
            assert!(outcome.default_prevented);
            page.run_until_idle();
            assert_eq!(page.viewport().scroll_y(), 0.0);
        }
    }

    #[test]
    fn without_the_enhancement_links_jump() {
        let mut page = page();
        let link = page.query(r##"a[href="#about"]"##).unwrap();
        let outcome = page.click(link);
        assert!(!outcome.default_prevented);
        assert_eq!(page.viewport().scroll_y(), 1200.0);
    }
}
