//! "Processing" feedback on form submission.

use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::{Effect, Event, EventKind, Handler, HandlerCtx, Reaction};
use crate::page::Page;
use css::{SelectorList, select_first};
use std::rc::Rc;

/// Relabels and disables the form's submit button. The submission itself
/// proceeds; nothing restores the button afterwards.
pub struct SubmitFeedback {
    pub submit_button: SelectorList,
    pub label: String,
}

impl Handler for SubmitFeedback {
    fn handle(&self, event: &Event, ctx: HandlerCtx<'_>) -> Reaction {
        let form = event.current_target;
        let Some(button) = select_first(ctx.doc, form, &self.submit_button) else {
            return Reaction::none();
        };
        Reaction::effects(vec![
            Effect::SetText {
                node: button,
                text: self.label.clone(),
            },
            Effect::SetAttribute {
                node: button,
                name: "disabled".into(),
                value: String::new(),
            },
        ])
    }
}

/// Wires every form matched by `forms`. Returns the number of forms.
pub fn install(
    page: &mut Page,
    forms: &str,
    submit_button: &str,
    label: &str,
) -> Result<usize, EnhanceError> {
    let forms = parse_selectors("forms", forms)?;
    let handler = Rc::new(SubmitFeedback {
        submit_button: parse_selectors("submit button", submit_button)?,
        label: label.to_string(),
    });
    let targets = page.select_all(&forms);
    for &form in &targets {
        page.add_listener(form, EventKind::Submit, handler.clone());
    }
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::Document;

    #[test]
    fn relabels_and_disables_the_submit_button() {
        let mut page = Page::from_html(
            r#"<form><input name="phone"><button type="submit">Send</button></form>"#,
        );
        assert_eq!(install(&mut page, "form", r#"button[type="submit"]"#, "Working").unwrap(), 1);
        let form = page.query("form").unwrap();
        let button = page.query("button").unwrap();

        let outcome = page.submit(form);
        assert!(!outcome.default_prevented);
        assert_eq!(page.submissions(), &[form]);
        assert_eq!(page.document().text_content(button), "Working");
        assert!(page.document().has_attr(button, "disabled"));
    }

    #[test]
    fn forms_without_submit_button_are_left_alone() {
        let mut page = Page::from_html("<form><button type=button>x</button></form>");
        install(&mut page, "form", r#"button[type="submit"]"#, "Working").unwrap();
        let form = page.query("form").unwrap();
        page.submit(form);
        assert_eq!(
            html::to_html(page.document(), Document::ROOT),
            r#"<form><button type="button">x</button></form>"#
        );
    }

    #[test]
    fn clicking_submit_button_submits_once_then_stays_disabled() {
        let mut page =
            Page::from_html(r#"<form><button type="submit"><b>Send</b></button></form>"#);
        install(&mut page, "form", r#"button[type="submit"]"#, "Working").unwrap();
        let bold = page.query("b").unwrap();
        let button = page.query("button").unwrap();

        // Click lands on the inner <b>; the button's default action submits the form.
        page.click(bold);
        assert_eq!(page.submissions().len(), 1);
        assert_eq!(page.document().text_content(button), "Working");

        let second = page.click(button);
        assert!(!second.dispatched);
        assert_eq!(page.submissions().len(), 1);
    }
}
