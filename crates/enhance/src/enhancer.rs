//! The one-shot `initialize` entry point wiring every behavior to a page.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::features::{
    counter, phone, reveal, ripple, search_mode, smooth_scroll, submit_feedback, typewriter,
};
use crate::page::Page;
use css::{SelectorList, parse_selector_list};

pub(crate) fn parse_selectors(what: &'static str, source: &str) -> Result<SelectorList, EnhanceError> {
    parse_selector_list(source).map_err(|source| EnhanceError::Selector { what, source })
}

/// How many elements each behavior was attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Enhancements {
    pub forms: usize,
    pub ripple_buttons: usize,
    pub phone_inputs: usize,
    pub fragment_links: usize,
    pub typewriter: bool,
    pub counters: usize,
    pub reveal_targets: usize,
    pub search: bool,
}

/// Wires every behavior against the page as it is right now.
///
/// Missing elements skip their behavior. Only a bad selector or margin in
/// `config` is an error, and it is reported before anything is wired.
pub fn initialize(page: &mut Page, config: &EnhancerConfig) -> Result<Enhancements, EnhanceError> {
    config.validate()?;
    let sel = &config.selectors;
    for (what, source) in [
        ("forms", &sel.forms),
        ("submit button", &sel.submit_button),
        ("ripple buttons", &sel.ripple_buttons),
        ("phone inputs", &sel.phone_inputs),
        ("fragment links", &sel.fragment_links),
        ("hero title", &sel.hero_title),
        ("stat numbers", &sel.stat_numbers),
        ("reveal targets", &sel.reveal_targets),
        ("search form", &sel.search_form),
        ("search value input", &sel.search_value),
        ("search mode select", &sel.search_mode),
    ] {
        parse_selectors(what, source)?;
    }

    page.set_scroll_timing(config.scroll.smooth_duration_ms, config.scroll.frame_ms);

    let summary = Enhancements {
        forms: submit_feedback::install(
            page,
            &sel.forms,
            &sel.submit_button,
            &config.submit.processing_label,
        )?,
        ripple_buttons: ripple::install(
            page,
            &sel.ripple_buttons,
            &config.ripple.class,
            config.ripple.lifetime_ms,
        )?,
        phone_inputs: phone::install(page, &sel.phone_inputs, &config.phone.country_code)?,
        fragment_links: smooth_scroll::install(page, &sel.fragment_links)?,
        typewriter: typewriter::install(
            page,
            &sel.hero_title,
            config.typewriter.start_delay_ms,
            config.typewriter.step_ms,
        )?,
        counters: counter::install(
            page,
            &sel.stat_numbers,
            config.counter.interval_ms,
            config.counter.steps,
        )?,
        reveal_targets: reveal::install(
            page,
            &sel.reveal_targets,
            config.reveal.threshold,
            &config.reveal.root_margin,
            &config.reveal.class,
        )?,
        search: search_mode::install(
            page,
            search_mode::SearchSelectors {
                form: &sel.search_form,
                value: &sel.search_value,
                mode: &sel.search_mode,
            },
            config.search.plate_max_len,
            &config.search.chassis_placeholder,
            &config.search.plate_placeholder,
        )?,
    };
    log::debug!(target: "enhance", "initialized: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_selector_is_reported_before_wiring() {
        let mut page = Page::from_html("<form><button>x</button></form>");
        let mut config = EnhancerConfig::default();
        config.selectors.search_mode = "select[".into();
        let err = initialize(&mut page, &config).unwrap_err();
        assert!(matches!(err, EnhanceError::Selector { what: "search mode select", .. }));
        let button = page.query("button").unwrap();
        assert_eq!(page.listener_count(button), 0);
    }

    #[test]
    fn empty_page_wires_nothing() {
        let mut page = Page::from_html("<p>hello</p>");
        let summary = initialize(&mut page, &EnhancerConfig::default()).unwrap();
        assert_eq!(summary, Enhancements::default());
        assert_eq!(page.scheduler().pending(), 0);
    }
}
