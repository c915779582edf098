//! Count-up animation for statistic numbers.

use crate::animation::{Animation, Frame, Next, Phase, Schedule};
use crate::enhancer::parse_selectors;
use crate::error::EnhanceError;
use crate::event::Effect;
use crate::page::Page;
use core_types::Millis;
use html::Id;

/// Leading-integer parse with the lenient rules browsers apply to `parseInt`.
///
/// Leading whitespace and one sign are skipped, `0x`/`0X` switches to base 16,
/// then the longest run of digits is read. Trailing garbage ("1,200+") is
/// ignored. Returns `None` when no digit follows.
pub fn parse_int(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let mut value = 0.0f64;
    let mut seen = false;
    for c in s.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        value = value * f64::from(radix) + f64::from(d);
        seen = true;
    }
    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Integer display of a counter value. Non-finite values print the way a
/// browser would stringify them.
pub fn display_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let floored = value.floor();
    if floored == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{floored}")
}

/// Counts from zero to `target` in a fixed number of equal steps.
#[derive(Debug)]
pub struct Counter {
    node: Id,
    target: f64,
    increment: f64,
    current: f64,
    phase: Phase,
}

impl Counter {
    /// `target` is `None` when the element text held no number.
    pub fn new(node: Id, target: Option<f64>, steps: u32) -> Self {
        let target = target.unwrap_or(f64::NAN);
        Self {
            node,
            target,
            increment: target / f64::from(steps.max(1)),
            current: 0.0,
            phase: Phase::Pending,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Runs one step and returns the text to display.
    pub fn step(&mut self) -> Option<String> {
        if self.phase == Phase::Complete {
            return None;
        }
        self.phase = Phase::Running;
        if self.target.is_nan() {
            // Unparseable text: show it once and stop ticking.
            self.phase = Phase::Complete;
            return Some(display_number(f64::NAN));
        }
        self.current += self.increment;
        if self.current >= self.target {
            self.current = self.target;
            self.phase = Phase::Complete;
        }
        Some(display_number(self.current))
    }
}

impl Animation for Counter {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn tick(&mut self) -> Frame {
        match self.step() {
            Some(text) => Frame {
                effects: vec![Effect::SetText {
                    node: self.node,
                    text,
                }],
                next: if self.phase == Phase::Complete {
                    Next::Done
                } else {
                    Next::Continue
                },
            },
            None => Frame::done(),
        }
    }
}

/// Starts one interval-driven counter per matching element.
pub fn install(
    page: &mut Page,
    selector: &str,
    interval: Millis,
    steps: u32,
) -> Result<usize, EnhanceError> {
    let list = parse_selectors("stat numbers", selector)?;
    let targets = page.select_all(&list);
    for &node in &targets {
        let text = page.document().text_content(node);
        let target = parse_int(&text);
        if target.is_none() {
            log::debug!(target: "enhance.counter", "no number in `{}`", text.trim());
        }
        page.start_animation(
            Box::new(Counter::new(node, target, steps)),
            Schedule::Interval(interval),
        );
    }
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_leading_integers() {
        assert_eq!(parse_int("200"), Some(200.0));
        assert_eq!(parse_int("  1500+ "), Some(1500.0));
        assert_eq!(parse_int("-42px"), Some(-42.0));
        assert_eq!(parse_int("+7"), Some(7.0));
        assert_eq!(parse_int("0x1F"), Some(31.0));
        assert_eq!(parse_int("12.9"), Some(12.0));
        assert_eq!(parse_int("1,200"), Some(1.0));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("0x"), None);
    }

    #[test]
    fn displays_integers() {
        assert_eq!(display_number(199.99), "199");
        assert_eq!(display_number(200.0), "200");
        assert_eq!(display_number(-0.5), "-1");
        assert_eq!(display_number(-0.0), "0");
        assert_eq!(display_number(f64::NAN), "NaN");
    }

    #[test]
    fn counts_to_exact_target_in_fixed_steps() {
        let mut counter = Counter::new(Id(1), Some(200.0), 50);
        let mut shown = Vec::new();
        while let Some(text) = counter.step() {
            shown.push(text);
        }
        assert_eq!(shown.len(), 50);
        assert_eq!(shown.first().map(String::as_str), Some("4"));
        assert_eq!(shown.last().map(String::as_str), Some("200"));
        assert_eq!(counter.phase(), Phase::Complete);
    }

    #[test]
    fn zero_and_negative_targets_finish_on_first_tick() {
        let mut zero = Counter::new(Id(1), Some(0.0), 50);
        assert_eq!(zero.step().as_deref(), Some("0"));
        assert_eq!(zero.phase(), Phase::Complete);
        let mut negative = Counter::new(Id(1), Some(-10.0), 50);
        assert_eq!(negative.step().as_deref(), Some("-10"));
        assert_eq!(negative.step(), None);
    }

    #[test]
    fn unparseable_text_shows_nan_once() {
        let mut counter = Counter::new(Id(1), None, 50);
        let frame = counter.tick();
        assert_eq!(
            frame.effects,
            vec![Effect::SetText {
                node: Id(1),
                text: "NaN".into()
            }]
        );
        assert_eq!(frame.next, Next::Done);
    }

    #[test]
    fn page_counter_stops_its_interval() {
        let mut page = Page::from_html(
            r#"<div class="stat-item"><span class="stat-number">200</span></div>"#,
        );
        assert_eq!(install(&mut page, ".stat-number", 30, 50).unwrap(), 1);
        let number = page.query(".stat-number").unwrap();

        let mut last = 0;
        for _ in 0..49 {
            page.advance(30);
            let shown: i64 = page.document().text_content(number).parse().unwrap();
            assert!(shown >= last && shown < 200);
            last = shown;
        }
        page.advance(30);
        assert_eq!(page.document().text_content(number), "200");
        assert_eq!(page.scheduler().pending(), 0);
        page.advance(300);
        assert_eq!(page.document().text_content(number), "200");
    }

    proptest! {
        #[test]
        fn display_is_monotonic_and_ends_at_target(target in 1u32..1_000_000) {
            let mut counter = Counter::new(Id(1), Some(f64::from(target)), 50);
            let mut last = 0u64;
            let mut ticks = 0;
            let mut final_text = String::new();
            while let Some(text) = counter.step() {
                let value: u64 = text.parse().unwrap();
                prop_assert!(value >= last);
                last = value;
                ticks += 1;
                final_text = text;
            }
            prop_assert!(ticks <= 51);
            prop_assert_eq!(final_text, target.to_string());
        }
    }
}
