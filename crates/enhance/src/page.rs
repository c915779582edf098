//! Headless page host.
//!
//! `Page` owns the document plus everything a browser would keep beside it:
//! control values, element boxes, the viewport, timers and listeners. Handlers
//! and animations only describe changes; `Page::apply` is the single place the
//! document is mutated on their behalf.

use crate::animation::{Animation, AnimationId, Next, Phase, Schedule};
use crate::controls::{ControlValues, is_disabled};
use crate::event::{DispatchOutcome, Effect, Event, EventKind, Handler, HandlerCtx};
use crate::features::smooth_scroll::fragment_target;
use crate::observer::{IntersectionHandler, IntersectionObserver, ObserverOptions};
use crate::scheduler::{Scheduler, Task};
use crate::viewport::{Rectangle, ScrollAnimation, ScrollBehavior, Viewport};
use core_types::{Millis, TimerId};
use css::{SelectorList, parse_selector_list, select_all, select_first};
use html::{Document, DomError, Id, parse_document};
use std::collections::HashMap;
use std::rc::Rc;

/// Upper bound on timer callbacks fired by one `run_until_idle` call.
pub const IDLE_FIRE_LIMIT: usize = 100_000;

const DEFAULT_SMOOTH_SCROLL_MS: Millis = 400;
const DEFAULT_FRAME_MS: Millis = 16;

struct Listener {
    kind: EventKind,
    handler: Rc<dyn Handler>,
}

struct RunningAnimation {
    animation: Box<dyn Animation>,
    timer: TimerId,
}

struct SmoothScroll {
    animation: ScrollAnimation,
    timer: TimerId,
}

pub struct Page {
    doc: Document,
    controls: ControlValues,
    viewport: Viewport,
    layout: HashMap<Id, Rectangle>,
    scheduler: Scheduler,
    listeners: HashMap<Id, Vec<Listener>>,
    animations: HashMap<AnimationId, RunningAnimation>,
    next_animation: u64,
    observers: Vec<IntersectionObserver>,
    smooth_scroll: Option<SmoothScroll>,
    smooth_scroll_ms: Millis,
    frame_ms: Millis,
    submissions: Vec<Id>,
}

impl Page {
    pub fn new(doc: Document) -> Self {
        let controls = ControlValues::seeded_from(&doc);
        Self {
            doc,
            controls,
            viewport: Viewport::default(),
            layout: HashMap::new(),
            scheduler: Scheduler::new(),
            listeners: HashMap::new(),
            animations: HashMap::new(),
            next_animation: 0,
            observers: Vec::new(),
            smooth_scroll: None,
            smooth_scroll_ms: DEFAULT_SMOOTH_SCROLL_MS,
            frame_ms: DEFAULT_FRAME_MS,
            submissions: Vec::new(),
        }
    }

    pub fn from_html(source: &str) -> Self {
        Self::new(parse_document(source))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Direct document access for the host. Controls created this way read
    /// their value from markup until something sets it.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn controls(&self) -> &ControlValues {
        &self.controls
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn submissions(&self) -> &[Id] {
        &self.submissions
    }

    pub fn value(&self, control: Id) -> Option<String> {
        self.controls.value(&self.doc, control)
    }

    /// Smooth scroll duration and frame period. A zero frame is bumped to 1ms.
    pub fn set_scroll_timing(&mut self, duration: Millis, frame: Millis) {
        self.smooth_scroll_ms = duration;
        self.frame_ms = frame.max(1);
    }

    // ---- queries ----

    /// First element matching `selector`; an unparsable selector matches nothing.
    pub fn query(&self, selector: &str) -> Option<Id> {
        match parse_selector_list(selector) {
            Ok(list) => self.select_first(&list),
            Err(err) => {
                log::warn!(target: "enhance.page", "bad selector `{selector}`: {err}");
                None
            }
        }
    }

    pub fn select_all(&self, list: &SelectorList) -> Vec<Id> {
        select_all(&self.doc, Document::ROOT, list)
    }

    pub fn select_first(&self, list: &SelectorList) -> Option<Id> {
        select_first(&self.doc, Document::ROOT, list)
    }

    pub fn select_all_in(&self, scope: Id, list: &SelectorList) -> Vec<Id> {
        select_all(&self.doc, scope, list)
    }

    pub fn select_first_in(&self, scope: Id, list: &SelectorList) -> Option<Id> {
        select_first(&self.doc, scope, list)
    }

    // ---- events ----

    pub fn add_listener(&mut self, node: Id, kind: EventKind, handler: Rc<dyn Handler>) {
        self.listeners
            .entry(node)
            .or_default()
            .push(Listener { kind, handler });
    }

    pub fn listener_count(&self, node: Id) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    pub fn click(&mut self, target: Id) -> DispatchOutcome {
        self.dispatch(EventKind::Click, target)
    }

    /// Replaces the control's value with `text` and fires `input`.
    pub fn type_text(&mut self, control: Id, text: &str) -> DispatchOutcome {
        if self.inert(control) {
            return DispatchOutcome::default();
        }
        if !self.controls.set_value(&self.doc, control, text) {
            log::debug!(target: "enhance.page", "{control:?} is not a form control");
            return DispatchOutcome::default();
        }
        self.dispatch(EventKind::Input, control)
    }

    pub fn submit(&mut self, form: Id) -> DispatchOutcome {
        self.dispatch(EventKind::Submit, form)
    }

    /// Missing nodes and nodes inside a disabled control receive no user events.
    fn inert(&self, target: Id) -> bool {
        if !self.doc.is_live(target) {
            return true;
        }
        self.ancestors(target).any(|n| is_disabled(&self.doc, n))
    }

    fn ancestors(&self, node: Id) -> impl Iterator<Item = Id> + '_ {
        std::iter::successors(Some(node), |&n| self.doc.parent(n))
    }

    /// Fires `kind` at `target`, bubbling to the document, then runs the
    /// default action unless a handler prevented it.
    pub fn dispatch(&mut self, kind: EventKind, target: Id) -> DispatchOutcome {
        let user_event = matches!(kind, EventKind::Click | EventKind::Input);
        if !self.doc.is_live(target) || (user_event && self.inert(target)) {
            log::trace!(target: "enhance.page", "{kind:?} at {target:?} swallowed");
            return DispatchOutcome::default();
        }

        let path: Vec<Id> = self.ancestors(target).collect();
        let mut outcome = DispatchOutcome {
            dispatched: true,
            ..DispatchOutcome::default()
        };
        for current in path {
            let handlers: Vec<Rc<dyn Handler>> = match self.listeners.get(&current) {
                Some(list) => list
                    .iter()
                    .filter(|l| l.kind == kind)
                    .map(|l| Rc::clone(&l.handler))
                    .collect(),
                None => continue,
            };
            for handler in handlers {
                let event = Event {
                    kind,
                    target,
                    current_target: current,
                };
                let reaction = handler.handle(
                    &event,
                    HandlerCtx {
                        doc: &self.doc,
                        controls: &self.controls,
                    },
                );
                outcome.listeners_run += 1;
                outcome.default_prevented |= reaction.prevent_default;
                for effect in reaction.effects {
                    self.apply(effect);
                }
            }
        }
        log::trace!(
            target: "enhance.page",
            "{kind:?} at {target:?}: {} listener(s), prevented={}",
            outcome.listeners_run,
            outcome.default_prevented
        );

        if !outcome.default_prevented {
            self.default_action(kind, target);
        }
        outcome
    }

    fn default_action(&mut self, kind: EventKind, target: Id) {
        match kind {
            EventKind::Click => {
                let Some(activator) = self.ancestors(target).find(|&n| {
                    matches!(self.doc.element_name(n), Some("a" | "button" | "input"))
                }) else {
                    return;
                };
                match self.doc.element_name(activator) {
                    Some("a") => {
                        let node = self
                            .doc
                            .attr(activator, "href")
                            .and_then(|href| fragment_target(&self.doc, href));
                        if let Some(node) = node {
                            self.scroll_into_view(node, ScrollBehavior::Instant);
                        }
                    }
                    _ if self.is_submit_control(activator) => {
                        let form = self
                            .ancestors(activator)
                            .find(|&n| self.doc.element_name(n) == Some("form"));
                        if let Some(form) = form {
                            self.submit(form);
                        }
                    }
                    _ => {}
                }
            }
            EventKind::Submit => {
                if self.doc.element_name(target) == Some("form") {
                    self.submissions.push(target);
                }
            }
            EventKind::Input => {}
        }
    }

    fn is_submit_control(&self, node: Id) -> bool {
        let ty = self.doc.attr(node, "type").map(str::to_ascii_lowercase);
        match self.doc.element_name(node) {
            Some("button") => matches!(ty.as_deref(), None | Some("submit")),
            Some("input") => ty.as_deref() == Some("submit"),
            _ => false,
        }
    }

    // ---- mutation ----

    /// Applies one effect. Effects aimed at removed nodes are dropped.
    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SetText { node, text } => {
                let result = self.doc.set_text_content(node, &text);
                self.note(result);
            }
            Effect::AppendText { node, text } => {
                let result = self.doc.append_text(node, &text);
                self.note(result);
            }
            Effect::SetValue { node, value } => {
                if !self.doc.is_live(node) || !self.controls.set_value(&self.doc, node, &value) {
                    log::debug!(target: "enhance.page", "cannot set value on {node:?}");
                }
            }
            Effect::SetAttribute { node, name, value } => {
                let result = self.doc.set_attr(node, &name, &value);
                self.note(result);
            }
            Effect::RemoveAttribute { node, name } => {
                let result = self.doc.remove_attr(node, &name);
                self.note(result);
            }
            Effect::AddClass { node, class } => {
                let result = self.doc.add_class(node, &class);
                self.note(result);
            }
            Effect::AppendTransient {
                parent,
                tag,
                class,
                lifetime,
            } => {
                if !self.doc.is_live(parent) {
                    self.note(Err(DomError::MissingNode(parent)));
                    return;
                }
                let marker = self
                    .doc
                    .create_element_with(&tag, vec![("class".to_string(), Some(class))]);
                let result = self.doc.append_child(parent, marker);
                if result.is_ok() {
                    self.scheduler.set_timeout(lifetime, Task::RemoveNode(marker));
                }
                self.note(result);
            }
            Effect::ScrollIntoView { node, behavior } => self.scroll_into_view(node, behavior),
        }
    }

    fn note(&self, result: Result<(), DomError>) {
        if let Err(err) = result {
            log::debug!(target: "enhance.page", "effect dropped: {err}");
        }
    }

    /// Removes `node` and its subtree along with their listeners, values and boxes.
    pub fn remove_node(&mut self, node: Id) {
        if !self.doc.is_live(node) {
            return;
        }
        let subtree: Vec<Id> = std::iter::once(node)
            .chain(self.doc.descendants(node))
            .collect();
        let result = self.doc.remove(node);
        self.note(result);
        for id in subtree {
            self.listeners.remove(&id);
            self.layout.remove(&id);
            self.controls.forget(id);
        }
    }

    // ---- time ----

    /// Runs every timer due within the next `ms` and leaves the clock at `now + ms`.
    pub fn advance(&mut self, ms: Millis) {
        let deadline = self.scheduler.now().saturating_add(ms);
        while let Some((timer, task)) = self.scheduler.pop_due(deadline) {
            self.run_task(timer, task);
        }
        self.scheduler.set_now(deadline);
    }

    /// Fires timers until none remain. Returns how many fired.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            if fired >= IDLE_FIRE_LIMIT {
                log::warn!(
                    target: "enhance.page",
                    "stopped after {fired} timer callbacks with {} still pending",
                    self.scheduler.pending()
                );
                break;
            }
            if let Some((timer, task)) = self.scheduler.pop_due(due) {
                self.run_task(timer, task);
                fired += 1;
            }
        }
        fired
    }

    fn run_task(&mut self, timer: TimerId, task: Task) {
        log::trace!(target: "enhance.page", "t={} {timer:?} {task:?}", self.scheduler.now());
        match task {
            Task::RemoveNode(node) => self.remove_node(node),
            Task::Animation(id) => self.tick_animation(id),
            Task::ScrollFrame => self.scroll_frame(),
        }
    }

    /// Registers an animation; its first tick runs per `schedule`.
    pub fn start_animation(&mut self, animation: Box<dyn Animation>, schedule: Schedule) -> AnimationId {
        self.next_animation += 1;
        let id = AnimationId(self.next_animation);
        let timer = match schedule {
            Schedule::Timeout(delay) => self.scheduler.set_timeout(delay, Task::Animation(id)),
            Schedule::Interval(period) => self.scheduler.set_interval(period, Task::Animation(id)),
        };
        self.animations.insert(id, RunningAnimation { animation, timer });
        id
    }

    /// Phase of a running animation; `None` once it finished and was dropped.
    pub fn animation_phase(&self, id: AnimationId) -> Option<Phase> {
        self.animations.get(&id).map(|a| a.animation.phase())
    }

    pub fn active_animations(&self) -> usize {
        self.animations.len()
    }

    fn tick_animation(&mut self, id: AnimationId) {
        let Some(running) = self.animations.get_mut(&id) else {
            return;
        };
        let frame = running.animation.tick();
        for effect in frame.effects {
            self.apply(effect);
        }
        match frame.next {
            Next::After(delay) => {
                let timer = self.scheduler.set_timeout(delay, Task::Animation(id));
                if let Some(running) = self.animations.get_mut(&id) {
                    running.timer = timer;
                }
            }
            Next::Continue => {}
            Next::Done => {
                if let Some(running) = self.animations.remove(&id) {
                    self.scheduler.clear(running.timer);
                }
            }
        }
    }

    // ---- geometry ----

    /// Assigns the element's box and grows the scrollable area to contain it.
    pub fn set_layout(&mut self, node: Id, rect: Rectangle) {
        self.layout.insert(node, rect);
        self.viewport.extend_content(rect.bottom());
        self.check_intersections();
    }

    pub fn layout_of(&self, node: Id) -> Option<Rectangle> {
        self.layout.get(&node).copied()
    }

    pub fn set_content_height(&mut self, height: f32) {
        self.viewport.set_content_height(height);
        self.check_intersections();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.check_intersections();
    }

    /// Jumps to `y`, cancelling any smooth scroll in flight.
    pub fn scroll_to(&mut self, y: f32) {
        self.cancel_smooth_scroll();
        if self.viewport.set_scroll(y) {
            self.check_intersections();
        }
    }

    /// Aligns the top of `node` with the top of the viewport.
    pub fn scroll_into_view(&mut self, node: Id, behavior: ScrollBehavior) {
        let Some(rect) = self.layout_of(node) else {
            log::debug!(target: "enhance.page", "{node:?} has no layout box to scroll to");
            return;
        };
        let to = self.viewport.clamp_scroll(rect.y);
        if behavior == ScrollBehavior::Instant || self.smooth_scroll_ms == 0 {
            self.scroll_to(to);
            return;
        }
        self.cancel_smooth_scroll();
        let animation = ScrollAnimation {
            from: self.viewport.scroll_y(),
            to,
            started: self.scheduler.now(),
            duration: self.smooth_scroll_ms,
        };
        let timer = self.scheduler.set_interval(self.frame_ms, Task::ScrollFrame);
        self.smooth_scroll = Some(SmoothScroll { animation, timer });
    }

    fn cancel_smooth_scroll(&mut self) {
        if let Some(scroll) = self.smooth_scroll.take() {
            self.scheduler.clear(scroll.timer);
        }
    }

    fn scroll_frame(&mut self) {
        let Some(scroll) = &self.smooth_scroll else {
            return;
        };
        let now = self.scheduler.now();
        let y = scroll.animation.position_at(now);
        let finished = scroll.animation.is_finished(now);
        if finished {
            self.cancel_smooth_scroll();
        }
        if self.viewport.set_scroll(y) {
            self.check_intersections();
        }
    }

    // ---- intersection ----

    /// Starts watching `targets`. Initial entries are delivered immediately.
    pub fn observe(
        &mut self,
        options: ObserverOptions,
        targets: &[Id],
        handler: Rc<dyn IntersectionHandler>,
    ) {
        let mut observer = IntersectionObserver::new(options, handler);
        for &target in targets {
            observer.observe(target);
        }
        self.observers.push(observer);
        self.check_intersections();
    }

    /// Delivers pending intersection changes to their handlers.
    pub fn check_intersections(&mut self) {
        let root = self.viewport.visible_rect();
        for i in 0..self.observers.len() {
            let layout = &self.layout;
            let observer = &mut self.observers[i];
            let entries = observer.take_records(root, &self.doc, |id| layout.get(&id).copied());
            if entries.is_empty() {
                continue;
            }
            let effects = observer.handler().on_entries(&entries, &self.doc);
            for effect in effects {
                self.apply(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Frame;
    use crate::event::Reaction;
    use std::cell::RefCell;

    struct Log(RefCell<Vec<(Id, Id)>>, bool);

    impl Handler for Log {
        fn handle(&self, event: &Event, _ctx: HandlerCtx<'_>) -> Reaction {
            self.0.borrow_mut().push((event.target, event.current_target));
            let reaction = Reaction::none();
            if self.1 { reaction.prevent_default() } else { reaction }
        }
    }

    #[test]
    fn click_bubbles_from_target_to_ancestors() {
        let mut page = Page::from_html("<div id=outer><p id=inner><span>x</span></p></div>");
        let outer = page.query("#outer").unwrap();
        let inner = page.query("#inner").unwrap();
        let span = page.query("span").unwrap();
        let log = Rc::new(Log(RefCell::new(Vec::new()), false));
        page.add_listener(outer, EventKind::Click, log.clone());
        page.add_listener(inner, EventKind::Click, log.clone());
        page.add_listener(inner, EventKind::Input, log.clone());

        let outcome = page.click(span);
        assert!(outcome.dispatched);
        assert_eq!(outcome.listeners_run, 2);
        assert_eq!(*log.0.borrow(), vec![(span, inner), (span, outer)]);
    }

    #[test]
    fn prevented_submit_is_not_recorded() {
        let mut page = Page::from_html("<form><input type=submit></form>");
        let form = page.query("form").unwrap();
        let input = page.query("input").unwrap();
        page.add_listener(form, EventKind::Submit, Rc::new(Log(RefCell::new(Vec::new()), true)));
        let outcome = page.click(input);
        assert!(!outcome.default_prevented);
        assert!(page.submissions().is_empty());
    }

    #[test]
    fn typed_buttons_do_not_submit() {
        let mut page = Page::from_html("<form><button type=button>a</button><button>b</button></form>");
        let form = page.query("form").unwrap();
        let plain = page.query("button").unwrap();
        page.click(plain);
        assert!(page.submissions().is_empty());
        let implicit = page.document().children(form)[1];
        page.click(implicit);
        assert_eq!(page.submissions(), &[form]);
    }

    #[test]
    fn disabled_controls_swallow_input() {
        let mut page = Page::from_html("<input name=q value=a disabled><div>x</div>");
        let input = page.query("input").unwrap();
        let div = page.query("div").unwrap();
        assert!(!page.type_text(input, "b").dispatched);
        assert_eq!(page.value(input).as_deref(), Some("a"));
        assert!(!page.type_text(div, "b").dispatched);
    }

    #[test]
    fn stale_effects_are_dropped() {
        let mut page = Page::from_html("<p>x</p>");
        let p = page.query("p").unwrap();
        page.remove_node(p);
        page.apply(Effect::SetText {
            node: p,
            text: "y".into(),
        });
        page.apply(Effect::AppendTransient {
            parent: p,
            tag: "span".into(),
            class: "ripple".into(),
            lifetime: 10,
        });
        assert_eq!(page.scheduler().pending(), 0);
        assert_eq!(html::to_html(page.document(), Document::ROOT), "");
    }

    struct Countdown(u32, Phase);

    impl Animation for Countdown {
        fn phase(&self) -> Phase {
            self.1
        }

        fn tick(&mut self) -> Frame {
            if self.0 == 0 {
                self.1 = Phase::Complete;
                return Frame::done();
            }
            self.0 -= 1;
            self.1 = Phase::Running;
            Frame {
                effects: Vec::new(),
                next: Next::After(10),
            }
        }
    }

    #[test]
    fn chained_animation_runs_to_completion() {
        let mut page = Page::from_html("");
        let id = page.start_animation(Box::new(Countdown(3, Phase::Pending)), Schedule::Timeout(5));
        assert_eq!(page.animation_phase(id), Some(Phase::Pending));
        page.advance(5);
        assert_eq!(page.animation_phase(id), Some(Phase::Running));
        assert_eq!(page.run_until_idle(), 3);
        assert_eq!(page.animation_phase(id), None);
        assert_eq!(page.now(), 35);
    }

    #[test]
    fn new_smooth_scroll_replaces_the_old_one() {
        let mut page = Page::from_html("<p id=a>a</p><p id=b>b</p>");
        page.resize(800.0, 600.0);
        let a = page.query("#a").unwrap();
        let b = page.query("#b").unwrap();
        page.set_layout(a, Rectangle::new(0.0, 2000.0, 800.0, 100.0));
        page.set_layout(b, Rectangle::new(0.0, 500.0, 800.0, 100.0));
        page.scroll_into_view(a, ScrollBehavior::Smooth);
        page.advance(100);
        page.scroll_into_view(b, ScrollBehavior::Smooth);
        assert_eq!(page.scheduler().pending(), 1);
        page.run_until_idle();
        assert_eq!(page.viewport().scroll_y(), 500.0);
    }

    #[test]
    fn scroll_target_is_clamped_to_content() {
        let mut page = Page::from_html("<p>a</p>");
        page.resize(800.0, 600.0);
        let p = page.query("p").unwrap();
        page.set_layout(p, Rectangle::new(0.0, 900.0, 800.0, 100.0));
        page.scroll_into_view(p, ScrollBehavior::Instant);
        assert_eq!(page.viewport().scroll_y(), 400.0);
    }
}
