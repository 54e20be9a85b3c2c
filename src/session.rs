//! Scripted visits to the reference page.
//!
//! A [`Session`] boots the reference page on a [`MemoryDocument`] with a
//! [`ManualScheduler`] and replays visitor [`Step`]s against it: clock ticks,
//! clicks, focus, hover, scrolling, resizing. After each step it reports the DOM
//! writes the step caused and a [`Snapshot`] of the resulting state. The CLI's
//! `simulate` command is a thin wrapper around this.
//!
//! Events go through the document's listener registry first, the way a browser
//! only runs handlers that were registered; an event nobody listens to is
//! reported as not delivered.
//!
//! ## Step Syntax
//!
//! ```text
//! tick 4000      advance the clock by 4000 ms (at most one day)
//! click clouds   click the view button for "clouds"
//! focus clouds   keyboard-focus the view button for "clouds"
//! hover          move the pointer into the hero
//! scroll 250     scroll the window to 250 px
//! resize 400     resize so the hero is 400 px tall
//! toggle         click the menu toggle
//! link 1         click the second nav link
//! ```
//!
//! The verb and argument may also be joined with `:` (`tick:4000`), which is
//! handier on a command line.

use crate::config::SiteConfig;
use crate::document::{MemoryDocument, Mutation};
use crate::hero::Mode;
use crate::markup::{self, HREF, PageParts};
use crate::page::Page;
use crate::scheduler::ManualScheduler;
use crate::view::{ElementId, Event, EventKind, View};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Longest single `tick`, in milliseconds: one day.
///
/// The manual clock delivers every interval fire one at a time, so the cost
/// of a tick grows with its length.
pub const MAX_TICK_MS: u64 = 24 * 60 * 60 * 1000;

const VERBS: &str = "tick, click, focus, hover, scroll, resize, toggle or link";

#[derive(Error, Debug, PartialEq)]
pub enum StepError {
    #[error("empty step")]
    Empty,
    #[error("unknown step '{0}' (expected {verbs})", verbs = VERBS)]
    UnknownVerb(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("'{verb}' expects a non-negative number, got '{value}'")]
    BadNumber {
        verb: &'static str,
        value: String,
    },
    #[error("tick of {0} ms exceeds the {max} ms limit", max = MAX_TICK_MS)]
    TickTooLong(u64),
}

/// One visitor action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", content = "arg", rename_all = "snake_case")]
pub enum Step {
    /// Advance the clock, in milliseconds.
    Tick(u64),
    Click(String),
    Focus(String),
    Hover,
    /// Scroll the window to this offset, in pixels.
    Scroll(f64),
    /// New hero height, in pixels.
    Resize(f64),
    Toggle,
    /// Click the nav link at this 0-based position.
    Link(usize),
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StepError::Empty);
        }
        let (verb, arg) = match s.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((verb, arg)) => (verb, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (s, None),
        };

        match verb.to_ascii_lowercase().as_str() {
            "tick" => match number("tick", arg)? {
                ms if ms > MAX_TICK_MS => Err(StepError::TickTooLong(ms)),
                ms => Ok(Step::Tick(ms)),
            },
            "click" => Ok(Step::Click(required("click", arg)?.to_string())),
            "focus" => Ok(Step::Focus(required("focus", arg)?.to_string())),
            "hover" => none("hover", arg).map(|_| Step::Hover),
            "scroll" => Ok(Step::Scroll(pixels("scroll", arg)?)),
            "resize" => Ok(Step::Resize(pixels("resize", arg)?)),
            "toggle" => none("toggle", arg).map(|_| Step::Toggle),
            "link" => Ok(Step::Link(number("link", arg)?)),
            _ => Err(StepError::UnknownVerb(verb.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Tick(ms) => write!(f, "tick {ms}"),
            Step::Click(v) => write!(f, "click {v}"),
            Step::Focus(v) => write!(f, "focus {v}"),
            Step::Hover => write!(f, "hover"),
            Step::Scroll(px) => write!(f, "scroll {px}"),
            Step::Resize(px) => write!(f, "resize {px}"),
            Step::Toggle => write!(f, "toggle"),
            Step::Link(n) => write!(f, "link {n}"),
        }
    }
}

fn required<'a>(verb: &'static str, arg: Option<&'a str>) -> Result<&'a str, StepError> {
    arg.ok_or(StepError::MissingArgument(verb))
}

fn none(verb: &'static str, arg: Option<&str>) -> Result<(), StepError> {
    match arg {
        Some(_) => Err(StepError::UnexpectedArgument(verb)),
        None => Ok(()),
    }
}

fn number<T: FromStr>(verb: &'static str, arg: Option<&str>) -> Result<T, StepError> {
    let value = required(verb, arg)?;
    value.parse().map_err(|_| StepError::BadNumber {
        verb,
        value: value.to_string(),
    })
}

fn pixels(verb: &'static str, arg: Option<&str>) -> Result<f64, StepError> {
    let px: f64 = number(verb, arg)?;
    if px.is_finite() && px >= 0.0 {
        Ok(px)
    } else {
        Err(StepError::BadNumber {
            verb,
            value: px.to_string(),
        })
    }
}

// =============================================================================
// Snapshots
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSnapshot {
    pub active_variant: String,
    pub mode: Mode,
    pub variants: Vec<String>,
    /// Text of the visible subtitle slot.
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavSnapshot {
    pub past_scroll_threshold: bool,
    pub menu_open: bool,
    pub active_link: Option<String>,
}

/// Observable state of the page after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub location: String,
    pub now_ms: u64,
    pub scroll_y: f64,
    pub body_classes: Vec<String>,
    pub hero: Option<HeroSnapshot>,
    pub nav: Option<NavSnapshot>,
}

/// What one step did.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    /// False when the step's event had no listener or no target element.
    pub delivered: bool,
    /// Interval fires delivered while the clock advanced.
    pub timer_fires: usize,
    pub mutations: Vec<Mutation>,
    pub snapshot: Snapshot,
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug)]
pub struct Session {
    page: Page<MemoryDocument, ManualScheduler>,
    parts: PageParts,
    boot_mutations: Vec<Mutation>,
}

impl Session {
    /// Boot the reference page at `location`, optionally declaring a default
    /// variant on the hero.
    pub fn new(config: &SiteConfig, location: &str, declared_variant: Option<&str>) -> Self {
        let (doc, parts) = markup::marketing_page(config, location, declared_variant);
        let mut page = Page::boot(doc, ManualScheduler::new(), config);
        let boot_mutations = page.view_mut().take_mutations();
        Self {
            page,
            parts,
            boot_mutations,
        }
    }

    /// DOM writes made while the page booted.
    pub fn boot_mutations(&self) -> &[Mutation] {
        &self.boot_mutations
    }

    pub fn page(&self) -> &Page<MemoryDocument, ManualScheduler> {
        &self.page
    }

    pub fn parts(&self) -> &PageParts {
        &self.parts
    }

    pub fn run(&mut self, step: &Step) -> StepOutcome {
        let mut timer_fires = 0;
        let delivered = match step {
            Step::Tick(ms) => {
                timer_fires = self.page.advance(Duration::from_millis(*ms));
                true
            }
            Step::Click(variant) => self.deliver_to_button(variant, EventKind::Click),
            Step::Focus(variant) => self.deliver_to_button(variant, EventKind::Focus),
            Step::Hover => self.deliver(Event::element(self.parts.hero, EventKind::MouseEnter)),
            Step::Scroll(y) => {
                self.page.view_mut().scroll_to(*y);
                self.deliver(Event::window(EventKind::Scroll))
            }
            Step::Resize(height) => {
                let hero = self.parts.hero;
                self.page.view_mut().set_height(hero, *height);
                self.deliver(Event::window(EventKind::Resize))
            }
            Step::Toggle => self.deliver(Event::element(self.parts.toggle, EventKind::Click)),
            Step::Link(n) => match self.parts.links.get(*n).copied() {
                Some(link) => self.deliver(Event::element(link, EventKind::Click)),
                None => false,
            },
        };

        StepOutcome {
            step: step.clone(),
            delivered,
            timer_fires,
            mutations: self.page.view_mut().take_mutations(),
            snapshot: self.snapshot(),
        }
    }

    /// Run every step in order.
    pub fn run_all(&mut self, steps: &[Step]) -> Vec<StepOutcome> {
        steps.iter().map(|s| self.run(s)).collect()
    }

    fn deliver_to_button(&mut self, variant: &str, kind: EventKind) -> bool {
        match self.parts.button(self.page.view(), variant) {
            Some(button) => self.deliver(Event::element(button, kind)),
            None => false,
        }
    }

    fn deliver(&mut self, event: Event) -> bool {
        if !self.page.view().has_listener(&event) {
            return false;
        }
        self.page.dispatch(event);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let doc = self.page.view();
        let hero = self.page.hero().map(|h| HeroSnapshot {
            active_variant: h.active_variant().to_string(),
            mode: h.mode(),
            variants: h.variants().to_vec(),
            subtitle: h.current_subtitle_slot().map(|slot| doc.text(slot)),
        });
        let nav = self.page.nav().map(|n| NavSnapshot {
            past_scroll_threshold: n.state().past_scroll_threshold,
            menu_open: n.state().menu_open,
            active_link: n.active_link().and_then(|l| doc.attribute(l, HREF)),
        });

        Snapshot {
            location: doc.location_path(),
            now_ms: self.page.scheduler().now().as_millis() as u64,
            scroll_y: doc.scroll_y(),
            body_classes: doc.classes(doc.body()).to_vec(),
            hero,
            nav,
        }
    }

    /// Label for an element, for transcripts: its first class, or its tag.
    /// `<body>` is always `body`, since its classes are page state.
    pub fn describe(&self, el: ElementId) -> String {
        let doc = self.page.view();
        if el == doc.body() {
            return "body".to_string();
        }
        let name = doc
            .classes(el)
            .first()
            .map(|c| format!(".{c}"))
            .unwrap_or_else(|| doc.tag(el).to_string());
        match doc.attribute(el, markup::DATA_VARIANT) {
            Some(v) if el != self.parts.hero => format!("{name}[{v}]"),
            _ => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{NAV_OPEN, NAV_VISIBLE};

    fn session(location: &str, declared: Option<&str>) -> Session {
        Session::new(&SiteConfig::default(), location, declared)
    }

    // =========================================================================
    // Step parsing
    // =========================================================================

    fn parse(s: &str) -> Result<Step, StepError> {
        s.parse()
    }

    #[test]
    fn parse_all_verbs() {
        assert_eq!(parse("tick 4000"), Ok(Step::Tick(4000)));
        assert_eq!(parse("click clouds"), Ok(Step::Click("clouds".into())));
        assert_eq!(parse("focus sunflare"), Ok(Step::Focus("sunflare".into())));
        assert_eq!(parse("hover"), Ok(Step::Hover));
        assert_eq!(parse("scroll 250"), Ok(Step::Scroll(250.0)));
        assert_eq!(parse("resize 400.5"), Ok(Step::Resize(400.5)));
        assert_eq!(parse("toggle"), Ok(Step::Toggle));
        assert_eq!(parse("link 2"), Ok(Step::Link(2)));
    }

    #[test]
    fn parse_colon_form() {
        assert_eq!(parse("tick:4000"), Ok(Step::Tick(4000)));
        assert_eq!(parse("click:clouds"), Ok(Step::Click("clouds".into())));
    }

    #[test]
    fn parse_is_case_insensitive_on_verb() {
        assert_eq!(parse("TICK 10"), Ok(Step::Tick(10)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse(""), Err(StepError::Empty));
        assert_eq!(parse("jump 3"), Err(StepError::UnknownVerb("jump".into())));
        assert_eq!(parse("tick"), Err(StepError::MissingArgument("tick")));
        assert_eq!(parse("click:"), Err(StepError::MissingArgument("click")));
        assert_eq!(
            parse("hover now"),
            Err(StepError::UnexpectedArgument("hover"))
        );
        assert!(matches!(
            parse("tick soon"),
            Err(StepError::BadNumber { verb: "tick", .. })
        ));
        assert!(matches!(
            parse("scroll -5"),
            Err(StepError::BadNumber { verb: "scroll", .. })
        ));
    }

    #[test]
    fn tick_longer_than_a_day_is_rejected() {
        let too_long = MAX_TICK_MS + 1;
        assert_eq!(
            parse(&format!("tick:{too_long}")),
            Err(StepError::TickTooLong(too_long))
        );
        assert_eq!(
            parse("tick:18446744073709551615"),
            Err(StepError::TickTooLong(u64::MAX))
        );
        assert_eq!(parse("tick:86400000"), Ok(Step::Tick(MAX_TICK_MS)));

        let message = parse("tick 90000000").unwrap_err().to_string();
        assert!(message.contains("86400000 ms limit"));
    }

    #[test]
    fn longest_tick_finishes() {
        let mut s = session("/", None);
        let out = s.run(&Step::Tick(MAX_TICK_MS));
        assert_eq!(out.timer_fires, 21_600);
        let now = s.page().scheduler().now();
        assert_eq!(now, Duration::from_millis(MAX_TICK_MS));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let steps = [
            Step::Tick(4000),
            Step::Click("clouds".into()),
            Step::Toggle,
            Step::Link(1),
        ];
        for step in steps {
            assert_eq!(parse(&step.to_string()), Ok(step));
        }
    }

    // =========================================================================
    // Running steps
    // =========================================================================

    #[test]
    fn boot_state() {
        let s = session("/", Some("clouds"));
        let snap = s.snapshot();
        let hero = snap.hero.unwrap();
        assert_eq!(hero.active_variant, "clouds");
        assert_eq!(hero.subtitle.as_deref(), Some("Low clouds. Soft horizons."));
        assert_eq!(hero.mode, Mode::AutoRotating);
        assert_eq!(snap.nav.unwrap().active_link.as_deref(), Some("/"));
        assert!(!s.boot_mutations().is_empty());
    }

    #[test]
    fn documented_rotation_example() {
        let mut s = session("/", Some("clouds"));
        let out = s.run(&Step::Tick(4000));
        assert_eq!(out.timer_fires, 1);
        let hero = out.snapshot.hero.unwrap();
        assert_eq!(hero.active_variant, "sunflare");
        let out = s.run(&Step::Tick(8000));
        assert_eq!(out.timer_fires, 2);
        assert_eq!(out.snapshot.hero.unwrap().active_variant, "clouds");
    }

    #[test]
    fn click_after_rotation_freezes() {
        let mut s = session("/", None);
        s.run(&Step::Tick(4000));
        let out = s.run(&Step::Click("sunflare".into()));
        assert!(out.delivered);
        let out = s.run(&Step::Tick(40_000));
        assert_eq!(out.timer_fires, 0);
        let hero = out.snapshot.hero.unwrap();
        assert_eq!(hero.active_variant, "sunflare");
        assert_eq!(hero.mode, Mode::Manual);
        assert!(out.mutations.is_empty());
    }

    #[test]
    fn click_on_missing_button_is_not_delivered() {
        let mut s = session("/", None);
        let out = s.run(&Step::Click("midnight".into()));
        assert!(!out.delivered);
        assert!(out.mutations.is_empty());
    }

    #[test]
    fn link_out_of_range_is_not_delivered() {
        let mut s = session("/", None);
        assert!(!s.run(&Step::Link(9)).delivered);
    }

    #[test]
    fn scroll_reveal_and_menu() {
        let mut s = session("/about/", None);
        let out = s.run(&Step::Scroll(150.0));
        assert!(out.mutations.is_empty());

        let out = s.run(&Step::Scroll(400.0));
        assert_eq!(out.mutations.len(), 1);
        assert!(out.snapshot.body_classes.contains(&NAV_VISIBLE.to_string()));

        let out = s.run(&Step::Toggle);
        assert!(out.snapshot.nav.as_ref().unwrap().menu_open);
        assert!(out.snapshot.body_classes.contains(&NAV_OPEN.to_string()));

        let out = s.run(&Step::Scroll(0.0));
        assert!(out.mutations.is_empty());

        let out = s.run(&Step::Link(0));
        assert!(!out.snapshot.nav.unwrap().menu_open);
    }

    #[test]
    fn resize_reaches_nav() {
        let mut s = session("/", None);
        s.run(&Step::Scroll(150.0));
        let out = s.run(&Step::Resize(400.0));
        assert!(out.delivered);
        assert!(out.snapshot.nav.unwrap().past_scroll_threshold);
    }

    #[test]
    fn describe_elements() {
        let s = session("/", None);
        let parts = s.parts().clone();
        assert_eq!(s.describe(parts.hero), ".hero");
        assert_eq!(s.describe(parts.buttons[1]), ".hero__view-button[clouds]");
        assert_eq!(s.describe(s.page().view().body()), "body");
    }

    #[test]
    fn snapshot_serializes() {
        let s = session("/", None);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["hero"]["mode"], "auto_rotating");
        assert_eq!(json["nav"]["menu_open"], false);
    }
}
