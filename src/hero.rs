//! Rotating hero showcase.
//!
//! The hero shows one of several named **variants** at a time: a picture, a
//! pressed view button, and a subtitle. Variants rotate on a timer until the
//! visitor shows intent (clicks or focuses a view button, or moves the pointer
//! into the hero). From then on the hero stays put and only changes on button
//! clicks.
//!
//! ```text
//!            click / focus / mouseenter
//! AutoRotating ───────────────────────────▶ Manual
//!   │  ▲                                     │  ▲
//!   └──┘ tick: next variant                  └──┘ click: set variant
//! ```
//!
//! ## Variants
//!
//! The variant set is whatever `data-variant` keys the `.hero__picture`
//! elements carry, in document order, read once at startup. The hero's own
//! `data-variant` names the author's default; an unknown or missing default
//! falls back to the first variant, and the resolved key is written back so
//! stylesheets never see an invalid value.
//!
//! ## Subtitle Crossfade
//!
//! Two slots alternate roles. The incoming text goes into the hidden slot,
//! which becomes current; the old current slot becomes hidden but keeps its
//! text while CSS fades it out. A visible slot is never cleared.
//!
//! ## Inertness
//!
//! Pages without a hero, pictures, or view buttons simply don't get the
//! behavior: [`HeroShowcase::init`] returns `None` and touches nothing.

use crate::config::HeroConfig;
use crate::markup::{
    ARIA_PRESSED, DATA_VARIANT, HERO, HERO_PICTURE, HERO_PICTURE_ACTIVE, SUBTITLE_CURRENT,
    SUBTITLE_NEXT, VIEW_BUTTON, VIEW_BUTTON_ACTIVE,
};
use crate::scheduler::{Scheduler, TimerId};
use crate::view::{ElementId, Event, EventKind, EventTarget, View};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Autoplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    AutoRotating,
    /// Terminal: autoplay never resumes.
    Manual,
}

#[derive(Debug, Clone)]
struct HeroElements {
    hero: ElementId,
    pictures: Vec<ElementId>,
    buttons: Vec<ElementId>,
    /// Both subtitle slots, or `None` when the markup lacks either.
    subtitle_slots: Option<[ElementId; 2]>,
}

#[derive(Debug, Clone)]
struct HeroState {
    variants: Vec<String>,
    current_index: usize,
    mode: Mode,
    rotate_timer: Option<TimerId>,
    /// Index into `subtitle_slots` of the visible slot.
    current_slot: usize,
}

#[derive(Debug, Clone)]
pub struct HeroShowcase {
    elements: HeroElements,
    state: HeroState,
    subtitles: BTreeMap<String, String>,
    rotate_interval: Duration,
}

impl HeroShowcase {
    /// Find the hero in `view`, wire its listeners, render the initial variant
    /// and start auto-rotation.
    ///
    /// Returns `None` without touching the view or the scheduler when the hero,
    /// its pictures, its view buttons, or every picture's variant key is
    /// missing.
    pub fn init<V: View, S: Scheduler>(
        view: &mut V,
        scheduler: &mut S,
        config: &HeroConfig,
    ) -> Option<Self> {
        let hero = view.find_one(HERO)?;
        let pictures = view.find_all_within(hero, HERO_PICTURE);
        let buttons = view.find_all_within(hero, VIEW_BUTTON);
        if pictures.is_empty() || buttons.is_empty() {
            return None;
        }

        let variants: Vec<String> = pictures
            .iter()
            .filter_map(|&p| view.attribute(p, DATA_VARIANT))
            .filter(|v| !v.is_empty())
            .collect();
        if variants.is_empty() {
            return None;
        }

        let current = view.find_one_within(hero, &format!(".{SUBTITLE_CURRENT}"));
        let next = view.find_one_within(hero, &format!(".{SUBTITLE_NEXT}"));
        let subtitle_slots = current.zip(next).map(|(c, n)| [c, n]);

        let mut showcase = Self {
            elements: HeroElements {
                hero,
                pictures,
                buttons,
                subtitle_slots,
            },
            state: HeroState {
                variants,
                current_index: 0,
                mode: Mode::AutoRotating,
                rotate_timer: None,
                current_slot: 0,
            },
            subtitles: config.subtitles.clone(),
            rotate_interval: config.rotate_interval(),
        };

        showcase.set_initial_state(view);
        showcase.bind_events(view);
        let initial = showcase.active_variant().to_string();
        showcase.set_variant(view, &initial);
        showcase.start_auto_rotate(scheduler);
        Some(showcase)
    }

    /// Resolve the starting variant, sync it back to the hero and show its
    /// subtitle without a fade.
    fn set_initial_state<V: View>(&mut self, view: &mut V) {
        let declared = view.attribute(self.elements.hero, DATA_VARIANT);
        self.state.current_index = declared.and_then(|d| self.index_of(&d)).unwrap_or(0);

        let resolved = self.active_variant().to_string();
        view.set_attribute(self.elements.hero, DATA_VARIANT, &resolved);

        let text = self.subtitles.get(&resolved);
        if let (Some(slots), Some(text)) = (self.elements.subtitle_slots, text) {
            view.set_text(slots[self.state.current_slot], text);
        }
    }

    fn bind_events<V: View>(&self, view: &mut V) {
        for &button in &self.elements.buttons {
            view.listen(EventTarget::Element(button), EventKind::Click);
            view.listen(EventTarget::Element(button), EventKind::Focus);
        }
        let hero = EventTarget::Element(self.elements.hero);
        view.listen(hero, EventKind::MouseEnter);
    }

    // =========================================================================
    // Core behavior
    // =========================================================================

    /// Make `variant` the active one.
    ///
    /// Unknown or empty keys are ignored. Re-applying the active variant is
    /// safe and rewrites the same state.
    pub fn set_variant<V: View>(&mut self, view: &mut V, variant: &str) {
        let Some(index) = self.index_of(variant) else {
            return;
        };

        for &picture in &self.elements.pictures {
            if view.attribute(picture, DATA_VARIANT).as_deref() == Some(variant) {
                view.add_class(picture, HERO_PICTURE_ACTIVE);
            } else {
                view.remove_class(picture, HERO_PICTURE_ACTIVE);
            }
        }

        for &button in &self.elements.buttons {
            if view.attribute(button, DATA_VARIANT).as_deref() == Some(variant) {
                view.add_class(button, VIEW_BUTTON_ACTIVE);
                view.set_attribute(button, ARIA_PRESSED, "true");
            } else {
                view.remove_class(button, VIEW_BUTTON_ACTIVE);
                view.set_attribute(button, ARIA_PRESSED, "false");
            }
        }

        // Drives the CSS tint.
        view.set_attribute(self.elements.hero, DATA_VARIANT, variant);
        self.state.current_index = index;
        debug!(variant, index, "hero variant applied");

        if let Some(text) = self.subtitles.get(variant).cloned() {
            self.crossfade_subtitle_to(view, &text);
        }
    }

    /// Fade `text` in over whatever the current slot shows.
    pub fn crossfade_subtitle_to<V: View>(&mut self, view: &mut V, text: &str) {
        let Some(slots) = self.elements.subtitle_slots else {
            return;
        };
        let incoming = slots[1 - self.state.current_slot];
        let outgoing = slots[self.state.current_slot];

        view.set_text(incoming, text);
        view.add_class(incoming, SUBTITLE_CURRENT);
        view.remove_class(incoming, SUBTITLE_NEXT);

        view.remove_class(outgoing, SUBTITLE_CURRENT);
        view.add_class(outgoing, SUBTITLE_NEXT);

        self.state.current_slot = 1 - self.state.current_slot;
    }

    /// Advance to the next variant, wrapping after the last.
    pub fn next_variant<V: View>(&mut self, view: &mut V) {
        let len = self.state.variants.len();
        if len == 0 {
            return;
        }
        self.state.current_index = (self.state.current_index + 1) % len;
        let next = self.state.variants[self.state.current_index].clone();
        self.set_variant(view, &next);
    }

    /// Arm the rotation timer. No-op if already running or once the hero has
    /// gone manual.
    pub fn start_auto_rotate<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.state.rotate_timer.is_some() || self.state.mode == Mode::Manual {
            return;
        }
        self.state.rotate_timer = Some(scheduler.set_interval(self.rotate_interval));
    }

    /// Cancel the rotation timer if it is running.
    pub fn stop_auto_rotate<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.state.rotate_timer.take() {
            scheduler.clear_interval(id);
        }
    }

    /// Leave autoplay for good.
    fn go_manual<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.stop_auto_rotate(scheduler);
        if self.state.mode != Mode::Manual {
            self.state.mode = Mode::Manual;
            debug!(variant = self.active_variant(), "hero autoplay stopped");
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// React to a delivered event. Events for other elements are ignored.
    pub fn handle_event<V: View, S: Scheduler>(
        &mut self,
        view: &mut V,
        scheduler: &mut S,
        event: &Event,
    ) {
        let EventTarget::Element(target) = event.target else {
            return;
        };

        if self.elements.buttons.contains(&target) {
            match event.kind {
                EventKind::Click => self.handle_button_click(view, scheduler, target),
                EventKind::Focus => self.go_manual(scheduler),
                _ => {}
            }
        } else if target == self.elements.hero && event.kind == EventKind::MouseEnter {
            self.go_manual(scheduler);
        }
    }

    fn handle_button_click<V: View, S: Scheduler>(
        &mut self,
        view: &mut V,
        scheduler: &mut S,
        button: ElementId,
    ) {
        let variant = view.attribute(button, DATA_VARIANT).unwrap_or_default();
        if variant.is_empty() {
            return;
        }
        self.set_variant(view, &variant);
        self.go_manual(scheduler);
    }

    /// Run a timer fire. Only this hero's live rotation timer advances it.
    pub fn on_timer<V: View>(&mut self, view: &mut V, id: TimerId) {
        if self.state.mode == Mode::AutoRotating && self.state.rotate_timer == Some(id) {
            self.next_variant(view);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn active_variant(&self) -> &str {
        &self.state.variants[self.state.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Variant keys in rotation order.
    pub fn variants(&self) -> &[String] {
        &self.state.variants
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn rotate_timer(&self) -> Option<TimerId> {
        self.state.rotate_timer
    }

    /// The slot currently showing the subtitle, if the markup has both slots.
    pub fn current_subtitle_slot(&self) -> Option<ElementId> {
        self.elements
            .subtitle_slots
            .map(|slots| slots[self.state.current_slot])
    }

    fn index_of(&self, variant: &str) -> Option<usize> {
        if variant.is_empty() {
            return None;
        }
        self.state.variants.iter().position(|v| v == variant)
    }
}
