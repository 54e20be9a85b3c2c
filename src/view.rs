//! The document capability the components are written against.
//!
//! Neither component touches a browser API directly. Everything they need from
//! the page (finding elements, flipping classes, writing attributes and text,
//! reading geometry, subscribing to events) goes through the [`View`] trait.
//! The browser implementation lives in `web` (feature `web`); tests and the CLI
//! use [`crate::document::MemoryDocument`].
//!
//! ## Selectors
//!
//! Selectors are single class selectors (`.hero__picture`). That is the whole
//! structural contract the markup exposes, so implementations are not required
//! to support anything richer.

use serde::Serialize;
use std::fmt;

/// Opaque handle to an element owned by a [`View`].
///
/// Handles are only meaningful for the view that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub(crate) usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The browser window (scroll, resize).
    Window,
    Element(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Focus,
    MouseEnter,
    Scroll,
    Resize,
}

impl EventKind {
    /// DOM event type name, as passed to `addEventListener`.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Focus => "focus",
            EventKind::MouseEnter => "mouseenter",
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
        }
    }
}

/// A delivered event. Carries no payload; handlers re-read whatever state
/// they need from the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub target: EventTarget,
    pub kind: EventKind,
}

impl Event {
    pub fn window(kind: EventKind) -> Self {
        Self {
            target: EventTarget::Window,
            kind,
        }
    }

    pub fn element(id: ElementId, kind: EventKind) -> Self {
        Self {
            target: EventTarget::Element(id),
            kind,
        }
    }
}

/// Viewport-relative box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Distance from the top of the viewport. Negative once scrolled past.
    pub top: f64,
    pub height: f64,
}

/// Injected document/view capability.
///
/// Write operations are unconditional: callers are responsible for only
/// writing on real state transitions.
pub trait View {
    /// First element in document order carrying `selector`.
    fn find_one(&self, selector: &str) -> Option<ElementId>;
    /// All elements in document order carrying `selector`.
    fn find_all(&self, selector: &str) -> Vec<ElementId>;
    /// Like [`View::find_one`], restricted to descendants of `scope`.
    fn find_one_within(&self, scope: ElementId, selector: &str) -> Option<ElementId>;
    /// Like [`View::find_all`], restricted to descendants of `scope`.
    fn find_all_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    /// The `<body>` element, which carries the page-level marker classes.
    fn body(&self) -> ElementId;

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    /// Flip `class` and return whether it is present afterwards.
    fn toggle_class(&mut self, el: ElementId, class: &str) -> bool;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    fn text(&self, el: ElementId) -> String;
    fn set_text(&mut self, el: ElementId, text: &str);

    fn bounding_rect(&self, el: ElementId) -> Rect;
    /// Path component of the current URL (`/about/`).
    fn location_path(&self) -> String;

    /// Subscribe to `kind` events on `target`. Delivery is the host's job:
    /// subscribed events reach the components through [`crate::page::Page::dispatch`].
    fn listen(&mut self, target: EventTarget, kind: EventKind);
}

/// Strip the leading `.` of a class selector.
pub fn class_of(selector: &str) -> &str {
    selector.strip_prefix('.').unwrap_or(selector)
}
