//! Sticky navigation bar.
//!
//! Three independent jobs:
//!
//! - **Reveal on scroll**: once the visitor has scrolled more than a fraction
//!   (25% by default) of the hero's height into the hero, `<body>` gets
//!   `site--nav-visible`; scrolling back removes it. The class is only written
//!   when the past/not-past answer actually changes.
//! - **Mobile menu**: the toggle button flips `site--nav-open` on `<body>` and
//!   keeps its `aria-expanded` and label in step. Clicking any nav link closes
//!   the menu. While the menu is open, scroll handling is suspended so the bar
//!   doesn't hide underneath an open menu. The open state is read from
//!   `<body>` at startup, so a page served with the menu already open starts
//!   suspended.
//! - **Active link**: on startup, the link matching the current path gets
//!   `main-nav__link--active`.
//!
//! The threshold is 25% of the hero height. An older design note mentions 60%;
//! 25% is what shipped and what is kept.

use crate::config::NavigationConfig;
use crate::markup::{
    ARIA_EXPANDED, HEADER, HERO, HREF, NAV_LINK, NAV_LINK_ACTIVE, NAV_OPEN, NAV_TOGGLE,
    NAV_TOGGLE_LABEL, NAV_VISIBLE,
};
use crate::view::{ElementId, Event, EventKind, EventTarget, View};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone)]
struct NavElements {
    body: ElementId,
    hero: ElementId,
    toggle: Option<ElementId>,
    toggle_label: Option<ElementId>,
    links: Vec<ElementId>,
}

/// Observable navigation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub past_scroll_threshold: bool,
    pub menu_open: bool,
}

#[derive(Debug, Clone)]
pub struct NavigationBar {
    elements: NavElements,
    state: NavState,
    threshold_ratio: f64,
    menu_label: String,
    close_label: String,
    active_link: Option<ElementId>,
}

impl NavigationBar {
    /// Highlight the current link, wire listeners and evaluate the scroll
    /// position once.
    ///
    /// Returns `None` without touching the view when the page has no header
    /// or no hero.
    pub fn init<V: View>(view: &mut V, config: &NavigationConfig) -> Option<Self> {
        view.find_one(HEADER)?;
        let hero = view.find_one(HERO)?;

        let body = view.body();
        let mut nav = Self {
            elements: NavElements {
                body,
                hero,
                toggle: view.find_one(NAV_TOGGLE),
                toggle_label: view.find_one(NAV_TOGGLE_LABEL),
                links: view.find_all(NAV_LINK),
            },
            state: NavState {
                past_scroll_threshold: false,
                menu_open: view.has_class(body, NAV_OPEN),
            },
            threshold_ratio: config.scroll_threshold_ratio,
            menu_label: config.menu_label.clone(),
            close_label: config.close_label.clone(),
            active_link: None,
        };

        nav.highlight_active_link(view);
        nav.bind_events(view);
        nav.handle_scroll(view);
        Some(nav)
    }

    fn bind_events<V: View>(&self, view: &mut V) {
        view.listen(EventTarget::Window, EventKind::Scroll);
        view.listen(EventTarget::Window, EventKind::Resize);
        if let Some(toggle) = self.elements.toggle {
            view.listen(EventTarget::Element(toggle), EventKind::Click);
        }
        for &link in &self.elements.links {
            view.listen(EventTarget::Element(link), EventKind::Click);
        }
    }

    /// Mark the first link whose `href` matches the current path.
    fn highlight_active_link<V: View>(&mut self, view: &mut V) {
        let path = view.location_path();
        let current = strip_trailing_slash(&path);

        let found = self.elements.links.iter().copied().find(|&link| {
            view.attribute(link, HREF)
                .is_some_and(|href| link_matches(current, strip_trailing_slash(&href)))
        });

        if let Some(link) = found {
            view.add_class(link, NAV_LINK_ACTIVE);
            debug!(path = %path, "active nav link marked");
        }
        self.active_link = found;
    }

    // =========================================================================
    // Core behavior
    // =========================================================================

    /// Recompute whether the visitor is past the reveal threshold.
    ///
    /// Suspended while the menu is open. Writes to the DOM only when the
    /// answer changes.
    pub fn handle_scroll<V: View>(&mut self, view: &mut V) {
        if self.state.menu_open {
            return;
        }

        let rect = view.bounding_rect(self.elements.hero);
        // 0 at the top of the page, growing as the hero scrolls up.
        let scrolled = -rect.top;
        let threshold = rect.height * self.threshold_ratio;
        let past = scrolled > threshold;

        if past != self.state.past_scroll_threshold {
            self.state.past_scroll_threshold = past;
            if past {
                view.add_class(self.elements.body, NAV_VISIBLE);
            } else {
                view.remove_class(self.elements.body, NAV_VISIBLE);
            }
            debug!(past, scrolled, threshold, "nav threshold crossed");
        }
    }

    /// Open or close the mobile menu.
    pub fn handle_toggle<V: View>(&mut self, view: &mut V) {
        let open = view.toggle_class(self.elements.body, NAV_OPEN);
        self.state.menu_open = open;

        if let Some(toggle) = self.elements.toggle {
            view.set_attribute(toggle, ARIA_EXPANDED, if open { "true" } else { "false" });
        }
        if let Some(label) = self.elements.toggle_label {
            let text = if open {
                &self.close_label
            } else {
                &self.menu_label
            };
            view.set_text(label, text);
        }
        debug!(open, "nav menu toggled");
    }

    /// Collapse the menu after a link is followed.
    pub fn handle_nav_link_click<V: View>(&mut self, view: &mut V) {
        view.remove_class(self.elements.body, NAV_OPEN);
        self.state.menu_open = false;

        if let Some(toggle) = self.elements.toggle {
            view.set_attribute(toggle, ARIA_EXPANDED, "false");
        }
        if let Some(label) = self.elements.toggle_label {
            view.set_text(label, &self.menu_label);
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// React to a delivered event. Events for other elements are ignored.
    pub fn handle_event<V: View>(&mut self, view: &mut V, event: &Event) {
        match (event.target, event.kind) {
            (EventTarget::Window, EventKind::Scroll | EventKind::Resize) => {
                self.handle_scroll(view)
            }
            (EventTarget::Element(el), EventKind::Click) if Some(el) == self.elements.toggle => {
                self.handle_toggle(view)
            }
            (EventTarget::Element(el), EventKind::Click) if self.elements.links.contains(&el) => {
                self.handle_nav_link_click(view)
            }
            _ => {}
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn active_link(&self) -> Option<ElementId> {
        self.active_link
    }
}

/// Drop one trailing `/`, so `/about/` and `/about` compare equal and `/`
/// becomes the empty home path.
fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Whether a normalized link `href` points at the normalized `current` path.
///
/// The home path matches an empty href or any href mentioning `index`; every
/// other path matches a non-empty href it ends with.
pub fn link_matches(current: &str, href: &str) -> bool {
    if current.is_empty() {
        href.is_empty() || href.contains("index")
    } else {
        !href.is_empty() && current.ends_with(href)
    }
}
