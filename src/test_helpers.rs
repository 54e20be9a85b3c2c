//! Shared test utilities for the marquee test suite.
//!
//! Builds the reference page with stock config and reads back the bits of
//! DOM state most tests assert on.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (mut doc, parts) = demo_page("/", Some("clouds"));
//! let mut sched = ManualScheduler::new();
//! let hero = init_hero(&mut doc, &mut sched);
//!
//! assert_eq!(pressed(&doc, &parts), vec!["false", "true", "false"]);
//! ```

use crate::config::{HeroConfig, NavigationConfig, SiteConfig};
use crate::document::MemoryDocument;
use crate::hero::HeroShowcase;
use crate::markup::{self, ARIA_PRESSED, HERO_PICTURE_ACTIVE, NAV_LINK_ACTIVE, PageParts};
use crate::navigation::NavigationBar;
use crate::scheduler::Scheduler;
use crate::view::{ElementId, View};

// =========================================================================
// Fixture setup
// =========================================================================

/// Reference page with stock config at `location`.
pub fn demo_page(location: &str, declared: Option<&str>) -> (MemoryDocument, PageParts) {
    markup::marketing_page(&SiteConfig::default(), location, declared)
}

/// Initialize a hero with stock config. Panics if the page is inert.
pub fn init_hero<S: Scheduler>(doc: &mut MemoryDocument, sched: &mut S) -> HeroShowcase {
    HeroShowcase::init(doc, sched, &HeroConfig::default())
        .unwrap_or_else(|| panic!("hero stayed inert on a page that has one"))
}

/// Initialize a navigation bar with stock config. Panics if the page is inert.
pub fn init_nav(doc: &mut MemoryDocument) -> NavigationBar {
    NavigationBar::init(doc, &NavigationConfig::default())
        .unwrap_or_else(|| panic!("navigation stayed inert on a page that has a header and hero"))
}

// =========================================================================
// DOM state extractors
// =========================================================================

/// Pictures currently carrying the active class.
pub fn active_pictures(doc: &MemoryDocument, parts: &PageParts) -> Vec<ElementId> {
    parts
        .pictures
        .iter()
        .copied()
        .filter(|&p| doc.has_class(p, HERO_PICTURE_ACTIVE))
        .collect()
}

/// `aria-pressed` of every view button, in document order.
pub fn pressed(doc: &MemoryDocument, parts: &PageParts) -> Vec<String> {
    parts
        .buttons
        .iter()
        .map(|&b| doc.attribute(b, ARIA_PRESSED).unwrap_or_default())
        .collect()
}

/// Nav links currently carrying the active class.
pub fn active_links(doc: &MemoryDocument, parts: &PageParts) -> Vec<ElementId> {
    parts
        .links
        .iter()
        .copied()
        .filter(|&l| doc.has_class(l, NAV_LINK_ACTIVE))
        .collect()
}
