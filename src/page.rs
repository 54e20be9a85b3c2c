//! Page host.
//!
//! A [`Page`] is what runs at DOM-ready: it owns the view and the scheduler,
//! boots both components against them, and afterwards routes every delivered
//! event and timer fire to the components. Each component ignores events for
//! elements it doesn't own, so routing is a plain fan-out.
//!
//! Either component may be absent when the page lacks its markup; the other
//! runs regardless.

use crate::config::SiteConfig;
use crate::hero::HeroShowcase;
use crate::navigation::NavigationBar;
use crate::scheduler::{ManualScheduler, Scheduler, TimerId};
use crate::view::{Event, View};
use std::time::Duration;

#[derive(Debug)]
pub struct Page<V, S> {
    view: V,
    scheduler: S,
    hero: Option<HeroShowcase>,
    nav: Option<NavigationBar>,
}

impl<V: View, S: Scheduler> Page<V, S> {
    /// Boot both components, as on `DOMContentLoaded`.
    pub fn boot(mut view: V, mut scheduler: S, config: &SiteConfig) -> Self {
        let hero = HeroShowcase::init(&mut view, &mut scheduler, &config.hero);
        let nav = NavigationBar::init(&mut view, &config.navigation);
        tracing::debug!(
            hero = hero.is_some(),
            nav = nav.is_some(),
            "page booted"
        );
        Self {
            view,
            scheduler,
            hero,
            nav,
        }
    }

    /// Deliver a DOM event.
    pub fn dispatch(&mut self, event: Event) {
        if let Some(hero) = self.hero.as_mut() {
            hero.handle_event(&mut self.view, &mut self.scheduler, &event);
        }
        if let Some(nav) = self.nav.as_mut() {
            nav.handle_event(&mut self.view, &event);
        }
    }

    /// Deliver an interval fire.
    pub fn fire_timer(&mut self, id: TimerId) {
        if let Some(hero) = self.hero.as_mut() {
            hero.on_timer(&mut self.view, id);
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn hero(&self) -> Option<&HeroShowcase> {
        self.hero.as_ref()
    }

    pub fn nav(&self) -> Option<&NavigationBar> {
        self.nav.as_ref()
    }
}

impl<V: View> Page<V, ManualScheduler> {
    /// Move logical time forward by `by`, delivering every interval fire due
    /// on the way, in order. Returns how many fires were delivered.
    pub fn advance(&mut self, by: Duration) -> usize {
        let deadline = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(id) = self.scheduler.fire_next(deadline) {
            self.fire_timer(id);
            fired += 1;
        }
        self.scheduler.settle(deadline);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, MemoryDocument};
    use crate::hero::Mode;
    use crate::markup::{self, NAV_VISIBLE};
    use crate::view::EventKind;

    type DemoPage = Page<MemoryDocument, ManualScheduler>;

    fn boot(location: &str, declared: Option<&str>) -> (DemoPage, markup::PageParts) {
        let config = SiteConfig::default();
        let (doc, parts) = markup::marketing_page(&config, location, declared);
        (Page::boot(doc, ManualScheduler::new(), &config), parts)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn boots_both_components() {
        let (page, _) = boot("/", None);
        assert!(page.hero().is_some());
        assert!(page.nav().is_some());
    }

    #[test]
    fn bare_page_boots_nothing() {
        let page = Page::boot(
            MemoryDocument::new("/"),
            ManualScheduler::new(),
            &SiteConfig::default(),
        );
        assert!(page.hero().is_none());
        assert!(page.nav().is_none());
        assert!(page.view().listeners().is_empty());
        assert_eq!(page.scheduler().active(), 0);
    }

    #[test]
    fn nav_runs_without_a_showcase() {
        let mut doc = MemoryDocument::new("/");
        let body = doc.body();
        doc.append(body, Element::new("header").class("header"));
        let hero = Element::new("section").class("hero").layout(0.0, 400.0);
        doc.append(body, hero);
        let mut page = Page::boot(doc, ManualScheduler::new(), &SiteConfig::default());
        assert!(page.hero().is_none());

        page.view_mut().scroll_to(300.0);
        page.dispatch(Event::window(EventKind::Scroll));
        let body = page.view().body();
        assert!(page.view().has_class(body, NAV_VISIBLE));
    }

    #[test]
    fn advance_rotates_on_schedule() {
        let (mut page, _) = boot("/", Some("clouds"));
        assert_eq!(page.advance(ms(3999)), 0);
        assert_eq!(page.hero().unwrap().active_variant(), "clouds");
        assert_eq!(page.advance(ms(1)), 1);
        assert_eq!(page.hero().unwrap().active_variant(), "sunflare");
        assert_eq!(page.advance(ms(8000)), 2);
        assert_eq!(page.hero().unwrap().active_variant(), "clouds");
    }

    #[test]
    fn interaction_freezes_rotation() {
        let (mut page, parts) = boot("/", None);
        page.advance(ms(4000));
        page.dispatch(Event::element(parts.hero, EventKind::MouseEnter));
        let frozen = page.hero().unwrap().active_variant().to_string();

        assert_eq!(page.advance(ms(60_000)), 0);
        assert_eq!(page.hero().unwrap().active_variant(), frozen);
        assert_eq!(page.hero().unwrap().mode(), Mode::Manual);
    }

    #[test]
    fn dispatch_fans_out_to_both() {
        let (mut page, parts) = boot("/", None);
        page.dispatch(Event::element(parts.toggle, EventKind::Click));
        assert!(page.nav().unwrap().state().menu_open);
        assert_eq!(page.hero().unwrap().mode(), Mode::AutoRotating);
    }
}
