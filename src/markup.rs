//! Structural contract with the page markup.
//!
//! The components find everything they touch by these class names and
//! attributes. Changing one here is a breaking change for every page and
//! stylesheet that uses the behaviors.
//!
//! [`marketing_page`] builds the reference page used by the CLI and tests.

use crate::config::SiteConfig;
use crate::document::{Element, MemoryDocument};
use crate::view::{ElementId, View};

// Hero region
pub const HERO: &str = ".hero";
pub const HERO_PICTURE: &str = ".hero__picture";
pub const HERO_PICTURE_ACTIVE: &str = "hero__picture--active";
pub const VIEW_BUTTON: &str = ".hero__view-button";
pub const VIEW_BUTTON_ACTIVE: &str = "hero__view-button--active";
pub const SUBTITLE_CURRENT: &str = "hero__subtitle--current";
pub const SUBTITLE_NEXT: &str = "hero__subtitle--next";

// Header / navigation
pub const HEADER: &str = ".header";
pub const NAV_TOGGLE: &str = ".main-nav__toggle";
pub const NAV_TOGGLE_LABEL: &str = ".main-nav__toggle-label";
pub const NAV_LIST: &str = ".main-nav__list";
pub const NAV_LINK: &str = ".main-nav__link";
pub const NAV_LINK_ACTIVE: &str = "main-nav__link--active";

// Page-level markers on <body>
pub const NAV_OPEN: &str = "site--nav-open";
pub const NAV_VISIBLE: &str = "site--nav-visible";

// Attributes
pub const DATA_VARIANT: &str = "data-variant";
pub const ARIA_PRESSED: &str = "aria-pressed";
pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const HREF: &str = "href";

/// Hero box on the reference page, in document pixels.
pub const DEMO_HERO_TOP: f64 = 0.0;
pub const DEMO_HERO_HEIGHT: f64 = 800.0;

/// Navigation entries on the reference page: (label, href).
pub const DEMO_LINKS: &[(&str, &str)] = &[
    ("Home", "/"),
    ("About", "/about/"),
    ("Contact", "/contact/"),
];

/// Variants the reference page shows first, in this order.
pub const DEMO_VARIANTS: &[&str] = &["standard", "clouds", "sunflare"];

/// Variant keys for the reference page: [`DEMO_VARIANTS`] that have a
/// configured subtitle, then any other configured keys in key order.
pub fn demo_variants(config: &SiteConfig) -> Vec<String> {
    let subtitles = &config.hero.subtitles;
    DEMO_VARIANTS
        .iter()
        .filter(|v| subtitles.contains_key(**v))
        .map(|v| v.to_string())
        .chain(
            subtitles
                .keys()
                .filter(|k| !DEMO_VARIANTS.contains(&k.as_str()))
                .cloned(),
        )
        .collect()
}

/// Handles to the interesting parts of a built reference page.
#[derive(Debug, Clone)]
pub struct PageParts {
    pub header: ElementId,
    pub toggle: ElementId,
    pub toggle_label: ElementId,
    pub links: Vec<ElementId>,
    pub hero: ElementId,
    pub pictures: Vec<ElementId>,
    pub buttons: Vec<ElementId>,
    pub subtitles: [ElementId; 2],
}

impl PageParts {
    /// The selector button for `variant`, if the page has one.
    pub fn button<V: View>(&self, view: &V, variant: &str) -> Option<ElementId> {
        self.buttons
            .iter()
            .copied()
            .find(|&b| view.attribute(b, DATA_VARIANT).as_deref() == Some(variant))
    }
}

/// Build the reference marketing page at `location`.
///
/// One picture and one view button per entry of [`demo_variants`].
/// `declared_variant`, when given, is written to the hero's `data-variant` as
/// the page author's chosen default; it is not checked.
pub fn marketing_page(
    config: &SiteConfig,
    location: &str,
    declared_variant: Option<&str>,
) -> (MemoryDocument, PageParts) {
    let mut doc = MemoryDocument::new(location);
    let body = doc.body();
    let menu_label = &config.navigation.menu_label;
    let variants = demo_variants(config);

    let header = doc.append(body, Element::new("header").class("header"));
    let nav = doc.append(header, Element::new("nav").class("main-nav"));
    let toggle = doc.append(
        nav,
        Element::new("button")
            .class("main-nav__toggle")
            .attr("type", "button")
            .attr(ARIA_EXPANDED, "false"),
    );
    let toggle_label = doc.append(
        toggle,
        Element::new("span")
            .class("main-nav__toggle-label")
            .text(menu_label),
    );
    let list = doc.append(nav, Element::new("ul").class("main-nav__list"));
    let links = DEMO_LINKS
        .iter()
        .map(|(label, href)| {
            let item = doc.append(list, Element::new("li").class("main-nav__item"));
            doc.append(
                item,
                Element::new("a")
                    .class("main-nav__link")
                    .attr(HREF, href)
                    .text(label),
            )
        })
        .collect();

    let mut hero_el = Element::new("section")
        .class("hero")
        .layout(DEMO_HERO_TOP, DEMO_HERO_HEIGHT);
    if let Some(variant) = declared_variant {
        hero_el = hero_el.attr(DATA_VARIANT, variant);
    }
    let hero = doc.append(body, hero_el);

    let media = doc.append(hero, Element::new("div").class("hero__media"));
    let pictures = variants
        .iter()
        .map(|variant| {
            doc.append(
                media,
                Element::new("picture")
                    .class("hero__picture")
                    .attr(DATA_VARIANT, variant),
            )
        })
        .collect::<Vec<_>>();
    for (picture, variant) in pictures.iter().zip(&variants) {
        doc.append(
            *picture,
            Element::new("img")
                .attr("src", &format!("/images/hero-{variant}.avif"))
                .attr("alt", ""),
        );
    }

    let copy = doc.append(hero, Element::new("div").class("hero__copy"));
    let title = Element::new("h1").class("hero__title").text("Hollow Farm");
    doc.append(copy, title);
    let subtitle_box = doc.append(copy, Element::new("p").class("hero__subtitles"));
    let current = doc.append(
        subtitle_box,
        Element::new("span")
            .class("hero__subtitle")
            .class(SUBTITLE_CURRENT),
    );
    let next = doc.append(
        subtitle_box,
        Element::new("span")
            .class("hero__subtitle")
            .class(SUBTITLE_NEXT)
            .attr("aria-hidden", "true"),
    );

    let views = doc.append(hero, Element::new("div").class("hero__views"));
    let buttons = variants
        .iter()
        .map(|variant| {
            doc.append(
                views,
                Element::new("button")
                    .class("hero__view-button")
                    .attr("type", "button")
                    .attr(DATA_VARIANT, variant)
                    .attr(ARIA_PRESSED, "false")
                    .text(variant),
            )
        })
        .collect();

    doc.append(
        body,
        Element::new("main")
            .class("content")
            .layout(DEMO_HERO_TOP + DEMO_HERO_HEIGHT, 2400.0),
    );

    let parts = PageParts {
        header,
        toggle,
        toggle_label,
        links,
        hero,
        pictures,
        buttons,
        subtitles: [current, next],
    };
    (doc, parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_page_matches_contract() {
        let config = SiteConfig::default();
        let (doc, parts) = marketing_page(&config, "/", None);

        assert_eq!(doc.find_one(HERO), Some(parts.hero));
        assert_eq!(doc.find_one(HEADER), Some(parts.header));
        let pictures = doc.find_all_within(parts.hero, HERO_PICTURE);
        assert_eq!(pictures, parts.pictures);
        let buttons = doc.find_all_within(parts.hero, VIEW_BUTTON);
        assert_eq!(buttons, parts.buttons);
        assert_eq!(doc.find_all(NAV_LINK), parts.links);
        assert_eq!(doc.find_one(NAV_TOGGLE), Some(parts.toggle));
        assert_eq!(doc.find_one(NAV_TOGGLE_LABEL), Some(parts.toggle_label));
        assert!(doc.find_one(NAV_LIST).is_some());
    }

    #[test]
    fn one_picture_and_button_per_variant_in_showcase_order() {
        let config = SiteConfig::default();
        let (doc, parts) = marketing_page(&config, "/", None);
        let keys: Vec<String> = parts
            .pictures
            .iter()
            .filter_map(|&p| doc.attribute(p, DATA_VARIANT))
            .collect();
        assert_eq!(keys, vec!["standard", "clouds", "sunflare"]);
        assert_eq!(parts.button(&doc, "sunflare"), Some(parts.buttons[2]));
        assert_eq!(parts.button(&doc, "dusk"), None);
    }

    #[test]
    fn extra_configured_variants_follow_the_stock_ones() {
        let mut config = SiteConfig::default();
        let subtitles = &mut config.hero.subtitles;
        subtitles.insert("dusk".into(), "Long shadows.".into());
        subtitles.insert("aurora".into(), "Green skies.".into());
        assert_eq!(
            demo_variants(&config),
            vec!["standard", "clouds", "sunflare", "aurora", "dusk"]
        );
    }

    #[test]
    fn declared_variant_lands_on_hero() {
        let config = SiteConfig::default();
        let (doc, parts) = marketing_page(&config, "/", Some("bogus"));
        let declared = doc.attribute(parts.hero, DATA_VARIANT);
        assert_eq!(declared.as_deref(), Some("bogus"));

        let (doc, parts) = marketing_page(&config, "/", None);
        assert_eq!(doc.attribute(parts.hero, DATA_VARIANT), None);
    }

    #[test]
    fn toggle_starts_collapsed() {
        let config = SiteConfig::default();
        let (doc, parts) = marketing_page(&config, "/", None);
        let expanded = doc.attribute(parts.toggle, ARIA_EXPANDED);
        assert_eq!(expanded.as_deref(), Some("false"));
        assert_eq!(doc.text(parts.toggle_label), "Menu");
    }
}
