//! In-memory document.
//!
//! [`MemoryDocument`] is a small element tree implementing [`View`]. It is what
//! the CLI simulates against and what every component test runs on. On top of
//! the trait it records:
//!
//! - a **mutation log**: one [`Mutation`] per class/attribute/text write call,
//!   whether or not the write changed anything. Tests count entries to check
//!   that components only write on real transitions.
//! - a **listener registry**: which `(target, kind)` pairs a component
//!   subscribed to. The host consults it before delivering events, the way a
//!   browser only runs registered handlers.
//! - a **scroll offset** and per-element layout boxes, so
//!   [`View::bounding_rect`] can report viewport-relative geometry.
//!
//! Documents render back to HTML with maud, so a simulated page can be
//! inspected after the fact.

use crate::view::{ElementId, Event, EventKind, EventTarget, Rect, View, class_of};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

/// A single DOM write, as issued by a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddClass {
        el: ElementId,
        class: String,
    },
    RemoveClass {
        el: ElementId,
        class: String,
    },
    SetAttribute {
        el: ElementId,
        name: String,
        value: String,
    },
    SetText {
        el: ElementId,
        text: String,
    },
}

impl Mutation {
    pub fn element(&self) -> ElementId {
        match self {
            Mutation::AddClass { el, .. }
            | Mutation::RemoveClass { el, .. }
            | Mutation::SetAttribute { el, .. }
            | Mutation::SetText { el, .. } => *el,
        }
    }
}

/// Description of an element to insert, built fluently.
///
/// ```rust
/// use marquee::document::Element;
///
/// let picture = Element::new("picture")
///     .class("hero__picture")
///     .attr("data-variant", "clouds");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: String,
    layout: Rect,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        upsert(&mut self.attributes, name, value);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Document-relative layout box: `top` is measured from the top of the page.
    pub fn layout(mut self, top: f64, height: f64) -> Self {
        self.layout = Rect { top, height };
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Elements without a closing tag.
const VOID_TAGS: &[&str] = &["img", "meta", "link", "br", "hr", "source", "input"];

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    location: String,
    scroll_y: f64,
    listeners: Vec<(EventTarget, EventKind)>,
    mutations: Vec<Mutation>,
}

impl MemoryDocument {
    /// An empty document (just `<body>`) loaded at `location`.
    pub fn new(location: &str) -> Self {
        Self {
            nodes: vec![Node {
                element: Element::new("body"),
                parent: None,
                children: Vec::new(),
            }],
            location: location.to_string(),
            scroll_y: 0.0,
            listeners: Vec::new(),
            mutations: Vec::new(),
        }
    }

    /// Insert `element` as the last child of `parent`. Setup only: not logged.
    pub fn append(&mut self, parent: ElementId, element: Element) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn tag(&self, el: ElementId) -> &str {
        &self.nodes[el.0].element.tag
    }

    pub fn classes(&self, el: ElementId) -> &[String] {
        &self.nodes[el.0].element.classes
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes[el.0].parent
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scroll the window to `y` pixels from the top of the page.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Change an element's height, as a viewport resize would.
    pub fn set_height(&mut self, el: ElementId, height: f64) {
        self.nodes[el.0].element.layout.height = height;
    }

    pub fn listeners(&self) -> &[(EventTarget, EventKind)] {
        &self.listeners
    }

    /// Whether some component subscribed to this event.
    pub fn has_listener(&self, event: &Event) -> bool {
        self.listeners
            .iter()
            .any(|&listener| listener == (event.target, event.kind))
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drain the mutation log, returning what was recorded since the last call.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Elements in document order, starting at (and including) `root`.
    fn walk(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn matching(&self, root: ElementId, include_root: bool, selector: &str) -> Vec<ElementId> {
        let class = class_of(selector);
        self.walk(root)
            .into_iter()
            .filter(|&id| include_root || id != root)
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the subtree rooted at `el` as HTML.
    pub fn render_element(&self, el: ElementId) -> Markup {
        let element = &self.nodes[el.0].element;
        let mut open = format!("<{}", element.tag);
        if !element.classes.is_empty() {
            let classes = escape(&element.classes.join(" "));
            open.push_str(&format!(r#" class="{classes}""#));
        }
        for (name, value) in &element.attributes {
            open.push_str(&format!(r#" {}="{}""#, name, escape(value)));
        }
        open.push('>');

        if VOID_TAGS.contains(&element.tag.as_str()) {
            return PreEscaped(open);
        }

        html! {
            (PreEscaped(open))
            (element.text)
            @for child in &self.nodes[el.0].children {
                (self.render_element(*child))
            }
            (PreEscaped(format!("</{}>", element.tag)))
        }
    }

    /// Render a complete HTML page around `<body>`.
    pub fn render_page(&self, title: &str, css: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    style { (PreEscaped(css)) }
                }
                (self.render_element(self.body()))
            }
        }
    }

    fn log(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }
}

fn escape(s: &str) -> String {
    html! { (s) }.into_string()
}

fn upsert(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
    match attributes.iter_mut().find(|(n, _)| n == name) {
        Some((_, v)) => *v = value.to_string(),
        None => attributes.push((name.to_string(), value.to_string())),
    }
}

impl View for MemoryDocument {
    fn find_one(&self, selector: &str) -> Option<ElementId> {
        self.find_all(selector).into_iter().next()
    }

    fn find_all(&self, selector: &str) -> Vec<ElementId> {
        self.matching(self.body(), true, selector)
    }

    fn find_one_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.find_all_within(scope, selector).into_iter().next()
    }

    fn find_all_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        self.matching(scope, false, selector)
    }

    fn body(&self) -> ElementId {
        ElementId(0)
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes[el.0].element.classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if !self.has_class(el, class) {
            self.nodes[el.0].element.classes.push(class.to_string());
        }
        self.log(Mutation::AddClass {
            el,
            class: class.to_string(),
        });
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.nodes[el.0].element.classes.retain(|c| c != class);
        self.log(Mutation::RemoveClass {
            el,
            class: class.to_string(),
        });
    }

    fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.nodes[el.0]
            .element
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        upsert(&mut self.nodes[el.0].element.attributes, name, value);
        self.log(Mutation::SetAttribute {
            el,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn text(&self, el: ElementId) -> String {
        self.nodes[el.0].element.text.clone()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.nodes[el.0].element.text = text.to_string();
        self.log(Mutation::SetText {
            el,
            text: text.to_string(),
        });
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        let layout = self.nodes[el.0].element.layout;
        Rect {
            top: layout.top - self.scroll_y,
            height: layout.height,
        }
    }

    fn location_path(&self) -> String {
        self.location.clone()
    }

    fn listen(&mut self, target: EventTarget, kind: EventKind) {
        self.listeners.push((target, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryDocument, ElementId, ElementId, ElementId) {
        let mut doc = MemoryDocument::new("/");
        let body = doc.body();
        let outer = doc.append(body, Element::new("section").class("box").class("outer"));
        let inner = doc.append(outer, Element::new("div").class("box").attr("data-k", "v"));
        let sibling = doc.append(body, Element::new("div").class("box"));
        (doc, outer, inner, sibling)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[test]
    fn find_all_is_document_order() {
        let (doc, outer, inner, sibling) = sample();
        assert_eq!(doc.find_all(".box"), vec![outer, inner, sibling]);
    }

    #[test]
    fn find_within_excludes_scope_itself() {
        let (doc, outer, inner, _) = sample();
        assert_eq!(doc.find_all_within(outer, ".box"), vec![inner]);
        assert_eq!(doc.find_one_within(inner, ".box"), None);
    }

    #[test]
    fn find_one_misses_cleanly() {
        let (doc, ..) = sample();
        assert_eq!(doc.find_one(".nope"), None);
    }

    #[test]
    fn attributes_read_back() {
        let (doc, outer, inner, _) = sample();
        assert_eq!(doc.attribute(inner, "data-k").as_deref(), Some("v"));
        assert_eq!(doc.attribute(outer, "data-k"), None);
    }

    // =========================================================================
    // Writes and the mutation log
    // =========================================================================

    #[test]
    fn every_write_call_is_logged() {
        let (mut doc, outer, ..) = sample();
        doc.add_class(outer, "outer");
        doc.add_class(outer, "outer");
        assert_eq!(doc.mutations().len(), 2);
        assert_eq!(
            doc.classes(outer).iter().filter(|c| *c == "outer").count(),
            1
        );
    }

    #[test]
    fn toggle_reports_new_state() {
        let (mut doc, outer, ..) = sample();
        assert!(doc.toggle_class(outer, "open"));
        assert!(doc.has_class(outer, "open"));
        assert!(!doc.toggle_class(outer, "open"));
        assert!(!doc.has_class(outer, "open"));
    }

    #[test]
    fn take_mutations_drains() {
        let (mut doc, _, inner, _) = sample();
        doc.set_text(inner, "hi");
        doc.set_attribute(inner, "data-k", "w");
        let taken = doc.take_mutations();
        assert_eq!(taken.len(), 2);
        assert!(doc.mutations().is_empty());
        assert_eq!(doc.attribute(inner, "data-k").as_deref(), Some("w"));
        assert_eq!(doc.text(inner), "hi");
    }

    #[test]
    fn setup_is_not_logged() {
        let (doc, ..) = sample();
        assert!(doc.mutations().is_empty());
    }

    // =========================================================================
    // Geometry and listeners
    // =========================================================================

    #[test]
    fn bounding_rect_follows_scroll() {
        let mut doc = MemoryDocument::new("/");
        let body = doc.body();
        let hero = doc.append(body, Element::new("section").layout(100.0, 800.0));
        assert_eq!(doc.bounding_rect(hero).top, 100.0);
        doc.scroll_to(250.0);
        assert_eq!(doc.bounding_rect(hero).top, -150.0);
        assert_eq!(doc.bounding_rect(hero).height, 800.0);
    }

    #[test]
    fn listener_registry() {
        let (mut doc, outer, ..) = sample();
        doc.listen(EventTarget::Element(outer), EventKind::Click);
        assert!(doc.has_listener(&Event::element(outer, EventKind::Click)));
        assert!(!doc.has_listener(&Event::element(outer, EventKind::Focus)));
        assert!(!doc.has_listener(&Event::window(EventKind::Scroll)));
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn render_escapes_text_and_attributes() {
        let mut doc = MemoryDocument::new("/");
        let body = doc.body();
        let para = Element::new("p")
            .attr("title", "a\"b")
            .text("<fish & chips>");
        doc.append(body, para);
        let out = doc.render_element(body).into_string();
        assert_eq!(
            out,
            r#"<body><p title="a&quot;b">&lt;fish &amp; chips&gt;</p></body>"#
        );
    }

    #[test]
    fn render_void_elements_without_close() {
        let mut doc = MemoryDocument::new("/");
        let body = doc.body();
        doc.append(body, Element::new("img").attr("src", "a.avif"));
        let out = doc.render_element(body).into_string();
        assert_eq!(out, r#"<body><img src="a.avif"></body>"#);
    }

    #[test]
    fn render_page_wraps_body() {
        let doc = MemoryDocument::new("/");
        let out = doc.render_page("T", ":root{}").into_string();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>T</title>"));
        assert!(out.contains("<style>:root{}</style>"));
        assert!(out.contains("<body></body>"));
    }
}
