//! Browser bindings.
//!
//! [`WebDocument`] and [`BrowserScheduler`] back the component capabilities
//! with the real DOM and `setInterval`. Neither talks to JavaScript callbacks
//! directly: listen requests and timer arm/clear requests are queued, and the
//! runtime drains the queues after boot and after every delivered event or
//! timer fire, attaching closures that feed back into the [`Page`].
//!
//! ```js
//! import init, { boot } from "./marquee.js";
//! await init();
//! boot();                      // stock settings
//! boot(configTomlString);      // or sparse overrides, as in config.toml
//! ```

use crate::config::{self, SiteConfig};
use crate::page::Page;
use crate::scheduler::{Scheduler, TimerId};
use crate::view::{ElementId, Event, EventKind, EventTarget, Rect, View};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentReadyState, Element, Window};

// =============================================================================
// WebDocument
// =============================================================================

/// `View` over the live DOM.
///
/// Element handles index a registry of every element the components have
/// looked up; looking the same node up twice yields the same handle.
pub struct WebDocument {
    window: Window,
    document: Document,
    elements: RefCell<Vec<Element>>,
    body: ElementId,
    listen_queue: Vec<(EventTarget, EventKind)>,
}

impl WebDocument {
    /// Wrap the window's document. `None` if there is no document element.
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        let body: Element = match document.body() {
            Some(body) => body.into(),
            None => document.document_element()?,
        };
        Some(Self {
            window,
            document,
            elements: RefCell::new(vec![body]),
            body: ElementId(0),
            listen_queue: Vec::new(),
        })
    }

    /// The DOM node behind a handle.
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0).cloned()
    }

    /// Drain listen requests made since the last call.
    pub fn take_listen_requests(&mut self) -> Vec<(EventTarget, EventKind)> {
        std::mem::take(&mut self.listen_queue)
    }

    fn register(&self, el: Element) -> ElementId {
        let mut elements = self.elements.borrow_mut();
        if let Some(pos) = elements.iter().position(|known| *known == el) {
            return ElementId(pos);
        }
        elements.push(el);
        ElementId(elements.len() - 1)
    }

    fn collect(&self, list: Result<web_sys::NodeList, JsValue>) -> Vec<ElementId> {
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.register(el))
            .collect()
    }

    fn with<T: Default>(&self, id: ElementId, f: impl FnOnce(&Element) -> T) -> T {
        match self.elements.borrow().get(id.0) {
            Some(el) => f(el),
            None => T::default(),
        }
    }
}

impl View for WebDocument {
    fn find_one(&self, selector: &str) -> Option<ElementId> {
        let el = self.document.query_selector(selector).ok().flatten()?;
        Some(self.register(el))
    }

    fn find_all(&self, selector: &str) -> Vec<ElementId> {
        self.collect(self.document.query_selector_all(selector))
    }

    fn find_one_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        let scope = self.element(scope)?;
        let el = scope.query_selector(selector).ok().flatten()?;
        Some(self.register(el))
    }

    fn find_all_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        match self.element(scope) {
            Some(scope) => self.collect(scope.query_selector_all(selector)),
            None => Vec::new(),
        }
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.with(el, |e| e.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        self.with(el, |e| e.class_list().add_1(class).ok());
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.with(el, |e| e.class_list().remove_1(class).ok());
    }

    fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        self.with(el, |e| e.class_list().toggle(class).unwrap_or(false))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.with(el, |e| e.get_attribute(name))
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        self.with(el, |e| e.set_attribute(name, value).ok());
    }

    fn text(&self, el: ElementId) -> String {
        self.with(el, |e| e.text_content().unwrap_or_default())
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.with(el, |e| e.set_text_content(Some(text)));
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.with(el, |e| {
            let rect = e.get_bounding_client_rect();
            Rect {
                top: rect.top(),
                height: rect.height(),
            }
        })
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn listen(&mut self, target: EventTarget, kind: EventKind) {
        self.listen_queue.push((target, kind));
    }
}

// =============================================================================
// BrowserScheduler
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    Arm {
        id: TimerId,
        period: Duration,
    },
    Clear(TimerId),
}

/// `Scheduler` that queues requests for the runtime to apply with
/// `setInterval` / `clearInterval`.
#[derive(Debug, Default)]
pub struct BrowserScheduler {
    next_id: u64,
    queue: Vec<TimerRequest>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_requests(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.queue)
    }
}

impl Scheduler for BrowserScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(TimerRequest::Arm { id, period });
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.queue.push(TimerRequest::Clear(id));
    }
}

/// `setInterval` delay for a period: whole milliseconds, at least 1.
fn interval_ms(period: Duration) -> i32 {
    i32::try_from(period.as_millis()).unwrap_or(i32::MAX).max(1)
}

// =============================================================================
// Runtime
// =============================================================================

struct ArmedInterval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

struct Runtime {
    window: Window,
    page: RefCell<Page<WebDocument, BrowserScheduler>>,
    intervals: RefCell<HashMap<TimerId, ArmedInterval>>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

/// Boot the page behaviors once the DOM is parsed.
///
/// `config_toml` holds sparse overrides in `config.toml` syntax. Calling
/// `boot` again after a successful boot does nothing.
#[wasm_bindgen]
pub fn boot(config_toml: Option<String>) -> Result<(), JsValue> {
    let config = resolve(config_toml.as_deref())?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == DocumentReadyState::Loading {
        let start_later = Closure::once_into_js(move || start(config));
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            start_later.unchecked_ref(),
        )?;
    } else {
        start(config);
    }
    Ok(())
}

fn resolve(config_toml: Option<&str>) -> Result<SiteConfig, JsValue> {
    let overlay = config_toml
        .map(toml::from_str::<toml::Value>)
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    config::resolve_config(config::stock_defaults_value(), overlay)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn start(config: SiteConfig) {
    if RUNTIME.with(|rt| rt.borrow().is_some()) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(view) = WebDocument::new(window.clone()) else {
        return;
    };

    let page = Page::boot(view, BrowserScheduler::new(), &config);
    let runtime = Rc::new(Runtime {
        window,
        page: RefCell::new(page),
        intervals: RefCell::new(HashMap::new()),
    });
    flush(&runtime);
    RUNTIME.with(|rt| *rt.borrow_mut() = Some(runtime));
}

/// Apply queued listen and timer requests.
fn flush(runtime: &Rc<Runtime>) {
    let (listens, timers) = {
        let Ok(mut page) = runtime.page.try_borrow_mut() else {
            return;
        };
        (
            page.view_mut().take_listen_requests(),
            page.scheduler_mut().take_requests(),
        )
    };

    for (target, kind) in listens {
        attach(runtime, target, kind);
    }
    for request in timers {
        match request {
            TimerRequest::Arm { id, period } => arm(runtime, id, period),
            TimerRequest::Clear(id) => {
                if let Some(armed) = runtime.intervals.borrow_mut().remove(&id) {
                    runtime.window.clear_interval_with_handle(armed.handle);
                }
            }
        }
    }
}

fn attach(runtime: &Rc<Runtime>, target: EventTarget, kind: EventKind) {
    let js_target: web_sys::EventTarget = match target {
        EventTarget::Window => runtime.window.clone().into(),
        EventTarget::Element(id) => match runtime.page.borrow().view().element(id) {
            Some(el) => el.into(),
            None => return,
        },
    };

    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut()>::new(move || {
        deliver(&weak, |page| page.dispatch(Event { target, kind }));
    });
    if js_target
        .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref())
        .is_ok()
    {
        // Listeners live as long as the page.
        callback.forget();
    }
}

fn arm(runtime: &Rc<Runtime>, id: TimerId, period: Duration) {
    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut()>::new(move || {
        deliver(&weak, |page| page.fire_timer(id));
    });
    let handle = runtime
        .window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            interval_ms(period),
        );
    match handle {
        Ok(handle) => {
            tracing::trace!(?id, handle, "interval armed in browser");
            runtime.intervals.borrow_mut().insert(
                id,
                ArmedInterval {
                    handle,
                    _callback: callback,
                },
            );
        }
        Err(_) => tracing::debug!(?id, "setInterval refused"),
    }
}

fn deliver(
    weak: &Weak<Runtime>,
    f: impl FnOnce(&mut Page<WebDocument, BrowserScheduler>),
) {
    let Some(runtime) = weak.upgrade() else {
        return;
    };
    {
        // A re-entrant event fired during a handler is dropped.
        let Ok(mut page) = runtime.page.try_borrow_mut() else {
            return;
        };
        f(&mut page);
    }
    flush(&runtime);
}
