//! # Marquee
//!
//! Two interactive behaviors for a marketing page: a rotating hero showcase
//! and a sticky navigation bar. Both are headless state machines. They touch
//! the page only through an injected [`view::View`] and keep time only through
//! an injected [`scheduler::Scheduler`], so the same code runs against the
//! browser DOM (feature `web`) and against an in-memory document in tests and
//! the CLI.
//!
//! # Architecture: Components Over Injected Capabilities
//!
//! ```text
//!                  ┌──────────── Page ────────────┐
//!   DOM events ──▶ │ HeroShowcase   NavigationBar │ ──▶ View writes
//!   timer fires ─▶ │      │                       │
//!                  └──────┼───────────────────────┘
//!                         ▼
//!                     Scheduler (set/clear interval)
//! ```
//!
//! A [`page::Page`] boots both components at DOM-ready and afterwards routes
//! every event and interval fire to them. The host decides which events exist
//! at all: components register interest through [`view::View::listen`], and a
//! host only delivers events somebody listened for.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`view`] | The DOM capability: element handles, events, layout boxes |
//! | [`scheduler`] | Interval timers, plus a logical-clock implementation for tests |
//! | [`document`] | In-memory `View` with a mutation log; renders to HTML with Maud |
//! | [`markup`] | Class-name contract with the page, and the reference page builder |
//! | [`hero`] | Hero showcase: variant rotation, subtitle crossfade, autoplay shutoff |
//! | [`navigation`] | Navigation bar: scroll reveal, mobile menu toggle, active link |
//! | [`page`] | Boots both components and dispatches events and timer fires |
//! | [`session`] | Scripted visitor steps against the reference page |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting: transcripts and config summaries |
//! | `web` | Browser `View` and `Scheduler` over `web-sys` (feature `web`) |
//!
//! # Design Decisions
//!
//! ## Missing Markup Means Inert, Not Broken
//!
//! A behavior whose required elements are absent simply does not start:
//! `init` returns `None` and nothing is written, listened to, or scheduled.
//! The same bundle can then ship on every page, including pages with no hero.
//!
//! ## Manual Is Terminal
//!
//! The first deliberate interaction with the showcase (a click or focus on a
//! view button, or the pointer entering the hero) stops autoplay for the rest
//! of the page's life. Nothing restarts it; the visitor is in control.
//!
//! ## Write Only On Change
//!
//! Scroll fires constantly. The navigation bar keeps its own copy of the
//! visible/hidden state and touches the DOM only when it flips, so steady
//! scrolling costs no style recalculation.
//!
//! ## Maud For Rendering
//!
//! The in-memory document renders with [Maud](https://maud.lambda.xyz/), so
//! every text node and attribute is escaped on the way out.

pub mod config;
pub mod document;
pub mod hero;
pub mod markup;
pub mod navigation;
pub mod output;
pub mod page;
pub mod scheduler;
pub mod session;
pub mod view;

#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
