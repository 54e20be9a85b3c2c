//! CLI output formatting.
//!
//! # Behavior-First Display
//!
//! Output is **behavior-centric, not DOM-centric**. Every simulated step leads
//! with its positional index and the visitor action, followed by the DOM
//! writes it caused as indented context and a one-line state summary. Elements
//! are named by their first class (plus the variant key on variant-bound
//! elements), never by their internal handle, so a transcript reads like a
//! description of the page.
//!
//! # Output Format
//!
//! ## Simulate
//!
//! ```text
//! Boot
//!     + .hero__picture[clouds] hero__picture--active
//!     = .hero__view-button[clouds] aria-pressed="true"
//!     ~ .hero__subtitle "Low clouds. Soft horizons."
//!     State: clouds (auto-rotating) | nav hidden, menu closed
//! 001 tick 4000 (1 timer fire)
//!     - .hero__picture[clouds] hero__picture--active
//!     + .hero__picture[sunflare] hero__picture--active
//!     ...
//!     State: sunflare (auto-rotating) | nav hidden, menu closed
//! 002 click midnight (not delivered)
//!     State: sunflare (auto-rotating) | nav hidden, menu closed
//! ```
//!
//! ## Check
//!
//! ```text
//! Hero
//!     Rotate every: 4000ms
//!     Subtitle fade: 1000ms
//!     Variants: standard, clouds, sunflare
//! Navigation
//!     Reveal after: 25% of hero
//!     Toggle labels: Menu / Close
//! Config OK
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::document::Mutation;
use crate::hero::Mode;
use crate::markup;
use crate::session::{Session, Snapshot, StepOutcome};
use crate::view::ElementId;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending "..." if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

/// Format one DOM write.
///
/// ```text
/// + .hero__picture[clouds] hero__picture--active     // class added
/// - .hero__picture[clouds] hero__picture--active     // class removed
/// = .hero data-variant="clouds"                      // attribute set
/// ~ .hero__subtitle "Low clouds. Soft horizons."     // text set
/// ```
pub fn format_mutation(mutation: &Mutation, describe: impl Fn(ElementId) -> String) -> String {
    let el = describe(mutation.element());
    match mutation {
        Mutation::AddClass { class, .. } => format!("+ {} {}", el, class),
        Mutation::RemoveClass { class, .. } => format!("- {} {}", el, class),
        Mutation::SetAttribute { name, value, .. } => format!("= {} {}=\"{}\"", el, name, value),
        Mutation::SetText { text, .. } => format!("~ {} \"{}\"", el, truncate_text(text, 40)),
    }
}

/// One-line summary of a snapshot.
///
/// ```text
/// clouds (auto-rotating) | nav visible, menu open
/// ```
pub fn format_state(snapshot: &Snapshot) -> String {
    let hero = match &snapshot.hero {
        Some(h) => {
            let mode = match h.mode {
                Mode::AutoRotating => "auto-rotating",
                Mode::Manual => "manual",
            };
            format!("{} ({})", h.active_variant, mode)
        }
        None => "no hero".to_string(),
    };
    let nav = match &snapshot.nav {
        Some(n) => {
            let visibility = if n.past_scroll_threshold {
                "visible"
            } else {
                "hidden"
            };
            let menu = if n.menu_open { "open" } else { "closed" };
            format!("nav {}, menu {}", visibility, menu)
        }
        None => "no nav".to_string(),
    };
    format!("{} | {}", hero, nav)
}

// ============================================================================
// Simulate output
// ============================================================================

/// Format the boot section of a simulation transcript.
pub fn format_boot(session: &Session) -> Vec<String> {
    let mut lines = vec!["Boot".to_string()];
    for mutation in session.boot_mutations() {
        lines.push(format!(
            "{}{}",
            indent(1),
            format_mutation(mutation, |el| session.describe(el))
        ));
    }
    let state = format_state(&session.snapshot());
    lines.push(format!("{}State: {}", indent(1), state));
    lines
}

/// Format one simulated step.
///
/// `position` is 1-based. Element names are resolved against the session's
/// current document; elements are never removed, so names stay valid.
pub fn format_step(position: usize, outcome: &StepOutcome, session: &Session) -> Vec<String> {
    let mut header = format!("{} {}", format_index(position), outcome.step);
    if !outcome.delivered {
        header.push_str(" (not delivered)");
    } else if outcome.timer_fires > 0 {
        let plural = if outcome.timer_fires == 1 { "" } else { "s" };
        header.push_str(&format!(" ({} timer fire{})", outcome.timer_fires, plural));
    }

    let mut lines = vec![header];
    for mutation in &outcome.mutations {
        lines.push(format!(
            "{}{}",
            indent(1),
            format_mutation(mutation, |el| session.describe(el))
        ));
    }
    let state = format_state(&outcome.snapshot);
    lines.push(format!("{}State: {}", indent(1), state));
    lines
}

/// Format a full transcript: boot, then every step in order.
pub fn format_transcript(session: &Session, outcomes: &[StepOutcome]) -> Vec<String> {
    let mut lines = format_boot(session);
    for (i, outcome) in outcomes.iter().enumerate() {
        lines.extend(format_step(i + 1, outcome, session));
    }
    lines
}

pub fn print_transcript(session: &Session, outcomes: &[StepOutcome]) {
    for line in format_transcript(session, outcomes) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the resolved configuration summary shown by `check`.
pub fn format_config_summary(config: &SiteConfig) -> Vec<String> {
    let variants = markup::demo_variants(config);
    let hero = &config.hero;
    vec![
        "Hero".to_string(),
        format!("{}Rotate every: {}ms", indent(1), hero.rotate_interval_ms),
        format!("{}Subtitle fade: {}ms", indent(1), hero.subtitle_fade_ms),
        format!("{}Variants: {}", indent(1), variants.join(", ")),
        "Navigation".to_string(),
        format!(
            "{}Reveal after: {}% of hero",
            indent(1),
            config.navigation.scroll_threshold_ratio * 100.0
        ),
        format!(
            "{}Toggle labels: {} / {}",
            indent(1),
            config.navigation.menu_label,
            config.navigation.close_label
        ),
        "Config OK".to_string(),
    ]
}

pub fn print_config_summary(config: &SiteConfig) {
    for line in format_config_summary(config) {
        println!("{}", line);
    }
}
