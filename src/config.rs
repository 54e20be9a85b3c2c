//! Behavior configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever the site's `config.toml` specifies; the file is
//! sparse, so it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [hero]
//! rotate_interval_ms = 4000  # Auto-rotation period
//! subtitle_fade_ms = 1000    # Subtitle crossfade, emitted as a CSS variable
//!
//! [hero.subtitles]           # Subtitle text per variant key
//! standard = "Warm hearth. Quiet fields."
//! clouds = "Low clouds. Soft horizons."
//! sunflare = "Golden light. Slow mornings."
//!
//! [navigation]
//! scroll_threshold_ratio = 0.25  # Fraction of hero height scrolled before the bar shows
//! menu_label = "Menu"            # Toggle label while closed
//! close_label = "Close"          # Toggle label while open
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Fade Duration
//!
//! The crossfade itself is a CSS transition. The component never waits on it,
//! so `subtitle_fade_ms` only matters to styling: [`generate_motion_css`] turns
//! it into `--hero-subtitle-fade`, which the stylesheet's `transition` reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Hero showcase timing and subtitles.
    pub hero: HeroConfig,
    /// Sticky navigation bar settings.
    pub navigation: NavigationConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hero.rotate_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "hero.rotate_interval_ms must be greater than 0".into(),
            ));
        }
        if self.hero.subtitle_fade_ms == 0 {
            return Err(ConfigError::Validation(
                "hero.subtitle_fade_ms must be greater than 0".into(),
            ));
        }
        if self.hero.subtitle_fade_ms >= self.hero.rotate_interval_ms {
            return Err(ConfigError::Validation(
                "hero.subtitle_fade_ms must be shorter than hero.rotate_interval_ms".into(),
            ));
        }
        for (variant, text) in &self.hero.subtitles {
            if variant.is_empty() || text.is_empty() {
                return Err(ConfigError::Validation(
                    "hero.subtitles keys and texts must not be empty".into(),
                ));
            }
        }
        let ratio = self.navigation.scroll_threshold_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Validation(
                "navigation.scroll_threshold_ratio must be in (0, 1]".into(),
            ));
        }
        if self.navigation.menu_label.is_empty() || self.navigation.close_label.is_empty() {
            return Err(ConfigError::Validation(
                "navigation labels must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Hero showcase settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    /// Milliseconds between auto-rotation ticks.
    pub rotate_interval_ms: u64,
    /// Milliseconds the subtitle crossfade takes in CSS.
    pub subtitle_fade_ms: u64,
    /// Subtitle text keyed by variant. Variants missing here keep their
    /// current subtitle when selected.
    pub subtitles: BTreeMap<String, String>,
}

impl HeroConfig {
    pub fn rotate_interval(&self) -> Duration {
        Duration::from_millis(self.rotate_interval_ms)
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        let subtitles = [
            ("standard", "Warm hearth. Quiet fields."),
            ("clouds", "Low clouds. Soft horizons."),
            ("sunflare", "Golden light. Slow mornings."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            rotate_interval_ms: 4000,
            subtitle_fade_ms: 1000,
            subtitles,
        }
    }
}

/// Navigation bar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Fraction of the hero's height that must be scrolled past before the
    /// bar becomes visible.
    pub scroll_threshold_ratio: f64,
    /// Toggle label while the menu is closed.
    pub menu_label: String,
    /// Toggle label while the menu is open.
    pub close_label: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_ratio: 0.25,
            menu_label: "Menu".to_string(),
            close_label: "Close".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Marquee Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Hero showcase
# ---------------------------------------------------------------------------
[hero]
# Milliseconds between automatic variant changes. Rotation stops for good
# once the visitor clicks, focuses a view button, or hovers the hero.
rotate_interval_ms = 4000

# Milliseconds the subtitle crossfade takes. Emitted as the CSS variable
# --hero-subtitle-fade; must be shorter than rotate_interval_ms.
subtitle_fade_ms = 1000

# Subtitle shown for each variant key (the data-variant of each picture).
[hero.subtitles]
standard = "Warm hearth. Quiet fields."
clouds = "Low clouds. Soft horizons."
sunflare = "Golden light. Slow mornings."

# ---------------------------------------------------------------------------
# Navigation bar
# ---------------------------------------------------------------------------
[navigation]
# Fraction of the hero's height to scroll past before the bar appears.
scroll_threshold_ratio = 0.25

# Toggle button label while the mobile menu is closed / open.
menu_label = "Menu"
close_label = "Close"
"##
}

/// Generate CSS custom properties carrying the hero's timing.
pub fn generate_motion_css(hero: &HeroConfig) -> String {
    format!(
        r#":root {{
    --hero-rotate-interval: {rotate}ms;
    --hero-subtitle-fade: {fade}ms;
}}"#,
        rotate = hero.rotate_interval_ms,
        fade = hero.subtitle_fade_ms,
    )
}
