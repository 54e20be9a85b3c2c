//! End-to-end tests of the `marquee` binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn marquee(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_marquee"))
        .arg("--config")
        .arg(config_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run marquee")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn empty_config_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn config_dir(toml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), toml).unwrap();
    dir
}

// =============================================================================
// render
// =============================================================================

#[test]
fn render_prints_booted_page() {
    let dir = empty_config_dir();
    let args = ["render", "--path", "/about/", "--variant", "clouds"];
    let out = marquee(dir.path(), &args);
    assert!(out.status.success());

    let html = stdout(&out);
    let picture = r#"class="hero__picture hero__picture--active" data-variant="clouds""#;
    let link = r#"class="main-nav__link main-nav__link--active" href="/about/""#;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("--hero-rotate-interval: 4000ms"));
    assert!(html.contains(picture));
    assert!(html.contains(link));
    assert!(html.contains("Low clouds. Soft horizons."));
}

#[test]
fn render_uses_configured_timing() {
    let dir = config_dir("[hero]\nrotate_interval_ms = 6000\n");
    let out = marquee(dir.path(), &["render"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("--hero-rotate-interval: 6000ms"));
}

// =============================================================================
// simulate
// =============================================================================

#[test]
fn simulate_prints_transcript() {
    let dir = empty_config_dir();
    let mut args = vec!["simulate", "--variant", "clouds"];
    args.extend(["tick:4000", "click:midnight", "toggle"]);
    let out = marquee(dir.path(), &args);
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.starts_with("Boot\n"));
    assert!(text.contains("001 tick 4000 (1 timer fire)"));
    assert!(text.contains("State: sunflare (auto-rotating)"));
    assert!(text.contains("002 click midnight (not delivered)"));
    assert!(text.contains("003 toggle"));
    assert!(text.contains("+ body site--nav-open"));
}

#[test]
fn simulate_json_prints_final_state() {
    let dir = empty_config_dir();
    let args = ["simulate", "--json", "hover", "tick 12000", "scroll:300"];
    let out = marquee(dir.path(), &args);
    assert!(out.status.success());

    let state: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(state["hero"]["active_variant"], "standard");
    assert_eq!(state["hero"]["mode"], "manual");
    assert_eq!(state["nav"]["past_scroll_threshold"], true);
    assert_eq!(state["now_ms"], 12000);
}

#[test]
fn simulate_rejects_bad_steps() {
    let dir = empty_config_dir();
    let out = marquee(dir.path(), &["simulate", "jump:3"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown step 'jump'"));
}

// =============================================================================
// check / gen-config
// =============================================================================

#[test]
fn check_summarizes_config() {
    let dir = config_dir("[navigation]\nmenu_label = \"Browse\"\n");
    let out = marquee(dir.path(), &["check"]);
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains("Toggle labels: Browse / Close"));
    assert!(text.contains("Config OK"));
}

#[test]
fn check_fails_on_invalid_config() {
    let dir = config_dir("[hero]\nsubtitle_fade_ms = 5000\n");
    let out = marquee(dir.path(), &["check"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr).to_lowercase();
    assert!(stderr.contains("validation"));
}

#[test]
fn check_fails_on_unknown_key() {
    let dir = config_dir("[hero]\nspeed = 3\n");
    let out = marquee(dir.path(), &["check"]);
    assert!(!out.status.success());
}

#[test]
fn gen_config_output_loads_back() {
    let dir = empty_config_dir();
    let out = marquee(dir.path(), &["gen-config"]);
    assert!(out.status.success());

    let generated = config_dir(&stdout(&out));
    let check = marquee(generated.path(), &["check"]);
    assert!(check.status.success());
}
