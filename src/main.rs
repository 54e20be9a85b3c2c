use clap::{Parser, Subcommand};
use marquee::config;
use marquee::markup;
use marquee::output;
use marquee::page::Page;
use marquee::scheduler::ManualScheduler;
use marquee::session::{Session, Step};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Title of the reference page.
const PAGE_TITLE: &str = "Hollow Farm";

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Hero showcase and sticky navigation behaviors for marketing pages")]
#[command(long_about = "\
Hero showcase and sticky navigation behaviors for marketing pages

Two page behaviors, driven by class names in the markup:

  Hero showcase    cycles .hero__picture variants on a timer, crossfading the
                   subtitle; the first click, focus or hover stops it for good
  Navigation bar   shows once the visitor scrolls past a fraction of the
                   hero, toggles the mobile menu, highlights the current link

The CLI works on a built-in reference page so the behaviors can be inspected
without a browser:

  marquee render --path /about/             # page HTML after boot
  marquee simulate tick:4000 click:clouds   # step-by-step DOM writes
  marquee simulate --json scroll:300 toggle # final state as JSON

Steps: tick <ms>, click <variant>, focus <variant>, hover, scroll <px>,
resize <px>, toggle, link <n>. Join verb and argument with ':' or quote them.
A single tick may advance the clock by at most one day (86400000 ms).

Settings come from config.toml in the --config directory. Run
'marquee gen-config' to print a documented config.toml.

Set RUST_LOG=marquee=debug to trace state transitions on stderr.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Where the reference page is loaded.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Location path of the page (drives the active nav link)
    #[arg(long, default_value = "/")]
    path: String,
    /// Variant declared as the hero's default
    #[arg(long)]
    variant: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the reference page HTML as it looks right after boot
    Render {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Replay visitor steps against the reference page
    Simulate {
        #[command(flatten)]
        page: PageArgs,
        /// Print the final state as JSON instead of a transcript
        #[arg(long)]
        json: bool,
        /// Steps to run, in order
        steps: Vec<Step>,
    },
    /// Validate config.toml and print the resolved settings
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { page } => {
            let site_config = config::load_config(&cli.config)?;
            let variant = page.variant.as_deref();
            let (doc, _) = markup::marketing_page(&site_config, &page.path, variant);
            let booted = Page::boot(doc, ManualScheduler::new(), &site_config);
            let css = config::generate_motion_css(&site_config.hero);
            let html = booted.view().render_page(PAGE_TITLE, &css);
            println!("{}", html.into_string());
        }
        Command::Simulate { page, json, steps } => {
            let site_config = config::load_config(&cli.config)?;
            let mut session = Session::new(&site_config, &page.path, page.variant.as_deref());
            let outcomes = session.run_all(&steps);
            if json {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            } else {
                output::print_transcript(&session, &outcomes);
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.join("config.toml").display());
            let site_config = config::load_config(&cli.config)?;
            output::print_config_summary(&site_config);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays a clean transcript.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
