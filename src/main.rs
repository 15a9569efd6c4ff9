//! Insights Deck - a terminal dashboard for insights backends
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::{Path, PathBuf};

use clap::Parser;
use ideck_app::config::{self, Settings};
use ideck_core::prelude::*;
use ideck_core::TabId;

/// Insights Deck - lazy-loading terminal dashboard for an insights REST backend
#[derive(Parser, Debug)]
#[command(name = "ideck", version)]
#[command(about = "A terminal dashboard for insights REST backends", long_about = None)]
struct Args {
    /// Backend base URL (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Tab to open first (overview, concepts, memories, ...)
    #[arg(long, value_name = "ID")]
    tab: Option<TabId>,

    /// Load settings from this file only, skipping user and project config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run in headless mode (NDJSON output, no TUI)
    #[arg(long)]
    headless: bool,

    /// Write a default user config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    if args.init_config {
        return Ok(init_config()?);
    }

    ideck_core::logging::init()?;

    let result = run(&args).await;

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
        if let Some(hint) = insights_deck::fatal_hint(e) {
            eprintln!("{hint}");
        }
    }
    info!("Insights Deck exiting");
    Ok(result?)
}

async fn run(args: &Args) -> Result<()> {
    let settings = resolve_settings(args)?;
    let mut engine = insights_deck::build_engine(settings).context("Invalid backend settings")?;

    if args.headless {
        let mut stdout = std::io::stdout();
        let summary = insights_deck::run_headless(&mut engine, &mut stdout).await?;
        if !summary.success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    insights_deck::run_tui(&mut engine).await
}

/// Config layers, then CLI overrides.
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => config::load_settings_file(path)?,
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            config::load_settings(&cwd)
        }
    };

    if let Some(base_url) = &args.base_url {
        settings.server.base_url = base_url.clone();
    }
    if let Some(tab) = args.tab {
        settings.behavior.default_tab = tab;
    }

    Ok(settings)
}

fn init_config() -> Result<()> {
    let path = config::user_config_path()
        .ok_or_else(|| Error::config("no config directory on this platform"))?;
    write_default_config(&path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if config::save_default_config(path)? {
        println!("Wrote default config to {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}
