//! Markpad - A two-pane terminal markdown editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! markpad
//! markpad notes.md
//! markpad --split 60 --title-policy replace notes.md
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use markpad::app::App;
use markpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markpad::session::TitlePolicy;

/// A two-pane terminal markdown editor with live preview
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open at startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Editor pane width in percent of the terminal (20-80)
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u16).range(20..=80))]
    split: Option<u16>,

    /// How the window title changes when a file is associated
    #[arg(long, value_enum)]
    title_policy: Option<TitlePolicy>,

    /// Write diagnostic logs to a file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

// The terminal belongs to the UI, so logs only go to an explicit file.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = || {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::info!(?effective, file = ?cli.file, "starting markpad");

    let mut app = App::new()
        .with_initial_file(cli.file)
        .with_split_percent(effective.split_or_default())
        .with_title_policy(effective.title_policy.unwrap_or_default());

    app.run().context("Application error")
}
