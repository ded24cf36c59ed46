#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Geocoin in a terminal.

mod config;
mod input;
mod save_file;
mod session_transfer;
mod terminal;
mod walk;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geocoin_runtime::{Runtime, SessionStore};
use geocoin_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::GameConfig,
    input::{Input, HELP},
    save_file::FileStore,
    terminal::TerminalRenderer,
};

/// Collect coins from caches scattered around you and deposit them elsewhere.
#[derive(Debug, Parser)]
#[command(name = "geocoin", version)]
struct Cli {
    /// TOML file with game settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Save file; overrides `save_path` from the config.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play interactively (the default).
    Play,
    /// Print a share code for the saved session.
    Export,
    /// Replace the saved session with the one in a share code.
    Import {
        /// Code printed by `export` or the in-game `share` command.
        code: String,
    },
}

/// Entry point for the Geocoin command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;
    let mut store = FileStore::new(cli.save.unwrap_or_else(|| config.save_path.clone()));
    info!(save = %store.path().display(), "using save file");

    match cli.command.unwrap_or(Mode::Play) {
        Mode::Play => play(&config, &mut store),
        Mode::Export => export(&mut store),
        Mode::Import { code } => import(&mut store, &code),
    }
}

fn play(config: &GameConfig, store: &mut dyn SessionStore) -> Result<()> {
    let mut runtime = Runtime::new(
        config.world(),
        config.regeneration(),
        TerminalRenderer::new(io::stdout().lock()),
    );
    let banner = query::welcome_banner(runtime.world());
    runtime.renderer_mut().line(banner)?;
    runtime.start(store)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        match input::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => execute(&mut runtime, config, store, input)?,
            Err(error) => runtime.renderer_mut().line(&format!("? {error}"))?,
        }
    }

    runtime.shutdown(store)?;
    runtime.renderer_mut().line("* session saved, goodbye")
}

fn execute<W: Write>(
    runtime: &mut Runtime<TerminalRenderer<W>>,
    config: &GameConfig,
    store: &mut dyn SessionStore,
    input: Input,
) -> Result<()> {
    match input {
        Input::Move(direction) => runtime.move_player(direction),
        Input::Collect(handle) => runtime.on_collect(handle),
        Input::Deposit { handle, amount } => runtime.on_deposit(handle, &amount),
        Input::Caches => {
            let listing: Vec<String> = runtime
                .displayed_caches()
                .map(|(handle, cache)| format!("  [{handle}] {}", cache.summary()))
                .collect();
            if listing.is_empty() {
                return runtime.renderer_mut().line("no caches nearby");
            }
            for line in listing {
                runtime.renderer_mut().line(&line)?;
            }
            Ok(())
        }
        Input::Gps(true) => {
            let start = query::player_position(runtime.world());
            runtime.start_geolocation(walk::position_source(config, start))
        }
        Input::Gps(false) => runtime.stop_geolocation(),
        Input::Wait(fixes) => {
            if !runtime.is_watching() {
                return runtime
                    .renderer_mut()
                    .line("? geolocation is off; use `gps on` first");
            }
            let applied = runtime.poll_geolocation(fixes)?;
            debug!(requested = fixes, applied, "geolocation fixes applied");
            Ok(())
        }
        Input::Regenerate => {
            let center = query::player_cell(runtime.world());
            runtime.regenerate(center)
        }
        Input::Save => {
            runtime.save(store)?;
            runtime.renderer_mut().line("* session saved")
        }
        Input::Share => {
            let code = session_transfer::encode(&runtime.save_game())?;
            runtime.renderer_mut().line(&code)
        }
        Input::Reset => runtime.reset(),
        Input::Help => runtime.renderer_mut().line(HELP),
        Input::Quit => Ok(()),
    }
}

fn export(store: &mut dyn SessionStore) -> Result<()> {
    let Some(save) = store.load_blob()? else {
        bail!("there is no saved session to export yet; play first");
    };
    let code = session_transfer::encode(&save)?;
    println!("{code}");
    Ok(())
}

fn import(store: &mut dyn SessionStore, code: &str) -> Result<()> {
    let save = session_transfer::decode(code).context("invalid share code")?;
    store.save_blob(&save)?;
    info!(
        cells = save.world.cells.len(),
        coins = save.player.coins,
        "session imported"
    );
    println!(
        "Imported a session carrying {} coins with {} known cells",
        save.player.coins,
        save.world.cells.len()
    );
    Ok(())
}
