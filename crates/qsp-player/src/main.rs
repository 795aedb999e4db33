//! qspgui: console shell for the QSP callback bridge
//!
//! Modules:
//!   console/  line-oriented GUI shell with menus, prompts and file choosers
//!   script/   command language read from a script or stdin
//!   session/  command loop driving the callback facade
//!   dialogs/  native message boxes and file choosers (feature `native-dialogs`)

mod console;
#[cfg(feature = "native-dialogs")]
mod dialogs;
mod script;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use qsp_audio::SoundChannelManager;
use qsp_callbacks::CallbackFacade;
use qsp_common::{clamp_coefficient, default_settings_path, SettingsSource};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleShell;
use crate::session::FileCheckPersistence;

#[cfg(feature = "playback")]
type Backend = qsp_audio::RodioBackend;
#[cfg(not(feature = "playback"))]
type Backend = qsp_audio::NullBackend;

#[derive(Parser, Debug)]
#[command(name = "qspgui", version, about = "Console shell for QSP games")]
struct Args {
    /// Game file to open at startup
    game: Option<PathBuf>,

    /// Settings file (default: $QSP_CONFIG or qspgui.toml next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory engine file names are relative to (default: current directory)
    #[arg(long)]
    game_dir: Option<PathBuf>,

    /// Overall volume 0.0 - 1.0, overrides the settings file
    #[arg(long)]
    volume: Option<f32>,

    /// Start muted
    #[arg(long)]
    mute: bool,

    /// Read commands from a file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Tracing directive used when RUST_LOG is not set (e.g. "debug")
    #[arg(long)]
    log_level: Option<String>,

    /// Use system dialogs for messages and file choosers
    #[arg(long)]
    native_dialogs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings_path = args.config.clone().unwrap_or_else(default_settings_path);
    let source = SettingsSource::read(&settings_path);
    let mut settings = source.settings();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| settings.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(level.parse().with_context(|| format!("Bad log level '{}'", level))?),
        )
        .init();

    tracing::info!("qspgui v{}", env!("CARGO_PKG_VERSION"));
    source.log(&settings_path);

    if let Some(volume) = args.volume {
        settings.volume = clamp_coefficient(volume);
    }
    if args.mute {
        settings.muted = true;
    }

    let game_dir = match args.game_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let mut sounds = open_sound_channels()
        .with_max_channels(settings.max_channels)
        .with_overall_volume(settings.volume_coefficient());
    sounds.set_base_dir(&game_dir);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Cannot open script {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    };
    let shell = ConsoleShell::new(input, std::io::stdout()).with_native_dialogs(args.native_dialogs);
    if args.native_dialogs && !shell.uses_native_dialogs() {
        tracing::warn!("Built without native dialogs, using the console");
    }

    let mut facade = CallbackFacade::new(shell, sounds, FileCheckPersistence);
    facade.set_html_mode(settings.html_dialogs);

    if let Some(game) = &args.game {
        facade.open_game(&game.to_string_lossy(), true);
    }

    session::run(&mut facade, &mut settings);

    if let Some(game) = facade.game_path() {
        settings.last_game = Some(game.to_path_buf());
    }
    facade.shutdown();

    session::save_settings(&settings, &settings_path, &source);
    Ok(())
}

#[cfg(feature = "playback")]
fn open_sound_channels() -> SoundChannelManager<Backend> {
    match qsp_audio::RodioBackend::new() {
        Ok(backend) => SoundChannelManager::new(backend),
        Err(e) => {
            tracing::warn!("Sound disabled: {}", e);
            SoundChannelManager::unavailable()
        }
    }
}

#[cfg(not(feature = "playback"))]
fn open_sound_channels() -> SoundChannelManager<Backend> {
    tracing::info!("Built without playback, sound commands are ignored");
    SoundChannelManager::new(qsp_audio::NullBackend)
}
