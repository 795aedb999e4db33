//! Command loop driving the callback facade

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{ensure, Context};
use qsp_audio::AudioBackend;
use qsp_callbacks::{menu_index, CallbackFacade, GamePersistence, Pane, Shell};
use qsp_common::{clamp_coefficient, Settings, SettingsSource};
use tracing::{error, info, warn};

use crate::console::ConsoleShell;
use crate::script::{parse_command, Command, HELP, INPUT_MAX_LEN};

pub type ConsoleFacade<R, W, B> = CallbackFacade<ConsoleShell<R, W>, B>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Game file access without a linked interpreter; only checks the files
#[derive(Debug, Default)]
pub struct FileCheckPersistence;

impl GamePersistence for FileCheckPersistence {
    fn load_game_world(&mut self, path: &Path, is_new_game: bool) -> anyhow::Result<()> {
        ensure!(path.is_file(), "game file {} not found", path.display());
        info!(
            "Game world {} accepted (new game: {})",
            path.display(),
            is_new_game
        );
        Ok(())
    }

    fn open_saved_game(&mut self, path: &Path) -> anyhow::Result<()> {
        ensure!(path.is_file(), "saved game {} not found", path.display());
        info!("Saved game {} accepted", path.display());
        Ok(())
    }

    fn save_game(&mut self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure!(parent.is_dir(), "folder {} does not exist", parent.display());
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("Save slot {} ready", path.display());
        Ok(())
    }
}

/// Read and execute commands until `quit` or end of input
pub fn run<R: BufRead, W: Write, B: AudioBackend>(
    facade: &mut ConsoleFacade<R, W, B>,
    settings: &mut Settings,
) {
    loop {
        let Some(line) = facade.shell_mut().read_line() else {
            info!("End of input");
            break;
        };
        let flow = match parse_command(&line) {
            Ok(Some(command)) => execute(facade, settings, command),
            Ok(None) => Flow::Continue,
            Err(e) => {
                facade.shell_mut().say(&format!("error: {:#}", e));
                Flow::Continue
            }
        };
        facade.shell_mut().pump_events();
        facade.update_sounds();
        if flow == Flow::Quit {
            break;
        }
    }
}

pub fn execute<R: BufRead, W: Write, B: AudioBackend>(
    facade: &mut ConsoleFacade<R, W, B>,
    settings: &mut Settings,
    command: Command,
) -> Flow {
    match command {
        Command::Refresh { forced } => facade.refresh_int(forced),
        Command::Timer(msecs) => facade.set_timer(msecs),
        Command::InputText(text) => facade.set_input_str_text(&text),
        Command::Pane { pane, visible } => facade.show_pane(pane, visible),
        Command::Sleep(msecs) => facade.sleep(msecs),
        Command::Ms => {
            let ms = facade.get_ms_count();
            facade.shell_mut().say(&format!("{} ms", ms));
        }
        Command::Msg(text) => facade.msg(&text),
        Command::Menu(items) => match facade.show_menu(&items) {
            Ok(choice) => {
                let index = menu_index(choice);
                facade.shell_mut().say(&format!("menu -> {}", index));
            }
            Err(e) => {
                error!("{}", e);
                facade.shell_mut().say(&format!("error: {}", e));
            }
        },
        Command::Input(text) => {
            let answer = facade.input(&text, INPUT_MAX_LEN);
            facade.shell_mut().say(&format!("input -> '{}'", answer));
        }
        Command::Image(file) => facade.show_image(&file),
        Command::Play { file, volume } => facade.play_file(&file, volume),
        Command::Close(file) => facade.close_file(&file),
        Command::IsPlaying(file) => {
            let playing = facade.is_play(&file);
            facade.shell_mut().say(&format!("{} -> {}", file, playing));
        }
        Command::Volume(coeff) => {
            settings.volume = clamp_coefficient(coeff);
            facade.set_overall_volume(settings.volume_coefficient());
        }
        Command::Mute(muted) => {
            settings.muted = muted;
            facade.set_overall_volume(settings.volume_coefficient());
        }
        Command::Html(html) => {
            settings.html_dialogs = html;
            facade.set_html_mode(html);
        }
        Command::Open(file) => facade.open_game(&file, true),
        Command::Restore(file) => facade.open_game_status(&file),
        Command::Save(file) => facade.save_game_status(&file),
        Command::Version(param) => {
            let value = facade.version(&param, INPUT_MAX_LEN);
            facade.shell_mut().say(&format!("{} -> '{}'", param, value));
        }
        Command::Status => report_status(facade),
        Command::Help => facade.shell_mut().say(HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Write settings back unless the file they came from could not be read.
///
/// Returns true if the file was written.
pub fn save_settings(settings: &Settings, path: &Path, source: &SettingsSource) -> bool {
    if !source.may_overwrite() {
        warn!(
            "Leaving unreadable settings file {} untouched, changes are not saved",
            path.display()
        );
        return false;
    }
    match settings.save(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}

fn report_status<R: BufRead, W: Write, B: AudioBackend>(facade: &mut ConsoleFacade<R, W, B>) {
    let sounds = facade.sounds();
    let mut lines = vec![format!(
        "audio: {}, {} channel(s), overall volume {:.2}",
        if sounds.is_running() { "running" } else { "unavailable" },
        sounds.len(),
        sounds.overall_volume()
    )];
    match facade.game_path() {
        Some(path) => lines.push(format!("game: {}", path.display())),
        None => lines.push("game: none".to_string()),
    }
    let shell = facade.shell();
    match shell.timer() {
        Some(interval) => lines.push(format!("timer: {} ms", interval.as_millis())),
        None => lines.push("timer: off".to_string()),
    }
    if !shell.input_text().is_empty() {
        lines.push(format!("input line: {}", shell.input_text()));
    }
    let hidden: Vec<&str> = Pane::ALL
        .into_iter()
        .filter(|pane| !shell.is_visible(*pane))
        .map(|pane| pane.name())
        .collect();
    if !hidden.is_empty() {
        lines.push(format!("hidden panes: {}", hidden.join(", ")));
    }
    if let Some(image) = shell.image() {
        lines.push(format!("image: {}", image.display()));
    }
    lines.push(format!("redraws: {}", shell.redraws()));
    let shell = facade.shell_mut();
    for line in lines {
        shell.say(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_audio::testing::FakeBackend;
    use qsp_audio::SoundChannelManager;
    use std::io::Cursor;

    type TestFacade = ConsoleFacade<Cursor<Vec<u8>>, Vec<u8>, FakeBackend>;

    fn console_facade(input: &str, dir: &Path) -> (TestFacade, FakeBackend) {
        let backend = FakeBackend::default();
        let mut sounds = SoundChannelManager::new(backend.clone());
        sounds.set_base_dir(dir);
        let shell = ConsoleShell::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        (
            CallbackFacade::new(shell, sounds, FileCheckPersistence),
            backend,
        )
    }

    fn run_script(facade: &mut TestFacade, settings: &mut Settings) -> String {
        run(facade, settings);
        String::from_utf8_lossy(facade.shell().output()).into_owned()
    }

    #[test]
    fn script_plays_and_queries_sounds() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, backend) = console_facade(
            "play music/theme.ogg 80\nisplaying MUSIC\\THEME.OGG\nclose\nisplaying music/theme.ogg\nquit\nplay never.ogg\n",
            dir.path(),
        );
        let mut settings = Settings::default();
        let out = run_script(&mut facade, &mut settings);

        assert!(out.contains("MUSIC\\THEME.OGG -> true"));
        assert!(out.contains("music/theme.ogg -> false"));
        assert_eq!(backend.loads(), 1);
        assert_eq!(backend.starts("never.ogg"), 0);
    }

    #[test]
    fn volume_and_mute_update_settings() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, _backend) = console_facade("volume 0.4\nmute on\n", dir.path());
        let mut settings = Settings::default();
        run(&mut facade, &mut settings);

        assert!((settings.volume - 0.4).abs() < 1e-6);
        assert!(settings.muted);
        assert_eq!(facade.sounds().overall_volume(), 0.0);

        execute(&mut facade, &mut settings, Command::Mute(false));
        assert!((facade.sounds().overall_volume() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn menu_answer_is_read_from_the_script() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, _backend) = console_facade("menu North | South\n2\nmenu Only\n\n", dir.path());
        let mut settings = Settings::default();
        let out = run_script(&mut facade, &mut settings);
        assert!(out.contains("menu -> 1"));
        assert!(out.contains("menu -> -1"));
    }

    #[test]
    fn bad_lines_report_errors_and_continue() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, _backend) = console_facade("dance\nms\n", dir.path());
        let mut settings = Settings::default();
        let out = run_script(&mut facade, &mut settings);
        assert!(out.contains("error: unknown command 'dance'"));
        assert!(out.contains(" ms"));
    }

    #[test]
    fn open_game_moves_sound_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let game_dir = dir.path().join("quest");
        std::fs::create_dir(&game_dir).unwrap();
        let game = game_dir.join("quest.qsp");
        std::fs::write(&game, b"QSPGAME").unwrap();

        let (mut facade, _backend) = console_facade("", dir.path());
        let mut settings = Settings::default();
        execute(
            &mut facade,
            &mut settings,
            Command::Open("quest/quest.qsp".to_string()),
        );
        assert_eq!(facade.game_path(), Some(game.as_path()));
        assert_eq!(facade.sounds().base_dir(), game_dir.as_path());
    }

    #[test]
    fn missing_game_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, _backend) = console_facade("", dir.path());
        let mut settings = Settings::default();
        execute(
            &mut facade,
            &mut settings,
            Command::Open("nothing.qsp".to_string()),
        );
        assert_eq!(facade.game_path(), None);
    }

    #[test]
    fn status_reports_shell_state() {
        let dir = tempfile::tempdir().unwrap();
        let (mut facade, _backend) = console_facade(
            "pane vars off\npane 9 off\nimage pic.png\nrefresh force\nstatus\n",
            dir.path(),
        );
        let mut settings = Settings::default();
        let out = run_script(&mut facade, &mut settings);

        assert!(out.contains("hidden panes: vars\n"));
        assert!(out.contains("image: "));
        assert!(out.contains("pic.png"));
        assert!(out.contains("redraws: 1"));
        assert!(facade.shell().is_visible(Pane::Actions));
    }

    #[test]
    fn broken_settings_file_survives_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qspgui.toml");
        let original = "volume = 0.3\nmuted = true\nmax_channels = 8\nlast_game = \"x.qsp\"\nbroken line\n";
        std::fs::write(&path, original).unwrap();

        let source = SettingsSource::read(&path);
        let mut settings = source.settings();
        let (mut facade, _backend) = console_facade("volume 0.9\nquit\n", dir.path());
        run(&mut facade, &mut settings);

        assert!(!save_settings(&settings, &path, &source));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn session_changes_are_saved_to_a_good_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qspgui.toml");
        std::fs::write(&path, "max_channels = 8\n").unwrap();

        let source = SettingsSource::read(&path);
        let mut settings = source.settings();
        let (mut facade, _backend) = console_facade("mute on\nquit\n", dir.path());
        run(&mut facade, &mut settings);

        assert!(save_settings(&settings, &path, &source));
        let saved = Settings::load(&path).unwrap();
        assert!(saved.muted);
        assert_eq!(saved.max_channels, 8);
    }

    #[test]
    fn persistence_checks_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut persistence = FileCheckPersistence;
        let slot = dir.path().join("slot.sav");
        persistence.save_game(&slot).unwrap();
        assert!(slot.is_file());
        persistence.open_saved_game(&slot).unwrap();
        assert!(persistence
            .open_saved_game(&dir.path().join("missing.sav"))
            .is_err());
        assert!(persistence
            .save_game(&dir.path().join("no/such/dir/slot.sav"))
            .is_err());
    }
}
