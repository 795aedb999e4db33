//! Command language of the console shell
//!
//! One command per line; `#` starts a comment line.
//! ```text
//! play <file> [volume]     close [file]        isplaying <file>
//! volume <0.0-1.0>         mute on|off         status
//! msg <text>               input <text>        menu <a>[@image] | <b> | ...
//! image [file]             pane <name|0-3> on|off  inputtext <text>
//! refresh [force]          timer <ms>          sleep <ms>
//! ms                       version <param>     html on|off
//! open [file]              restore [file]      save [file]
//! help                     quit
//! ```

use anyhow::{bail, Context, Result};
use qsp_callbacks::{MenuItem, Pane};

/// Maximum answer length for `input`
pub const INPUT_MAX_LEN: usize = 1024;

/// Volume used by `play` when none is given
const DEFAULT_PLAY_VOLUME: i32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh { forced: bool },
    Timer(i32),
    InputText(String),
    /// `pane` is the engine's pane constant
    Pane { pane: i32, visible: bool },
    Sleep(i32),
    Ms,
    Msg(String),
    Menu(Vec<MenuItem>),
    Input(String),
    Image(String),
    Play { file: String, volume: i32 },
    Close(String),
    IsPlaying(String),
    Volume(f32),
    Mute(bool),
    Html(bool),
    Open(String),
    Restore(String),
    Save(String),
    Version(String),
    Status,
    Help,
    Quit,
}

/// Parse one line; blank lines and comments give `None`
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "refresh" => Command::Refresh {
            forced: match rest {
                "" => false,
                "force" | "forced" => true,
                other => bail!("refresh takes 'force' or nothing, not '{}'", other),
            },
        },
        "timer" => Command::Timer(parse_int(rest, "timer")?),
        "inputtext" => Command::InputText(rest.to_string()),
        "pane" => {
            let (name, state) = rest
                .split_once(char::is_whitespace)
                .context("usage: pane <actions|objects|vars|input> on|off")?;
            let pane = match Pane::from_name(name) {
                Some(pane) => pane.code(),
                None => name
                    .parse()
                    .with_context(|| format!("unknown pane '{}'", name))?,
            };
            Command::Pane {
                pane,
                visible: parse_switch(state)?,
            }
        }
        "sleep" => Command::Sleep(parse_int(rest, "sleep")?),
        "ms" => Command::Ms,
        "msg" => Command::Msg(rest.to_string()),
        "menu" => {
            let items: Vec<MenuItem> = rest
                .split('|')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(|entry| match entry.split_once('@') {
                    Some((name, image)) => MenuItem::new(name.trim()).with_image(image.trim()),
                    None => MenuItem::new(entry),
                })
                .collect();
            if items.is_empty() {
                bail!("usage: menu <item> | <item> | ...");
            }
            Command::Menu(items)
        }
        "input" => Command::Input(rest.to_string()),
        "image" => Command::Image(rest.to_string()),
        "play" => {
            if rest.is_empty() {
                bail!("usage: play <file> [volume]");
            }
            match rest.rsplit_once(char::is_whitespace) {
                Some((file, volume)) if volume.parse::<i32>().is_ok() => Command::Play {
                    file: file.trim().to_string(),
                    volume: parse_int(volume, "play")?,
                },
                _ => Command::Play {
                    file: rest.to_string(),
                    volume: DEFAULT_PLAY_VOLUME,
                },
            }
        }
        "close" => Command::Close(rest.to_string()),
        "isplaying" => Command::IsPlaying(rest.to_string()),
        "volume" => Command::Volume(
            rest.parse()
                .with_context(|| format!("volume expects a number, got '{}'", rest))?,
        ),
        "mute" => Command::Mute(parse_switch(rest)?),
        "html" => Command::Html(parse_switch(rest)?),
        "open" => Command::Open(rest.to_string()),
        "restore" => Command::Restore(rest.to_string()),
        "save" => Command::Save(rest.to_string()),
        "version" => Command::Version(rest.to_string()),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(Some(command))
}

fn parse_int(text: &str, command: &str) -> Result<i32> {
    text.trim()
        .parse()
        .with_context(|| format!("{} expects a whole number, got '{}'", command, text.trim()))
}

fn parse_switch(text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "show" => Ok(true),
        "off" | "false" | "0" | "hide" => Ok(false),
        other => bail!("expected on/off, got '{}'", other),
    }
}

pub const HELP: &str = "\
play <file> [volume]   close [file]   isplaying <file>   volume <0.0-1.0>   mute on|off
msg <text>   input <text>   menu <a>[@image] | <b>   image [file]   pane <name|0-3> on|off
inputtext <text>   refresh [force]   timer <ms>   sleep <ms>   ms   version <param>
html on|off   open [file]   restore [file]   save [file]   status   quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# intro music").unwrap(), None);
    }

    #[test]
    fn play_with_and_without_volume() {
        assert_eq!(
            parse_command("play music/theme.ogg 40").unwrap(),
            Some(Command::Play {
                file: "music/theme.ogg".to_string(),
                volume: 40
            })
        );
        assert_eq!(
            parse_command("PLAY sound\\boom.wav").unwrap(),
            Some(Command::Play {
                file: "sound\\boom.wav".to_string(),
                volume: 100
            })
        );
        assert_eq!(
            parse_command("play old song.ogg 70").unwrap(),
            Some(Command::Play {
                file: "old song.ogg".to_string(),
                volume: 70
            })
        );
        assert!(parse_command("play").is_err());
    }

    #[test]
    fn close_without_file_means_all() {
        assert_eq!(parse_command("close").unwrap(), Some(Command::Close(String::new())));
    }

    #[test]
    fn menu_items_are_split_on_bars() {
        let command = parse_command("menu North | South ||  West ").unwrap();
        assert_eq!(
            command,
            Some(Command::Menu(vec![
                MenuItem::new("North"),
                MenuItem::new("South"),
                MenuItem::new("West"),
            ]))
        );
        assert!(parse_command("menu").is_err());
    }

    #[test]
    fn menu_item_with_image() {
        assert_eq!(
            parse_command("menu Door @ img/door.png | Window").unwrap(),
            Some(Command::Menu(vec![
                MenuItem::new("Door").with_image("img/door.png"),
                MenuItem::new("Window"),
            ]))
        );
    }

    #[test]
    fn pane_switches() {
        assert_eq!(
            parse_command("pane vars off").unwrap(),
            Some(Command::Pane {
                pane: Pane::Variables.code(),
                visible: false
            })
        );
        assert_eq!(
            parse_command("pane 7 on").unwrap(),
            Some(Command::Pane {
                pane: 7,
                visible: true
            })
        );
        assert!(parse_command("pane status on").is_err());
        assert!(parse_command("pane vars maybe").is_err());
    }

    #[test]
    fn numbers_are_validated() {
        assert_eq!(parse_command("sleep 250").unwrap(), Some(Command::Sleep(250)));
        assert_eq!(parse_command("timer 0").unwrap(), Some(Command::Timer(0)));
        assert!(parse_command("sleep soon").is_err());
        assert_eq!(parse_command("volume 0.5").unwrap(), Some(Command::Volume(0.5)));
        assert!(parse_command("volume loud").is_err());
    }

    #[test]
    fn refresh_flag() {
        assert_eq!(
            parse_command("refresh force").unwrap(),
            Some(Command::Refresh { forced: true })
        );
        assert_eq!(
            parse_command("refresh").unwrap(),
            Some(Command::Refresh { forced: false })
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.to_string().contains("dance"));
    }
}
