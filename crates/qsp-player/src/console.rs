//! Line-oriented implementation of the GUI shell
//!
//! Modal dialogs read their answer from the same input the commands come
//! from, so a script can drive menus and prompts unattended.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use qsp_callbacks::{FileRequest, MenuItem, Pane, Shell};
use tracing::{debug, warn};

pub struct ConsoleShell<R, W> {
    input: R,
    output: W,
    redraw_pending: bool,
    redraws: usize,
    timer: Option<Duration>,
    input_text: String,
    hidden: Vec<Pane>,
    image: Option<PathBuf>,
    native_dialogs: bool,
}

impl<R: BufRead, W: Write> ConsoleShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            redraw_pending: false,
            redraws: 0,
            timer: None,
            input_text: String::new(),
            hidden: Vec::new(),
            image: None,
            native_dialogs: false,
        }
    }

    /// Use system message boxes and file choosers when built with them
    pub fn with_native_dialogs(mut self, enabled: bool) -> Self {
        self.native_dialogs = enabled && cfg!(feature = "native-dialogs");
        self
    }

    /// Next input line without its line ending; `None` at end of input
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    pub fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            warn!("Failed to write output: {}", e);
        }
    }

    /// Number of redraws actually performed
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn timer(&self) -> Option<Duration> {
        self.timer
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn is_visible(&self, pane: Pane) -> bool {
        !self.hidden.contains(&pane)
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Everything written so far
    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn uses_native_dialogs(&self) -> bool {
        self.native_dialogs
    }

    fn flush_redraw(&mut self) {
        if self.redraw_pending {
            self.redraw_pending = false;
            self.redraws += 1;
            debug!("Redraw #{}", self.redraws);
        }
    }

    fn render(&self, text: &str, html: bool) -> String {
        if html {
            strip_tags(text)
        } else {
            text.to_string()
        }
    }
}

impl<R: BufRead, W: Write> Shell for ConsoleShell<R, W> {
    fn request_redraw(&mut self, forced: bool) {
        self.redraw_pending = true;
        if forced {
            self.flush_redraw();
        }
    }

    fn set_timer(&mut self, interval: Option<Duration>) {
        self.timer = interval;
        match interval {
            Some(interval) => debug!("Timer set to {} ms", interval.as_millis()),
            None => debug!("Timer stopped"),
        }
    }

    fn set_input_text(&mut self, text: &str) {
        self.input_text = text.to_string();
        self.say(&format!("[input] {}", text));
    }

    fn show_pane(&mut self, pane: Pane, visible: bool) {
        self.hidden.retain(|p| *p != pane);
        if !visible {
            self.hidden.push(pane);
        }
        self.say(&format!(
            "[{}] {}",
            pane.name(),
            if visible { "shown" } else { "hidden" }
        ));
    }

    fn show_message(&mut self, text: &str, html: bool) {
        let text = self.render(text, html);
        #[cfg(feature = "native-dialogs")]
        {
            if self.native_dialogs {
                crate::dialogs::message(&text);
                return;
            }
        }
        self.say(&text);
        self.say("(press Enter)");
        self.read_line();
    }

    fn choose_menu_item(&mut self, items: &[MenuItem]) -> Option<usize> {
        for (i, item) in items.iter().enumerate() {
            let line = match &item.image {
                Some(image) => format!("  {}) {} [{}]", i + 1, item.name, image.display()),
                None => format!("  {}) {}", i + 1, item.name),
            };
            self.say(&line);
        }
        loop {
            self.say(&format!("Choose 1-{} (empty to cancel):", items.len()));
            let line = self.read_line()?;
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Some(n - 1),
                _ => self.say(&format!("'{}' is not a menu entry", line)),
            }
        }
    }

    fn prompt_input(&mut self, initial: &str, html: bool) -> Option<String> {
        let text = self.render(initial, html);
        self.say(&format!("{} (empty keeps it)", text));
        let line = self.read_line()?;
        if line.is_empty() {
            Some(initial.to_string())
        } else {
            Some(line)
        }
    }

    fn show_image(&mut self, path: Option<&Path>) {
        self.image = path.map(Path::to_path_buf);
        match path {
            Some(path) => self.say(&format!("[image] {}", path.display())),
            None => self.say("[image] closed"),
        }
    }

    fn choose_file(&mut self, request: FileRequest) -> Option<PathBuf> {
        #[cfg(feature = "native-dialogs")]
        {
            if self.native_dialogs {
                return crate::dialogs::choose_file(request);
            }
        }
        self.say(&format!(
            "{} ({}: *.{}), empty to cancel:",
            request.title(),
            request.filter_name(),
            request.extensions().join(", *.")
        ));
        let line = self.read_line()?;
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(PathBuf::from(line))
        }
    }

    fn pump_events(&mut self) {
        self.flush_redraw();
        if let Err(e) = self.output.flush() {
            warn!("Failed to flush output: {}", e);
        }
    }
}

/// Plain-text rendering of an HTML fragment
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type TestShell = ConsoleShell<Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestShell {
        ConsoleShell::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(shell: &TestShell) -> String {
        String::from_utf8_lossy(&shell.output).into_owned()
    }

    fn items(names: &[&str]) -> Vec<MenuItem> {
        names.iter().map(|n| MenuItem::new(*n)).collect()
    }

    #[test]
    fn unforced_redraws_coalesce_until_events_are_pumped() {
        let mut shell = console("");
        shell.request_redraw(false);
        shell.request_redraw(false);
        shell.request_redraw(false);
        assert_eq!(shell.redraws(), 0);
        shell.pump_events();
        assert_eq!(shell.redraws(), 1);
        shell.pump_events();
        assert_eq!(shell.redraws(), 1);
    }

    #[test]
    fn forced_redraw_is_immediate() {
        let mut shell = console("");
        shell.request_redraw(false);
        shell.request_redraw(true);
        assert_eq!(shell.redraws(), 1);
        shell.pump_events();
        assert_eq!(shell.redraws(), 1);
    }

    #[test]
    fn menu_returns_zero_based_choice() {
        let mut shell = console("2\n");
        assert_eq!(shell.choose_menu_item(&items(&["North", "South"])), Some(1));
        let out = output(&shell);
        assert!(out.contains("1) North"));
        assert!(out.contains("2) South"));
    }

    #[test]
    fn menu_lists_item_images() {
        let mut shell = console("1\n");
        let items = vec![MenuItem::new("Door").with_image("img/door.png"), MenuItem::new("Window")];
        assert_eq!(shell.choose_menu_item(&items), Some(0));
        let out = output(&shell);
        assert!(out.contains("1) Door [img/door.png]"));
        assert!(out.contains("2) Window\n"));
    }

    #[test]
    fn menu_retries_invalid_answers() {
        let mut shell = console("7\nwest\n1\n");
        assert_eq!(shell.choose_menu_item(&items(&["North", "South"])), Some(0));
        assert!(output(&shell).contains("'7' is not a menu entry"));
    }

    #[test]
    fn menu_cancel_on_empty_line_or_end_of_input() {
        let mut shell = console("\n");
        assert_eq!(shell.choose_menu_item(&items(&["North"])), None);
        let mut shell = console("");
        assert_eq!(shell.choose_menu_item(&items(&["North"])), None);
    }

    #[test]
    fn input_prompt() {
        let mut shell = console("Alice\n\n");
        assert_eq!(shell.prompt_input("Your name?", false), Some("Alice".to_string()));
        assert_eq!(shell.prompt_input("Bob", false), Some("Bob".to_string()));
        assert_eq!(shell.prompt_input("Bob", false), None);
    }

    #[test]
    fn message_waits_for_enter() {
        let mut shell = console("\nnext\n");
        shell.show_message("<b>Hello</b> &amp; welcome", true);
        assert!(output(&shell).contains("Hello & welcome"));
        assert_eq!(shell.read_line().as_deref(), Some("next"));
    }

    #[test]
    fn file_prompt_lists_extensions() {
        let mut shell = console("saves/one.sav\n\n");
        assert_eq!(
            shell.choose_file(FileRequest::SaveGame),
            Some(PathBuf::from("saves/one.sav"))
        );
        assert!(output(&shell).contains("*.sav"));
        assert_eq!(shell.choose_file(FileRequest::OpenGame), None);
    }

    #[test]
    fn panes_and_image_are_tracked() {
        let mut shell = console("");
        shell.show_pane(Pane::Objects, false);
        assert!(!shell.is_visible(Pane::Objects));
        assert!(shell.is_visible(Pane::Actions));
        shell.show_pane(Pane::Objects, true);
        assert!(shell.is_visible(Pane::Objects));

        shell.show_image(Some(Path::new("game/pic.png")));
        assert_eq!(shell.image(), Some(Path::new("game/pic.png")));
        shell.show_image(None);
        assert_eq!(shell.image(), None);
    }

    #[test]
    fn read_line_strips_line_endings() {
        let mut shell = console("play a.ogg\r\nquit\n");
        assert_eq!(shell.read_line().as_deref(), Some("play a.ogg"));
        assert_eq!(shell.read_line().as_deref(), Some("quit"));
        assert_eq!(shell.read_line(), None);
    }

    #[test]
    fn tags_are_stripped() {
        assert_eq!(strip_tags("<p>a&lt;b</p>"), "a<b");
        assert_eq!(strip_tags("no tags"), "no tags");
    }
}
