use std::io::{self, Write};

use agora_core::{Message, MessageRenderer, Sender};
use crossterm::style::Stylize;

/// Line-oriented renderer: one line per message, notices prefixed with `!`.
pub struct TerminalRenderer {
    show_typing: bool,
}

impl TerminalRenderer {
    pub fn new(show_typing: bool) -> Self {
        Self { show_typing }
    }

    fn write_line(&self, line: String) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            log::warn!("Failed to write to terminal: {}", err);
        }
    }
}

impl MessageRenderer for TerminalRenderer {
    fn append(&self, message: &Message) {
        let line = match message.sender() {
            Sender::User => format!("{} {}", "you ›".bold().green(), message.text()),
            Sender::Ai => format!("{} {}", "ai  ›".bold().cyan(), message.text()),
        };
        self.write_line(line);
    }

    fn clear(&self) {
        self.write_line(format!("{}", "──────── new session ────────".dim()));
    }

    fn set_typing(&self, typing: bool) {
        if typing && self.show_typing {
            self.write_line(format!("{}", "ai is typing…".dim().italic()));
        }
    }

    fn notify(&self, text: &str) {
        self.write_line(format!("{} {}", "!".bold().yellow(), text.yellow()));
    }
}
