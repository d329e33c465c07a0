/// What one line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send(String),
    Restart,
    Summary,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> ChatCommand {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return ChatCommand::Send(line.to_string());
        }

        let name = trimmed.split_whitespace().next().unwrap_or(trimmed);
        match name {
            "/restart" | "/r" => ChatCommand::Restart,
            "/summary" | "/s" => ChatCommand::Summary,
            "/help" | "/h" | "/?" => ChatCommand::Help,
            "/quit" | "/q" | "/exit" => ChatCommand::Quit,
            other => ChatCommand::Unknown(other.to_string()),
        }
    }

    pub fn help_text() -> &'static str {
        "Type a message and press Enter to send it.\n\
         /restart  start the dialogue over\n\
         /summary  show your progress\n\
         /help     show this help\n\
         /quit     leave"
    }
}
