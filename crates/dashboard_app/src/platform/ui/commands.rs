use std::path::PathBuf;

use dashboard_core::{ProjectId, SortKey};

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Sort(SortKey),
    Open(ProjectId),
    Download(ProjectId),
    Duplicate(ProjectId),
    Delete(ProjectId),
    Upload(PathBuf),
    Reload,
    Retry,
    Dismiss,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "no command given"),
            CommandError::Unknown(word) => write!(f, "unknown command '{word}' (type 'help')"),
            CommandError::MissingArgument(usage) => write!(f, "usage: {usage}"),
        }
    }
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        // An empty search clears the filter.
        "search" | "find" => Ok(Command::Search(rest.to_string())),
        "sort" => required(rest, "sort <date-desc|date-asc|name-asc|name-desc>")
            .map(|key| Command::Sort(SortKey::parse_or_default(key))),
        "open" | "edit" => required(rest, "open <id>").map(|id| Command::Open(id.to_string())),
        "download" => {
            required(rest, "download <id>").map(|id| Command::Download(id.to_string()))
        }
        "duplicate" | "copy" => {
            required(rest, "duplicate <id>").map(|id| Command::Duplicate(id.to_string()))
        }
        "delete" | "rm" => required(rest, "delete <id>").map(|id| Command::Delete(id.to_string())),
        "upload" => {
            required(rest, "upload <path.docx>").map(|path| Command::Upload(PathBuf::from(path)))
        }
        "reload" | "refresh" => Ok(Command::Reload),
        "retry" => Ok(Command::Retry),
        "dismiss" => Ok(Command::Dismiss),
        "logout" => Ok(Command::Logout),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Only an explicit yes confirms a destructive action.
pub fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(usage))
    } else {
        Ok(rest)
    }
}
